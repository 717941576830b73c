//! # Segment and Closure Data
//!
//! Material, reinforcement and handling payload carried by segments and
//! closure joints.
//!
//! ## Example
//!
//! ```rust
//! use splice_core::materials::{ConcreteMaterial, SegmentMaterial};
//!
//! let material = SegmentMaterial {
//!     concrete: ConcreteMaterial::normal_weight(10000.0, 7000.0),
//!     ..SegmentMaterial::default()
//! };
//! assert_eq!(material.concrete.fc_psi, 10000.0);
//! ```

pub mod concrete;
pub mod reinforcement;

pub use concrete::{ConcreteMaterial, ConcreteType, CuringMethod, SegmentMaterial};
pub use reinforcement::{
    HandlingData, LongitudinalRebar, RebarFace, RebarRow, ShearData, ShearZone, StrandLayout,
};
