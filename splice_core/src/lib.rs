//! # splice_core - Spliced Girder Topology & Geometry
//!
//! `splice_core` models spliced precast girders: chains of precast segments
//! joined by cast-in-place closure joints over piers and temporary supports.
//! It keeps the segment/closure sequence consistent while supports are added
//! and removed, carries each segment's depth variation through those edits,
//! and tells the construction timeline what changed. All data types are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Refuse before mutating**: every edit is checked in full before the
//!   girder, the timeline or the ID counters are touched
//! - **Owned sequences**: a girder owns its segments and closures; cross
//!   references are IDs rebuilt by `relink()`
//! - **Injected collaborators**: bridge framing, timeline and ID allocation
//!   are traits passed to each edit
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use splice_core::project::{FramingEdit, SplicedProject};
//! use splice_core::ids::PierId;
//!
//! let mut project = SplicedProject::new("John Engineer", "25-001", "Acme DOT");
//! for station in [0.0, 180.0, 360.0] {
//!     project.bridge.add_pier(station).unwrap();
//! }
//! let girder = project.add_girder(PierId(0), PierId(2));
//! project.apply_framing_edit(FramingEdit::split_at_pier(PierId(1))).unwrap();
//! assert_eq!(project.get_girder(&girder).unwrap().closure_count(), 1);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`girder`] - Segment/closure sequence and support queries
//! - [`editor`] - Split and join at piers and temporary supports
//! - [`profile`] - Segment depth variation, split and merge
//! - [`spans`] - Span assignment for segment ends
//! - [`timeline`] - Construction timeline and edit coordination
//! - [`bridge`] - Pier and temporary support framing
//! - [`project`] - Project container, metadata, and settings
//! - [`file_io`] - Atomic saves and checked loads
//! - [`errors`] - Structured error types

pub mod bridge;
pub mod closure;
pub mod editor;
pub mod errors;
pub mod file_io;
pub mod girder;
pub mod ids;
pub mod materials;
pub mod profile;
pub mod project;
pub mod segment;
pub mod spans;
pub mod timeline;

// Re-export commonly used types at crate root for convenience
pub use bridge::{BridgeFraming, BridgeTopology};
pub use closure::{ClosureJoint, ClosureSupport};
pub use editor::TopologyEditor;
pub use errors::{GirderError, GirderResult};
pub use file_io::{load_project, save_project};
pub use girder::SplicedGirder;
pub use profile::{SegmentVariation, VariationProfile};
pub use project::{FramingEdit, GlobalSettings, ProjectMetadata, SplicedProject};
pub use segment::Segment;
pub use timeline::{Timeline, TimelineManager};
