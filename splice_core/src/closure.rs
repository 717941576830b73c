//! # Closure Joints
//!
//! Cast-in-place joints between adjacent segments. Each joint sits on exactly
//! one pier or temporary support.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ClosureId, PierId, SegmentId, TemporarySupportId};
use crate::materials::ConcreteMaterial;

/// Support a closure joint is cast over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum ClosureSupport {
    Pier(PierId),
    TemporarySupport(TemporarySupportId),
}

impl fmt::Display for ClosureSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosureSupport::Pier(id) => write!(f, "{}", id),
            ClosureSupport::TemporarySupport(id) => write!(f, "{}", id),
        }
    }
}

/// Closure joint between two segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureJoint {
    /// Stable identity, never reused
    pub id: ClosureId,

    /// Position in the girder, recomputed after every structural edit
    pub index: usize,

    pub support: ClosureSupport,

    pub concrete: ConcreteMaterial,

    /// Segment on the left, set by relinking
    pub left_segment: Option<SegmentId>,

    /// Segment on the right, set by relinking
    pub right_segment: Option<SegmentId>,
}

impl ClosureJoint {
    pub fn new(id: ClosureId, support: ClosureSupport, concrete: ConcreteMaterial) -> Self {
        ClosureJoint {
            id,
            index: 0,
            support,
            concrete,
            left_segment: None,
            right_segment: None,
        }
    }
}
