//! # Identifiers
//!
//! Newtype identifiers for the entities the girder model refers to. They
//! serialize as plain numbers so project files stay readable.
//!
//! Segment and closure IDs are stable: once handed out by an [`IdAllocator`]
//! they are never reused, even after the entity is removed by a join.
//!
//! ## Example
//!
//! ```rust
//! use splice_core::ids::{IdAllocator, SequentialIds};
//!
//! let mut ids = SequentialIds::default();
//! let a = ids.next_segment_id();
//! let b = ids.next_segment_id();
//! assert!(b > a);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs
// ============================================================================

/// Stable identity of a precast segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u64);

/// Stable identity of a closure joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosureId(pub u64);

/// Identity of a permanent pier in the bridge framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PierId(pub u64);

/// Identity of a temporary support (erection tower or strong back)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemporarySupportId(pub u64);

// ============================================================================
// Indices
// ============================================================================

/// Zero-based span index, counted from the first pier of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanIndex(pub usize);

/// Zero-based index of an event in the construction timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventIndex(pub usize);

impl SpanIndex {
    /// The span after this one
    pub fn next(self) -> SpanIndex {
        SpanIndex(self.0 + 1)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment {}", self.0)
    }
}

impl fmt::Display for ClosureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure {}", self.0)
    }
}

impl fmt::Display for PierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pier {}", self.0)
    }
}

impl fmt::Display for TemporarySupportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Temporary Support {}", self.0)
    }
}

impl fmt::Display for SpanIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span {}", self.0 + 1)
    }
}

// ============================================================================
// Allocation
// ============================================================================

/// Source of new stable IDs.
///
/// Implementations must return strictly increasing values and never hand out
/// an ID twice.
pub trait IdAllocator {
    fn next_segment_id(&mut self) -> SegmentId;
    fn next_closure_id(&mut self) -> ClosureId;
}

/// Counter-based allocator persisted with the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequentialIds {
    /// Next segment ID to hand out
    pub next_segment: u64,
    /// Next closure ID to hand out
    pub next_closure: u64,
}

impl SequentialIds {
    /// Bump the counters past IDs already in use (after loading a girder that
    /// was built elsewhere).
    pub fn reserve_past(&mut self, segment: Option<SegmentId>, closure: Option<ClosureId>) {
        if let Some(SegmentId(id)) = segment {
            self.next_segment = self.next_segment.max(id + 1);
        }
        if let Some(ClosureId(id)) = closure {
            self.next_closure = self.next_closure.max(id + 1);
        }
    }
}

impl IdAllocator for SequentialIds {
    fn next_segment_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_segment);
        self.next_segment += 1;
        id
    }

    fn next_closure_id(&mut self) -> ClosureId {
        let id = ClosureId(self.next_closure);
        self.next_closure += 1;
        id
    }
}
