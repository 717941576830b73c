//! # Construction Timeline
//!
//! Segments are constructed and erected, and closures cast, at events of the
//! construction timeline. The girder model reaches the timeline only through
//! the [`TimelineManager`] trait; [`Timeline`] is the in-memory implementation
//! persisted with a project.
//!
//! Split and join compute a [`TimelinePlan`] before the girder is touched and
//! apply it afterwards, so a refused edit leaves the timeline unchanged.

mod coordinator;
mod schedule;

use serde::{Deserialize, Serialize};

use crate::closure::ClosureSupport;
use crate::ids::{ClosureId, EventIndex, SegmentId, TemporarySupportId};

pub use coordinator::{merged_events, plan_join, plan_split, TimelineChange, TimelinePlan};
pub use schedule::{CastClosureActivity, Timeline, TimelineEvent};

/// Construction and erection events of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentEvents {
    pub construction: Option<EventIndex>,
    pub erection: Option<EventIndex>,
}

/// Scheduling operations the girder editor needs.
pub trait TimelineManager {
    fn segment_events(&self, segment: SegmentId) -> SegmentEvents;

    fn set_segment_events(&mut self, segment: SegmentId, events: SegmentEvents);

    fn closure_cast_event(&self, closure: ClosureId) -> Option<EventIndex>;

    fn set_closure_cast_event(&mut self, closure: ClosureId, event: Option<EventIndex>);

    /// Drop every reference to a segment
    fn remove_segment(&mut self, segment: SegmentId);

    /// Drop every reference to a closure
    fn remove_closure(&mut self, closure: ClosureId);

    /// First event with an enabled closure-casting activity at `support`
    fn closure_casting_event_for(&self, support: ClosureSupport) -> Option<EventIndex>;

    fn temporary_support_erection_event(&self, support: TemporarySupportId) -> Option<EventIndex>;
}
