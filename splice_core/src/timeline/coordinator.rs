//! Timeline changes that go with a split or a join.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{SegmentEvents, TimelineManager};
use crate::closure::ClosureSupport;
use crate::ids::{ClosureId, EventIndex, SegmentId, TemporarySupportId};

/// One request to the timeline manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineChange {
    SetSegmentEvents { segment: SegmentId, events: SegmentEvents },
    SetClosureCastEvent { closure: ClosureId, event: Option<EventIndex> },
    RemoveSegment(SegmentId),
    RemoveClosure(ClosureId),
}

/// Ordered timeline changes computed ahead of a girder edit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelinePlan {
    pub changes: Vec<TimelineChange>,
}

impl TimelinePlan {
    pub fn apply(&self, timeline: &mut dyn TimelineManager) {
        for change in &self.changes {
            match change {
                TimelineChange::SetSegmentEvents { segment, events } => {
                    timeline.set_segment_events(*segment, *events)
                }
                TimelineChange::SetClosureCastEvent { closure, event } => {
                    timeline.set_closure_cast_event(*closure, *event)
                }
                TimelineChange::RemoveSegment(segment) => timeline.remove_segment(*segment),
                TimelineChange::RemoveClosure(closure) => timeline.remove_closure(*closure),
            }
        }
    }
}

/// Plan for a split of `original` that creates `new_segment` and `new_closure`
/// at `support`.
///
/// The new segment is built and erected with the original. The closure is
/// cast at the first event already casting closures at the support, falling
/// back to the original segment's erection event.
pub fn plan_split(
    timeline: &dyn TimelineManager,
    original: SegmentId,
    new_segment: SegmentId,
    new_closure: ClosureId,
    support: ClosureSupport,
) -> TimelinePlan {
    let events = timeline.segment_events(original);
    let cast = timeline.closure_casting_event_for(support).or_else(|| {
        warn!(
            %support,
            fallback = ?events.erection,
            "no closure casting event at support, using segment erection event"
        );
        events.erection
    });
    TimelinePlan {
        changes: vec![
            TimelineChange::SetSegmentEvents {
                segment: new_segment,
                events,
            },
            TimelineChange::SetClosureCastEvent {
                closure: new_closure,
                event: cast,
            },
        ],
    }
}

/// Plan for joining `right` into `left` across `closure`.
///
/// `dependent_supports` are the temporary supports the merged segment still
/// rests on.
pub fn plan_join(
    timeline: &dyn TimelineManager,
    left: SegmentId,
    right: SegmentId,
    closure: ClosureId,
    dependent_supports: &[TemporarySupportId],
) -> TimelinePlan {
    let latest_support_erection = dependent_supports
        .iter()
        .filter_map(|ts| timeline.temporary_support_erection_event(*ts))
        .max();
    let events = merged_events(
        timeline.segment_events(left),
        timeline.segment_events(right),
        latest_support_erection,
    );
    TimelinePlan {
        changes: vec![
            TimelineChange::SetSegmentEvents { segment: left, events },
            TimelineChange::RemoveClosure(closure),
            TimelineChange::RemoveSegment(right),
        ],
    }
}

/// Earliest construction and erection of two segments, with erection held
/// back until the latest supporting tower is up.
pub fn merged_events(
    left: SegmentEvents,
    right: SegmentEvents,
    latest_support_erection: Option<EventIndex>,
) -> SegmentEvents {
    let earliest = |a: Option<EventIndex>, b: Option<EventIndex>| match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    };
    let erection = match (earliest(left.erection, right.erection), latest_support_erection) {
        (Some(erection), Some(support)) => Some(erection.max(support)),
        (erection, _) => erection,
    };
    SegmentEvents {
        construction: earliest(left.construction, right.construction),
        erection,
    }
}
