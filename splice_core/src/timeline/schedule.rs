use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{SegmentEvents, TimelineManager};
use crate::closure::ClosureSupport;
use crate::errors::{GirderError, GirderResult};
use crate::ids::{ClosureId, EventIndex, PierId, SegmentId, TemporarySupportId};

/// Closure casting at an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastClosureActivity {
    pub enabled: bool,

    /// Supports where closures are cast at this event
    pub piers: BTreeSet<PierId>,
    pub temporary_supports: BTreeSet<TemporarySupportId>,

    /// Closure joints assigned to this event
    pub closures: BTreeSet<ClosureId>,

    /// Concrete age when continuity is achieved (days)
    pub concrete_age_at_continuity_days: f64,
}

impl Default for CastClosureActivity {
    fn default() -> Self {
        CastClosureActivity {
            enabled: false,
            piers: BTreeSet::new(),
            temporary_supports: BTreeSet::new(),
            closures: BTreeSet::new(),
            concrete_age_at_continuity_days: 7.0,
        }
    }
}

impl CastClosureActivity {
    pub fn references(&self, support: ClosureSupport) -> bool {
        match support {
            ClosureSupport::Pier(id) => self.piers.contains(&id),
            ClosureSupport::TemporarySupport(id) => self.temporary_supports.contains(&id),
        }
    }
}

/// One event of the construction timeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub description: String,

    /// Elapsed time from the start of construction (days)
    pub day: f64,

    pub construct_segments: BTreeSet<SegmentId>,
    pub erect_segments: BTreeSet<SegmentId>,
    pub erect_temporary_supports: BTreeSet<TemporarySupportId>,
    pub remove_temporary_supports: BTreeSet<TemporarySupportId>,
    pub cast_closure_joints: CastClosureActivity,
}

/// In-memory construction timeline with events in chronological order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn event(&self, index: EventIndex) -> Option<&TimelineEvent> {
        self.events.get(index.0)
    }

    pub fn event_mut(&mut self, index: EventIndex) -> Option<&mut TimelineEvent> {
        self.events.get_mut(index.0)
    }

    /// Append an event. Days must not decrease.
    pub fn add_event(&mut self, description: impl Into<String>, day: f64) -> GirderResult<EventIndex> {
        if !day.is_finite() || day < 0.0 {
            return Err(GirderError::invalid_input("day", day.to_string(), "Day must be non-negative"));
        }
        if let Some(last) = self.events.last() {
            if day < last.day {
                return Err(GirderError::invalid_input(
                    "day",
                    day.to_string(),
                    format!("Events are chronological; the last event is on day {}", last.day),
                ));
            }
        }
        self.events.push(TimelineEvent {
            description: description.into(),
            day,
            ..TimelineEvent::default()
        });
        Ok(EventIndex(self.events.len() - 1))
    }

    fn first_event(&self, pred: impl Fn(&TimelineEvent) -> bool) -> Option<EventIndex> {
        self.events.iter().position(pred).map(EventIndex)
    }

    fn event_in_range(&mut self, index: EventIndex, what: &str) -> Option<&mut TimelineEvent> {
        let count = self.events.len();
        let event = self.events.get_mut(index.0);
        if event.is_none() {
            warn!(event = index.0, events = count, what, "event index out of range, ignored");
        }
        event
    }
}

impl TimelineManager for Timeline {
    fn segment_events(&self, segment: SegmentId) -> SegmentEvents {
        SegmentEvents {
            construction: self.first_event(|e| e.construct_segments.contains(&segment)),
            erection: self.first_event(|e| e.erect_segments.contains(&segment)),
        }
    }

    fn set_segment_events(&mut self, segment: SegmentId, events: SegmentEvents) {
        for event in self.events.iter_mut() {
            event.construct_segments.remove(&segment);
            event.erect_segments.remove(&segment);
        }
        if let Some(index) = events.construction {
            if let Some(event) = self.event_in_range(index, "segment construction") {
                event.construct_segments.insert(segment);
            }
        }
        if let Some(index) = events.erection {
            if let Some(event) = self.event_in_range(index, "segment erection") {
                event.erect_segments.insert(segment);
            }
        }
    }

    fn closure_cast_event(&self, closure: ClosureId) -> Option<EventIndex> {
        self.first_event(|e| e.cast_closure_joints.closures.contains(&closure))
    }

    fn set_closure_cast_event(&mut self, closure: ClosureId, event: Option<EventIndex>) {
        self.remove_closure(closure);
        if let Some(index) = event {
            if let Some(event) = self.event_in_range(index, "closure casting") {
                event.cast_closure_joints.enabled = true;
                event.cast_closure_joints.closures.insert(closure);
            }
        }
    }

    fn remove_segment(&mut self, segment: SegmentId) {
        for event in self.events.iter_mut() {
            event.construct_segments.remove(&segment);
            event.erect_segments.remove(&segment);
        }
    }

    fn remove_closure(&mut self, closure: ClosureId) {
        for event in self.events.iter_mut() {
            event.cast_closure_joints.closures.remove(&closure);
        }
    }

    fn closure_casting_event_for(&self, support: ClosureSupport) -> Option<EventIndex> {
        self.first_event(|e| e.cast_closure_joints.enabled && e.cast_closure_joints.references(support))
    }

    fn temporary_support_erection_event(&self, support: TemporarySupportId) -> Option<EventIndex> {
        self.first_event(|e| e.erect_temporary_supports.contains(&support))
    }
}
