//! # Spliced Girder
//!
//! The girder aggregate: segments in physical left-to-right order with exactly
//! one closure joint between each consecutive pair.
//!
//! ```text
//! start pier                                                    end pier
//!     |== segment 0 ==|C0|== segment 1 ==|C1|== segment 2 ==|
//! ```
//!
//! `segments[i]` is bounded on the right by `closures[i]`, which is bounded
//! on the right by `segments[i + 1]`. The girder owns both sequences and
//! changes them together; adjacency references on each element are rebuilt
//! from sequence order by [`SplicedGirder::relink`].
//!
//! ## Example
//!
//! ```rust
//! use splice_core::bridge::{BridgeFraming, TemporarySupportKind};
//! use splice_core::closure::ClosureSupport;
//! use splice_core::girder::SplicedGirder;
//! use splice_core::ids::{PierId, SequentialIds, TemporarySupportId};
//! use splice_core::materials::ConcreteMaterial;
//! use splice_core::profile::VariationProfile;
//!
//! let mut bridge = BridgeFraming::from_pier_stations(&[0.0, 300.0]).unwrap();
//! bridge.add_temporary_support(100.0, TemporarySupportKind::ErectionTower).unwrap();
//! bridge.add_temporary_support(200.0, TemporarySupportKind::ErectionTower).unwrap();
//!
//! let mut ids = SequentialIds::default();
//! let profile = VariationProfile::constant(6.0, 0.75);
//! let mut girder = SplicedGirder::new(PierId(0), PierId(1), &mut ids, profile.clone());
//!
//! girder
//!     .resize(3, &bridge, &mut ids, &profile, &ConcreteMaterial::default(), |i| {
//!         ClosureSupport::TemporarySupport(TemporarySupportId(i as u64))
//!     })
//!     .unwrap();
//! assert_eq!(girder.segment_count(), 3);
//! assert_eq!(girder.closure_count(), 2);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bridge::{BridgeTopology, TemporarySupportInfo, TemporarySupportKind};
use crate::closure::{ClosureJoint, ClosureSupport};
use crate::errors::{GirderError, GirderResult};
use crate::ids::{IdAllocator, PierId};
use crate::materials::ConcreteMaterial;
use crate::profile::{SegmentVariation, VariationProfile, TOLERANCE};
use crate::segment::{Segment, SegmentEnd};

/// Precast girder made of segments joined by cast-in-place closures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplicedGirder {
    /// Pier at the girder's left end
    pub start_pier: PierId,

    /// Pier at the girder's right end
    pub end_pier: PierId,

    pub(crate) segments: Vec<Segment>,
    pub(crate) closures: Vec<ClosureJoint>,
}

impl SplicedGirder {
    /// Create a single-segment girder between two piers.
    pub fn new(start_pier: PierId, end_pier: PierId, ids: &mut dyn IdAllocator, profile: VariationProfile) -> Self {
        let mut girder = SplicedGirder {
            start_pier,
            end_pier,
            segments: vec![Segment::new(ids.next_segment_id(), profile)],
            closures: Vec::new(),
        };
        girder.relink();
        girder
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn closures(&self) -> &[ClosureJoint] {
        &self.closures
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Mutable access to segment data. Structure changes go through the
    /// girder's edit operations.
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    pub fn closure(&self, index: usize) -> Option<&ClosureJoint> {
        self.closures.get(index)
    }

    pub fn closure_mut(&mut self, index: usize) -> Option<&mut ClosureJoint> {
        self.closures.get_mut(index)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn closure_count(&self) -> usize {
        self.closures.len()
    }

    /// Grow or shrink the girder at its right end.
    ///
    /// New segments take `profile` and get fresh IDs from `ids`; each new
    /// closure is placed on `support_for(closure_index)` and cast from
    /// `closure_concrete`. Shrinking drops the trailing segments with their
    /// closures. Span references are resolved against `bridge` afterwards.
    pub fn resize(
        &mut self,
        target_segment_count: usize,
        bridge: &dyn BridgeTopology,
        ids: &mut dyn IdAllocator,
        profile: &VariationProfile,
        closure_concrete: &ConcreteMaterial,
        mut support_for: impl FnMut(usize) -> ClosureSupport,
    ) -> GirderResult<()> {
        if target_segment_count == 0 {
            return Err(GirderError::invalid_input(
                "target_segment_count",
                "0",
                "A girder has at least one segment",
            ));
        }

        let current = self.segments.len();
        if target_segment_count < current {
            self.segments.truncate(target_segment_count);
            self.closures.truncate(target_segment_count - 1);
        } else {
            for _ in current..target_segment_count {
                let closure_index = self.closures.len();
                let closure = ClosureJoint::new(
                    ids.next_closure_id(),
                    support_for(closure_index),
                    closure_concrete.clone(),
                );
                self.closures.push(closure);
                self.segments
                    .push(Segment::new(ids.next_segment_id(), profile.clone()));
            }
        }
        self.relink();
        self.resolve_spans(bridge);

        info!(
            from = current,
            to = target_segment_count,
            "girder resized"
        );
        debug_assert!(self.validate().is_ok());
        Ok(())
    }

    /// Rebuild indices and adjacency references from sequence order.
    pub fn relink(&mut self) {
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.index = i;
            segment.closure_start = i.checked_sub(1).and_then(|c| self.closures.get(c)).map(|c| c.id);
            segment.closure_end = self.closures.get(i).map(|c| c.id);
        }
        for (i, closure) in self.closures.iter_mut().enumerate() {
            closure.index = i;
            closure.left_segment = self.segments.get(i).map(|s| s.id);
            closure.right_segment = self.segments.get(i + 1).map(|s| s.id);
        }
    }

    /// Check the segment/closure sequences for consistency.
    pub fn validate(&self) -> GirderResult<()> {
        if self.segments.is_empty() {
            return Err(GirderError::invariant("girder has no segments"));
        }
        if self.closures.len() != self.segments.len() - 1 {
            return Err(GirderError::invariant(format!(
                "{} segments require {} closures, found {}",
                self.segments.len(),
                self.segments.len() - 1,
                self.closures.len()
            )));
        }

        let mut segment_ids = HashSet::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if !segment_ids.insert(segment.id) {
                return Err(GirderError::invariant(format!("duplicate {}", segment.id)));
            }
            if segment.index != i {
                return Err(GirderError::invariant(format!(
                    "{} has index {} at position {}",
                    segment.id, segment.index, i
                )));
            }
            let expected_start = i.checked_sub(1).map(|c| self.closures[c].id);
            let expected_end = self.closures.get(i).map(|c| c.id);
            if segment.closure_start != expected_start || segment.closure_end != expected_end {
                return Err(GirderError::invariant(format!(
                    "{} is not linked to its neighbouring closures",
                    segment.id
                )));
            }
        }

        let mut closure_ids = HashSet::new();
        let mut supports = HashSet::new();
        for (i, closure) in self.closures.iter().enumerate() {
            if !closure_ids.insert(closure.id) {
                return Err(GirderError::invariant(format!("duplicate {}", closure.id)));
            }
            if !supports.insert(closure.support) {
                return Err(GirderError::invariant(format!(
                    "more than one closure at {}",
                    closure.support
                )));
            }
            if closure.index != i
                || closure.left_segment != Some(self.segments[i].id)
                || closure.right_segment != Some(self.segments[i + 1].id)
            {
                return Err(GirderError::invariant(format!(
                    "{} is not linked to its neighbouring segments",
                    closure.id
                )));
            }
        }
        Ok(())
    }

    /// Support at one end of a segment. Girder ends sit on piers.
    pub fn segment_support(&self, index: usize, end: SegmentEnd) -> Option<ClosureSupport> {
        if index >= self.segments.len() {
            return None;
        }
        match end {
            SegmentEnd::Start if index == 0 => Some(ClosureSupport::Pier(self.start_pier)),
            SegmentEnd::Start => Some(self.closures[index - 1].support),
            SegmentEnd::End if index + 1 == self.segments.len() => Some(ClosureSupport::Pier(self.end_pier)),
            SegmentEnd::End => Some(self.closures[index].support),
        }
    }

    /// Start and end stations of a segment, if both supports can be located.
    pub fn segment_stations(&self, index: usize, bridge: &dyn BridgeTopology) -> Option<(f64, f64)> {
        let start = bridge.support_station(self.segment_support(index, SegmentEnd::Start)?)?;
        let end = bridge.support_station(self.segment_support(index, SegmentEnd::End)?)?;
        Some((start, end))
    }

    pub fn segment_length(&self, index: usize, bridge: &dyn BridgeTopology) -> Option<f64> {
        self.segment_stations(index, bridge).map(|(start, end)| end - start)
    }

    /// Total length between the girder's end piers
    pub fn length(&self, bridge: &dyn BridgeTopology) -> Option<f64> {
        Some(bridge.pier_station(self.end_pier)? - bridge.pier_station(self.start_pier)?)
    }

    /// Segment whose station range strictly contains `station_ft`.
    pub fn find_segment_at_station(&self, station_ft: f64, bridge: &dyn BridgeTopology) -> Option<usize> {
        (0..self.segments.len()).find(|i| match self.segment_stations(*i, bridge) {
            Some((start, end)) => start + TOLERANCE < station_ft && station_ft < end - TOLERANCE,
            None => false,
        })
    }

    /// Index of the closure cast over `support`
    pub fn find_closure(&self, support: ClosureSupport) -> Option<usize> {
        self.closures.iter().position(|c| c.support == support)
    }

    /// Temporary supports strictly inside a segment
    pub fn temporary_supports_within(&self, index: usize, bridge: &dyn BridgeTopology) -> Vec<TemporarySupportInfo> {
        match self.segment_stations(index, bridge) {
            Some((start, end)) => bridge.temporary_supports_between(start, end),
            None => Vec::new(),
        }
    }

    /// A drop-in segment hangs from strong backs at both ends.
    pub fn is_drop_in(&self, index: usize, bridge: &dyn BridgeTopology) -> bool {
        let strong_back = |end| match self.segment_support(index, end) {
            Some(ClosureSupport::TemporarySupport(id)) => bridge
                .temporary_support(id)
                .is_some_and(|ts| ts.kind == TemporarySupportKind::StrongBack),
            _ => false,
        };
        strong_back(SegmentEnd::Start) && strong_back(SegmentEnd::End)
    }

    /// Replace a segment's profile and carry its end depths to the touching
    /// ends of the neighbouring segments.
    pub fn set_segment_profile(
        &mut self,
        index: usize,
        profile: VariationProfile,
        bridge: &dyn BridgeTopology,
    ) -> GirderResult<()> {
        if index >= self.segments.len() {
            return Err(GirderError::invalid_input(
                "index",
                index.to_string(),
                format!("Girder has {} segments", self.segments.len()),
            ));
        }
        if let Some(length) = self.segment_length(index, bridge) {
            profile.validate(length)?;
        }

        let start_depth = profile.end_zone_depth(SegmentEnd::Start);
        let end_depth = profile.end_zone_depth(SegmentEnd::End);
        self.segments[index].profile = profile;

        if let Some(prev) = index.checked_sub(1).and_then(|i| self.segments.get_mut(i)) {
            if prev.profile.variation != SegmentVariation::General {
                prev.profile.set_end_depth(SegmentEnd::End, start_depth);
            }
        }
        if let Some(next) = self.segments.get_mut(index + 1) {
            if next.profile.variation != SegmentVariation::General {
                next.profile.set_end_depth(SegmentEnd::Start, end_depth);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeFraming;
    use crate::ids::{SegmentId, SequentialIds, SpanIndex, TemporarySupportId};
    use crate::profile::{SectionDepth, SegmentVariation, SegmentZone};

    fn ts(i: usize) -> ClosureSupport {
        ClosureSupport::TemporarySupport(TemporarySupportId(i as u64))
    }

    /// Piers at 0 and 300, towers at 100 and 200 carrying the closures
    fn three_segment_setup() -> (BridgeFraming, SplicedGirder, SequentialIds) {
        let mut bridge = BridgeFraming::from_pier_stations(&[0.0, 300.0]).unwrap();
        bridge
            .add_temporary_support(100.0, TemporarySupportKind::ErectionTower)
            .unwrap();
        bridge
            .add_temporary_support(200.0, TemporarySupportKind::ErectionTower)
            .unwrap();
        let mut ids = SequentialIds::default();
        let profile = VariationProfile::constant(6.0, 0.75);
        let mut girder = SplicedGirder::new(PierId(0), PierId(1), &mut ids, profile.clone());
        girder
            .resize(3, &bridge, &mut ids, &profile, &ConcreteMaterial::default(), ts)
            .unwrap();
        (bridge, girder, ids)
    }

    #[test]
    fn test_closure_count_follows_segments() {
        let (bridge, mut girder, mut ids) = three_segment_setup();
        assert_eq!(girder.closure_count(), 2);

        let profile = VariationProfile::default();
        let concrete = ConcreteMaterial::default();
        girder.resize(1, &bridge, &mut ids, &profile, &concrete, ts).unwrap();
        assert_eq!(girder.segment_count(), 1);
        assert_eq!(girder.closure_count(), 0);
        assert!(girder.validate().is_ok());

        assert!(girder.resize(0, &bridge, &mut ids, &profile, &concrete, ts).is_err());
    }

    #[test]
    fn test_resize_never_reuses_ids() {
        let (bridge, mut girder, mut ids) = three_segment_setup();
        let profile = VariationProfile::default();
        let concrete = ConcreteMaterial::default();
        girder.resize(2, &bridge, &mut ids, &profile, &concrete, ts).unwrap();
        girder.resize(3, &bridge, &mut ids, &profile, &concrete, ts).unwrap();
        assert_eq!(girder.segment(2).unwrap().id, SegmentId(3));
    }

    #[test]
    fn test_resize_refreshes_spans() {
        let mut bridge = BridgeFraming::from_pier_stations(&[0.0, 100.0, 200.0]).unwrap();
        bridge
            .add_temporary_support(150.0, TemporarySupportKind::ErectionTower)
            .unwrap();
        let mut ids = SequentialIds::default();
        let profile = VariationProfile::default();
        let concrete = ConcreteMaterial::normal_weight(9000.0, 6000.0);
        let mut girder = SplicedGirder::new(PierId(0), PierId(2), &mut ids, profile.clone());

        girder.resize(2, &bridge, &mut ids, &profile, &concrete, ts).unwrap();
        let first = girder.segment(0).unwrap();
        assert_eq!((first.span_start, first.span_end), (Some(SpanIndex(0)), Some(SpanIndex(1))));
        let added = girder.segment(1).unwrap();
        assert_eq!((added.span_start, added.span_end), (Some(SpanIndex(1)), Some(SpanIndex(1))));
        assert_eq!(girder.closure(0).unwrap().concrete, concrete);

        // the remaining segment runs to the end pier again
        girder.resize(1, &bridge, &mut ids, &profile, &concrete, ts).unwrap();
        let only = girder.segment(0).unwrap();
        assert_eq!((only.span_start, only.span_end), (Some(SpanIndex(0)), Some(SpanIndex(1))));
    }

    #[test]
    fn test_relink_is_idempotent() {
        let (_, mut girder, _) = three_segment_setup();
        let before = girder.clone();
        girder.relink();
        girder.relink();
        assert_eq!(girder, before);

        let first = girder.segment(0).unwrap();
        assert_eq!(first.closure_start, None);
        assert_eq!(first.closure_end, Some(girder.closure(0).unwrap().id));
        let last = girder.segment(2).unwrap();
        assert_eq!(last.closure_end, None);
    }

    #[test]
    fn test_validate_detects_broken_links() {
        let (_, mut girder, _) = three_segment_setup();
        girder.closures[1].left_segment = None;
        let err = girder.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVARIANT_VIOLATION");

        girder.relink();
        assert!(girder.validate().is_ok());

        girder.closures.pop();
        assert!(girder.validate().is_err());
    }

    #[test]
    fn test_segment_stations() {
        let (bridge, girder, _) = three_segment_setup();
        assert_eq!(girder.segment_stations(0, &bridge), Some((0.0, 100.0)));
        assert_eq!(girder.segment_stations(1, &bridge), Some((100.0, 200.0)));
        assert_eq!(girder.segment_stations(2, &bridge), Some((200.0, 300.0)));
        assert_eq!(girder.length(&bridge), Some(300.0));
        assert_eq!(girder.find_segment_at_station(150.0, &bridge), Some(1));
        assert_eq!(girder.find_segment_at_station(100.0, &bridge), None);
        assert_eq!(girder.find_closure(ts(1)), Some(1));
    }

    #[test]
    fn test_drop_in_segment() {
        let mut bridge = BridgeFraming::from_pier_stations(&[0.0, 300.0]).unwrap();
        bridge
            .add_temporary_support(100.0, TemporarySupportKind::StrongBack)
            .unwrap();
        bridge
            .add_temporary_support(200.0, TemporarySupportKind::StrongBack)
            .unwrap();
        let mut ids = SequentialIds::default();
        let profile = VariationProfile::default();
        let mut girder = SplicedGirder::new(PierId(0), PierId(1), &mut ids, profile.clone());
        girder
            .resize(3, &bridge, &mut ids, &profile, &ConcreteMaterial::default(), ts)
            .unwrap();

        assert!(girder.is_drop_in(1, &bridge));
        assert!(!girder.is_drop_in(0, &bridge));
        assert!(!girder.is_drop_in(2, &bridge));
    }

    #[test]
    fn test_temporary_supports_within() {
        let (mut bridge, girder, _) = three_segment_setup();
        bridge
            .add_temporary_support(150.0, TemporarySupportKind::ErectionTower)
            .unwrap();
        let inside = girder.temporary_supports_within(1, &bridge);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].station_ft, 150.0);
        assert!(girder.temporary_supports_within(0, &bridge).is_empty());
    }

    #[test]
    fn test_set_segment_profile_matches_neighbours() {
        let (bridge, mut girder, _) = three_segment_setup();
        let haunched = VariationProfile::single(SegmentVariation::Linear, (10.0, 8.0), (10.0, 7.0), 0.75);
        girder.set_segment_profile(1, haunched, &bridge).unwrap();

        let left = &girder.segment(0).unwrap().profile;
        let right = &girder.segment(2).unwrap().profile;
        // neighbours are prismatic, so they take the touching depth throughout
        assert_eq!(left.end_zone_depth(SegmentEnd::End), SectionDepth::new(8.0, 0.75));
        assert_eq!(right.end_zone_depth(SegmentEnd::Start), SectionDepth::new(7.0, 0.75));
        assert_eq!(
            girder.segment(1).unwrap().profile.zone(SegmentZone::LeftPrismatic).height_ft,
            8.0
        );
    }

    #[test]
    fn test_set_segment_profile_rejects_overlong_zones() {
        let (bridge, mut girder, _) = three_segment_setup();
        let before = girder.clone();
        let too_long = VariationProfile::single(SegmentVariation::Linear, (60.0, 8.0), (60.0, 7.0), 0.75);
        assert!(girder.set_segment_profile(1, too_long, &bridge).is_err());
        assert_eq!(girder, before);
    }

    #[test]
    fn test_girder_serialization() {
        let (_, girder, _) = three_segment_setup();
        let json = serde_json::to_string(&girder).unwrap();
        let roundtrip: SplicedGirder = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, girder);
    }
}
