//! # Topology Editor
//!
//! Splits and joins girders when supports are added to or removed from the
//! bridge framing.
//!
//! Every edit runs in two phases. `prepare_*` looks everything up and does the
//! profile arithmetic without touching anything, so a refusal leaves the
//! girder, the timeline and the ID allocator as they were. `commit_*` then
//! allocates IDs, plans the timeline changes, restructures the girder,
//! reassigns spans and applies the timeline plan.
//!
//! ## Example
//!
//! ```rust
//! use splice_core::bridge::{BridgeFraming, TemporarySupportKind};
//! use splice_core::editor::TopologyEditor;
//! use splice_core::girder::SplicedGirder;
//! use splice_core::ids::{PierId, SequentialIds};
//! use splice_core::profile::VariationProfile;
//! use splice_core::timeline::Timeline;
//!
//! let mut bridge = BridgeFraming::from_pier_stations(&[0.0, 200.0]).unwrap();
//! let tower = bridge.add_temporary_support(80.0, TemporarySupportKind::ErectionTower).unwrap();
//! let mut timeline = Timeline::new();
//! let mut ids = SequentialIds::default();
//! let mut girder = SplicedGirder::new(PierId(0), PierId(1), &mut ids, VariationProfile::default());
//!
//! let mut editor = TopologyEditor::new(&bridge, &mut timeline, &mut ids);
//! editor.split_at_temporary_support(&mut girder, tower).unwrap();
//! assert_eq!(girder.segment_count(), 2);
//!
//! editor.join_at_temporary_support(&mut girder, tower).unwrap();
//! assert_eq!(girder.segment_count(), 1);
//! ```

use tracing::info;

use crate::bridge::BridgeTopology;
use crate::closure::{ClosureJoint, ClosureSupport};
use crate::errors::{GirderError, GirderResult};
use crate::girder::SplicedGirder;
use crate::ids::{ClosureId, IdAllocator, PierId, SegmentId, TemporarySupportId};
use crate::materials::ConcreteMaterial;
use crate::profile::VariationProfile;
use crate::segment::{EndBlock, SegmentEnd};
use crate::timeline::{plan_join, plan_split, TimelineManager};

/// A checked split, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSplit {
    pub support: ClosureSupport,
    /// Index of the segment being split
    pub segment_index: usize,
    pub segment: SegmentId,
    left_profile: VariationProfile,
    right_profile: VariationProfile,
}

/// A checked join, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedJoin {
    pub support: ClosureSupport,
    /// Index of the closure being removed
    pub closure_index: usize,
    pub closure: ClosureId,
    profile: VariationProfile,
    dependent_supports: Vec<TemporarySupportId>,
}

/// Result of a committed split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Index of the left segment; the new segment follows it
    pub segment_index: usize,
    pub new_segment: SegmentId,
    pub new_closure: ClosureId,
}

/// Result of a committed join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Index of the merged segment
    pub segment_index: usize,
    pub removed_segment: SegmentId,
    pub removed_closure: ClosureId,
}

/// Split/join operations with their collaborators.
pub struct TopologyEditor<'a> {
    bridge: &'a dyn BridgeTopology,
    timeline: &'a mut dyn TimelineManager,
    ids: &'a mut dyn IdAllocator,
    /// Concrete for a closure cast on a girder that has none yet
    closure_concrete: ConcreteMaterial,
}

impl<'a> TopologyEditor<'a> {
    pub fn new(
        bridge: &'a dyn BridgeTopology,
        timeline: &'a mut dyn TimelineManager,
        ids: &'a mut dyn IdAllocator,
    ) -> Self {
        TopologyEditor {
            bridge,
            timeline,
            ids,
            closure_concrete: ConcreteMaterial::default(),
        }
    }

    pub fn with_closure_concrete(mut self, concrete: ConcreteMaterial) -> Self {
        self.closure_concrete = concrete;
        self
    }

    // ========================================================================
    // Split
    // ========================================================================

    /// Check a split at `support` and compute both child profiles.
    pub fn prepare_split(&self, girder: &SplicedGirder, support: ClosureSupport) -> GirderResult<PreparedSplit> {
        let station_ft = self
            .bridge
            .support_station(support)
            .ok_or_else(|| GirderError::support_not_found(support.to_string()))?;
        let segment_index = girder
            .find_segment_at_station(station_ft, self.bridge)
            .ok_or_else(|| GirderError::SupportNotOnGirder {
                support: support.to_string(),
                station_ft,
            })?;
        let (start_ft, end_ft) = girder
            .segment_stations(segment_index, self.bridge)
            .ok_or_else(|| GirderError::invariant("segment stations vanished during split"))?;

        let segment = &girder.segments[segment_index];
        let (left_profile, right_profile) = segment.profile.split(end_ft - start_ft, station_ft - start_ft)?;

        Ok(PreparedSplit {
            support,
            segment_index,
            segment: segment.id,
            left_profile,
            right_profile,
        })
    }

    /// Apply a prepared split to the girder it was prepared on.
    pub fn commit_split(&mut self, girder: &mut SplicedGirder, prepared: PreparedSplit) -> GirderResult<SplitOutcome> {
        let index = prepared.segment_index;
        if girder.segments.get(index).map(|s| s.id) != Some(prepared.segment) {
            return Err(GirderError::invariant(format!(
                "girder changed since the split at {} was prepared",
                prepared.support
            )));
        }

        let new_segment_id = self.ids.next_segment_id();
        let new_closure_id = self.ids.next_closure_id();
        let plan = plan_split(
            &*self.timeline,
            prepared.segment,
            new_segment_id,
            new_closure_id,
            prepared.support,
        );

        let concrete = index
            .checked_sub(1)
            .and_then(|i| girder.closures.get(i))
            .or_else(|| girder.closures.get(index))
            .map(|c| c.concrete.clone())
            .unwrap_or_else(|| self.closure_concrete.clone());

        let original = &mut girder.segments[index];
        let new_segment = original.split_off(new_segment_id, prepared.right_profile);
        original.profile = prepared.left_profile;
        original.set_end_block(SegmentEnd::End, EndBlock::default());

        girder.segments.insert(index + 1, new_segment);
        girder
            .closures
            .insert(index, ClosureJoint::new(new_closure_id, prepared.support, concrete));
        girder.relink();
        girder.resolve_spans(self.bridge);
        plan.apply(&mut *self.timeline);

        info!(
            support = %prepared.support,
            segment = index,
            new_segment = new_segment_id.0,
            new_closure = new_closure_id.0,
            "segment split"
        );
        debug_assert!(girder.validate().is_ok());

        Ok(SplitOutcome {
            segment_index: index,
            new_segment: new_segment_id,
            new_closure: new_closure_id,
        })
    }

    /// Split the segment spanning `support`, placing a new closure on it.
    pub fn split_at_support(&mut self, girder: &mut SplicedGirder, support: ClosureSupport) -> GirderResult<SplitOutcome> {
        let prepared = self.prepare_split(girder, support)?;
        self.commit_split(girder, prepared)
    }

    pub fn split_at_pier(&mut self, girder: &mut SplicedGirder, pier: PierId) -> GirderResult<SplitOutcome> {
        self.split_at_support(girder, ClosureSupport::Pier(pier))
    }

    pub fn split_at_temporary_support(
        &mut self,
        girder: &mut SplicedGirder,
        support: TemporarySupportId,
    ) -> GirderResult<SplitOutcome> {
        self.split_at_support(girder, ClosureSupport::TemporarySupport(support))
    }

    // ========================================================================
    // Join
    // ========================================================================

    /// Check a join at `support` and compute the merged profile.
    ///
    /// The support must still be part of the bridge so both segment lengths
    /// are known.
    pub fn prepare_join(&self, girder: &SplicedGirder, support: ClosureSupport) -> GirderResult<PreparedJoin> {
        let closure_index = girder
            .find_closure(support)
            .ok_or_else(|| GirderError::ClosureNotFound {
                support: support.to_string(),
            })?;
        let left = closure_index;
        let right = closure_index + 1;

        let (start_ft, joint_ft) = girder
            .segment_stations(left, self.bridge)
            .ok_or_else(|| GirderError::support_not_found(support.to_string()))?;
        let (_, end_ft) = girder
            .segment_stations(right, self.bridge)
            .ok_or_else(|| GirderError::support_not_found(support.to_string()))?;

        let profile = VariationProfile::merge(
            &girder.segments[left].profile,
            joint_ft - start_ft,
            &girder.segments[right].profile,
            end_ft - joint_ft,
        )?;

        let mut dependent_supports: Vec<TemporarySupportId> = self
            .bridge
            .temporary_supports_between(start_ft, end_ft)
            .iter()
            .map(|ts| ts.id)
            .collect();
        for end_support in [
            girder.segment_support(left, SegmentEnd::Start),
            girder.segment_support(right, SegmentEnd::End),
        ] {
            if let Some(ClosureSupport::TemporarySupport(id)) = end_support {
                if !dependent_supports.contains(&id) {
                    dependent_supports.push(id);
                }
            }
        }

        Ok(PreparedJoin {
            support,
            closure_index,
            closure: girder.closures[closure_index].id,
            profile,
            dependent_supports,
        })
    }

    /// Apply a prepared join to the girder it was prepared on.
    pub fn commit_join(&mut self, girder: &mut SplicedGirder, prepared: PreparedJoin) -> GirderResult<JoinOutcome> {
        let index = prepared.closure_index;
        if girder.closures.get(index).map(|c| c.id) != Some(prepared.closure) {
            return Err(GirderError::invariant(format!(
                "girder changed since the join at {} was prepared",
                prepared.support
            )));
        }

        let plan = plan_join(
            &*self.timeline,
            girder.segments[index].id,
            girder.segments[index + 1].id,
            prepared.closure,
            &prepared.dependent_supports,
        );

        let right = girder.segments.remove(index + 1);
        let closure = girder.closures.remove(index);
        let merged = &mut girder.segments[index];
        merged.profile = prepared.profile;
        merged.set_end_block(SegmentEnd::End, *right.end_block(SegmentEnd::End));
        merged.span_end = right.span_end;

        girder.relink();
        girder.resolve_spans(self.bridge);
        plan.apply(&mut *self.timeline);

        info!(
            support = %prepared.support,
            segment = index,
            removed_segment = right.id.0,
            removed_closure = closure.id.0,
            "segments joined"
        );
        debug_assert!(girder.validate().is_ok());

        Ok(JoinOutcome {
            segment_index: index,
            removed_segment: right.id,
            removed_closure: closure.id,
        })
    }

    /// Remove the closure on `support`, merging the segments on either side.
    pub fn join_at_support(&mut self, girder: &mut SplicedGirder, support: ClosureSupport) -> GirderResult<JoinOutcome> {
        let prepared = self.prepare_join(girder, support)?;
        self.commit_join(girder, prepared)
    }

    pub fn join_at_pier(&mut self, girder: &mut SplicedGirder, pier: PierId) -> GirderResult<JoinOutcome> {
        self.join_at_support(girder, ClosureSupport::Pier(pier))
    }

    pub fn join_at_temporary_support(
        &mut self,
        girder: &mut SplicedGirder,
        support: TemporarySupportId,
    ) -> GirderResult<JoinOutcome> {
        self.join_at_support(girder, ClosureSupport::TemporarySupport(support))
    }
}
