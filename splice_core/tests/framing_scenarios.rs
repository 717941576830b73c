//! End-to-end framing edits on a three-span girder line.

use approx::assert_relative_eq;
use splice_core::bridge::{BridgeFraming, BridgeTopology, TemporarySupportKind};
use splice_core::editor::TopologyEditor;
use splice_core::girder::SplicedGirder;
use splice_core::ids::{EventIndex, PierId, SequentialIds, SpanIndex, TemporarySupportId};
use splice_core::profile::{SegmentVariation, SegmentZone, VariationProfile, ZoneParameters};
use splice_core::segment::{EndBlock, SegmentEnd};
use splice_core::timeline::{SegmentEvents, Timeline, TimelineManager};

struct Model {
    bridge: BridgeFraming,
    timeline: Timeline,
    ids: SequentialIds,
    girder: SplicedGirder,
    towers: Vec<TemporarySupportId>,
}

impl Model {
    fn editor(&mut self) -> (TopologyEditor<'_>, &mut SplicedGirder) {
        (
            TopologyEditor::new(&self.bridge, &mut self.timeline, &mut self.ids),
            &mut self.girder,
        )
    }
}

/// Piers at 0, 120, 240, 360 with towers at 60, 180, 300. One girder from
/// the first to the last pier, split over both interior piers.
fn three_segment_model() -> Model {
    let mut bridge = BridgeFraming::from_pier_stations(&[0.0, 120.0, 240.0, 360.0]).unwrap();
    let towers = [60.0, 180.0, 300.0]
        .iter()
        .map(|s| {
            bridge
                .add_temporary_support(*s, TemporarySupportKind::ErectionTower)
                .unwrap()
        })
        .collect();

    let mut timeline = Timeline::new();
    timeline.add_event("Cast segments", 0.0).unwrap();
    timeline.add_event("Erect segments", 45.0).unwrap();
    timeline.add_event("Cast closures", 60.0).unwrap();

    let mut ids = SequentialIds::default();
    let profile = VariationProfile::constant(7.0, 0.75);
    let mut girder = SplicedGirder::new(PierId(0), PierId(3), &mut ids, profile);
    let first = girder.segment(0).unwrap().id;
    timeline.set_segment_events(
        first,
        SegmentEvents {
            construction: Some(EventIndex(0)),
            erection: Some(EventIndex(1)),
        },
    );

    let mut model = Model {
        bridge,
        timeline,
        ids,
        girder,
        towers,
    };
    let (mut editor, girder) = model.editor();
    editor.split_at_pier(girder, PierId(1)).unwrap();
    editor.split_at_pier(girder, PierId(2)).unwrap();
    model
}

#[test]
fn closures_track_segments_through_edits() {
    let mut model = three_segment_model();
    assert_eq!(model.girder.segment_count(), 3);
    assert_eq!(model.girder.closure_count(), 2);

    let towers = model.towers.clone();
    let (mut editor, girder) = model.editor();
    for tower in &towers {
        editor.split_at_temporary_support(girder, *tower).unwrap();
        assert_eq!(girder.closure_count(), girder.segment_count() - 1);
    }
    assert_eq!(girder.segment_count(), 6);

    editor.join_at_pier(girder, PierId(1)).unwrap();
    editor.join_at_temporary_support(girder, towers[2]).unwrap();
    assert_eq!(girder.segment_count(), 4);
    assert_eq!(girder.closure_count(), 3);
    assert!(girder.validate().is_ok());
}

#[test]
fn join_three_segments_into_two() {
    let mut model = three_segment_model();
    let old_right = model.girder.segment(1).unwrap().clone();
    assert_eq!(old_right.span_end, Some(SpanIndex(1)));

    let (mut editor, girder) = model.editor();
    let outcome = editor.join_at_pier(girder, PierId(1)).unwrap();

    assert_eq!(outcome.segment_index, 0);
    assert_eq!(outcome.removed_segment, old_right.id);
    assert_eq!(model.girder.segment_count(), 2);
    let merged = model.girder.segment(0).unwrap();
    assert_eq!(merged.span_start, Some(SpanIndex(0)));
    assert_eq!(merged.span_end, old_right.span_end);
    assert_relative_eq!(model.girder.segment_length(0, &model.bridge).unwrap(), 240.0);
    assert_eq!(model.timeline.closure_cast_event(outcome.removed_closure), None);
}

#[test]
fn split_then_join_restores_geometry() {
    let mut model = three_segment_model();
    // central portion slopes from 6 to 5 between stations 155 and 205
    let profile = VariationProfile::double(
        SegmentVariation::DoubleParabolic,
        [
            ZoneParameters::new(10.0, 9.0, 1.0),
            ZoneParameters::new(25.0, 6.0, 0.75),
            ZoneParameters::new(25.0, 5.0, 0.75),
            ZoneParameters::new(10.0, 9.0, 1.0),
        ],
    );
    model
        .girder
        .set_segment_profile(1, profile.clone(), &model.bridge)
        .unwrap();

    let tower = model.towers[1];
    let (mut editor, girder) = model.editor();
    editor.split_at_temporary_support(girder, tower).unwrap();
    for i in [1, 2] {
        assert_eq!(girder.segment(i).unwrap().profile.variation, SegmentVariation::DoubleParabolic);
    }
    editor.join_at_temporary_support(girder, tower).unwrap();

    let length = model.girder.segment_length(1, &model.bridge).unwrap();
    assert_relative_eq!(length, 120.0);
    let restored = &model.girder.segment(1).unwrap().profile;
    let (start, end) = restored.end_depths(length).unwrap();
    assert_relative_eq!(start.height_ft, 9.0);
    assert_relative_eq!(end.height_ft, 9.0);
    for x in [0.0, 5.0, 12.0, 30.0, 60.0, 85.0, 110.0, 120.0] {
        assert_relative_eq!(
            restored.height_at(length, x).unwrap(),
            profile.height_at(length, x).unwrap(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            restored.bottom_flange_depth_at(length, x).unwrap(),
            profile.bottom_flange_depth_at(length, x).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn parabolic_split_then_join_restores_geometry() {
    let mut model = three_segment_model();
    let profile = VariationProfile::single(SegmentVariation::Parabolic, (20.0, 7.0), (20.0, 5.0), 0.75);
    model
        .girder
        .set_segment_profile(0, profile.clone(), &model.bridge)
        .unwrap();

    let tower = model.towers[0];
    let (mut editor, girder) = model.editor();
    editor.split_at_temporary_support(girder, tower).unwrap();
    let left = girder.segment(0).unwrap().profile.clone();
    assert_eq!(left.variation, SegmentVariation::Parabolic);
    // the cut lands halfway along the taper
    assert_relative_eq!(left.zone(SegmentZone::RightPrismatic).height_ft, 6.0, epsilon = 1e-9);
    editor.join_at_temporary_support(girder, tower).unwrap();

    let restored = &model.girder.segment(0).unwrap().profile;
    assert_eq!(restored.variation, SegmentVariation::Parabolic);
    for x in [0.0, 20.0, 35.0, 50.0, 60.0, 65.0, 80.0, 100.0, 120.0] {
        assert_relative_eq!(
            restored.height_at(120.0, x).unwrap(),
            profile.height_at(120.0, x).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn none_split_children_sum_to_parent() {
    let mut model = three_segment_model();
    let tower = model.towers[0];
    let parent = model.girder.segment_length(0, &model.bridge).unwrap();

    let (mut editor, girder) = model.editor();
    editor.split_at_temporary_support(girder, tower).unwrap();

    let children: f64 = (0..2)
        .map(|i| model.girder.segment_length(i, &model.bridge).unwrap())
        .sum();
    assert_relative_eq!(children, parent);
    for i in 0..2 {
        assert_eq!(model.girder.segment(i).unwrap().profile.variation, SegmentVariation::None);
    }
}

#[test]
fn split_inside_taper_matches_at_closure() {
    let mut model = three_segment_model();
    let profile = VariationProfile::single(SegmentVariation::Linear, (20.0, 6.0), (40.0, 8.0), 0.75);
    model
        .girder
        .set_segment_profile(0, profile, &model.bridge)
        .unwrap();

    let tower = model.towers[0];
    let (mut editor, girder) = model.editor();
    editor.split_at_temporary_support(girder, tower).unwrap();

    let left_len = model.girder.segment_length(0, &model.bridge).unwrap();
    let right_len = model.girder.segment_length(1, &model.bridge).unwrap();
    let left_end = model.girder.segment(0).unwrap().profile.end_depths(left_len).unwrap().1;
    let right_start = model.girder.segment(1).unwrap().profile.end_depths(right_len).unwrap().0;
    assert_relative_eq!(left_end.height_ft, right_start.height_ft, epsilon = 1e-9);
    // taper runs 6 -> 8 over stations 20..80, so 40/60 of the way at the tower
    assert_relative_eq!(left_end.height_ft, 6.0 + 2.0 * 40.0 / 60.0, epsilon = 1e-9);
}

#[test]
fn join_keeps_right_trailing_end_block() {
    let mut model = three_segment_model();
    let block = EndBlock {
        length_ft: 4.0,
        transition_length_ft: 2.0,
        width_ft: 2.5,
    };
    model
        .girder
        .segment_mut(2)
        .unwrap()
        .set_end_block(SegmentEnd::End, block);

    let (mut editor, girder) = model.editor();
    editor.join_at_pier(girder, PierId(2)).unwrap();
    assert_eq!(*model.girder.segment(1).unwrap().end_block(SegmentEnd::End), block);
}

#[test]
fn refused_edit_leaves_model_untouched() {
    let mut model = three_segment_model();
    let mut general = VariationProfile::single(SegmentVariation::Linear, (10.0, 6.0), (10.0, 8.0), 0.75);
    general.variation = SegmentVariation::General;
    model.girder.segment_mut(0).unwrap().profile = general;

    let girder_before = model.girder.clone();
    let timeline_before = model.timeline.clone();
    let ids_before = model.ids.clone();

    let tower = model.towers[0];
    let (mut editor, girder) = model.editor();
    let err = editor.split_at_temporary_support(girder, tower).unwrap_err();
    assert!(err.is_refusal());
    let err = editor.join_at_pier(girder, PierId(1)).unwrap_err();
    assert!(err.is_refusal());

    assert_eq!(model.girder, girder_before);
    assert_eq!(model.timeline, timeline_before);
    assert_eq!(model.ids, ids_before);
}

#[test]
fn drop_in_segment_between_strong_backs() {
    let mut model = three_segment_model();
    let a = model
        .bridge
        .add_temporary_support(150.0, TemporarySupportKind::StrongBack)
        .unwrap();
    let b = model
        .bridge
        .add_temporary_support(210.0, TemporarySupportKind::StrongBack)
        .unwrap();

    let (mut editor, girder) = model.editor();
    editor.split_at_temporary_support(girder, a).unwrap();
    editor.split_at_temporary_support(girder, b).unwrap();

    // segments: 0-120, 120-150, 150-210, 210-240, 240-360
    assert!(model.girder.is_drop_in(2, &model.bridge));
    assert!(!model.girder.is_drop_in(1, &model.bridge));
    let within: Vec<_> = model
        .girder
        .temporary_supports_within(2, &model.bridge)
        .iter()
        .map(|ts| ts.id)
        .collect();
    assert_eq!(within, vec![model.towers[1]]);
    assert_eq!(
        model.bridge.support_station(model.girder.closure(1).unwrap().support),
        Some(150.0)
    );
}

#[test]
fn split_copies_schedule_to_new_segment() {
    let mut model = three_segment_model();
    let original = model.girder.segment(0).unwrap().id;
    let expected = model.timeline.segment_events(original);
    assert_eq!(expected.erection, Some(EventIndex(1)));

    model
        .timeline
        .event_mut(EventIndex(2))
        .unwrap()
        .cast_closure_joints
        .enabled = true;
    let tower = model.towers[0];
    model
        .timeline
        .event_mut(EventIndex(2))
        .unwrap()
        .cast_closure_joints
        .temporary_supports
        .insert(tower);

    let (mut editor, girder) = model.editor();
    let outcome = editor.split_at_temporary_support(girder, tower).unwrap();
    assert_eq!(model.timeline.segment_events(outcome.new_segment), expected);
    assert_eq!(model.timeline.closure_cast_event(outcome.new_closure), Some(EventIndex(2)));
    assert_relative_eq!(
        model.girder.segment(0).unwrap().profile.zone(SegmentZone::LeftPrismatic).height_ft,
        7.0
    );
}
