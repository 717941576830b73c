//! # Precast Segments
//!
//! A segment is one precast piece of a spliced girder. Its physical length
//! comes from the stations of the supports at its ends (see
//! [`SplicedGirder::segment_stations`](crate::girder::SplicedGirder::segment_stations)),
//! so the segment itself only stores the shape of its depth variation,
//! end-block geometry, material and reinforcement.

use serde::{Deserialize, Serialize};

use crate::ids::{ClosureId, SegmentId, SpanIndex};
use crate::materials::{HandlingData, LongitudinalRebar, SegmentMaterial, ShearData, StrandLayout};
use crate::profile::VariationProfile;

/// One end of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentEnd {
    Start,
    End,
}

impl SegmentEnd {
    fn index(self) -> usize {
        match self {
            SegmentEnd::Start => 0,
            SegmentEnd::End => 1,
        }
    }
}

/// Thickened web region at a segment end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EndBlock {
    /// Length of the full-width block (ft)
    pub length_ft: f64,
    /// Length over which the web returns to its nominal width (ft)
    pub transition_length_ft: f64,
    /// Web width within the block (ft)
    pub width_ft: f64,
}

/// How the top flange width is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TopWidthType {
    /// Width from the girder library entry
    #[default]
    Nominal,
    /// Same overhang on both sides of the web
    Balanced,
    /// Different overhangs left and right of the web
    Unbalanced,
}

/// Top flange width at each end of the segment (added in schema 1.1).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TopWidth {
    pub kind: TopWidthType,
    /// Overhang left of the web centerline (ft)
    pub left_ft: f64,
    /// Overhang right of the web centerline (ft)
    pub right_ft: f64,
}

/// A precast girder segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Stable identity, never reused
    pub id: SegmentId,

    /// Position in the girder, recomputed after every structural edit
    pub index: usize,

    /// Depth variation along the segment
    pub profile: VariationProfile,

    /// End blocks at the start and end of the segment
    pub end_blocks: [EndBlock; 2],

    #[serde(default)]
    pub top_width: TopWidth,

    pub material: SegmentMaterial,
    pub handling: HandlingData,
    pub strands: StrandLayout,
    pub shear: ShearData,
    pub longitudinal_rebar: LongitudinalRebar,

    /// Span containing the segment's start station
    pub span_start: Option<SpanIndex>,

    /// Span containing the segment's end station
    pub span_end: Option<SpanIndex>,

    /// Closure joint at the start (None at the girder's first segment)
    pub closure_start: Option<ClosureId>,

    /// Closure joint at the end (None at the girder's last segment)
    pub closure_end: Option<ClosureId>,
}

impl Segment {
    /// Create a segment with default data and the given profile.
    pub fn new(id: SegmentId, profile: VariationProfile) -> Self {
        Segment {
            id,
            index: 0,
            profile,
            end_blocks: [EndBlock::default(); 2],
            top_width: TopWidth::default(),
            material: SegmentMaterial::default(),
            handling: HandlingData::default(),
            strands: StrandLayout::default(),
            shear: ShearData::default(),
            longitudinal_rebar: LongitudinalRebar::default(),
            span_start: None,
            span_end: None,
            closure_start: None,
            closure_end: None,
        }
    }

    pub fn end_block(&self, end: SegmentEnd) -> &EndBlock {
        &self.end_blocks[end.index()]
    }

    pub fn set_end_block(&mut self, end: SegmentEnd, block: EndBlock) {
        self.end_blocks[end.index()] = block;
    }

    /// Build the segment created to the right of a split.
    ///
    /// Material, handling and top width are copied. Reinforcement starts from
    /// defaults. The new segment inherits this segment's trailing end block
    /// and gets a default block at its start.
    pub fn split_off(&self, id: SegmentId, profile: VariationProfile) -> Segment {
        let mut segment = Segment::new(id, profile);
        segment.material = self.material.clone();
        segment.handling = self.handling.clone();
        segment.top_width = self.top_width;
        segment.set_end_block(SegmentEnd::End, *self.end_block(SegmentEnd::End));
        segment
    }
}
