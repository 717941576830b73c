//! # Variation Profiles
//!
//! How a segment's depth and bottom flange depth vary along its length.
//!
//! ## Zones
//!
//! A profile is stored as four named zones, each carrying a length, a height
//! and a bottom flange depth:
//!
//! ```text
//!  |<- LP ->|<- LT ->|<--- central --->|<- RT ->|<- RP ->|
//!  prismatic  taper      (implicit)      taper   prismatic
//! ```
//!
//! - `None`: prismatic; every zone carries the segment height, lengths are zero.
//! - `Linear` / `Parabolic`: LP and RP are prismatic ends; the central portion
//!   tapers from LP height to RP height. LT and RT are unused.
//! - `DoubleLinear` / `DoubleParabolic`: LT tapers from LP height to LT height,
//!   RT tapers from RT height to RP height, and the central portion runs
//!   linearly from LT height to RT height.
//! - `General`: user-defined shape. It can be stored and validated but not
//!   split, merged or evaluated here.
//!
//! The zone lengths that apply to the variation plus the central length always
//! equal the segment length.
//!
//! ## Example
//!
//! ```rust
//! use splice_core::profile::{VariationProfile, SegmentVariation};
//!
//! // 100 ft segment, 6 ft deep at the left, 4 ft deep at the right
//! let profile = VariationProfile::single(SegmentVariation::Linear, (20.0, 6.0), (20.0, 4.0), 0.75);
//! let (left, right) = profile.split(100.0, 50.0).unwrap();
//!
//! assert_eq!(left.end_depths(50.0).unwrap().1.height_ft, 5.0);
//! assert_eq!(right.end_depths(50.0).unwrap().0.height_ft, 5.0);
//! ```

mod pieces;
mod split;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{GirderError, GirderResult};
use crate::segment::SegmentEnd;

/// Length tolerance (ft) for zone arithmetic and station comparisons
pub const TOLERANCE: f64 = 1.0e-6;

// ============================================================================
// Variation Types
// ============================================================================

/// Shape of a segment's depth variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SegmentVariation {
    #[default]
    None,
    Linear,
    Parabolic,
    DoubleLinear,
    DoubleParabolic,
    General,
}

/// Curve used by a tapered portion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaperShape {
    Linear,
    Parabolic,
}

impl SegmentVariation {
    /// Linear or Parabolic
    pub fn is_single(self) -> bool {
        matches!(self, SegmentVariation::Linear | SegmentVariation::Parabolic)
    }

    /// DoubleLinear or DoubleParabolic
    pub fn is_double(self) -> bool {
        matches!(self, SegmentVariation::DoubleLinear | SegmentVariation::DoubleParabolic)
    }

    /// Taper curve of a single or double variation
    pub fn taper_shape(self) -> Option<TaperShape> {
        match self {
            SegmentVariation::Linear | SegmentVariation::DoubleLinear => Some(TaperShape::Linear),
            SegmentVariation::Parabolic | SegmentVariation::DoubleParabolic => Some(TaperShape::Parabolic),
            SegmentVariation::None | SegmentVariation::General => None,
        }
    }

    /// Single variation with the given taper curve
    pub fn single_of(shape: TaperShape) -> Self {
        match shape {
            TaperShape::Linear => SegmentVariation::Linear,
            TaperShape::Parabolic => SegmentVariation::Parabolic,
        }
    }

    /// Double variation with the given taper curve
    pub fn double_of(shape: TaperShape) -> Self {
        match shape {
            TaperShape::Linear => SegmentVariation::DoubleLinear,
            TaperShape::Parabolic => SegmentVariation::DoubleParabolic,
        }
    }

    /// Zones whose lengths count toward the segment length
    pub fn active_zones(self) -> &'static [SegmentZone] {
        match self {
            SegmentVariation::None => &[],
            SegmentVariation::Linear | SegmentVariation::Parabolic => {
                &[SegmentZone::LeftPrismatic, SegmentZone::RightPrismatic]
            }
            SegmentVariation::DoubleLinear | SegmentVariation::DoubleParabolic | SegmentVariation::General => &SegmentZone::ALL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SegmentVariation::None => "None",
            SegmentVariation::Linear => "Linear",
            SegmentVariation::Parabolic => "Parabolic",
            SegmentVariation::DoubleLinear => "DoubleLinear",
            SegmentVariation::DoubleParabolic => "DoubleParabolic",
            SegmentVariation::General => "General",
        }
    }
}

/// Named zones of a variation profile, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentZone {
    LeftPrismatic,
    LeftTapered,
    RightTapered,
    RightPrismatic,
}

impl SegmentZone {
    pub const ALL: [SegmentZone; 4] = [
        SegmentZone::LeftPrismatic,
        SegmentZone::LeftTapered,
        SegmentZone::RightTapered,
        SegmentZone::RightPrismatic,
    ];

    fn index(self) -> usize {
        match self {
            SegmentZone::LeftPrismatic => 0,
            SegmentZone::LeftTapered => 1,
            SegmentZone::RightTapered => 2,
            SegmentZone::RightPrismatic => 3,
        }
    }
}

/// Part of a segment a position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileRegion {
    Zone(SegmentZone),
    /// The implicit portion between the left and right zones
    Central,
}

// ============================================================================
// Profile Data
// ============================================================================

/// Length and depths of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneParameters {
    /// Zone length (ft)
    pub length_ft: f64,
    /// Girder height at the zone's defining end (ft)
    pub height_ft: f64,
    /// Bottom flange depth at the zone's defining end (ft)
    pub bottom_flange_depth_ft: f64,
}

impl ZoneParameters {
    pub fn new(length_ft: f64, height_ft: f64, bottom_flange_depth_ft: f64) -> Self {
        ZoneParameters {
            length_ft,
            height_ft,
            bottom_flange_depth_ft,
        }
    }

    pub fn depth(&self) -> SectionDepth {
        SectionDepth::new(self.height_ft, self.bottom_flange_depth_ft)
    }
}

/// Girder height and bottom flange depth at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionDepth {
    pub height_ft: f64,
    pub bottom_flange_depth_ft: f64,
}

impl SectionDepth {
    pub fn new(height_ft: f64, bottom_flange_depth_ft: f64) -> Self {
        SectionDepth {
            height_ft,
            bottom_flange_depth_ft,
        }
    }

    /// Both depths agree within [`TOLERANCE`]
    pub fn approx_eq(&self, other: &SectionDepth) -> bool {
        (self.height_ft - other.height_ft).abs() <= TOLERANCE
            && (self.bottom_flange_depth_ft - other.bottom_flange_depth_ft).abs() <= TOLERANCE
    }

    /// Linear interpolation toward `other` at fraction `t`
    pub fn lerp(&self, other: &SectionDepth, t: f64) -> SectionDepth {
        SectionDepth {
            height_ft: self.height_ft + (other.height_ft - self.height_ft) * t,
            bottom_flange_depth_ft: self.bottom_flange_depth_ft
                + (other.bottom_flange_depth_ft - self.bottom_flange_depth_ft) * t,
        }
    }
}

/// Depth variation of one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationProfile {
    pub variation: SegmentVariation,

    /// Zone parameters in [`SegmentZone`] order
    pub zones: [ZoneParameters; 4],

    /// Bottom flange depth follows the zone values (otherwise it is constant)
    pub variable_bottom_flange_depth: bool,
}

impl Default for VariationProfile {
    fn default() -> Self {
        VariationProfile::constant(6.0, 0.75)
    }
}

impl VariationProfile {
    /// Prismatic profile
    pub fn constant(height_ft: f64, bottom_flange_depth_ft: f64) -> Self {
        VariationProfile {
            variation: SegmentVariation::None,
            zones: [ZoneParameters::new(0.0, height_ft, bottom_flange_depth_ft); 4],
            variable_bottom_flange_depth: false,
        }
    }

    /// Single taper profile from `(length_ft, height_ft)` pairs for each prismatic end
    pub fn single(
        variation: SegmentVariation,
        left: (f64, f64),
        right: (f64, f64),
        bottom_flange_depth_ft: f64,
    ) -> Self {
        let lp = ZoneParameters::new(left.0, left.1, bottom_flange_depth_ft);
        let rp = ZoneParameters::new(right.0, right.1, bottom_flange_depth_ft);
        VariationProfile {
            variation,
            zones: [
                lp,
                ZoneParameters::new(0.0, left.1, bottom_flange_depth_ft),
                ZoneParameters::new(0.0, right.1, bottom_flange_depth_ft),
                rp,
            ],
            variable_bottom_flange_depth: false,
        }
    }

    /// Profile from explicit zone parameters
    pub fn double(variation: SegmentVariation, zones: [ZoneParameters; 4]) -> Self {
        VariationProfile {
            variation,
            zones,
            variable_bottom_flange_depth: true,
        }
    }

    pub fn zone(&self, zone: SegmentZone) -> &ZoneParameters {
        &self.zones[zone.index()]
    }

    pub fn set_zone(&mut self, zone: SegmentZone, params: ZoneParameters) {
        self.zones[zone.index()] = params;
    }

    /// Sum of the zone lengths that apply to this variation (ft)
    pub fn zone_length_sum(&self) -> f64 {
        self.variation
            .active_zones()
            .iter()
            .map(|z| self.zone(*z).length_ft)
            .sum()
    }

    /// Length of the implicit central portion for a segment of `segment_length_ft`
    pub fn central_length(&self, segment_length_ft: f64) -> f64 {
        segment_length_ft - self.zone_length_sum()
    }

    /// Check zone lengths and depths against the segment length.
    pub fn validate(&self, segment_length_ft: f64) -> GirderResult<()> {
        if !segment_length_ft.is_finite() || segment_length_ft <= 0.0 {
            return Err(GirderError::invalid_input(
                "segment_length_ft",
                segment_length_ft.to_string(),
                "Segment length must be positive",
            ));
        }
        for zone in SegmentZone::ALL {
            let params = self.zone(zone);
            if !params.length_ft.is_finite() || params.length_ft < 0.0 {
                return Err(GirderError::invalid_input(
                    format!("{:?}.length_ft", zone),
                    params.length_ft.to_string(),
                    "Zone length must be non-negative",
                ));
            }
            if !params.height_ft.is_finite() || params.height_ft <= 0.0 {
                return Err(GirderError::invalid_input(
                    format!("{:?}.height_ft", zone),
                    params.height_ft.to_string(),
                    "Height must be positive",
                ));
            }
            if !params.bottom_flange_depth_ft.is_finite() || params.bottom_flange_depth_ft < 0.0 {
                return Err(GirderError::invalid_input(
                    format!("{:?}.bottom_flange_depth_ft", zone),
                    params.bottom_flange_depth_ft.to_string(),
                    "Bottom flange depth must be non-negative",
                ));
            }
        }
        let central = self.central_length(segment_length_ft);
        if central < -TOLERANCE {
            return Err(GirderError::invalid_input(
                "zones",
                format!("{:.4} ft", self.zone_length_sum()),
                format!("Zone lengths exceed segment length of {:.4} ft", segment_length_ft),
            ));
        }
        Ok(())
    }

    /// Fractional boundaries (0..=1) between left zones, central portion and
    /// right zones: `[LP end, LT end, RT start, RP start]`.
    pub fn zone_boundaries(&self, segment_length_ft: f64) -> [f64; 4] {
        let len = |zone| {
            if self.variation.active_zones().contains(&zone) {
                self.zone(zone).length_ft
            } else {
                0.0
            }
        };
        let lp = len(SegmentZone::LeftPrismatic);
        let lt = len(SegmentZone::LeftTapered);
        let rt = len(SegmentZone::RightTapered);
        let rp = len(SegmentZone::RightPrismatic);
        let l = segment_length_ft;
        [lp / l, (lp + lt) / l, (l - rp - rt) / l, (l - rp) / l]
    }

    /// Region containing the point `x_ft` from the left end.
    pub fn region_at(&self, segment_length_ft: f64, x_ft: f64) -> ProfileRegion {
        if self.variation == SegmentVariation::None {
            return ProfileRegion::Central;
        }
        let f = x_ft / segment_length_ft;
        let [lp_end, lt_end, rt_start, rp_start] = self.zone_boundaries(segment_length_ft);
        if f < lp_end {
            ProfileRegion::Zone(SegmentZone::LeftPrismatic)
        } else if f < lt_end {
            ProfileRegion::Zone(SegmentZone::LeftTapered)
        } else if f < rt_start {
            ProfileRegion::Central
        } else if f < rp_start {
            ProfileRegion::Zone(SegmentZone::RightTapered)
        } else {
            ProfileRegion::Zone(SegmentZone::RightPrismatic)
        }
    }

    /// Depths at both ends of the segment.
    pub fn end_depths(&self, segment_length_ft: f64) -> GirderResult<(SectionDepth, SectionDepth)> {
        Ok((
            self.depth_at(segment_length_ft, 0.0)?,
            self.depth_at(segment_length_ft, segment_length_ft)?,
        ))
    }

    /// Height and bottom flange depth at `x_ft` from the left end.
    ///
    /// Parabolic tapers are tangent to horizontal at their shallow end.
    pub fn depth_at(&self, segment_length_ft: f64, x_ft: f64) -> GirderResult<SectionDepth> {
        if self.variation == SegmentVariation::General {
            return Err(GirderError::unsupported_variation("depth evaluation", self.variation.name()));
        }
        if x_ft < -TOLERANCE || x_ft > segment_length_ft + TOLERANCE {
            return Err(GirderError::invalid_input(
                "x_ft",
                x_ft.to_string(),
                format!("Position must lie within the segment (0 to {:.4} ft)", segment_length_ft),
            ));
        }
        let pieces = pieces::to_pieces(self, segment_length_ft)?;
        Ok(pieces::depth_along(&pieces, x_ft.clamp(0.0, segment_length_ft)))
    }

    pub fn height_at(&self, segment_length_ft: f64, x_ft: f64) -> GirderResult<f64> {
        Ok(self.depth_at(segment_length_ft, x_ft)?.height_ft)
    }

    pub fn bottom_flange_depth_at(&self, segment_length_ft: f64, x_ft: f64) -> GirderResult<f64> {
        Ok(self.depth_at(segment_length_ft, x_ft)?.bottom_flange_depth_ft)
    }

    /// Set the depth of the prismatic zone at one end.
    ///
    /// A `None` profile is prismatic, so every zone takes the new depth.
    pub fn set_end_depth(&mut self, end: SegmentEnd, depth: SectionDepth) {
        if self.variation == SegmentVariation::None {
            for zone in self.zones.iter_mut() {
                zone.height_ft = depth.height_ft;
                zone.bottom_flange_depth_ft = depth.bottom_flange_depth_ft;
            }
            return;
        }
        let zone = match end {
            SegmentEnd::Start => SegmentZone::LeftPrismatic,
            SegmentEnd::End => SegmentZone::RightPrismatic,
        };
        let params = &mut self.zones[zone.index()];
        params.height_ft = depth.height_ft;
        params.bottom_flange_depth_ft = depth.bottom_flange_depth_ft;
    }

    /// Depth stored for the prismatic zone at one end
    pub fn end_zone_depth(&self, end: SegmentEnd) -> SectionDepth {
        match end {
            SegmentEnd::Start => self.zone(SegmentZone::LeftPrismatic).depth(),
            SegmentEnd::End if self.variation == SegmentVariation::None => {
                self.zone(SegmentZone::LeftPrismatic).depth()
            }
            SegmentEnd::End => self.zone(SegmentZone::RightPrismatic).depth(),
        }
    }

    fn log_region(&self, operation: &str, segment_length_ft: f64, x_ft: f64) {
        debug!(
            operation,
            variation = self.variation.name(),
            x_ft,
            region = ?self.region_at(segment_length_ft, x_ft),
            "profile region"
        );
    }
}
