//! Splitting a profile in two and merging two profiles back into one.

use super::pieces::{fit, join_pieces, normalize, split_pieces, to_pieces, Piece};
use super::{SegmentVariation, VariationProfile, TOLERANCE};
use crate::errors::{GirderError, GirderResult};

impl VariationProfile {
    /// Split at `at_ft` from the left end into left and right child profiles.
    ///
    /// Inside a prismatic zone the zone is shortened on one side and its
    /// remainder goes to the other child. Inside a taper both children get a
    /// zero-length prismatic zone at the cut carrying the depth interpolated
    /// linearly between the taper's end values. A double variation collapses
    /// to a single one on a child left with only one taper, unless that child
    /// also keeps part of a sloped central portion.
    ///
    /// `General` profiles are refused.
    pub fn split(&self, segment_length_ft: f64, at_ft: f64) -> GirderResult<(VariationProfile, VariationProfile)> {
        if self.variation == SegmentVariation::General {
            return Err(GirderError::unsupported_variation("split", self.variation.name()));
        }
        self.validate(segment_length_ft)?;
        if at_ft <= TOLERANCE || at_ft >= segment_length_ft - TOLERANCE {
            return Err(GirderError::invalid_input(
                "at_ft",
                at_ft.to_string(),
                format!("Split point must lie strictly inside the segment (0 to {:.4} ft)", segment_length_ft),
            ));
        }
        self.log_region("split", segment_length_ft, at_ft);

        if self.variation == SegmentVariation::None {
            return Ok((self.clone(), self.clone()));
        }

        let pieces = to_pieces(self, segment_length_ft)?;
        let (left, right) = split_pieces(&pieces, at_ft);
        Ok((
            refit(&left, self.variation, "split", self.variable_bottom_flange_depth)?,
            refit(&right, self.variation, "split", self.variable_bottom_flange_depth)?,
        ))
    }

    /// Join two adjacent profiles into one spanning both segments.
    ///
    /// Tapers of the same curve that meet across zero-length prismatic zones
    /// become one taper when the joint depth lies on their common chord, so
    /// joining the children of a split gives back the parent.
    ///
    /// Refused when either side is `General`, when the depths do not meet at
    /// the joint, or when the combined shape needs more than two tapers.
    pub fn merge(
        left: &VariationProfile,
        left_length_ft: f64,
        right: &VariationProfile,
        right_length_ft: f64,
    ) -> GirderResult<VariationProfile> {
        for profile in [left, right] {
            if profile.variation == SegmentVariation::General {
                return Err(GirderError::unsupported_variation("join", profile.variation.name()));
            }
        }

        let left_pieces = normalize(&to_pieces(left, left_length_ft)?, "join")?;
        let right_pieces = normalize(&to_pieces(right, right_length_ft)?, "join")?;
        let pieces = join_pieces(left_pieces, &right_pieces);

        let hint = if left.variation != SegmentVariation::None {
            left.variation
        } else {
            right.variation
        };
        refit(
            &pieces,
            hint,
            "join",
            left.variable_bottom_flange_depth || right.variable_bottom_flange_depth,
        )
    }
}

fn refit(pieces: &[Piece], hint: SegmentVariation, operation: &str, variable_flange: bool) -> GirderResult<VariationProfile> {
    let normalized = normalize(pieces, operation)?;
    let mut profile = fit(&normalized, hint, operation)?;
    profile.variable_bottom_flange_depth = variable_flange;
    Ok(profile)
}
