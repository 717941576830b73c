//! Piecewise form of a variation profile.
//!
//! Split and join both work on an explicit list of prismatic and tapered
//! pieces: the profile is expanded, cut or concatenated, cleaned up, then fit
//! back into the zone form.

use super::{SectionDepth, SegmentVariation, SegmentZone, TaperShape, VariationProfile, ZoneParameters, TOLERANCE};
use crate::errors::{GirderError, GirderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceShape {
    Prismatic,
    Taper(TaperShape),
}

/// A stretch of constant or tapering depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Piece {
    pub length_ft: f64,
    pub start: SectionDepth,
    pub end: SectionDepth,
    pub shape: PieceShape,
}

impl Piece {
    pub fn prism(length_ft: f64, depth: SectionDepth) -> Self {
        Piece {
            length_ft,
            start: depth,
            end: depth,
            shape: PieceShape::Prismatic,
        }
    }

    pub fn taper(length_ft: f64, start: SectionDepth, end: SectionDepth, shape: TaperShape) -> Self {
        Piece {
            length_ft,
            start,
            end,
            shape: PieceShape::Taper(shape),
        }
    }

    fn is_flat(&self) -> bool {
        self.start.approx_eq(&self.end)
    }

    /// Depth `x_ft` from the start of the piece, following its curve.
    pub fn depth_at(&self, x_ft: f64) -> SectionDepth {
        if self.length_ft <= TOLERANCE {
            return self.end;
        }
        let t = (x_ft / self.length_ft).clamp(0.0, 1.0);
        match self.shape {
            PieceShape::Prismatic => self.start,
            PieceShape::Taper(TaperShape::Linear) => self.start.lerp(&self.end, t),
            PieceShape::Taper(TaperShape::Parabolic) => {
                // vertex at the shallow end
                if self.start.height_ft <= self.end.height_ft {
                    self.start.lerp(&self.end, t * t)
                } else {
                    let u = 1.0 - t;
                    self.end.lerp(&self.start, u * u)
                }
            }
        }
    }

    /// Cut at `x_ft`. The depth at the cut is interpolated linearly between
    /// the piece's end values for every shape.
    pub fn cut(&self, x_ft: f64) -> (Piece, Piece) {
        let t = x_ft / self.length_ft;
        let mid = self.start.lerp(&self.end, t);
        (
            Piece {
                length_ft: x_ft,
                end: mid,
                ..*self
            },
            Piece {
                length_ft: self.length_ft - x_ft,
                start: mid,
                ..*self
            },
        )
    }

    fn slope(&self) -> (f64, f64) {
        (
            (self.end.height_ft - self.start.height_ft) / self.length_ft,
            (self.end.bottom_flange_depth_ft - self.start.bottom_flange_depth_ft) / self.length_ft,
        )
    }

    /// `next` is the far side of a cut through one taper: same curve, and
    /// the joint depth is the linear interpolation the cut would have given.
    fn rejoins(&self, next: &Piece) -> bool {
        match (self.shape, next.shape) {
            (PieceShape::Taper(a), PieceShape::Taper(b)) if a == b => {
                let total = self.length_ft + next.length_ft;
                total > TOLERANCE
                    && self.end.approx_eq(&next.start)
                    && self
                        .start
                        .lerp(&next.end, self.length_ft / total)
                        .approx_eq(&self.end)
            }
            _ => false,
        }
    }

    /// `next` continues this piece without a change of shape
    fn can_absorb(&self, next: &Piece) -> bool {
        match (self.shape, next.shape) {
            (PieceShape::Prismatic, PieceShape::Prismatic) => true,
            (PieceShape::Taper(TaperShape::Linear), PieceShape::Taper(TaperShape::Linear)) => {
                let (ha, fa) = self.slope();
                let (hb, fb) = next.slope();
                (ha - hb).abs() <= TOLERANCE && (fa - fb).abs() <= TOLERANCE
            }
            _ => false,
        }
    }
}

/// Expand a profile into pieces spanning `segment_length_ft`.
pub(crate) fn to_pieces(profile: &VariationProfile, segment_length_ft: f64) -> GirderResult<Vec<Piece>> {
    profile.validate(segment_length_ft)?;

    let left_flange = profile.zone(SegmentZone::LeftPrismatic).bottom_flange_depth_ft;
    let depth = |zone: SegmentZone| {
        let params = profile.zone(zone);
        let flange = if profile.variable_bottom_flange_depth {
            params.bottom_flange_depth_ft
        } else {
            left_flange
        };
        SectionDepth::new(params.height_ft, flange)
    };
    let length = |zone: SegmentZone| profile.zone(zone).length_ft;
    let central = profile.central_length(segment_length_ft).max(0.0);

    let lp = depth(SegmentZone::LeftPrismatic);
    let rp = depth(SegmentZone::RightPrismatic);

    match profile.variation {
        SegmentVariation::None => Ok(vec![Piece::prism(segment_length_ft, lp)]),
        SegmentVariation::Linear | SegmentVariation::Parabolic | SegmentVariation::DoubleLinear | SegmentVariation::DoubleParabolic => {
            let shape = match profile.variation.taper_shape() {
                Some(shape) => shape,
                None => return Err(GirderError::invariant("tapered variation without a taper shape")),
            };
            if profile.variation.is_single() {
                return Ok(vec![
                    Piece::prism(length(SegmentZone::LeftPrismatic), lp),
                    Piece::taper(central, lp, rp, shape),
                    Piece::prism(length(SegmentZone::RightPrismatic), rp),
                ]);
            }
            let lt = depth(SegmentZone::LeftTapered);
            let rt = depth(SegmentZone::RightTapered);
            Ok(vec![
                Piece::prism(length(SegmentZone::LeftPrismatic), lp),
                Piece::taper(length(SegmentZone::LeftTapered), lp, lt, shape),
                Piece::taper(central, lt, rt, TaperShape::Linear),
                Piece::taper(length(SegmentZone::RightTapered), rt, rp, shape),
                Piece::prism(length(SegmentZone::RightPrismatic), rp),
            ])
        }
        SegmentVariation::General => Err(GirderError::unsupported_variation(
            "piecewise expansion",
            profile.variation.name(),
        )),
    }
}

/// Depth at `x_ft` along a piece list
pub(crate) fn depth_along(pieces: &[Piece], x_ft: f64) -> SectionDepth {
    let mut start = 0.0;
    for piece in pieces {
        let end = start + piece.length_ft;
        if piece.length_ft > TOLERANCE && x_ft <= end + TOLERANCE {
            return piece.depth_at(x_ft - start);
        }
        start = end;
    }
    pieces
        .last()
        .map_or(SectionDepth::new(0.0, 0.0), |piece| piece.end)
}

/// Divide a piece list at `at_ft`, cutting the piece that straddles it.
pub(crate) fn split_pieces(pieces: &[Piece], at_ft: f64) -> (Vec<Piece>, Vec<Piece>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut start = 0.0;
    for piece in pieces {
        let end = start + piece.length_ft;
        if end <= at_ft + TOLERANCE {
            left.push(*piece);
        } else if start >= at_ft - TOLERANCE {
            right.push(*piece);
        } else {
            let (a, b) = piece.cut(at_ft - start);
            left.push(a);
            right.push(b);
        }
        start = end;
    }
    (left, right)
}

/// Concatenate the pieces of two neighbouring segments, rejoining a taper
/// that an earlier cut divided at the joint.
pub(crate) fn join_pieces(mut left: Vec<Piece>, right: &[Piece]) -> Vec<Piece> {
    let mut rest = right;
    if let (Some(last), Some((first, tail))) = (left.last_mut(), right.split_first()) {
        if last.rejoins(first) {
            last.length_ft += first.length_ft;
            last.end = first.end;
            rest = tail;
        }
    }
    left.extend_from_slice(rest);
    left
}

/// Drop empty pieces, turn flat tapers into prisms and fuse pieces that
/// continue one another. Depths must meet at every boundary.
pub(crate) fn normalize(pieces: &[Piece], operation: &str) -> GirderResult<Vec<Piece>> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces.iter().filter(|p| p.length_ft > TOLERANCE) {
        let mut piece = *piece;
        if piece.is_flat() {
            piece.shape = PieceShape::Prismatic;
            piece.end = piece.start;
        }
        if let Some(prev) = out.last_mut() {
            if !prev.end.approx_eq(&piece.start) {
                return Err(GirderError::unsupported_geometry(
                    operation,
                    format!(
                        "depth jumps from {:.4} ft to {:.4} ft",
                        prev.end.height_ft, piece.start.height_ft
                    ),
                ));
            }
            if prev.can_absorb(&piece) {
                prev.length_ft += piece.length_ft;
                prev.end = piece.end;
                continue;
            }
        }
        out.push(piece);
    }
    Ok(out)
}

/// Fit normalized pieces back to zone form.
///
/// `hint` picks between `None` and a single variation when no taper is left.
pub(crate) fn fit(pieces: &[Piece], hint: SegmentVariation, operation: &str) -> GirderResult<VariationProfile> {
    let (prefix, rest) = match pieces.split_first() {
        Some((first, rest)) if first.shape == PieceShape::Prismatic => (Some(*first), rest),
        _ => (None, pieces),
    };
    let (core, suffix) = match rest.split_last() {
        Some((last, core)) if last.shape == PieceShape::Prismatic => (core, Some(*last)),
        _ => (rest, None),
    };
    let prefix_len = prefix.map_or(0.0, |p| p.length_ft);
    let suffix_len = suffix.map_or(0.0, |p| p.length_ft);

    let taper_shape = |piece: &Piece| match piece.shape {
        PieceShape::Taper(shape) => Ok(shape),
        PieceShape::Prismatic => Err(GirderError::unsupported_geometry(operation, "prismatic pieces are not adjacent")),
    };

    match core {
        [] => {
            let depth = match prefix {
                Some(piece) => piece.start,
                None => return Err(GirderError::invalid_input("segment_length_ft", "0", "Profile has no length")),
            };
            let zone = ZoneParameters::new(0.0, depth.height_ft, depth.bottom_flange_depth_ft);
            match hint.taper_shape() {
                None => Ok(VariationProfile::constant(depth.height_ft, depth.bottom_flange_depth_ft)),
                Some(shape) => Ok(VariationProfile {
                    variation: SegmentVariation::single_of(shape),
                    zones: [ZoneParameters { length_ft: prefix_len, ..zone }, zone, zone, zone],
                    variable_bottom_flange_depth: false,
                }),
            }
        }
        [taper] => {
            let shape = taper_shape(taper)?;
            Ok(VariationProfile {
                variation: SegmentVariation::single_of(shape),
                zones: [
                    zone_of(prefix_len, taper.start),
                    zone_of(0.0, taper.start),
                    zone_of(0.0, taper.end),
                    zone_of(suffix_len, taper.end),
                ],
                variable_bottom_flange_depth: false,
            })
        }
        [a, b] if a.shape != b.shape => sloped_central(prefix_len, a, b, suffix_len, operation),
        [a, middle @ .., b] if middle.len() <= 1 => {
            let shape = taper_shape(a)?;
            if taper_shape(b)? != shape {
                return Err(GirderError::unsupported_geometry(
                    operation,
                    "tapers at each end use different curves",
                ));
            }
            if let Some(mid) = middle.first() {
                if mid.shape == PieceShape::Taper(TaperShape::Parabolic) {
                    return Err(GirderError::unsupported_geometry(
                        operation,
                        "central portion would be parabolic",
                    ));
                }
            }
            Ok(VariationProfile {
                variation: SegmentVariation::double_of(shape),
                zones: [
                    zone_of(prefix_len, a.start),
                    zone_of(a.length_ft, a.end),
                    zone_of(b.length_ft, b.start),
                    zone_of(suffix_len, b.end),
                ],
                variable_bottom_flange_depth: true,
            })
        }
        _ => Err(GirderError::unsupported_geometry(
            operation,
            format!("{} tapered pieces cannot be expressed without a General profile", core.len()),
        )),
    }
}

/// A parabolic taper next to a linear one. The linear piece is the central
/// portion of a double parabolic profile whose other taper has no length.
fn sloped_central(prefix_len: f64, a: &Piece, b: &Piece, suffix_len: f64, operation: &str) -> GirderResult<VariationProfile> {
    let zones = match (a.shape, b.shape) {
        (PieceShape::Taper(TaperShape::Parabolic), PieceShape::Taper(TaperShape::Linear)) => [
            zone_of(prefix_len, a.start),
            zone_of(a.length_ft, a.end),
            zone_of(0.0, b.end),
            zone_of(suffix_len, b.end),
        ],
        (PieceShape::Taper(TaperShape::Linear), PieceShape::Taper(TaperShape::Parabolic)) => [
            zone_of(prefix_len, a.start),
            zone_of(0.0, a.start),
            zone_of(b.length_ft, b.start),
            zone_of(suffix_len, b.end),
        ],
        _ => {
            return Err(GirderError::unsupported_geometry(
                operation,
                "tapers at each end use different curves",
            ))
        }
    };
    Ok(VariationProfile {
        variation: SegmentVariation::DoubleParabolic,
        zones,
        variable_bottom_flange_depth: true,
    })
}

fn zone_of(length_ft: f64, depth: SectionDepth) -> ZoneParameters {
    ZoneParameters::new(length_ft, depth.height_ft, depth.bottom_flange_depth_ft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(h: f64) -> SectionDepth {
        SectionDepth::new(h, 0.75)
    }

    #[test]
    fn test_single_expands_to_three_pieces() {
        let p = VariationProfile::single(SegmentVariation::Linear, (20.0, 6.0), (20.0, 4.0), 0.75);
        let pieces = to_pieces(&p, 100.0).unwrap();
        assert_eq!(pieces.len(), 3);
        assert_relative_eq!(pieces[1].length_ft, 60.0);
        assert_eq!(pieces[1].start, d(6.0));
        assert_eq!(pieces[1].end, d(4.0));
    }

    #[test]
    fn test_normalize_fuses_collinear_tapers() {
        let pieces = [
            Piece::prism(10.0, d(6.0)),
            Piece::taper(10.0, d(6.0), d(5.0), TaperShape::Linear),
            Piece::taper(10.0, d(5.0), d(4.0), TaperShape::Linear),
            Piece::prism(0.0, d(4.0)),
        ];
        let out = normalize(&pieces, "join").unwrap();
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[1].length_ft, 20.0);
        assert_eq!(out[1].end, d(4.0));
    }

    #[test]
    fn test_normalize_keeps_parabolic_pieces_apart() {
        let pieces = [
            Piece::taper(10.0, d(6.0), d(5.0), TaperShape::Parabolic),
            Piece::taper(10.0, d(5.0), d(4.0), TaperShape::Parabolic),
        ];
        assert_eq!(normalize(&pieces, "join").unwrap().len(), 2);
    }

    #[test]
    fn test_join_pieces_rejoins_cut_parabola() {
        let parent = Piece::taper(60.0, d(6.0), d(4.0), TaperShape::Parabolic);
        let (a, b) = parent.cut(20.0);
        let joined = join_pieces(vec![Piece::prism(20.0, d(6.0)), a], &[b, Piece::prism(20.0, d(4.0))]);

        assert_eq!(joined.len(), 3);
        assert_eq!(joined[1].shape, PieceShape::Taper(TaperShape::Parabolic));
        assert_relative_eq!(joined[1].length_ft, 60.0);
        for x in [0.0, 15.0, 30.0, 45.0, 60.0] {
            assert_relative_eq!(joined[1].depth_at(x).height_ft, parent.depth_at(x).height_ft, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_join_pieces_keeps_unrelated_parabolas() {
        // 6 -> 5 -> 2 does not sit on one chord
        let left = vec![Piece::taper(10.0, d(6.0), d(5.0), TaperShape::Parabolic)];
        let right = [Piece::taper(10.0, d(5.0), d(2.0), TaperShape::Parabolic)];
        assert_eq!(join_pieces(left, &right).len(), 2);

        // a hump is two tapers even when the lengths match
        let left = vec![Piece::taper(10.0, d(6.0), d(8.0), TaperShape::Parabolic)];
        let right = [Piece::taper(10.0, d(8.0), d(6.0), TaperShape::Parabolic)];
        assert_eq!(join_pieces(left, &right).len(), 2);
    }

    #[test]
    fn test_normalize_flat_taper_becomes_prism() {
        let pieces = [
            Piece::prism(10.0, d(5.0)),
            Piece::taper(10.0, d(5.0), d(5.0), TaperShape::Linear),
        ];
        let out = normalize(&pieces, "join").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].shape, PieceShape::Prismatic);
        assert_relative_eq!(out[0].length_ft, 20.0);
    }

    #[test]
    fn test_normalize_rejects_depth_jump() {
        let pieces = [Piece::prism(10.0, d(6.0)), Piece::prism(10.0, d(5.0))];
        let err = normalize(&pieces, "join").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_GEOMETRY");
    }

    #[test]
    fn test_fit_prism_with_single_hint() {
        let fitted = fit(&[Piece::prism(30.0, d(6.0))], SegmentVariation::DoubleLinear, "split").unwrap();
        assert_eq!(fitted.variation, SegmentVariation::Linear);
        assert_relative_eq!(fitted.zone(SegmentZone::LeftPrismatic).length_ft, 30.0);
        assert_relative_eq!(fitted.central_length(30.0), 0.0);

        let fitted = fit(&[Piece::prism(30.0, d(6.0))], SegmentVariation::None, "split").unwrap();
        assert_eq!(fitted.variation, SegmentVariation::None);
    }

    #[test]
    fn test_fit_rejects_three_tapers() {
        let pieces = [
            Piece::taper(10.0, d(8.0), d(6.0), TaperShape::Linear),
            Piece::prism(10.0, d(6.0)),
            Piece::taper(10.0, d(6.0), d(8.0), TaperShape::Linear),
            Piece::prism(10.0, d(8.0)),
            Piece::taper(10.0, d(8.0), d(4.0), TaperShape::Linear),
        ];
        assert!(fit(&pieces, SegmentVariation::DoubleLinear, "join").is_err());
    }

    #[test]
    fn test_fit_rejects_mixed_curves() {
        let pieces = [
            Piece::taper(10.0, d(8.0), d(6.0), TaperShape::Parabolic),
            Piece::prism(10.0, d(6.0)),
            Piece::taper(10.0, d(6.0), d(8.0), TaperShape::Linear),
        ];
        let err = fit(&pieces, SegmentVariation::DoubleParabolic, "join").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_GEOMETRY");
    }

    #[test]
    fn test_fit_parabolic_then_sloped_central() {
        let pieces = [
            Piece::prism(10.0, d(9.0)),
            Piece::taper(20.0, d(9.0), d(6.0), TaperShape::Parabolic),
            Piece::taper(20.0, d(6.0), d(5.5), TaperShape::Linear),
        ];
        let fitted = fit(&pieces, SegmentVariation::DoubleParabolic, "split").unwrap();

        assert_eq!(fitted.variation, SegmentVariation::DoubleParabolic);
        assert_relative_eq!(fitted.zone(SegmentZone::LeftTapered).length_ft, 20.0);
        assert_relative_eq!(fitted.zone(SegmentZone::RightTapered).length_ft, 0.0);
        assert_relative_eq!(fitted.zone(SegmentZone::RightPrismatic).height_ft, 5.5);
        assert_relative_eq!(fitted.central_length(50.0), 20.0);
        assert_eq!(to_pieces(&fitted, 50.0).unwrap()[2].shape, PieceShape::Taper(TaperShape::Linear));
    }

    #[test]
    fn test_fit_sloped_central_then_parabolic() {
        let pieces = [
            Piece::taper(20.0, d(5.5), d(5.0), TaperShape::Linear),
            Piece::taper(20.0, d(5.0), d(9.0), TaperShape::Parabolic),
            Piece::prism(10.0, d(9.0)),
        ];
        let fitted = fit(&pieces, SegmentVariation::DoubleParabolic, "split").unwrap();

        assert_eq!(fitted.variation, SegmentVariation::DoubleParabolic);
        assert_relative_eq!(fitted.zone(SegmentZone::LeftPrismatic).length_ft, 0.0);
        assert_relative_eq!(fitted.zone(SegmentZone::LeftTapered).length_ft, 0.0);
        assert_relative_eq!(fitted.zone(SegmentZone::LeftTapered).height_ft, 5.5);
        assert_relative_eq!(fitted.zone(SegmentZone::RightTapered).height_ft, 5.0);
        assert_relative_eq!(fitted.central_length(50.0), 20.0);
    }

    #[test]
    fn test_split_pieces_cuts_straddling_piece() {
        let pieces = [
            Piece::prism(20.0, d(6.0)),
            Piece::taper(60.0, d(6.0), d(4.0), TaperShape::Linear),
            Piece::prism(20.0, d(4.0)),
        ];
        let (left, right) = split_pieces(&pieces, 50.0);
        assert_eq!(left.len(), 2);
        assert_eq!(right.len(), 2);
        assert_relative_eq!(left[1].length_ft, 30.0);
        assert_relative_eq!(left[1].end.height_ft, 5.0);
        assert_relative_eq!(right[0].start.height_ft, 5.0);
    }
}
