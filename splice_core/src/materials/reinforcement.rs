//! Reinforcement and Handling Data
//!
//! Per-segment prestressing, shear and longitudinal reinforcement, plus the
//! lifting/storage locations used for handling checks. A split copies the
//! handling data to the new segment but leaves its reinforcement at defaults.

use serde::{Deserialize, Serialize};

/// Lifting and storage support locations, measured from each segment end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlingData {
    /// Distance from left end to the left lift point (ft)
    pub left_lift_point_ft: f64,
    /// Distance from right end to the right lift point (ft)
    pub right_lift_point_ft: f64,
    /// Distance from left end to the left storage support (ft)
    pub left_storage_point_ft: f64,
    /// Distance from right end to the right storage support (ft)
    pub right_storage_point_ft: f64,
    /// Haul truck name, if one has been chosen
    pub haul_truck: Option<String>,
}

impl Default for HandlingData {
    fn default() -> Self {
        HandlingData {
            left_lift_point_ft: 5.0,
            right_lift_point_ft: 5.0,
            left_storage_point_ft: 5.0,
            right_storage_point_ft: 5.0,
            haul_truck: None,
        }
    }
}

/// Prestressing strand counts by group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandLayout {
    /// Strand designation (e.g., "0.6in Grade 270 low-relaxation")
    pub strand: String,
    pub straight_count: u32,
    pub harped_count: u32,
    pub temporary_count: u32,
    /// Jacking stress as a fraction of fpu
    pub jacking_ratio: f64,
}

impl Default for StrandLayout {
    fn default() -> Self {
        StrandLayout {
            strand: "0.6in Grade 270 low-relaxation".to_string(),
            straight_count: 0,
            harped_count: 0,
            temporary_count: 0,
            jacking_ratio: 0.75,
        }
    }
}

impl StrandLayout {
    pub fn total_permanent(&self) -> u32 {
        self.straight_count + self.harped_count
    }
}

/// Transverse (stirrup) reinforcement zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearZone {
    /// Zone length measured from the segment end (ft)
    pub length_ft: f64,
    pub bar_size: String,
    pub spacing_in: f64,
    pub legs: u32,
}

/// Shear reinforcement for a segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShearData {
    pub zones: Vec<ShearZone>,
    /// Zones are mirrored about the segment mid-length
    pub symmetric: bool,
}

/// Face a longitudinal bar row is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RebarFace {
    Top,
    #[default]
    Bottom,
}

/// One row of longitudinal mild reinforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarRow {
    pub face: RebarFace,
    pub cover_in: f64,
    pub bar_size: String,
    pub count: u32,
    pub spacing_in: f64,
}

/// Longitudinal mild reinforcement for a segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LongitudinalRebar {
    pub rows: Vec<RebarRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_totals() {
        let strands = StrandLayout {
            straight_count: 24,
            harped_count: 8,
            temporary_count: 2,
            ..StrandLayout::default()
        };
        assert_eq!(strands.total_permanent(), 32);
    }

    #[test]
    fn test_defaults_are_empty() {
        assert!(ShearData::default().zones.is_empty());
        assert!(LongitudinalRebar::default().rows.is_empty());
        assert!(HandlingData::default().haul_truck.is_none());
    }
}
