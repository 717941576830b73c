//! # Bridge Framing
//!
//! The girder model does not own the bridge: spans, piers and temporary
//! supports are supplied through the [`BridgeTopology`] trait. [`BridgeFraming`]
//! is the in-memory implementation persisted with a project.
//!
//! Spans are numbered from the first pier; span `i` runs from pier `i` to
//! pier `i + 1` in station order.
//!
//! ## Example
//!
//! ```rust
//! use splice_core::bridge::{BridgeFraming, BridgeTopology};
//! use splice_core::ids::SpanIndex;
//!
//! let framing = BridgeFraming::from_pier_stations(&[0.0, 120.0, 250.0]).unwrap();
//! assert_eq!(framing.span_count(), 2);
//! assert_eq!(framing.span(SpanIndex(1)).unwrap().end_station_ft, 250.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::closure::ClosureSupport;
use crate::errors::{GirderError, GirderResult};
use crate::ids::{PierId, SpanIndex, TemporarySupportId};
use crate::profile::TOLERANCE;

/// Station range of one span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanInfo {
    pub index: SpanIndex,
    pub start_station_ft: f64,
    pub end_station_ft: f64,
}

impl SpanInfo {
    pub fn length_ft(&self) -> f64 {
        self.end_station_ft - self.start_station_ft
    }
}

/// Kind of temporary support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporarySupportKind {
    /// Tower erected from the ground
    ErectionTower,
    /// Bracket hung from an adjacent segment
    StrongBack,
}

/// Temporary support location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporarySupportInfo {
    pub id: TemporarySupportId,
    pub station_ft: f64,
    pub kind: TemporarySupportKind,
}

/// Permanent pier location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PierInfo {
    pub id: PierId,
    pub station_ft: f64,
}

/// Read access to the bridge framing around a girder.
pub trait BridgeTopology {
    fn span_count(&self) -> usize;

    fn span(&self, index: SpanIndex) -> Option<SpanInfo>;

    /// The span that starts at `pier`, if any
    fn span_after_pier(&self, pier: PierId) -> Option<SpanIndex>;

    fn pier_station(&self, pier: PierId) -> Option<f64>;

    fn temporary_support(&self, id: TemporarySupportId) -> Option<TemporarySupportInfo>;

    /// All temporary supports in station order
    fn temporary_supports(&self) -> Vec<TemporarySupportInfo>;

    /// Station of a pier or temporary support
    fn support_station(&self, support: ClosureSupport) -> Option<f64> {
        match support {
            ClosureSupport::Pier(id) => self.pier_station(id),
            ClosureSupport::TemporarySupport(id) => self.temporary_support(id).map(|ts| ts.station_ft),
        }
    }

    /// Temporary supports strictly between two stations
    fn temporary_supports_between(&self, start_station_ft: f64, end_station_ft: f64) -> Vec<TemporarySupportInfo> {
        self.temporary_supports()
            .into_iter()
            .filter(|ts| ts.station_ft > start_station_ft + TOLERANCE && ts.station_ft < end_station_ft - TOLERANCE)
            .collect()
    }
}

/// In-memory bridge framing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeFraming {
    /// Piers in station order
    piers: Vec<PierInfo>,

    /// Temporary supports in station order
    temporary_supports: Vec<TemporarySupportInfo>,
}

impl BridgeFraming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Framing with piers at the given stations, numbered from zero.
    pub fn from_pier_stations(stations_ft: &[f64]) -> GirderResult<Self> {
        let mut framing = BridgeFraming::new();
        for station in stations_ft {
            framing.add_pier(*station)?;
        }
        Ok(framing)
    }

    pub fn piers(&self) -> &[PierInfo] {
        &self.piers
    }

    /// Add a pier, keeping station order. Returns its new ID.
    pub fn add_pier(&mut self, station_ft: f64) -> GirderResult<PierId> {
        check_station(station_ft)?;
        if self.piers.iter().any(|p| (p.station_ft - station_ft).abs() <= TOLERANCE) {
            return Err(GirderError::invalid_input(
                "station_ft",
                station_ft.to_string(),
                "A pier already exists at this station",
            ));
        }
        let id = PierId(self.piers.iter().map(|p| p.id.0 + 1).max().unwrap_or(0));
        let at = self.piers.partition_point(|p| p.station_ft < station_ft);
        self.piers.insert(at, PierInfo { id, station_ft });
        Ok(id)
    }

    /// Remove a pier, returning its data
    pub fn remove_pier(&mut self, id: PierId) -> GirderResult<PierInfo> {
        let at = self
            .piers
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| GirderError::support_not_found(id.to_string()))?;
        Ok(self.piers.remove(at))
    }

    /// Add a temporary support, keeping station order. Returns its new ID.
    pub fn add_temporary_support(&mut self, station_ft: f64, kind: TemporarySupportKind) -> GirderResult<TemporarySupportId> {
        check_station(station_ft)?;
        let id = TemporarySupportId(
            self.temporary_supports
                .iter()
                .map(|ts| ts.id.0 + 1)
                .max()
                .unwrap_or(0),
        );
        let at = self
            .temporary_supports
            .partition_point(|ts| ts.station_ft < station_ft);
        self.temporary_supports
            .insert(at, TemporarySupportInfo { id, station_ft, kind });
        Ok(id)
    }

    pub fn remove_temporary_support(&mut self, id: TemporarySupportId) -> GirderResult<TemporarySupportInfo> {
        let at = self
            .temporary_supports
            .iter()
            .position(|ts| ts.id == id)
            .ok_or_else(|| GirderError::support_not_found(id.to_string()))?;
        Ok(self.temporary_supports.remove(at))
    }

    /// Check station ordering of loaded data.
    pub fn validate(&self) -> GirderResult<()> {
        let ordered = self.piers.windows(2).all(|w| w[0].station_ft < w[1].station_ft)
            && self
                .temporary_supports
                .windows(2)
                .all(|w| w[0].station_ft <= w[1].station_ft);
        if !ordered {
            return Err(GirderError::invariant("bridge supports are not in station order"));
        }
        Ok(())
    }
}

fn check_station(station_ft: f64) -> GirderResult<()> {
    if !station_ft.is_finite() {
        return Err(GirderError::invalid_input(
            "station_ft",
            station_ft.to_string(),
            "Station must be a finite number",
        ));
    }
    Ok(())
}

impl BridgeTopology for BridgeFraming {
    fn span_count(&self) -> usize {
        self.piers.len().saturating_sub(1)
    }

    fn span(&self, index: SpanIndex) -> Option<SpanInfo> {
        let start = self.piers.get(index.0)?;
        let end = self.piers.get(index.0 + 1)?;
        Some(SpanInfo {
            index,
            start_station_ft: start.station_ft,
            end_station_ft: end.station_ft,
        })
    }

    fn span_after_pier(&self, pier: PierId) -> Option<SpanIndex> {
        let at = self.piers.iter().position(|p| p.id == pier)?;
        (at + 1 < self.piers.len()).then_some(SpanIndex(at))
    }

    fn pier_station(&self, pier: PierId) -> Option<f64> {
        self.piers.iter().find(|p| p.id == pier).map(|p| p.station_ft)
    }

    fn temporary_support(&self, id: TemporarySupportId) -> Option<TemporarySupportInfo> {
        self.temporary_supports.iter().find(|ts| ts.id == id).copied()
    }

    fn temporary_supports(&self) -> Vec<TemporarySupportInfo> {
        self.temporary_supports.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_follow_pier_order() {
        let mut framing = BridgeFraming::from_pier_stations(&[0.0, 200.0]).unwrap();
        let mid = framing.add_pier(90.0).unwrap();
        assert_eq!(mid, PierId(2));
        assert_eq!(framing.span_count(), 2);
        assert_eq!(framing.span(SpanIndex(0)).unwrap().end_station_ft, 90.0);
        assert_eq!(framing.span_after_pier(mid), Some(SpanIndex(1)));
        assert_eq!(framing.span_after_pier(PierId(1)), None);
        assert!(framing.span(SpanIndex(2)).is_none());
    }

    #[test]
    fn test_duplicate_pier_station_rejected() {
        let mut framing = BridgeFraming::from_pier_stations(&[0.0, 100.0]).unwrap();
        assert!(framing.add_pier(100.0).is_err());
        assert!(framing.add_pier(f64::NAN).is_err());
    }

    #[test]
    fn test_temporary_supports_between() {
        let mut framing = BridgeFraming::from_pier_stations(&[0.0, 300.0]).unwrap();
        let a = framing.add_temporary_support(100.0, TemporarySupportKind::ErectionTower).unwrap();
        let b = framing.add_temporary_support(50.0, TemporarySupportKind::StrongBack).unwrap();

        let all = framing.temporary_supports();
        assert_eq!(all[0].id, b);
        assert_eq!(all[1].id, a);

        // end stations are excluded
        let inside = framing.temporary_supports_between(50.0, 150.0);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].id, a);

        assert_eq!(
            framing.support_station(ClosureSupport::TemporarySupport(a)),
            Some(100.0)
        );
    }

    #[test]
    fn test_remove_unknown_support() {
        let mut framing = BridgeFraming::new();
        let err = framing.remove_pier(PierId(7)).unwrap_err();
        assert_eq!(err.error_code(), "SUPPORT_NOT_FOUND");
    }

    #[test]
    fn test_framing_serialization() {
        let mut framing = BridgeFraming::from_pier_stations(&[0.0, 150.0, 300.0]).unwrap();
        framing
            .add_temporary_support(75.0, TemporarySupportKind::ErectionTower)
            .unwrap();
        let json = serde_json::to_string(&framing).unwrap();
        let roundtrip: BridgeFraming = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, framing);
        assert!(roundtrip.validate().is_ok());
    }
}
