//! Concrete Materials
//!
//! Concrete properties for precast segments and cast-in-place closure joints.
//! The topology algorithms treat these as opaque payload that is copied or
//! preserved across split and join.

use serde::{Deserialize, Serialize};

/// Concrete density class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcreteType {
    #[default]
    Normal,
    AllLightweight,
    SandLightweight,
}

/// Concrete material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    /// Density class
    pub concrete_type: ConcreteType,

    /// 28-day compressive strength f'c (psi)
    pub fc_psi: f64,

    /// Strength at release or at continuity f'ci (psi)
    pub fci_psi: f64,

    /// Unit weight for dead load (pcf)
    pub unit_weight_pcf: f64,

    /// Maximum aggregate size (in)
    pub max_aggregate_size_in: f64,
}

impl ConcreteMaterial {
    /// Create a normal weight concrete with the given strengths
    pub fn normal_weight(fc_psi: f64, fci_psi: f64) -> Self {
        ConcreteMaterial {
            fc_psi,
            fci_psi,
            ..ConcreteMaterial::default()
        }
    }
}

impl Default for ConcreteMaterial {
    fn default() -> Self {
        ConcreteMaterial {
            concrete_type: ConcreteType::Normal,
            fc_psi: 8000.0,
            fci_psi: 6000.0,
            unit_weight_pcf: 155.0,
            max_aggregate_size_in: 0.75,
        }
    }
}

/// Curing method for precast segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CuringMethod {
    #[default]
    Normal,
    Accelerated,
}

/// Material data of a precast segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentMaterial {
    pub concrete: ConcreteMaterial,
    pub curing: CuringMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_weight_defaults() {
        let concrete = ConcreteMaterial::normal_weight(10000.0, 7500.0);
        assert_eq!(concrete.concrete_type, ConcreteType::Normal);
        assert_eq!(concrete.fc_psi, 10000.0);
        assert_eq!(concrete.unit_weight_pcf, 155.0);
    }

    #[test]
    fn test_concrete_serialization() {
        let concrete = ConcreteMaterial {
            concrete_type: ConcreteType::SandLightweight,
            ..ConcreteMaterial::default()
        };
        let json = serde_json::to_string(&concrete).unwrap();
        assert!(json.contains("SandLightweight"));
        let roundtrip: ConcreteMaterial = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, concrete);
    }
}
