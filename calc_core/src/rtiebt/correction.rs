//! Correction factors for ambient temperature (Quadro XI) and grouping
//! (Quadro XII).
//!
//! ```text
//! I_z,corrected = I_z,table × f_temp × f_agrup
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Conductor insulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Insulation {
    /// Polyvinyl chloride, 70°C conductor temperature
    #[default]
    Pvc,
    /// Cross-linked polyethylene, 90°C conductor temperature
    Xlpe,
    /// Ethylene propylene rubber, 90°C conductor temperature
    Epr,
}

impl Insulation {
    /// All insulation variants for UI selection
    pub const ALL: [Insulation; 3] = [Insulation::Pvc, Insulation::Xlpe, Insulation::Epr];

    /// Maximum conductor operating temperature (°C)
    pub fn max_conductor_temp_c(&self) -> f64 {
        match self {
            Insulation::Pvc => 70.0,
            Insulation::Xlpe | Insulation::Epr => 90.0,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Insulation::Pvc => "PVC (70°C)",
            Insulation::Xlpe => "XLPE (90°C)",
            Insulation::Epr => "EPR (90°C)",
        }
    }
}

impl std::fmt::Display for Insulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tabulated ambient temperatures (°C)
pub const TABULATED_TEMPS_C: [i32; 7] = [30, 35, 40, 45, 50, 55, 60];

const PVC_FACTORS: [f64; 7] = [1.22, 1.17, 1.12, 1.06, 1.0, 0.94, 0.87];
const XLPE_FACTORS: [f64; 7] = [1.15, 1.12, 1.08, 1.04, 1.0, 0.96, 0.91];

/// Default factor when no table entry matches
pub const DEFAULT_TEMPERATURE_FACTOR: f64 = 1.0;

/// Tabulated temperature factor, if the (insulation, °C) pair is in the table.
///
/// Only whole-degree temperatures listed in [`TABULATED_TEMPS_C`] match.
/// EPR has no column.
pub fn temperature_factor_entry(insulation: Insulation, ambient_c: f64) -> Option<f64> {
    if ambient_c.fract() != 0.0 {
        return None;
    }
    let column = match insulation {
        Insulation::Pvc => &PVC_FACTORS,
        Insulation::Xlpe => &XLPE_FACTORS,
        Insulation::Epr => return None,
    };
    TABULATED_TEMPS_C
        .iter()
        .position(|&t| f64::from(t) == ambient_c)
        .map(|i| column[i])
}

/// Temperature correction factor, falling back to 1.0 when untabulated.
pub fn temperature_factor(insulation: Insulation, ambient_c: f64) -> f64 {
    temperature_factor_entry(insulation, ambient_c).unwrap_or_else(|| {
        warn!(
            insulation = ?insulation,
            ambient_c,
            "no temperature factor tabulated, using {}",
            DEFAULT_TEMPERATURE_FACTOR
        );
        DEFAULT_TEMPERATURE_FACTOR
    })
}

/// Largest tabulated conductor count; larger groups use this row
pub const MAX_TABULATED_GROUP: u32 = 9;

/// Grouping correction factor for `count` loaded conductors.
///
/// Counts above 9 use the 9-conductor value (0.50).
///
/// ```rust
/// use calc_core::rtiebt::grouping_factor;
///
/// assert_eq!(grouping_factor(1), 1.0);
/// assert_eq!(grouping_factor(3), 0.7);
/// assert_eq!(grouping_factor(15), 0.5);
/// ```
pub fn grouping_factor(count: u32) -> f64 {
    match count.min(MAX_TABULATED_GROUP) {
        1 => 1.0,
        2 => 0.8,
        3 => 0.7,
        4 => 0.65,
        5 => 0.6,
        6 => 0.57,
        7 => 0.54,
        8 => 0.52,
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_factors() {
        assert_eq!(temperature_factor(Insulation::Pvc, 30.0), 1.22);
        assert_eq!(temperature_factor(Insulation::Pvc, 60.0), 0.87);
        assert_eq!(temperature_factor(Insulation::Xlpe, 45.0), 1.04);
        assert_eq!(temperature_factor(Insulation::Xlpe, 50.0), 1.0);
    }

    #[test]
    fn test_temperature_fallback() {
        assert_eq!(temperature_factor_entry(Insulation::Pvc, 25.0), None);
        assert_eq!(temperature_factor_entry(Insulation::Pvc, 32.5), None);
        assert_eq!(temperature_factor_entry(Insulation::Epr, 30.0), None);
        assert_eq!(temperature_factor(Insulation::Epr, 40.0), 1.0);
        assert_eq!(temperature_factor(Insulation::Pvc, -10.0), 1.0);
    }

    #[test]
    fn test_grouping_factors() {
        assert_eq!(grouping_factor(2), 0.8);
        assert_eq!(grouping_factor(6), 0.57);
        assert_eq!(grouping_factor(9), 0.5);
        assert_eq!(grouping_factor(20), 0.5);
    }

    #[test]
    fn test_insulation_serialization() {
        assert_eq!(serde_json::to_string(&Insulation::Xlpe).unwrap(), "\"XLPE\"");
        let parsed: Insulation = serde_json::from_str("\"PVC\"").unwrap();
        assert_eq!(parsed, Insulation::Pvc);
    }
}
