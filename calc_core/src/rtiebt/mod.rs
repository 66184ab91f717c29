//! # RTIEBT Tables
//!
//! Static data from the Portuguese low-voltage installation rules (RTIEBT,
//! Regras Técnicas das Instalações Eléctricas de Baixa Tensão) used by the
//! cable sizing and circuit schedule calculators.
//!
//! ## Overview
//!
//! ```text
//! ΔV      = k × L × I_b × ρ / S            (k = 2 single-phase, √3 three-phase)
//! I'_b    = I_b / (f_temp × f_agrup)
//! I_z     = I_z,table(S, method) × f_temp × f_agrup
//! ```
//!
//! ## Contents
//!
//! | Item                     | Where                                |
//! |--------------------------|--------------------------------------|
//! | Standard sections        | [`STANDARD_SECTIONS_MM2`]            |
//! | Protection ratings       | [`BREAKER_RATINGS_A`]                |
//! | Resistivities            | [`ConductorMaterial`]                |
//! | Drop limits              | [`UsageType`]                        |
//! | Sizing ampacity          | [`ampacity`] module                  |
//! | Correction factors       | [`correction`] module                |
//! | Quadros 52-C11 / 52-C12  | [`reference`] module                 |
//!
//! All tables are plain immutable data. Lookups that miss fall back to a
//! default (documented per function), never to an error.

pub mod ampacity;
pub mod correction;
pub mod reference;

pub use ampacity::{ampacity, InstallationMethod};
pub use correction::{grouping_factor, temperature_factor, Insulation};

use serde::{Deserialize, Serialize};

use crate::units::{Amperes, Percent, SqMm};

// ============================================================================
// RTIEBT Section References
// ============================================================================

/// RTIEBT section and table references for traceable reports.
pub mod rtiebt_ref {
    /// Conductor ampacity, insulated conductors in conduit (A1/A2)
    pub const TABLE_VII: &str = "RTIEBT Quadro VII";
    /// Cables in conduit in masonry (B1/B2)
    pub const TABLE_VIII: &str = "RTIEBT Quadro VIII";
    /// Buried cables (C/D)
    pub const TABLE_IX: &str = "RTIEBT Quadro IX";
    /// Cables in free air (E/F/G)
    pub const TABLE_X: &str = "RTIEBT Quadro X";
    /// Ambient temperature correction factors
    pub const TABLE_XI: &str = "RTIEBT Quadro XI";
    /// Grouping correction factors
    pub const TABLE_XII: &str = "RTIEBT Quadro XII";
    /// Copper XLPE/EPR ampacity, methods E/F/G
    pub const QUADRO_52_C11: &str = "RTIEBT Quadro 52-C11";
    /// Aluminium XLPE/EPR ampacity, methods E/F/G
    pub const QUADRO_52_C12: &str = "RTIEBT Quadro 52-C12";
    /// Minimum conductor sections
    pub const MIN_SECTIONS: &str = "RTIEBT Secção 523";
    /// Voltage drop limits
    pub const VOLTAGE_DROP: &str = "RTIEBT Secção 525";
}

// ============================================================================
// Standard Values
// ============================================================================

/// Standardized conductor sections (mm²)
pub const STANDARD_SECTIONS_MM2: [f64; 19] = [
    1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0, 95.0, 120.0, 150.0, 185.0, 240.0, 300.0,
    400.0, 500.0, 630.0,
];

/// Standard protective device ratings (A)
pub const BREAKER_RATINGS_A: [f64; 20] = [
    6.0, 10.0, 13.0, 16.0, 20.0, 25.0, 32.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0,
    250.0, 315.0, 400.0, 500.0, 630.0,
];

/// Minimum section for copper conductors (mm²)
pub const MIN_SECTION_COPPER_MM2: f64 = 1.5;

/// Minimum section for aluminium conductors (mm²)
pub const MIN_SECTION_ALUMINUM_MM2: f64 = 16.0;

/// Reference ambient temperature of the ampacity tables (°C)
pub const REFERENCE_AMBIENT_C: f64 = 30.0;

/// Round a computed section up to the nearest standardized section.
///
/// Sections above the largest standard size return the largest (630 mm²).
///
/// ```rust
/// use calc_core::rtiebt::next_standard_section;
/// use calc_core::units::SqMm;
///
/// assert_eq!(next_standard_section(SqMm(1.52)), SqMm(2.5));
/// assert_eq!(next_standard_section(SqMm(2.5)), SqMm(2.5));
/// assert_eq!(next_standard_section(SqMm(900.0)), SqMm(630.0));
/// ```
pub fn next_standard_section(section: SqMm) -> SqMm {
    let largest = STANDARD_SECTIONS_MM2[STANDARD_SECTIONS_MM2.len() - 1];
    SqMm(
        STANDARD_SECTIONS_MM2
            .iter()
            .copied()
            .find(|&s| s >= section.0)
            .unwrap_or(largest),
    )
}

/// First standard protection rating at or above the design current.
///
/// Currents above the largest rating return the largest (630 A).
pub fn next_breaker_rating(current: Amperes) -> Amperes {
    let largest = BREAKER_RATINGS_A[BREAKER_RATINGS_A.len() - 1];
    Amperes(
        BREAKER_RATINGS_A
            .iter()
            .copied()
            .find(|&r| r >= current.0)
            .unwrap_or(largest),
    )
}

// ============================================================================
// Conductor Material
// ============================================================================

/// Conductor material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConductorMaterial {
    /// Copper (Cu)
    #[default]
    Copper,
    /// Aluminium (Al)
    Aluminum,
}

impl ConductorMaterial {
    /// All materials for UI selection
    pub const ALL: [ConductorMaterial; 2] =
        [ConductorMaterial::Copper, ConductorMaterial::Aluminum];

    /// Resistivity at 20°C (Ω·mm²/m), used for sizing by voltage drop
    pub fn resistivity(&self) -> f64 {
        match self {
            ConductorMaterial::Copper => 0.0175,
            ConductorMaterial::Aluminum => 0.0285,
        }
    }

    /// Resistivity at conductor operating temperature (Ω·mm²/m),
    /// used by the circuit schedule
    pub fn operating_resistivity(&self) -> f64 {
        match self {
            ConductorMaterial::Copper => 0.0225,
            ConductorMaterial::Aluminum => 0.036,
        }
    }

    /// Minimum allowed section (mm²)
    pub fn min_section(&self) -> SqMm {
        match self {
            ConductorMaterial::Copper => SqMm(MIN_SECTION_COPPER_MM2),
            ConductorMaterial::Aluminum => SqMm(MIN_SECTION_ALUMINUM_MM2),
        }
    }

    /// Chemical symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Cu",
            ConductorMaterial::Aluminum => "Al",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Copper (Cu)",
            ConductorMaterial::Aluminum => "Aluminium (Al, ≥16 mm² only)",
        }
    }
}

impl std::fmt::Display for ConductorMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Usage Type (voltage drop limit)
// ============================================================================

/// Circuit usage, which sets the admissible voltage drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    /// Lighting circuits: 3%
    Lighting,
    /// Socket outlets: 5%
    #[default]
    Sockets,
    /// Motor circuits: 5%
    Motors,
    /// Any other use: 5%
    Other,
}

impl UsageType {
    /// All usage variants for UI selection
    pub const ALL: [UsageType; 4] = [
        UsageType::Lighting,
        UsageType::Sockets,
        UsageType::Motors,
        UsageType::Other,
    ];

    /// Maximum voltage drop allowed for this usage
    pub fn drop_limit(&self) -> Percent {
        match self {
            UsageType::Lighting => Percent(3.0),
            UsageType::Sockets | UsageType::Motors | UsageType::Other => Percent(5.0),
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            UsageType::Lighting => "Lighting (max. drop 3%)",
            UsageType::Sockets => "Socket outlets (max. drop 5%)",
            UsageType::Motors => "Motors (max. drop 5%)",
            UsageType::Other => "Other (max. drop 5%)",
        }
    }
}

impl std::fmt::Display for UsageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_standard_section() {
        assert_eq!(next_standard_section(SqMm(0.1)), SqMm(1.5));
        assert_eq!(next_standard_section(SqMm(1.52)), SqMm(2.5));
        assert_eq!(next_standard_section(SqMm(16.0)), SqMm(16.0));
        assert_eq!(next_standard_section(SqMm(241.0)), SqMm(300.0));
        assert_eq!(next_standard_section(SqMm(1000.0)), SqMm(630.0));
    }

    #[test]
    fn test_next_breaker_rating() {
        assert_eq!(next_breaker_rating(Amperes(20.0)), Amperes(20.0));
        assert_eq!(next_breaker_rating(Amperes(20.1)), Amperes(25.0));
        assert_eq!(next_breaker_rating(Amperes(1.0)), Amperes(6.0));
        assert_eq!(next_breaker_rating(Amperes(700.0)), Amperes(630.0));
    }

    #[test]
    fn test_resistivities() {
        assert_eq!(ConductorMaterial::Copper.resistivity(), 0.0175);
        assert_eq!(ConductorMaterial::Aluminum.resistivity(), 0.0285);
        assert_eq!(ConductorMaterial::Copper.operating_resistivity(), 0.0225);
        assert_eq!(ConductorMaterial::Aluminum.operating_resistivity(), 0.036);
    }

    #[test]
    fn test_drop_limits() {
        assert_eq!(UsageType::Lighting.drop_limit(), Percent(3.0));
        assert_eq!(UsageType::Sockets.drop_limit(), Percent(5.0));
        assert_eq!(UsageType::Motors.drop_limit(), Percent(5.0));
        assert_eq!(UsageType::Other.drop_limit(), Percent(5.0));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&ConductorMaterial::Aluminum).unwrap(), "\"aluminum\"");
        assert_eq!(serde_json::to_string(&UsageType::Lighting).unwrap(), "\"lighting\"");
    }
}
