//! Sizing ampacity table (copper, PVC insulation, 30°C ambient)
//!
//! Current-carrying capacity I_z (A) keyed by (section, installation method).
//! Only methods A1, A2, B1, B2, C and D are tabulated, for sections
//! 1.5 - 240 mm². Methods E, F and G are listed for selection but have no
//! sizing entry; see [`super::reference`] for their published values.

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::STANDARD_SECTIONS_MM2;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Amperes, SqMm};

/// Installation (reference) method per RTIEBT Quadro 52-H
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InstallationMethod {
    /// Insulated conductors in conduit in a thermally insulated wall
    A1,
    /// Multi-core cable in conduit in a thermally insulated wall
    A2,
    /// Insulated conductors in conduit on or in a masonry wall
    #[default]
    B1,
    /// Multi-core cable in conduit on or in a masonry wall
    B2,
    /// Cables buried directly in the ground
    C,
    /// Cables in ducts in the ground
    D,
    /// Multi-core cables in free air
    E,
    /// Single-core cables on perforated trays
    F,
    /// Single-core cables spaced, on non-perforated trays
    G,
}

impl InstallationMethod {
    /// All installation methods for UI selection
    pub const ALL: [InstallationMethod; 9] = [
        InstallationMethod::A1,
        InstallationMethod::A2,
        InstallationMethod::B1,
        InstallationMethod::B2,
        InstallationMethod::C,
        InstallationMethod::D,
        InstallationMethod::E,
        InstallationMethod::F,
        InstallationMethod::G,
    ];

    /// Short code (e.g., "B1")
    pub fn code(&self) -> &'static str {
        match self {
            InstallationMethod::A1 => "A1",
            InstallationMethod::A2 => "A2",
            InstallationMethod::B1 => "B1",
            InstallationMethod::B2 => "B2",
            InstallationMethod::C => "C",
            InstallationMethod::D => "D",
            InstallationMethod::E => "E",
            InstallationMethod::F => "F",
            InstallationMethod::G => "G",
        }
    }

    /// Description of the installation
    pub fn description(&self) -> &'static str {
        match self {
            InstallationMethod::A1 => "Insulated conductors in conduit",
            InstallationMethod::A2 => "Multi-core cable in conduit",
            InstallationMethod::B1 => "Insulated conductors in conduit in wall",
            InstallationMethod::B2 => "Multi-core cable in conduit in wall",
            InstallationMethod::C => "Cables directly buried",
            InstallationMethod::D => "Cables in buried duct",
            InstallationMethod::E => "Cables in free air",
            InstallationMethod::F => "Cables on perforated tray",
            InstallationMethod::G => "Cables on non-perforated tray",
        }
    }

    /// Whether the sizing table carries values for this method
    pub fn is_tabulated(&self) -> bool {
        !matches!(
            self,
            InstallationMethod::E | InstallationMethod::F | InstallationMethod::G
        )
    }

    fn column(&self) -> Option<usize> {
        match self {
            InstallationMethod::A1 => Some(0),
            InstallationMethod::A2 => Some(1),
            InstallationMethod::B1 => Some(2),
            InstallationMethod::B2 => Some(3),
            InstallationMethod::C => Some(4),
            InstallationMethod::D => Some(5),
            InstallationMethod::E | InstallationMethod::F | InstallationMethod::G => None,
        }
    }
}

impl std::fmt::Display for InstallationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code(), self.description())
    }
}

impl FromStr for InstallationMethod {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let code = s.trim().to_uppercase();
        InstallationMethod::ALL
            .iter()
            .copied()
            .find(|m| m.code() == code)
            .ok_or_else(|| CalcError::unknown_code("installation method", s))
    }
}

/// Rows: section (mm²), then A1, A2, B1, B2, C, D
const SIZING_TABLE: [(f64, [f64; 6]); 15] = [
    (1.5, [15.5, 13.5, 17.5, 16.0, 20.0, 18.0]),
    (2.5, [21.0, 18.5, 24.0, 22.0, 27.0, 24.0]),
    (4.0, [28.0, 25.0, 32.0, 30.0, 37.0, 32.0]),
    (6.0, [36.0, 32.0, 41.0, 38.0, 47.0, 41.0]),
    (10.0, [50.0, 43.0, 57.0, 52.0, 64.0, 57.0]),
    (16.0, [68.0, 57.0, 76.0, 69.0, 85.0, 76.0]),
    (25.0, [89.0, 75.0, 101.0, 90.0, 112.0, 96.0]),
    (35.0, [110.0, 92.0, 125.0, 111.0, 138.0, 119.0]),
    (50.0, [134.0, 110.0, 151.0, 133.0, 168.0, 144.0]),
    (70.0, [171.0, 139.0, 192.0, 168.0, 213.0, 184.0]),
    (95.0, [207.0, 167.0, 232.0, 201.0, 258.0, 223.0]),
    (120.0, [239.0, 192.0, 269.0, 232.0, 299.0, 259.0]),
    (150.0, [271.0, 216.0, 305.0, 262.0, 340.0, 295.0]),
    (185.0, [311.0, 245.0, 350.0, 298.0, 390.0, 341.0]),
    (240.0, [361.0, 281.0, 407.0, 344.0, 454.0, 397.0]),
];

/// Sections are keyed in tenths of mm² so 1.5 and 2.5 hash exactly
fn section_key(section: SqMm) -> u32 {
    (section.0 * 10.0).round() as u32
}

static AMPACITY: Lazy<HashMap<(u32, InstallationMethod), f64>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (section, row) in SIZING_TABLE.iter() {
        for method in InstallationMethod::ALL {
            if let Some(col) = method.column() {
                map.insert((section_key(SqMm(*section)), method), row[col]);
            }
        }
    }
    map
});

/// Tabulated ampacity for a section and installation method.
///
/// Returns `None` when the pair is not in the sizing table (methods E/F/G,
/// sections above 240 mm², non-standard sections).
///
/// ```rust
/// use calc_core::rtiebt::{ampacity, InstallationMethod};
/// use calc_core::units::{Amperes, SqMm};
///
/// assert_eq!(ampacity(SqMm(2.5), InstallationMethod::B1), Some(Amperes(24.0)));
/// assert_eq!(ampacity(SqMm(2.5), InstallationMethod::E), None);
/// ```
pub fn ampacity(section: SqMm, method: InstallationMethod) -> Option<Amperes> {
    if !STANDARD_SECTIONS_MM2.contains(&section.0) {
        return None;
    }
    AMPACITY.get(&(section_key(section), method)).copied().map(Amperes)
}

/// The tabulated sizing rows, for display
pub fn sizing_rows() -> impl Iterator<Item = (SqMm, [Amperes; 6])> {
    SIZING_TABLE
        .iter()
        .map(|(s, row)| (SqMm(*s), row.map(Amperes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(ampacity(SqMm(1.5), InstallationMethod::B1), Some(Amperes(17.5)));
        assert_eq!(ampacity(SqMm(240.0), InstallationMethod::C), Some(Amperes(454.0)));
        assert_eq!(ampacity(SqMm(16.0), InstallationMethod::A2), Some(Amperes(57.0)));
    }

    #[test]
    fn test_untabulated_entries() {
        assert_eq!(ampacity(SqMm(300.0), InstallationMethod::B1), None);
        assert_eq!(ampacity(SqMm(3.0), InstallationMethod::B1), None);
        assert_eq!(ampacity(SqMm(1.52), InstallationMethod::B1), None);
        assert_eq!(ampacity(SqMm(2.54), InstallationMethod::B1), None);
        assert_eq!(ampacity(SqMm(f64::NAN), InstallationMethod::B1), None);
        for method in [InstallationMethod::E, InstallationMethod::F, InstallationMethod::G] {
            assert!(!method.is_tabulated());
            assert_eq!(ampacity(SqMm(16.0), method), None);
        }
    }

    #[test]
    fn test_ampacity_grows_with_section() {
        for method in InstallationMethod::ALL.iter().filter(|m| m.is_tabulated()) {
            let values: Vec<f64> = sizing_rows()
                .filter_map(|(s, _)| ampacity(s, *method))
                .map(|a| a.0)
                .collect();
            assert_eq!(values.len(), 15);
            assert!(values.windows(2).all(|w| w[1] > w[0]), "{:?}", method);
        }
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("b1".parse::<InstallationMethod>().unwrap(), InstallationMethod::B1);
        assert_eq!(" G ".parse::<InstallationMethod>().unwrap(), InstallationMethod::G);
        assert!("Z9".parse::<InstallationMethod>().is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&InstallationMethod::A2).unwrap();
        assert_eq!(json, "\"A2\"");
    }
}
