//! Read-only reference tables for manual cross-checking.
//!
//! Quadro 52-C11 (copper) and Quadro 52-C12 (aluminium), XLPE or EPR
//! insulation (90°C conductor), 30°C ambient, installation methods E, F, G.
//!
//! The aluminium table is an approximation (~20% below copper) and is marked
//! with [`ReferenceTable::approximate`]. Treat its values as indicative only.

use serde::Serialize;

use super::rtiebt_ref;
use super::ConductorMaterial;
use crate::units::{Amperes, SqMm};

/// Column of the 52-C11 / 52-C12 tables (numbered 1-7 as printed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceColumn {
    /// Method E, multi-core, two loaded conductors
    E2Loaded,
    /// Method E, multi-core, three loaded conductors
    E3Loaded,
    /// Method F, single-core, two conductors in trefoil
    FTrefoil,
    /// Method F, single-core, three conductors touching
    FTouching,
    /// Method F, single-core, flat without spacing
    FFlat,
    /// Method G, spaced, horizontal
    GHorizontal,
    /// Method G, spaced, vertical
    GVertical,
}

impl ReferenceColumn {
    /// Columns in printed order
    pub const ALL: [ReferenceColumn; 7] = [
        ReferenceColumn::E2Loaded,
        ReferenceColumn::E3Loaded,
        ReferenceColumn::FTrefoil,
        ReferenceColumn::FTouching,
        ReferenceColumn::FFlat,
        ReferenceColumn::GHorizontal,
        ReferenceColumn::GVertical,
    ];

    /// Method letter and printed column number (e.g., "F 4")
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceColumn::E2Loaded => "E 1",
            ReferenceColumn::E3Loaded => "E 2",
            ReferenceColumn::FTrefoil => "F 3",
            ReferenceColumn::FTouching => "F 4",
            ReferenceColumn::FFlat => "F 5",
            ReferenceColumn::GHorizontal => "G 6",
            ReferenceColumn::GVertical => "G 7",
        }
    }

    /// Column heading
    pub fn heading(&self) -> &'static str {
        match self {
            ReferenceColumn::E2Loaded => "Multi-core, 2 loaded",
            ReferenceColumn::E3Loaded => "Multi-core, 3 loaded",
            ReferenceColumn::FTrefoil => "Single-core, trefoil",
            ReferenceColumn::FTouching => "Single-core, touching",
            ReferenceColumn::FFlat => "Single-core, flat",
            ReferenceColumn::GHorizontal => "Spaced, horizontal",
            ReferenceColumn::GVertical => "Spaced, vertical",
        }
    }

    fn index(&self) -> usize {
        match self {
            ReferenceColumn::E2Loaded => 0,
            ReferenceColumn::E3Loaded => 1,
            ReferenceColumn::FTrefoil => 2,
            ReferenceColumn::FTouching => 3,
            ReferenceColumn::FFlat => 4,
            ReferenceColumn::GHorizontal => 5,
            ReferenceColumn::GVertical => 6,
        }
    }
}

/// One row: nominal section and the seven column values (None = not listed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRow {
    pub section_mm2: f64,
    pub values_a: [Option<f64>; 7],
}

/// A published ampacity table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceTable {
    /// Regulation reference (e.g., "RTIEBT Quadro 52-C11")
    pub reference: &'static str,
    /// Conductor material
    pub material: ConductorMaterial,
    /// Insulation and temperature conditions
    pub conditions: &'static str,
    /// True when values are estimated rather than transcribed
    pub approximate: bool,
    pub rows: &'static [ReferenceRow],
}

impl ReferenceTable {
    /// Value for a section and column, if listed
    pub fn lookup(&self, section: SqMm, column: ReferenceColumn) -> Option<Amperes> {
        self.rows
            .iter()
            .find(|r| (r.section_mm2 - section.0).abs() < 1e-9)
            .and_then(|r| r.values_a[column.index()])
            .map(Amperes)
    }
}

const fn row(section_mm2: f64, values_a: [Option<f64>; 7]) -> ReferenceRow {
    ReferenceRow { section_mm2, values_a }
}

const N: Option<f64> = None;

const fn v(a: f64) -> Option<f64> {
    Some(a)
}

const COPPER_ROWS: [ReferenceRow; 19] = [
    row(1.5, [v(26.0), v(23.0), N, N, N, N, N]),
    row(2.5, [v(36.0), v(32.0), N, N, N, N, N]),
    row(4.0, [v(49.0), v(42.0), N, N, N, N, N]),
    row(6.0, [v(63.0), v(54.0), N, N, N, N, N]),
    row(10.0, [v(86.0), v(75.0), N, N, N, N, N]),
    row(16.0, [v(115.0), v(100.0), N, N, N, N, N]),
    row(25.0, [v(149.0), v(127.0), v(161.0), v(135.0), v(141.0), v(182.0), v(161.0)]),
    row(35.0, [v(185.0), v(158.0), v(200.0), v(169.0), v(176.0), v(226.0), v(201.0)]),
    row(50.0, [v(225.0), v(192.0), v(242.0), v(207.0), v(216.0), v(275.0), v(246.0)]),
    row(70.0, [v(289.0), v(246.0), v(310.0), v(268.0), v(279.0), v(353.0), v(318.0)]),
    row(95.0, [v(352.0), v(298.0), v(377.0), v(328.0), v(342.0), v(430.0), v(389.0)]),
    row(120.0, [v(410.0), v(346.0), v(437.0), v(383.0), v(400.0), v(500.0), v(454.0)]),
    row(150.0, [v(473.0), v(399.0), v(504.0), v(444.0), v(464.0), v(577.0), v(527.0)]),
    row(185.0, [v(542.0), v(456.0), v(575.0), v(510.0), v(533.0), v(661.0), v(605.0)]),
    row(240.0, [v(641.0), v(538.0), v(679.0), v(607.0), v(634.0), v(781.0), v(719.0)]),
    row(300.0, [v(741.0), v(621.0), v(783.0), v(703.0), v(736.0), v(902.0), v(833.0)]),
    row(400.0, [N, N, v(940.0), v(823.0), v(868.0), v(1085.0), v(1008.0)]),
    row(500.0, [N, N, v(1083.0), v(946.0), v(998.0), v(1253.0), v(1169.0)]),
    row(630.0, [N, N, v(1254.0), v(1088.0), v(1151.0), v(1454.0), v(1362.0)]),
];

const ALUMINUM_ROWS: [ReferenceRow; 14] = [
    row(16.0, [v(89.0), v(78.0), N, N, N, N, N]),
    row(25.0, [v(116.0), v(99.0), v(125.0), v(105.0), v(110.0), v(142.0), v(125.0)]),
    row(35.0, [v(144.0), v(123.0), v(156.0), v(132.0), v(137.0), v(176.0), v(157.0)]),
    row(50.0, [v(175.0), v(150.0), v(189.0), v(161.0), v(168.0), v(214.0), v(192.0)]),
    row(70.0, [v(225.0), v(192.0), v(242.0), v(209.0), v(217.0), v(275.0), v(248.0)]),
    row(95.0, [v(274.0), v(232.0), v(294.0), v(256.0), v(267.0), v(335.0), v(303.0)]),
    row(120.0, [v(319.0), v(270.0), v(341.0), v(298.0), v(312.0), v(390.0), v(354.0)]),
    row(150.0, [v(369.0), v(311.0), v(393.0), v(346.0), v(362.0), v(450.0), v(411.0)]),
    row(185.0, [v(422.0), v(355.0), v(448.0), v(397.0), v(415.0), v(515.0), v(471.0)]),
    row(240.0, [v(499.0), v(419.0), v(529.0), v(473.0), v(494.0), v(609.0), v(560.0)]),
    row(300.0, [v(577.0), v(484.0), v(610.0), v(548.0), v(573.0), v(703.0), v(649.0)]),
    row(400.0, [N, N, v(732.0), v(641.0), v(677.0), v(846.0), v(786.0)]),
    row(500.0, [N, N, v(843.0), v(737.0), v(778.0), v(977.0), v(911.0)]),
    row(630.0, [N, N, v(976.0), v(848.0), v(897.0), v(1133.0), v(1061.0)]),
];

/// Quadro 52-C11: copper, XLPE/EPR
pub const QUADRO_52_C11: ReferenceTable = ReferenceTable {
    reference: rtiebt_ref::QUADRO_52_C11,
    material: ConductorMaterial::Copper,
    conditions: "XLPE/EPR insulation, 90°C conductor, 30°C ambient",
    approximate: false,
    rows: &COPPER_ROWS,
};

/// Quadro 52-C12: aluminium, XLPE/EPR (approximate values)
pub const QUADRO_52_C12: ReferenceTable = ReferenceTable {
    reference: rtiebt_ref::QUADRO_52_C12,
    material: ConductorMaterial::Aluminum,
    conditions: "XLPE/EPR insulation, 90°C conductor, 30°C ambient",
    approximate: true,
    rows: &ALUMINUM_ROWS,
};

/// Reference table for a conductor material
pub fn table_for(material: ConductorMaterial) -> &'static ReferenceTable {
    match material {
        ConductorMaterial::Copper => &QUADRO_52_C11,
        ConductorMaterial::Aluminum => &QUADRO_52_C12,
    }
}

/// Headline temperature factors shown beside the tables (reference 30°C)
pub const TEMPERATURE_SUMMARY: [(&str, f64); 4] =
    [("25°C", 1.20), ("30°C", 1.00), ("40°C", 0.82), ("50°C", 0.58)];

/// Headline grouping factors shown beside the tables
pub const GROUPING_SUMMARY: [(&str, f64); 5] =
    [("1", 1.00), ("2", 0.80), ("3", 0.70), ("4-5", 0.65), ("≥6", 0.50)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copper_lookup() {
        assert_eq!(
            QUADRO_52_C11.lookup(SqMm(2.5), ReferenceColumn::E2Loaded),
            Some(Amperes(36.0))
        );
        assert_eq!(
            QUADRO_52_C11.lookup(SqMm(630.0), ReferenceColumn::GHorizontal),
            Some(Amperes(1454.0))
        );
        assert_eq!(QUADRO_52_C11.lookup(SqMm(16.0), ReferenceColumn::FTrefoil), None);
        assert_eq!(QUADRO_52_C11.lookup(SqMm(400.0), ReferenceColumn::E3Loaded), None);
    }

    #[test]
    fn test_aluminum_is_flagged_approximate() {
        assert!(QUADRO_52_C12.approximate);
        assert!(!QUADRO_52_C11.approximate);
        assert_eq!(QUADRO_52_C12.rows[0].section_mm2, 16.0);
        assert!(table_for(ConductorMaterial::Aluminum).approximate);
    }

    #[test]
    fn test_aluminum_below_copper() {
        for al in QUADRO_52_C12.rows {
            for column in ReferenceColumn::ALL {
                if let (Some(a), Some(c)) = (
                    QUADRO_52_C12.lookup(SqMm(al.section_mm2), column),
                    QUADRO_52_C11.lookup(SqMm(al.section_mm2), column),
                ) {
                    assert!(a.0 < c.0, "{} mm² {:?}", al.section_mm2, column);
                }
            }
        }
    }
}
