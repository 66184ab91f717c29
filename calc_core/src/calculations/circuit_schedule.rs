//! # Circuit Schedule
//!
//! Spreadsheet-style verification of a chain of three-phase circuits
//! (e.g., main board → sub-board → inverter). Each row is checked on its
//! own; the voltage drop accumulates down the list.
//!
//! ## Formulas
//!
//! ```text
//! I_b     = P × 1.45                    (P in kW)
//!         = P × 1000 / (√3 × 400)       (P in kVA)
//! I_2     = k_2 × I_n                   (fuse 1.6, breaker ≤63 A 1.45, >63 A 1.3)
//! U       = ρ × L / (S × n) × I_b
//! DU%     = √3 × ρ × L × I_b / (S × n × U_n) × 100
//! cond. 1 : I_b < I_n < I_z
//! cond. 2 : I_2 < 1.45 × I_z
//! ```
//!
//! ρ is the operating-temperature resistivity (Cu 0.0225, Al 0.036 Ω·mm²/m).
//! A zero section gives non-finite drops; they are shown as a dash and count
//! as zero in the running total. This holds for both kinds: NaN (zero length
//! over zero section) and +∞ (nonzero length over zero section). An unsized
//! row never turns the totals below it into infinity.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::rtiebt::ConductorMaterial;

/// Line-to-line voltage assumed when converting apparent power to current (V)
pub const KVA_REFERENCE_VOLTAGE: f64 = 400.0;

/// kW → A rule of thumb for 400 V three-phase loads
pub const KW_TO_AMPERES: f64 = 1.45;

/// Conventional operating current multiplier for the conductor
pub const IZ_FACTOR: f64 = 1.45;

/// Largest number of parallel conductors per phase
pub const MAX_PARALLEL: u32 = 5;

/// Parallel conductor counts offered for selection
pub const PARALLEL_CHOICES: [u32; MAX_PARALLEL as usize] = [1, 2, 3, 4, 5];

/// Round to a number of decimal places
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Unit of the power column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PowerUnit {
    #[default]
    #[serde(rename = "kW")]
    Kw,
    #[serde(rename = "kVA")]
    Kva,
}

impl PowerUnit {
    pub const ALL: [PowerUnit; 2] = [PowerUnit::Kw, PowerUnit::Kva];

    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUnit::Kw => "kW",
            PowerUnit::Kva => "kVA",
        }
    }
}

impl std::fmt::Display for PowerUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Protective device, which sets the conventional tripping current I_2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProtectionType {
    /// gG fuse
    #[serde(rename = "fuse")]
    Fuse,
    /// Circuit breaker rated up to 63 A
    #[serde(rename = "breaker_le_63a")]
    BreakerUpTo63,
    /// Circuit breaker rated above 63 A
    #[default]
    #[serde(rename = "breaker_gt_63a")]
    BreakerAbove63,
}

impl ProtectionType {
    pub const ALL: [ProtectionType; 3] = [
        ProtectionType::Fuse,
        ProtectionType::BreakerUpTo63,
        ProtectionType::BreakerAbove63,
    ];

    /// I_2 / I_n
    pub fn tripping_factor(&self) -> f64 {
        match self {
            ProtectionType::Fuse => 1.6,
            ProtectionType::BreakerUpTo63 => 1.45,
            ProtectionType::BreakerAbove63 => 1.3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProtectionType::Fuse => "Fuse",
            ProtectionType::BreakerUpTo63 => "Breaker ≤ 63 A",
            ProtectionType::BreakerAbove63 => "Breaker > 63 A",
        }
    }
}

impl std::fmt::Display for ProtectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Cable designation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CableType {
    #[serde(rename = "RZ1-K")]
    Rz1K,
    #[serde(rename = "RZ1-AL")]
    Rz1Al,
    #[serde(rename = "XV")]
    Xv,
}

impl CableType {
    pub const ALL: [CableType; 3] = [CableType::Rz1K, CableType::Rz1Al, CableType::Xv];

    pub fn designation(&self) -> &'static str {
        match self {
            CableType::Rz1K => "RZ1-K",
            CableType::Rz1Al => "RZ1-AL",
            CableType::Xv => "XV",
        }
    }
}

impl std::fmt::Display for CableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designation())
    }
}

/// One circuit of the schedule (the editable columns).
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "MB → Inverter 1",
///   "power": 10.0,
///   "power_unit": "kW",
///   "material": "copper",
///   "cable_type": "RZ1-K",
///   "parallel": 1,
///   "section_mm2": 16.0,
///   "length_m": 50.0,
///   "in_a": 16.0,
///   "iz_a": 20.0,
///   "method_ref": "E",
///   "protection": "breaker_le_63a"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitRow {
    /// Row identity (generated when absent)
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Run description (e.g., "Main board → Inverter 1")
    pub label: String,
    /// Load power
    pub power: f64,
    pub power_unit: PowerUnit,
    pub material: ConductorMaterial,
    pub cable_type: Option<CableType>,
    /// Parallel conductors per phase (1-5)
    pub parallel: u32,
    pub section_mm2: f64,
    pub length_m: f64,
    /// Protection rated current I_n (A)
    pub in_a: f64,
    /// Conductor ampacity I_z (A), read from the tables by the user
    pub iz_a: f64,
    /// Reference installation method, free text
    pub method_ref: String,
    pub protection: ProtectionType,
    pub power_factor: f64,
    /// Line-to-line nominal voltage U_n (V)
    pub nominal_voltage_v: f64,
    /// Typed design current replacing the one derived from power
    pub ib_override: Option<f64>,
}

impl Default for CircuitRow {
    fn default() -> Self {
        CircuitRow {
            id: Uuid::new_v4(),
            label: String::new(),
            power: 0.0,
            power_unit: PowerUnit::Kw,
            material: ConductorMaterial::Copper,
            cable_type: None,
            parallel: 1,
            section_mm2: 0.0,
            length_m: 0.0,
            in_a: 0.0,
            iz_a: 0.0,
            method_ref: String::new(),
            protection: ProtectionType::BreakerAbove63,
            power_factor: 0.95,
            nominal_voltage_v: 400.0,
            ib_override: None,
        }
    }
}

impl CircuitRow {
    /// Validate a row loaded from a file.
    pub fn validate(&self) -> CalcResult<()> {
        if !(1..=MAX_PARALLEL).contains(&self.parallel) {
            return Err(CalcError::invalid_input(
                "parallel",
                self.parallel.to_string(),
                "Parallel conductors must be between 1 and 5",
            ));
        }
        let non_negative = [
            ("power", self.power),
            ("section_mm2", self.section_mm2),
            ("length_m", self.length_m),
            ("in_a", self.in_a),
            ("iz_a", self.iz_a),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Value must be zero or positive",
                ));
            }
        }
        if !self.nominal_voltage_v.is_finite() || self.nominal_voltage_v <= 0.0 {
            return Err(CalcError::invalid_input(
                "nominal_voltage_v",
                self.nominal_voltage_v.to_string(),
                "Nominal voltage must be positive",
            ));
        }
        if let Some(ib) = self.ib_override {
            if !ib.is_finite() || ib < 0.0 {
                return Err(CalcError::invalid_input(
                    "ib_override",
                    ib.to_string(),
                    "Design current must be zero or positive",
                ));
            }
        }
        Ok(())
    }

    /// Design current derived from the power column, rounded to 0.1 A
    pub fn derived_ib(&self) -> f64 {
        let ib = match self.power_unit {
            PowerUnit::Kw => self.power * KW_TO_AMPERES,
            PowerUnit::Kva => self.power * 1000.0 / (3f64.sqrt() * KVA_REFERENCE_VOLTAGE),
        };
        round_to(ib, 1)
    }

    /// Design current in use: the override when set, else derived
    pub fn ib(&self) -> f64 {
        self.ib_override.unwrap_or_else(|| self.derived_ib())
    }

    /// Set the power and drop any typed design current
    pub fn set_power(&mut self, power: f64, unit: PowerUnit) {
        self.power = power;
        self.power_unit = unit;
        self.ib_override = None;
    }

    /// Evaluate this row on its own (the running total is left at the
    /// row's own DU%).
    pub fn evaluate(&self) -> CircuitRowResult {
        let ib = self.ib();
        let rho = self.material.operating_resistivity();
        let conductor_area = self.section_mm2 * f64::from(self.parallel);

        let i2 = round_to(self.protection.tripping_factor() * self.in_a, 1);
        let iz_145 = round_to(IZ_FACTOR * self.iz_a, 1);
        let u = round_to(rho * self.length_m / conductor_area * ib, 2);
        let du = round_to(
            3f64.sqrt() * rho * self.length_m * ib / (conductor_area * self.nominal_voltage_v)
                * 100.0,
            2,
        );

        CircuitRowResult {
            id: self.id,
            ib_a: ib,
            i2_a: i2,
            iz_145_a: iz_145,
            u_v: u,
            du_percent: du,
            du_total_percent: if du.is_finite() { du } else { 0.0 },
            condition1: ib < self.in_a && self.in_a < self.iz_a,
            condition2: i2 < iz_145,
        }
    }
}

/// Computed columns of one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitRowResult {
    pub id: Uuid,
    /// Design current I_b (A)
    pub ib_a: f64,
    /// Conventional tripping current I_2 (A)
    pub i2_a: f64,
    /// 1.45 × I_z (A)
    pub iz_145_a: f64,
    /// Voltage drop (V); non-finite for a zero section
    pub u_v: f64,
    /// Voltage drop (%)
    pub du_percent: f64,
    /// Cumulative voltage drop up to and including this row (%)
    pub du_total_percent: f64,
    /// I_b < I_n < I_z
    pub condition1: bool,
    /// I_2 < 1.45 × I_z
    pub condition2: bool,
}

impl CircuitRowResult {
    /// Both protection conditions hold
    pub fn passes(&self) -> bool {
        self.condition1 && self.condition2
    }
}

/// An ordered list of circuits; never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitSchedule {
    #[serde(default)]
    pub label: String,
    pub rows: Vec<CircuitRow>,
}

impl Default for CircuitSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitSchedule {
    /// A schedule with one blank row
    pub fn new() -> Self {
        CircuitSchedule {
            label: String::new(),
            rows: vec![CircuitRow::default()],
        }
    }

    /// Append a blank row, returning its id
    pub fn add_row(&mut self) -> Uuid {
        let row = CircuitRow::default();
        let id = row.id;
        self.rows.push(row);
        id
    }

    /// Remove a row. The last remaining row is never removed.
    ///
    /// Returns whether a row was removed.
    pub fn remove_row(&mut self, id: Uuid) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    pub fn row(&self, id: Uuid) -> Option<&CircuitRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn row_mut(&mut self, id: Uuid) -> Option<&mut CircuitRow> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Validate every row and that the schedule is not empty
    pub fn validate(&self) -> CalcResult<()> {
        if self.rows.is_empty() {
            return Err(CalcError::missing_field("rows"));
        }
        self.rows.iter().try_for_each(CircuitRow::validate)
    }

    /// Evaluate all rows in order, accumulating the voltage drop.
    pub fn evaluate(&self) -> Vec<CircuitRowResult> {
        let mut running = 0.0;
        let results: Vec<CircuitRowResult> = self
            .rows
            .iter()
            .map(|row| {
                let mut result = row.evaluate();
                if result.du_percent.is_finite() {
                    running += result.du_percent;
                }
                result.du_total_percent = round_to(running, 2);
                result
            })
            .collect();

        debug!(
            rows = results.len(),
            du_total = running,
            "circuit schedule evaluated"
        );
        results
    }
}

/// Validate then evaluate a schedule
pub fn calculate(schedule: &CircuitSchedule) -> CalcResult<Vec<CircuitRowResult>> {
    schedule.validate()?;
    Ok(schedule.evaluate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feeder() -> CircuitRow {
        CircuitRow {
            label: "MB → SB1".to_string(),
            power: 10.0,
            power_unit: PowerUnit::Kw,
            section_mm2: 16.0,
            length_m: 50.0,
            in_a: 16.0,
            iz_a: 20.0,
            protection: ProtectionType::BreakerUpTo63,
            ..CircuitRow::default()
        }
    }

    fn inverter() -> CircuitRow {
        CircuitRow {
            label: "SB1 → INV1".to_string(),
            power: 50.0,
            power_unit: PowerUnit::Kva,
            material: ConductorMaterial::Aluminum,
            cable_type: Some(CableType::Rz1Al),
            parallel: 2,
            section_mm2: 35.0,
            length_m: 100.0,
            in_a: 80.0,
            iz_a: 150.0,
            ..CircuitRow::default()
        }
    }

    #[test]
    fn test_design_current() {
        assert_eq!(feeder().derived_ib(), 14.5);
        // 50 000 / (√3 × 400) = 72.17
        assert_eq!(inverter().derived_ib(), 72.2);

        let mut row = feeder();
        row.ib_override = Some(12.3);
        assert_eq!(row.ib(), 12.3);
        row.set_power(20.0, PowerUnit::Kw);
        assert_eq!(row.ib(), 29.0);
    }

    #[test]
    fn test_tripping_current() {
        let mut row = feeder();
        assert_eq!(row.evaluate().i2_a, 23.2);
        row.protection = ProtectionType::Fuse;
        assert_eq!(row.evaluate().i2_a, 25.6);
        row.protection = ProtectionType::BreakerAbove63;
        assert_eq!(row.evaluate().i2_a, 20.8);
    }

    #[test]
    fn test_row_drops() {
        let result = feeder().evaluate();
        // 0.0225 × 50 / 16 × 14.5 = 1.0195
        assert_eq!(result.u_v, 1.02);
        // √3 × 0.0225 × 50 × 14.5 / (16 × 400) × 100 = 0.4415
        assert_eq!(result.du_percent, 0.44);
        assert_eq!(result.iz_145_a, 29.0);
        assert!(result.condition1);
        assert!(result.condition2);
        assert!(result.passes());
    }

    #[test]
    fn test_cumulative_drop() {
        let schedule = CircuitSchedule {
            label: "PV plant".to_string(),
            rows: vec![feeder(), inverter()],
        };
        let results = calculate(&schedule).unwrap();
        assert_eq!(results.len(), 2);
        // 0.036 × 100 / 70 × 72.2 = 3.713
        assert_eq!(results[1].u_v, 3.71);
        // √3 × 0.036 × 100 × 72.2 / (70 × 400) × 100 = 1.608
        assert_eq!(results[1].du_percent, 1.61);
        assert_eq!(results[0].du_total_percent, 0.44);
        assert_eq!(results[1].du_total_percent, 2.05);
    }

    #[test]
    fn test_zero_section_counts_as_zero() {
        let blank = CircuitRow {
            power: 5.0,
            length_m: 10.0,
            ..CircuitRow::default()
        };
        let schedule = CircuitSchedule {
            label: String::new(),
            rows: vec![blank, feeder()],
        };
        let results = schedule.evaluate();
        assert!(results[0].u_v.is_infinite());
        assert!(results[0].du_percent.is_infinite());
        assert_eq!(results[0].du_total_percent, 0.0);
        assert_eq!(results[1].du_total_percent, 0.44);

        // zero length over zero section is NaN, also counted as zero
        let empty = CircuitRow {
            power: 5.0,
            ..CircuitRow::default()
        };
        let schedule = CircuitSchedule {
            label: String::new(),
            rows: vec![empty, feeder()],
        };
        let results = schedule.evaluate();
        assert!(results[0].du_percent.is_nan());
        assert_eq!(results[0].du_total_percent, 0.0);
        assert_eq!(results[1].du_total_percent, 0.44);
    }

    #[test]
    fn test_conditions_fail() {
        let row = CircuitRow {
            in_a: 25.0,
            iz_a: 20.0,
            ..feeder()
        };
        let result = row.evaluate();
        // 14.5 < 25 but 25 > 20
        assert!(!result.condition1);
        // I2 = 36.25 → 36.3 > 29.0
        assert!(!result.condition2);
        assert!(!result.passes());
    }

    #[test]
    fn test_add_and_remove_rows() {
        let mut schedule = CircuitSchedule::new();
        assert_eq!(schedule.rows.len(), 1);
        let only = schedule.rows[0].id;
        assert!(!schedule.remove_row(only));
        assert_eq!(schedule.rows.len(), 1);

        let second = schedule.add_row();
        assert_eq!(schedule.rows.len(), 2);
        assert!(schedule.remove_row(only));
        assert_eq!(schedule.rows[0].id, second);
        assert!(!schedule.remove_row(second));
        assert!(!schedule.remove_row(Uuid::new_v4()));
    }

    #[test]
    fn test_row_mut() {
        let mut schedule = CircuitSchedule::new();
        let id = schedule.add_row();
        schedule.row_mut(id).unwrap().length_m = 42.0;
        assert_eq!(schedule.row(id).unwrap().length_m, 42.0);
        assert!(schedule.row_mut(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_validation() {
        let schedule = CircuitSchedule {
            label: String::new(),
            rows: vec![CircuitRow { parallel: 6, ..feeder() }],
        };
        assert_eq!(calculate(&schedule).unwrap_err().field(), Some("parallel"));

        let schedule = CircuitSchedule {
            label: String::new(),
            rows: vec![CircuitRow { length_m: -1.0, ..feeder() }],
        };
        assert_eq!(calculate(&schedule).unwrap_err().field(), Some("length_m"));

        let empty = CircuitSchedule {
            label: String::new(),
            rows: Vec::new(),
        };
        assert_eq!(calculate(&empty).unwrap_err().error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_serialization() {
        let json = r#"{
            "rows": [
                { "label": "A", "power": 10.0, "power_unit": "kW", "section_mm2": 16.0,
                  "length_m": 50.0, "in_a": 16.0, "iz_a": 20.0,
                  "protection": "breaker_le_63a", "cable_type": "RZ1-K" }
            ]
        }"#;
        let schedule: CircuitSchedule = serde_json::from_str(json).unwrap();
        let row = &schedule.rows[0];
        assert_eq!(row.parallel, 1);
        assert_eq!(row.nominal_voltage_v, 400.0);
        assert_eq!(row.cable_type, Some(CableType::Rz1K));
        assert_eq!(row.protection, ProtectionType::BreakerUpTo63);

        let out = serde_json::to_string(&schedule).unwrap();
        let back: CircuitSchedule = serde_json::from_str(&out).unwrap();
        assert_eq!(schedule, back);
    }
}
