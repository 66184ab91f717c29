//! # Cable Sizing (RTIEBT)
//!
//! Sizes a low-voltage cable by voltage drop and by current-carrying
//! capacity, then checks the chosen standard section.
//!
//! ## Method
//!
//! ```text
//! ΔV_max   = limit% × U                       (3% lighting, 5% otherwise)
//! S_drop   = k × L × I_b × ρ / ΔV_max         (k = 2 or √3)
//! I'_b     = I_b / (f_temp × f_agrup)
//! S_amp    = first standard S with I_z,table(S, method) ≥ I'_b   (else 1.5)
//! S        = next standard section ≥ max(S_drop, S_amp)
//! ΔV       = k × L × I_b × ρ / S
//! I_z      = I_z,table(S, method) × f_temp × f_agrup
//! I_n      = first standard rating ≥ I_b
//! ```
//!
//! Each check produces an [`Observation`]; the result is compliant when
//! none of them failed.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::cable_sizing::{calculate, CableSizingInput};
//!
//! let input = CableSizingInput {
//!     conductor_count: 1,
//!     ..CableSizingInput::default()
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.section_mm2, 2.5);
//! assert!(result.passes());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::format::{fmt2, fmt_percent};
use crate::rtiebt::{
    ampacity, grouping_factor, next_breaker_rating, next_standard_section, rtiebt_ref,
    temperature_factor, ConductorMaterial, InstallationMethod, Insulation, UsageType,
    BREAKER_RATINGS_A, REFERENCE_AMBIENT_C, STANDARD_SECTIONS_MM2,
};
use crate::units::{Amperes, Meters, Percent, SqMm, Volts};

/// Lowest accepted ambient temperature (°C)
pub const MIN_AMBIENT_C: f64 = -10.0;
/// Highest accepted ambient temperature (°C)
pub const MAX_AMBIENT_C: f64 = 60.0;
/// Largest accepted number of grouped conductors
pub const MAX_CONDUCTORS: u32 = 20;

// ============================================================================
// Phase System
// ============================================================================

/// Supply phase system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSystem {
    /// Single-phase, 230 V
    #[default]
    SinglePhase,
    /// Three-phase, 400 V
    ThreePhase,
}

impl PhaseSystem {
    /// All phase systems for UI selection
    pub const ALL: [PhaseSystem; 2] = [PhaseSystem::SinglePhase, PhaseSystem::ThreePhase];

    /// Voltage drop factor k: 2 for the go-and-return path, √3 for balanced
    /// three-phase
    pub fn k_factor(&self) -> f64 {
        match self {
            PhaseSystem::SinglePhase => 2.0,
            PhaseSystem::ThreePhase => 3f64.sqrt(),
        }
    }

    /// Nominal voltage that front ends preselect for this system
    pub fn nominal_voltage(&self) -> Volts {
        match self {
            PhaseSystem::SinglePhase => Volts(230.0),
            PhaseSystem::ThreePhase => Volts(400.0),
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseSystem::SinglePhase => "Single-phase",
            PhaseSystem::ThreePhase => "Three-phase",
        }
    }
}

impl std::fmt::Display for PhaseSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Input
// ============================================================================

/// Input parameters for cable sizing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Kitchen sockets",
///   "current_a": 20.0,
///   "voltage_v": 230.0,
///   "phases": "single_phase",
///   "length_m": 25.0,
///   "usage": "sockets",
///   "method": "B1",
///   "material": "copper",
///   "ambient_temp_c": 30.0,
///   "conductor_count": 2,
///   "insulation": "PVC"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSizingInput {
    /// User label for this circuit
    #[serde(default)]
    pub label: String,

    /// Design current I_b (A)
    pub current_a: f64,

    /// Nominal voltage U (V)
    pub voltage_v: f64,

    /// Phase system
    pub phases: PhaseSystem,

    /// One-way cable length L (m)
    pub length_m: f64,

    /// Circuit usage (sets the voltage drop limit)
    pub usage: UsageType,

    /// Installation reference method
    pub method: InstallationMethod,

    /// Conductor material
    pub material: ConductorMaterial,

    /// Ambient temperature (°C)
    pub ambient_temp_c: f64,

    /// Number of grouped loaded conductors/circuits
    pub conductor_count: u32,

    /// Insulation type
    pub insulation: Insulation,
}

impl Default for CableSizingInput {
    fn default() -> Self {
        CableSizingInput {
            label: String::new(),
            current_a: 20.0,
            voltage_v: 230.0,
            phases: PhaseSystem::SinglePhase,
            length_m: 25.0,
            usage: UsageType::Sockets,
            method: InstallationMethod::B1,
            material: ConductorMaterial::Copper,
            ambient_temp_c: REFERENCE_AMBIENT_C,
            conductor_count: 2,
            insulation: Insulation::Pvc,
        }
    }
}

impl CableSizingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.current_a.is_finite() || self.current_a <= 0.0 {
            return Err(CalcError::invalid_input(
                "current_a",
                self.current_a.to_string(),
                "Design current must be positive",
            ));
        }
        if !self.voltage_v.is_finite() || self.voltage_v <= 0.0 {
            return Err(CalcError::invalid_input(
                "voltage_v",
                self.voltage_v.to_string(),
                "Voltage must be positive",
            ));
        }
        if !self.length_m.is_finite() || self.length_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Length must be positive",
            ));
        }
        if !(MIN_AMBIENT_C..=MAX_AMBIENT_C).contains(&self.ambient_temp_c) {
            return Err(CalcError::invalid_input(
                "ambient_temp_c",
                self.ambient_temp_c.to_string(),
                "Ambient temperature must be between -10 and 60 °C",
            ));
        }
        if !(1..=MAX_CONDUCTORS).contains(&self.conductor_count) {
            return Err(CalcError::invalid_input(
                "conductor_count",
                self.conductor_count.to_string(),
                "Number of conductors must be between 1 and 20",
            ));
        }
        Ok(())
    }

    /// Switch the phase system and preselect its nominal voltage
    pub fn set_phases(&mut self, phases: PhaseSystem) {
        self.phases = phases;
        self.voltage_v = phases.nominal_voltage().value();
    }

    fn current(&self) -> Amperes {
        Amperes(self.current_a)
    }

    fn length(&self) -> Meters {
        Meters(self.length_m)
    }

    /// k × L × I_b × ρ, the numerator shared by both drop formulas (V·mm²)
    fn drop_moment(&self) -> f64 {
        self.phases.k_factor() * self.length().0 * self.current().0 * self.material.resistivity()
    }
}

// ============================================================================
// Observations
// ============================================================================

/// Outcome class of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    Pass,
    Fail,
    Info,
}

/// One line of the verification report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub kind: ObservationKind,
    pub message: String,
}

impl Observation {
    fn pass(message: impl Into<String>) -> Self {
        Observation {
            kind: ObservationKind::Pass,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Observation {
            kind: ObservationKind::Fail,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Observation {
            kind: ObservationKind::Info,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == ObservationKind::Fail
    }
}

// ============================================================================
// Result
// ============================================================================

/// Results from cable sizing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "drop_limit_percent": 5.0,
///   "allowed_drop_v": 11.5,
///   "k_factor": 2.0,
///   "drop_section_mm2": 1.52,
///   "temperature_factor": 1.22,
///   "grouping_factor": 1.0,
///   "corrected_current_a": 16.39,
///   "ampacity_section_mm2": 1.5,
///   "required_section_mm2": 1.52,
///   "section_mm2": 2.5,
///   "voltage_drop_v": 7.0,
///   "voltage_drop_percent": 3.04,
///   "table_ampacity_a": 24.0,
///   "corrected_ampacity_a": 29.28,
///   "breaker_a": 20.0,
///   "observations": [{ "kind": "pass", "message": "..." }],
///   "compliant": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSizingResult {
    /// Admissible voltage drop (%)
    pub drop_limit_percent: f64,

    /// Admissible voltage drop ΔV_max (V)
    pub allowed_drop_v: f64,

    /// Phase factor k
    pub k_factor: f64,

    /// Minimum section by voltage drop (mm², not standardized)
    pub drop_section_mm2: f64,

    /// Ambient temperature factor applied
    pub temperature_factor: f64,

    /// Grouping factor applied
    pub grouping_factor: f64,

    /// Design current divided by both factors, I'_b (A)
    pub corrected_current_a: f64,

    /// Minimum standard section by ampacity (mm²)
    pub ampacity_section_mm2: f64,

    /// max(drop section, ampacity section) (mm²)
    pub required_section_mm2: f64,

    /// Chosen standard section (mm²)
    pub section_mm2: f64,

    /// Voltage drop at the chosen section (V)
    pub voltage_drop_v: f64,

    /// Voltage drop at the chosen section (%)
    pub voltage_drop_percent: f64,

    /// Table ampacity at the chosen section, if tabulated (A)
    pub table_ampacity_a: Option<f64>,

    /// Table ampacity × factors, I_z (A); 0 when not tabulated
    pub corrected_ampacity_a: f64,

    /// Recommended protection rating I_n (A)
    pub breaker_a: f64,

    /// Verification report
    pub observations: Vec<Observation>,

    /// No observation failed
    pub compliant: bool,
}

impl CableSizingResult {
    /// Check if the cable passes every verification
    pub fn passes(&self) -> bool {
        self.compliant
    }

    /// The failed observations
    pub fn failures(&self) -> Vec<&Observation> {
        self.observations.iter().filter(|o| o.is_failure()).collect()
    }

    /// Report header text
    pub fn verdict(&self) -> &'static str {
        if self.compliant {
            "VALID SIZING"
        } else {
            "NOT COMPLIANT"
        }
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// First standard section whose tabulated ampacity covers `current`.
///
/// Falls back to the smallest standard section when none does (untabulated
/// method, or a current beyond the table).
fn ampacity_section(current: Amperes, method: InstallationMethod) -> SqMm {
    STANDARD_SECTIONS_MM2
        .iter()
        .map(|&s| SqMm(s))
        .find(|&s| ampacity(s, method).is_some_and(|iz| iz >= current))
        .unwrap_or(SqMm(STANDARD_SECTIONS_MM2[0]))
}

/// Evaluate the sizing without validating.
pub fn evaluate(input: &CableSizingInput) -> CableSizingResult {
    let current = input.current();
    let voltage = Volts(input.voltage_v);

    // 1-3: section by voltage drop
    let limit = input.usage.drop_limit();
    let allowed_drop = limit.of(voltage);
    let k = input.phases.k_factor();
    let drop_section = SqMm(input.drop_moment() / allowed_drop.0);

    // 4-5: section by ampacity
    let f_temp = temperature_factor(input.insulation, input.ambient_temp_c);
    let f_group = grouping_factor(input.conductor_count);
    let corrected_current = current / (f_temp * f_group);
    let amp_section = ampacity_section(corrected_current, input.method);

    // 6: standard section
    let required = if drop_section > amp_section {
        drop_section
    } else {
        amp_section
    };
    let section = next_standard_section(required);

    // 7: actual drop
    let drop = Volts(input.drop_moment() / section.0);
    let drop_percent = Percent::ratio(drop, voltage);

    // corrected capacity at the chosen section
    let table_ampacity = ampacity(section, input.method);
    let corrected_ampacity = table_ampacity.unwrap_or_default() * (f_temp * f_group);

    // 8: protection
    let breaker = next_breaker_rating(current);

    // 9: observations
    let mut observations = Vec::new();

    if drop_percent <= limit {
        observations.push(Observation::pass(format!(
            "Voltage drop {} within the {}% limit ({})",
            fmt_percent(drop_percent.0),
            limit.0,
            rtiebt_ref::VOLTAGE_DROP
        )));
    } else {
        observations.push(Observation::fail(format!(
            "Voltage drop {} exceeds the {}% limit ({})",
            fmt_percent(drop_percent.0),
            limit.0,
            rtiebt_ref::VOLTAGE_DROP
        )));
    }

    let min_section = input.material.min_section();
    if input.material == ConductorMaterial::Aluminum && section < min_section {
        observations.push(Observation::fail(format!(
            "Aluminium conductors require at least {} mm² ({})",
            min_section.0,
            rtiebt_ref::MIN_SECTIONS
        )));
    }

    if table_ampacity.is_none() {
        warn!(
            method = input.method.code(),
            section_mm2 = section.0,
            "no tabulated ampacity for method at section"
        );
        observations.push(Observation::info(format!(
            "No tabulated ampacity for method {} at {} mm²; see {}/{}",
            input.method.code(),
            fmt2(section.0),
            rtiebt_ref::QUADRO_52_C11,
            rtiebt_ref::QUADRO_52_C12
        )));
    }

    if corrected_ampacity >= current {
        observations.push(Observation::pass(format!(
            "Corrected ampacity {} A ≥ design current {} A",
            fmt2(corrected_ampacity.0),
            fmt2(current.0)
        )));
    } else {
        observations.push(Observation::fail(format!(
            "Corrected ampacity {} A < design current {} A",
            fmt2(corrected_ampacity.0),
            fmt2(current.0)
        )));
    }

    if breaker >= current {
        observations.push(Observation::pass(format!(
            "Recommended protection: {} A",
            breaker.0
        )));
    } else {
        let largest = BREAKER_RATINGS_A[BREAKER_RATINGS_A.len() - 1];
        observations.push(Observation::fail(format!(
            "Design current {} A exceeds the largest standard rating ({} A)",
            fmt2(current.0),
            largest
        )));
    }

    if input.ambient_temp_c != REFERENCE_AMBIENT_C {
        observations.push(Observation::info(format!(
            "Temperature factor {} applied ({} °C, {})",
            fmt2(f_temp),
            input.ambient_temp_c,
            rtiebt_ref::TABLE_XI
        )));
    }
    if input.conductor_count > 1 {
        observations.push(Observation::info(format!(
            "Grouping factor {} applied ({} conductors, {})",
            fmt2(f_group),
            input.conductor_count,
            rtiebt_ref::TABLE_XII
        )));
    }

    let compliant = !observations.iter().any(Observation::is_failure);

    debug!(
        label = %input.label,
        drop_section_mm2 = drop_section.0,
        ampacity_section_mm2 = amp_section.0,
        section_mm2 = section.0,
        drop_percent = drop_percent.0,
        compliant,
        "cable sizing evaluated"
    );

    CableSizingResult {
        drop_limit_percent: limit.value(),
        allowed_drop_v: allowed_drop.value(),
        k_factor: k,
        drop_section_mm2: drop_section.value(),
        temperature_factor: f_temp,
        grouping_factor: f_group,
        corrected_current_a: corrected_current.value(),
        ampacity_section_mm2: amp_section.value(),
        required_section_mm2: required.value(),
        section_mm2: section.value(),
        voltage_drop_v: drop.value(),
        voltage_drop_percent: drop_percent.value(),
        table_ampacity_a: table_ampacity.map(Amperes::value),
        corrected_ampacity_a: corrected_ampacity.value(),
        breaker_a: breaker.value(),
        observations,
        compliant,
    }
}

/// Size a cable.
///
/// # Returns
///
/// * `Ok(CableSizingResult)` - Sections, drop, capacity and observations
/// * `Err(CalcError)` - If an input is out of range
pub fn calculate(input: &CableSizingInput) -> CalcResult<CableSizingResult> {
    input.validate()?;
    Ok(evaluate(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sockets_circuit() -> CableSizingInput {
        CableSizingInput {
            label: "Sockets".to_string(),
            current_a: 20.0,
            voltage_v: 230.0,
            phases: PhaseSystem::SinglePhase,
            length_m: 25.0,
            usage: UsageType::Sockets,
            method: InstallationMethod::B1,
            material: ConductorMaterial::Copper,
            ambient_temp_c: 30.0,
            conductor_count: 1,
            insulation: Insulation::Pvc,
        }
    }

    #[test]
    fn test_reference_circuit() {
        let result = calculate(&sockets_circuit()).unwrap();

        // (2 × 25 × 20 × 0.0175) / (0.05 × 230) = 1.5217
        assert!((result.drop_section_mm2 - 1.5217).abs() < 1e-3);
        assert!((result.allowed_drop_v - 11.5).abs() < 1e-9);
        assert_eq!(result.section_mm2, 2.5);

        // 17.5 / 2.5 = 7 V → 3.04%
        assert!((result.voltage_drop_v - 7.0).abs() < 1e-9);
        assert!((result.voltage_drop_percent - 3.0435).abs() < 1e-3);

        assert_eq!(result.table_ampacity_a, Some(24.0));
        assert_eq!(result.breaker_a, 20.0);
        assert!(result.passes());
        assert!(result.failures().is_empty());
        assert_eq!(result.verdict(), "VALID SIZING");
    }

    #[test]
    fn test_default_form_values() {
        let input = CableSizingInput::default();
        assert_eq!(input.conductor_count, 2);
        let result = calculate(&input).unwrap();
        // 20 / (1.22 × 0.8) = 20.49 A → 2.5 mm² (24 A)
        assert!((result.corrected_current_a - 20.4918).abs() < 1e-3);
        assert_eq!(result.ampacity_section_mm2, 2.5);
        assert_eq!(result.section_mm2, 2.5);
        assert!(result
            .observations
            .iter()
            .any(|o| o.kind == ObservationKind::Info && o.message.contains("Grouping")));
        assert!(result.passes());
    }

    #[test]
    fn test_ampacity_governs() {
        // Short run: drop section is tiny, ampacity decides
        let input = CableSizingInput {
            current_a: 40.0,
            length_m: 2.0,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        // 40 / 1.22 = 32.79 A → B1 needs 6 mm² (41 A)
        assert!(result.drop_section_mm2 < 1.0);
        assert_eq!(result.ampacity_section_mm2, 6.0);
        assert_eq!(result.section_mm2, 6.0);
        assert_eq!(result.breaker_a, 40.0);
    }

    #[test]
    fn test_lighting_limit() {
        let input = CableSizingInput {
            current_a: 10.0,
            length_m: 40.0,
            usage: UsageType::Lighting,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.drop_limit_percent, 3.0);
        // 14 / 6.9 = 2.03 mm² → 2.5
        assert!((result.drop_section_mm2 - 2.029).abs() < 1e-3);
        assert_eq!(result.section_mm2, 2.5);
        assert!(result.voltage_drop_percent <= 3.0);
        assert!(result.passes());
    }

    #[test]
    fn test_three_phase() {
        let mut input = CableSizingInput {
            current_a: 32.0,
            length_m: 50.0,
            ..sockets_circuit()
        };
        input.set_phases(PhaseSystem::ThreePhase);
        assert_eq!(input.voltage_v, 400.0);

        let result = calculate(&input).unwrap();
        assert!((result.k_factor - 3f64.sqrt()).abs() < 1e-12);
        // √3 × 50 × 32 × 0.0175 / 20 = 2.425
        assert!((result.drop_section_mm2 - 2.4249).abs() < 1e-3);
        // 32 / 1.22 = 26.23 A → 4 mm² (32 A)
        assert_eq!(result.section_mm2, 4.0);
        assert_eq!(result.breaker_a, 32.0);
    }

    #[test]
    fn test_aluminum_minimum_section() {
        let input = CableSizingInput {
            material: ConductorMaterial::Aluminum,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        assert!(result.section_mm2 < 16.0);
        assert!(!result.passes());
        assert_eq!(result.verdict(), "NOT COMPLIANT");
        let failures = result.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("16 mm²"));
    }

    #[test]
    fn test_aluminum_large_section_passes() {
        let input = CableSizingInput {
            material: ConductorMaterial::Aluminum,
            current_a: 60.0,
            length_m: 100.0,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        // 2 × 100 × 60 × 0.0285 / 11.5 = 29.7 → 35 mm²
        assert_eq!(result.section_mm2, 35.0);
        assert!(result.passes(), "{:?}", result.failures());
    }

    #[test]
    fn test_untabulated_method() {
        let input = CableSizingInput {
            method: InstallationMethod::F,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.ampacity_section_mm2, 1.5);
        assert_eq!(result.table_ampacity_a, None);
        assert_eq!(result.corrected_ampacity_a, 0.0);
        assert!(result
            .observations
            .iter()
            .any(|o| o.kind == ObservationKind::Info && o.message.contains("method F")));
        assert!(!result.passes());
    }

    #[test]
    fn test_current_above_largest_breaker() {
        let input = CableSizingInput {
            current_a: 700.0,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.breaker_a, 630.0);
        assert!(result
            .failures()
            .iter()
            .any(|o| o.message.contains("largest standard rating")));
    }

    #[test]
    fn test_temperature_info() {
        let input = CableSizingInput {
            ambient_temp_c: 40.0,
            ..sockets_circuit()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.temperature_factor, 1.12);
        assert!(result
            .observations
            .iter()
            .any(|o| o.kind == ObservationKind::Info && o.message.contains("Temperature")));
    }

    #[test]
    fn test_validation() {
        let cases: Vec<(&str, CableSizingInput)> = vec![
            ("current_a", CableSizingInput { current_a: 0.0, ..sockets_circuit() }),
            ("voltage_v", CableSizingInput { voltage_v: -230.0, ..sockets_circuit() }),
            ("length_m", CableSizingInput { length_m: f64::INFINITY, ..sockets_circuit() }),
            ("ambient_temp_c", CableSizingInput { ambient_temp_c: 61.0, ..sockets_circuit() }),
            ("ambient_temp_c", CableSizingInput { ambient_temp_c: -11.0, ..sockets_circuit() }),
            ("conductor_count", CableSizingInput { conductor_count: 0, ..sockets_circuit() }),
            ("conductor_count", CableSizingInput { conductor_count: 21, ..sockets_circuit() }),
        ];
        for (field, input) in cases {
            let err = calculate(&input).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn test_idempotent() {
        let input = CableSizingInput::default();
        assert_eq!(evaluate(&input), evaluate(&input));
    }

    #[test]
    fn test_serialization() {
        let input = sockets_circuit();
        let json = serde_json::to_string_pretty(&input).unwrap();
        assert!(json.contains("\"single_phase\""));
        assert!(json.contains("\"PVC\""));
        let roundtrip: CableSizingInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
