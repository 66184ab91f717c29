//! # Calculations
//!
//! Each calculator follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `evaluate(input) -> *Result` - The formulas alone, total over finite input
//! - `calculate(input) -> Result<*Result, CalcError>` - Validate, then evaluate
//!
//! ## Available Calculations
//!
//! - [`shading`] - Inter-row distance for tilted PV panels
//! - [`cable_sizing`] - Cable section, voltage drop and protection (RTIEBT)
//! - [`circuit_schedule`] - Multi-row verification of three-phase circuits

pub mod cable_sizing;
pub mod circuit_schedule;
pub mod shading;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cable_sizing::{
    CableSizingInput, CableSizingResult, Observation, ObservationKind, PhaseSystem,
};
pub use circuit_schedule::{CircuitRow, CircuitRowResult, CircuitSchedule};
pub use shading::{ShadingInput, ShadingResult};

/// Any calculator input, tagged by kind.
///
/// This is the shape read by `solcabo run` and copied by the GUI's
/// "Copy JSON" button.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    Shading(ShadingInput),
    CableSizing(CableSizingInput),
    CircuitSchedule(CircuitSchedule),
}

/// Result matching a [`CalculationItem`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Shading(ShadingResult),
    CableSizing(CableSizingResult),
    CircuitSchedule { rows: Vec<CircuitRowResult> },
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Shading(s) => &s.label,
            CalculationItem::CableSizing(c) => &c.label,
            CalculationItem::CircuitSchedule(c) => &c.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Shading(_) => "Shading",
            CalculationItem::CableSizing(_) => "Cable sizing",
            CalculationItem::CircuitSchedule(_) => "Circuit schedule",
        }
    }

    /// Run the matching calculator
    pub fn calculate(&self) -> crate::CalcResult<CalculationOutput> {
        Ok(match self {
            CalculationItem::Shading(input) => {
                CalculationOutput::Shading(shading::calculate(input)?)
            }
            CalculationItem::CableSizing(input) => {
                CalculationOutput::CableSizing(cable_sizing::calculate(input)?)
            }
            CalculationItem::CircuitSchedule(schedule) => CalculationOutput::CircuitSchedule {
                rows: circuit_schedule::calculate(schedule)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_input() {
        let json = r#"{"type":"Shading","lat_deg":0,"lat_min":0,"lat_sec":0,"b_m":1.0,"beta_deg":0.0,"alfa_deg":0.0}"#;
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.calc_type(), "Shading");
        assert_eq!(item.label(), "");
        match item.calculate().unwrap() {
            CalculationOutput::Shading(r) => assert!((r.d_m - 1.2).abs() < 1e-9),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_invalid_item_propagates_error() {
        let item = CalculationItem::CableSizing(CableSizingInput {
            current_a: -1.0,
            ..CableSizingInput::default()
        });
        assert_eq!(item.calculate().unwrap_err().field(), Some("current_a"));
    }
}
