//! # Inter-row Shading Distance
//!
//! Minimum spacing between rows of tilted photovoltaic panels so that one
//! row does not shade the next at solar noon on the winter solstice.
//!
//! ## Method
//!
//! ```text
//! γ  = max(0, 90 − |φ − (−23.44)|)        solar elevation, solstice
//! h  = b · sin β                          panel height
//! d1 = h / tan(γ − α) + 0.2               shadow length plus margin
//! d  = d1 + b · cos β                     row pitch
//! ```
//!
//! where φ is the latitude, b the panel width, β the tilt and α the ground
//! slope. When `tan(γ − α)` is not finite or |tan| ≤ 1e-6 the shadow is
//! unbounded: `d1` and `d` are NaN and display as a dash.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::shading::{calculate, ShadingInput};
//!
//! let input = ShadingInput {
//!     label: "Row A".to_string(),
//!     lat_deg: 38,
//!     lat_min: 43,
//!     lat_sec: 0,
//!     b_m: 2.0,
//!     beta_deg: 30.0,
//!     alfa_deg: 0.0,
//! };
//! let result = calculate(&input).unwrap();
//! assert!(result.is_defined());
//! assert!((result.h_m - 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::geo::Dms;
use crate::units::{Degrees, Meters};

/// Solar declination at the winter solstice (degrees)
pub const SOLSTICE_DECLINATION_DEG: f64 = -23.44;

/// Clearance added to the projected shadow (m)
pub const SAFETY_MARGIN_M: f64 = 0.2;

/// Tangents at or below this magnitude are treated as zero
pub const TAN_EPSILON: f64 = 1e-6;

/// Input parameters for the shading calculator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Row A",
///   "lat_deg": 38,
///   "lat_min": 43,
///   "lat_sec": 0,
///   "b_m": 2.0,
///   "beta_deg": 30.0,
///   "alfa_deg": 0.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingInput {
    /// User label (e.g., "Row A", "Roof south")
    #[serde(default)]
    pub label: String,

    /// Latitude degrees (-90 to 90); the sign applies to the whole latitude
    pub lat_deg: i32,

    /// Latitude minutes (0-59)
    pub lat_min: u32,

    /// Latitude seconds (0-59)
    pub lat_sec: u32,

    /// Panel width along the slope, b (m)
    pub b_m: f64,

    /// Panel tilt β (degrees, 0-90)
    pub beta_deg: f64,

    /// Ground slope α (degrees, -90 to 90)
    pub alfa_deg: f64,
}

impl Default for ShadingInput {
    fn default() -> Self {
        ShadingInput {
            label: String::new(),
            lat_deg: 0,
            lat_min: 0,
            lat_sec: 0,
            b_m: 1.0,
            beta_deg: 0.0,
            alfa_deg: 0.0,
        }
    }
}

impl ShadingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(-90..=90).contains(&self.lat_deg) {
            return Err(CalcError::invalid_input(
                "lat_deg",
                self.lat_deg.to_string(),
                "Latitude degrees must be between -90 and 90",
            ));
        }
        if self.lat_min > 59 {
            return Err(CalcError::invalid_input(
                "lat_min",
                self.lat_min.to_string(),
                "Minutes must be between 0 and 59",
            ));
        }
        if self.lat_sec > 59 {
            return Err(CalcError::invalid_input(
                "lat_sec",
                self.lat_sec.to_string(),
                "Seconds must be between 0 and 59",
            ));
        }
        if !self.b_m.is_finite() || self.b_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "b_m",
                self.b_m.to_string(),
                "Panel width must be positive",
            ));
        }
        if !(0.0..=90.0).contains(&self.beta_deg) {
            return Err(CalcError::invalid_input(
                "beta_deg",
                self.beta_deg.to_string(),
                "Tilt must be between 0 and 90 degrees",
            ));
        }
        if !(-90.0..=90.0).contains(&self.alfa_deg) {
            return Err(CalcError::invalid_input(
                "alfa_deg",
                self.alfa_deg.to_string(),
                "Ground slope must be between -90 and 90 degrees",
            ));
        }
        Ok(())
    }

    /// Latitude in DMS form
    pub fn latitude_dms(&self) -> Dms {
        Dms::new(self.lat_deg, self.lat_min, self.lat_sec)
    }

    /// Set the latitude fields from decimal degrees
    pub fn set_latitude(&mut self, decimal: f64) {
        let dms = Dms::from_decimal(decimal);
        self.lat_deg = dms.degrees;
        self.lat_min = dms.minutes;
        self.lat_sec = dms.seconds;
    }

    /// Latitude in decimal degrees
    pub fn latitude_decimal(&self) -> f64 {
        self.latitude_dms().to_decimal()
    }

    /// Solar elevation at the winter solstice, γ (degrees, never negative)
    pub fn solar_elevation(&self) -> Degrees {
        solar_elevation(self.latitude_decimal())
    }

    /// Panel height h = b · sin β
    pub fn panel_height(&self) -> Meters {
        Meters(self.b_m * Degrees(self.beta_deg).sin())
    }

    /// Horizontal footprint of the panel, b · cos β
    pub fn panel_footprint(&self) -> Meters {
        Meters(self.b_m * Degrees(self.beta_deg).cos())
    }
}

/// Solar elevation γ at noon on the winter solstice for a latitude
pub fn solar_elevation(latitude_deg: f64) -> Degrees {
    Degrees((90.0 - (latitude_deg - SOLSTICE_DECLINATION_DEG).abs()).max(0.0))
}

/// Results from the shading calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "latitude_deg": 0.0,
///   "gama_deg": 66.56,
///   "h_m": 0.0,
///   "d1_m": 0.2,
///   "d_m": 1.2
/// }
/// ```
///
/// `d1_m` and `d_m` are NaN (serialized as `null`) when the shadow length is
/// undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingResult {
    /// Latitude in decimal degrees
    pub latitude_deg: f64,

    /// Solar elevation γ (degrees)
    pub gama_deg: f64,

    /// Panel height h (m)
    pub h_m: f64,

    /// Minimum clear distance between rows, d1 (m)
    #[serde(with = "nan_as_null")]
    pub d1_m: f64,

    /// Row pitch, d (m)
    #[serde(with = "nan_as_null")]
    pub d_m: f64,
}

impl ShadingResult {
    /// Whether the distances are finite
    pub fn is_defined(&self) -> bool {
        self.d1_m.is_finite() && self.d_m.is_finite()
    }
}

/// Evaluate the shading formulas without validating.
///
/// Total over finite inputs: an undefined tangent yields NaN distances
/// instead of an error.
pub fn evaluate(input: &ShadingInput) -> ShadingResult {
    let latitude_deg = input.latitude_decimal();
    let gama = solar_elevation(latitude_deg);
    let h = input.panel_height();

    let denom = (gama - Degrees(input.alfa_deg)).tan();
    let shadow = if denom.is_finite() && denom.abs() > TAN_EPSILON {
        h.0 / denom
    } else {
        f64::NAN
    };

    let d1 = Meters(shadow + SAFETY_MARGIN_M);
    let d = d1 + input.panel_footprint();

    debug!(
        label = %input.label,
        latitude_deg,
        gama_deg = gama.0,
        h_m = h.0,
        d1_m = d1.0,
        d_m = d.0,
        "shading evaluated"
    );

    ShadingResult {
        latitude_deg,
        gama_deg: gama.value(),
        h_m: h.value(),
        d1_m: d1.value(),
        d_m: d.value(),
    }
}

/// Validate the input, then evaluate.
///
/// # Returns
///
/// * `Ok(ShadingResult)` - Distances (possibly undefined, see [`ShadingResult::is_defined`])
/// * `Err(CalcError)` - If an input is out of range
pub fn calculate(input: &ShadingInput) -> CalcResult<ShadingResult> {
    input.validate()?;
    Ok(evaluate(input))
}

/// JSON has no NaN; undefined distances travel as `null`.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator() -> ShadingInput {
        ShadingInput {
            label: "Equator".to_string(),
            lat_deg: 0,
            lat_min: 0,
            lat_sec: 0,
            b_m: 1.0,
            beta_deg: 0.0,
            alfa_deg: 0.0,
        }
    }

    #[test]
    fn test_equator_flat_panel() {
        let result = calculate(&equator()).unwrap();
        assert!((result.gama_deg - 66.56).abs() < 1e-9);
        assert_eq!(result.h_m, 0.0);
        assert!((result.d1_m - 0.20).abs() < 1e-12);
        assert!((result.d_m - 1.20).abs() < 1e-12);
    }

    #[test]
    fn test_zero_height_gives_margin_only() {
        // b = 0 is rejected by validation but the evaluator is total
        for (beta, alfa) in [(0.0, 0.0), (30.0, 10.0), (60.0, -20.0)] {
            let input = ShadingInput {
                b_m: 0.0,
                beta_deg: beta,
                alfa_deg: alfa,
                ..equator()
            };
            assert_eq!(evaluate(&input).d1_m, SAFETY_MARGIN_M);
        }
    }

    #[test]
    fn test_height_increases_with_tilt() {
        let mut last = -1.0;
        for beta in 1..90 {
            let input = ShadingInput {
                b_m: 1.7,
                beta_deg: f64::from(beta),
                ..equator()
            };
            let h = evaluate(&input).h_m;
            assert!(h > last, "beta {beta}");
            last = h;
        }
    }

    #[test]
    fn test_lisbon() {
        let input = ShadingInput {
            lat_deg: 38,
            lat_min: 43,
            lat_sec: 0,
            b_m: 2.0,
            beta_deg: 30.0,
            ..equator()
        };
        let result = calculate(&input).unwrap();
        // φ = 38.7167, γ = 90 − 62.1567 = 27.8433
        assert!((result.gama_deg - 27.8433).abs() < 1e-3);
        assert!((result.h_m - 1.0).abs() < 1e-9);
        // d1 = 1 / tan(27.8433°) + 0.2 ≈ 2.094
        assert!((result.d1_m - 2.094).abs() < 1e-2);
        assert!((result.d_m - (result.d1_m + 3f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_southern_latitude_sign() {
        let input = ShadingInput {
            lat_deg: -23,
            lat_min: 26,
            lat_sec: 24,
            ..equator()
        };
        let result = evaluate(&input);
        assert!((result.latitude_deg + 23.44).abs() < 1e-9);
        assert!((result.gama_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_sun_below_horizon_is_undefined() {
        // |90 − (−23.44)| > 90, γ clamps to 0, tan(0) = 0
        let input = ShadingInput {
            lat_deg: 90,
            b_m: 1.0,
            beta_deg: 30.0,
            ..equator()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.gama_deg, 0.0);
        assert!(!result.is_defined());
        assert!(result.d_m.is_nan());
    }

    #[test]
    fn test_slope_equal_to_elevation_is_undefined() {
        let input = ShadingInput {
            beta_deg: 20.0,
            alfa_deg: 66.56,
            ..equator()
        };
        assert!(!evaluate(&input).is_defined());
    }

    #[test]
    fn test_validation() {
        let cases: Vec<(&str, ShadingInput)> = vec![
            ("lat_deg", ShadingInput { lat_deg: 91, ..equator() }),
            ("lat_deg", ShadingInput { lat_deg: -91, ..equator() }),
            ("lat_min", ShadingInput { lat_min: 60, ..equator() }),
            ("lat_sec", ShadingInput { lat_sec: 60, ..equator() }),
            ("b_m", ShadingInput { b_m: 0.0, ..equator() }),
            ("b_m", ShadingInput { b_m: f64::NAN, ..equator() }),
            ("beta_deg", ShadingInput { beta_deg: 90.5, ..equator() }),
            ("beta_deg", ShadingInput { beta_deg: -1.0, ..equator() }),
            ("alfa_deg", ShadingInput { alfa_deg: -91.0, ..equator() }),
        ];
        for (field, input) in cases {
            let err = calculate(&input).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn test_set_latitude_from_decimal() {
        let mut input = equator();
        input.set_latitude(41.1579);
        assert_eq!((input.lat_deg, input.lat_min, input.lat_sec), (41, 9, 28));
    }

    #[test]
    fn test_idempotent() {
        let input = ShadingInput {
            lat_deg: 41,
            b_m: 1.2,
            beta_deg: 35.0,
            alfa_deg: 5.0,
            ..equator()
        };
        assert_eq!(evaluate(&input), evaluate(&input));
    }

    #[test]
    fn test_serialization() {
        let input = equator();
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: ShadingInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);

        let undefined = ShadingResult {
            latitude_deg: 90.0,
            gama_deg: 0.0,
            h_m: 0.5,
            d1_m: f64::NAN,
            d_m: f64::NAN,
        };
        let json = serde_json::to_string(&undefined).unwrap();
        assert!(json.contains("\"d1_m\":null"));
        let back: ShadingResult = serde_json::from_str(&json).unwrap();
        assert!(!back.is_defined());
    }
}
