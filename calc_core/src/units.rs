//! # Unit Types
//!
//! Type-safe wrappers for the units both calculators work in. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers).
//!
//! ## SI Units
//!
//! - Length: metres (m)
//! - Angle: degrees (°) for inputs and display, radians for trigonometry
//! - Conductor cross-section: square millimetres (mm²)
//! - Current: amperes (A)
//! - Voltage: volts (V)
//! - Ratios: percent (%)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Degrees, Percent, Radians, Volts};
//!
//! let tilt = Degrees(30.0);
//! let rad: Radians = tilt.into();
//! assert!((rad.0.sin() - 0.5).abs() < 1e-12);
//!
//! let allowed = Percent(5.0).of(Volts(230.0));
//! assert!((allowed.0 - 11.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Angles
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

impl Degrees {
    /// Sine of the angle
    pub fn sin(self) -> f64 {
        Radians::from(self).0.sin()
    }

    /// Cosine of the angle
    pub fn cos(self) -> f64 {
        Radians::from(self).0.cos()
    }

    /// Tangent of the angle
    pub fn tan(self) -> f64 {
        Radians::from(self).0.tan()
    }
}

// ============================================================================
// Length and Section
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Conductor cross-section in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

// ============================================================================
// Electrical
// ============================================================================

/// Current in amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amperes(pub f64);

/// Voltage in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

/// Ratio expressed in percent
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    /// Apply this percentage to a voltage (e.g., 5% of 230 V = 11.5 V)
    pub fn of(self, voltage: Volts) -> Volts {
        Volts(self.0 / 100.0 * voltage.0)
    }

    /// Express `part` as a percentage of `whole`
    pub fn ratio(part: Volts, whole: Volts) -> Percent {
        Percent(part.0 / whole.0 * 100.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Degrees);
impl_arithmetic!(Radians);
impl_arithmetic!(Meters);
impl_arithmetic!(SqMm);
impl_arithmetic!(Amperes);
impl_arithmetic!(Volts);
impl_arithmetic!(Percent);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        let rad: Radians = Degrees(180.0).into();
        assert!((rad.0 - std::f64::consts::PI).abs() < 1e-12);
        let back: Degrees = rad.into();
        assert!((back.0 - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_trig_helpers() {
        assert!((Degrees(90.0).sin() - 1.0).abs() < 1e-12);
        assert!((Degrees(60.0).cos() - 0.5).abs() < 1e-12);
        assert!((Degrees(45.0).tan() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_percent_of_voltage() {
        assert!((Percent(3.0).of(Volts(230.0)).0 - 6.9).abs() < 1e-12);
        assert!((Percent::ratio(Volts(11.5), Volts(230.0)).0 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let s = SqMm(2.5);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "2.5");

        let roundtrip: SqMm = serde_json::from_str(&json).unwrap();
        assert_eq!(s, roundtrip);
    }
}
