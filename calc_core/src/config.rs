//! # Settings
//!
//! User settings read from a TOML file (`calc.toml` by convention): report
//! header details and the values new forms start with. Every key is
//! optional; missing keys take the built-in defaults.
//!
//! ```toml
//! [report]
//! author = "A. Engineer"
//! company = "Solar Lda"
//!
//! [cable]
//! current_a = 32.0
//! method = "C"
//! insulation = "XLPE"
//!
//! [shading]
//! panel_width_m = 2.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calculations::{CableSizingInput, ShadingInput};
use crate::errors::{CalcError, CalcResult};
use crate::rtiebt::{InstallationMethod, Insulation, REFERENCE_AMBIENT_C};

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "calc.toml";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcSettings {
    pub report: ReportSettings,
    pub cable: CableDefaults,
    pub shading: ShadingDefaults,
}

/// Header fields printed on PDF reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub author: String,
    pub company: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            author: String::new(),
            company: "Solcabo".to_string(),
        }
    }
}

/// Starting values of the cable sizing form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableDefaults {
    pub current_a: f64,
    pub length_m: f64,
    pub method: InstallationMethod,
    pub insulation: Insulation,
    pub ambient_temp_c: f64,
    pub conductor_count: u32,
}

impl Default for CableDefaults {
    fn default() -> Self {
        let input = CableSizingInput::default();
        CableDefaults {
            current_a: input.current_a,
            length_m: input.length_m,
            method: input.method,
            insulation: input.insulation,
            ambient_temp_c: REFERENCE_AMBIENT_C,
            conductor_count: input.conductor_count,
        }
    }
}

/// Starting values of the shading form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingDefaults {
    pub panel_width_m: f64,
}

impl Default for ShadingDefaults {
    fn default() -> Self {
        ShadingDefaults { panel_width_m: 1.0 }
    }
}

impl CalcSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        toml::from_str(text).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid settings: {}", e),
        })
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if it exists, otherwise the defaults
    pub fn load_or_default(path: &Path) -> CalcResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// A cable form prefilled from these settings
    pub fn cable_input(&self) -> CableSizingInput {
        CableSizingInput {
            current_a: self.cable.current_a,
            length_m: self.cable.length_m,
            method: self.cable.method,
            insulation: self.cable.insulation,
            ambient_temp_c: self.cable.ambient_temp_c,
            conductor_count: self.cable.conductor_count,
            ..CableSizingInput::default()
        }
    }

    /// A shading form prefilled from these settings
    pub fn shading_input(&self) -> ShadingInput {
        ShadingInput {
            b_m: self.shading.panel_width_m,
            ..ShadingInput::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = CalcSettings::from_toml_str("").unwrap();
        assert_eq!(settings, CalcSettings::default());
        assert_eq!(settings.cable_input(), CableSizingInput::default());
    }

    #[test]
    fn test_partial_settings() {
        let settings = CalcSettings::from_toml_str(
            r#"
            [report]
            author = "A. Engineer"

            [cable]
            current_a = 32.0
            method = "C"
            insulation = "XLPE"

            [shading]
            panel_width_m = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.report.author, "A. Engineer");
        assert_eq!(settings.report.company, "Solcabo");

        let cable = settings.cable_input();
        assert_eq!(cable.current_a, 32.0);
        assert_eq!(cable.method, InstallationMethod::C);
        assert_eq!(cable.insulation, Insulation::Xlpe);
        assert_eq!(cable.length_m, 25.0);

        assert_eq!(settings.shading_input().b_m, 2.0);
    }

    #[test]
    fn test_invalid_settings() {
        let err = CalcSettings::from_toml_str("[cable]\nmethod = \"Z\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let err = CalcSettings::load(Path::new("/nonexistent/calc.toml")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        let settings = CalcSettings::load_or_default(Path::new("/nonexistent/calc.toml")).unwrap();
        assert_eq!(settings, CalcSettings::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = CalcSettings::default();
        let text = settings.to_toml_string().unwrap();
        assert_eq!(CalcSettings::from_toml_str(&text).unwrap(), settings);
    }
}
