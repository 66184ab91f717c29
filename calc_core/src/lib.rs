//! # calc_core - Solar Shading and Cable Sizing Engine
//!
//! `calc_core` is the computational heart of Solcabo: the inter-row shading
//! distance for photovoltaic arrays and low-voltage cable sizing per the
//! Portuguese RTIEBT rules. All inputs and outputs are JSON-serializable, so
//! the same calls serve the desktop app, the browser build and the CLI.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Static tables**: Regulation data lives in immutable lookups
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::cable_sizing::{calculate, CableSizingInput};
//!
//! let input = CableSizingInput {
//!     current_a: 20.0,
//!     length_m: 25.0,
//!     conductor_count: 1,
//!     ..CableSizingInput::default()
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.section_mm2, 2.5);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Shading, cable sizing and circuit schedule calculators
//! - [`rtiebt`] - Regulation tables (ampacity, correction factors, references)
//! - [`geo`] - Latitude DMS conversion and coordinate parsing
//! - [`format`] - pt-PT number formatting
//! - [`config`] - TOML settings
//! - [`pdf`] - Typst PDF reports
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod format;
pub mod geo;
pub mod pdf;
pub mod rtiebt;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput};
pub use config::CalcSettings;
pub use errors::{CalcError, CalcResult};
