//! UI module for the Solcabo GUI
//!
//! # Panel Structure
//! - `toolbar` - Page tabs, Export PDF, Copy JSON, theme toggle
//! - `status_bar` - Settings source and status messages
//!
//! # Pages
//! - `shading_page` - Inter-row distance form, live γ/h, results and sketch
//! - `cable_page` - RTIEBT sizing form and verification report
//! - `schedule_page` - Editable circuit schedule
//! - `tables_page` - Read-only RTIEBT tables
//!
//! # Shared Components
//! - `shared/widgets` - Labeled inputs, result lines, error block
//! - `shared/row_diagram` - Canvas sketch of the panel rows

// Top-level panels
pub mod status_bar;
pub mod toolbar;

// Pages
pub mod cable_page;
pub mod schedule_page;
pub mod shading_page;
pub mod tables_page;

// Shared components
pub mod shared;
