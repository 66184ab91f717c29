//! Shared UI components reusable across pages
//!
//! Contains:
//! - `widgets` - labeled inputs, result lines, error block
//! - `row_diagram` - canvas sketch of two panel rows and their spacing

pub mod row_diagram;
pub mod widgets;
