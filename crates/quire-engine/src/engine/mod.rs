//! Spreadsheet formula engine API.
//!
//! This module provides the whole formula pipeline:
//!
//! - [`CellRef`], [`CellRange`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`CellSource`] - Read-only access to the caller's grid
//! - [`parse_sum_range`], [`substitute_references`] - Formula preprocessing
//! - [`eval_arithmetic`] - Safe arithmetic evaluation
//! - [`evaluate`] - The full formula → [`DisplayValue`] pipeline
//! - [`format_number`] - Number display

mod arith;
mod cell_ref;
mod eval;
mod format;
mod grid;
mod preprocess;
mod range;

pub use arith::{MAX_DEPTH, eval_arithmetic};
pub use cell_ref::CellRef;
pub use eval::{DisplayValue, ERROR_MARKER, evaluate, evaluate_expression, try_evaluate};
pub use format::format_number;
pub use grid::{CellSource, Row, parse_leading_number};
pub use preprocess::{parse_sum_range, starts_with_sum, substitute_references};
pub use range::CellRange;
