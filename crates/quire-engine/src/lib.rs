//! quire_engine - Spreadsheet formula engine.
//!
//! Evaluates cell formulas such as `=A1+B1*2` or `=SUM(A1:B5)` against a
//! caller-owned grid of strings. Evaluation is pure: the grid is only read
//! and nothing is kept between calls.

pub mod engine;
pub mod error;

pub use engine::{CellRef, CellSource, DisplayValue, Row, evaluate, try_evaluate};
pub use error::FormulaError;
