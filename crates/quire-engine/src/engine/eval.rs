//! Formula evaluation entry points.
//!
//! Evaluation is a pure function of the formula text and a grid snapshot:
//! nothing is cached and the grid is only read.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::arith::eval_arithmetic;
use super::format::format_number;
use super::grid::CellSource;
use super::preprocess::{parse_sum_range, substitute_references};
use crate::error::{FormulaError, Result};

/// Marker shown in place of a formula that failed to evaluate.
pub const ERROR_MARKER: &str = "#ERROR";

/// What a cell shows after evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DisplayValue {
    Number(f64),
    /// Non-formula input, passed through unchanged.
    Text(String),
    Error,
}

impl DisplayValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DisplayValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DisplayValue::Error)
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => f.write_str(&format_number(*n)),
            DisplayValue::Text(s) => f.write_str(s),
            DisplayValue::Error => f.write_str(ERROR_MARKER),
        }
    }
}

/// Evaluate a cell's raw text against a grid.
///
/// Text without a leading `=` is returned unchanged. Failures become
/// [`DisplayValue::Error`]; this never panics or returns an error.
pub fn evaluate<G: CellSource + ?Sized>(input: &str, grid: &G) -> DisplayValue {
    let Some(expr) = input.strip_prefix('=') else {
        return DisplayValue::Text(input.to_string());
    };
    match evaluate_expression(expr, grid) {
        Ok(n) => DisplayValue::Number(n),
        Err(e) => {
            tracing::debug!(formula = input, error = %e, "formula evaluation failed");
            DisplayValue::Error
        }
    }
}

/// Evaluate a cell's raw text, keeping the failure reason.
///
/// Returns `Ok(None)` for non-formula input.
pub fn try_evaluate<G: CellSource + ?Sized>(input: &str, grid: &G) -> Result<Option<f64>> {
    match input.strip_prefix('=') {
        Some(expr) => evaluate_expression(expr, grid).map(Some),
        None => Ok(None),
    }
}

/// Evaluate the expression after the `=` sign.
///
/// A `SUM(A1:B5)` call is recognised on the raw text and short-circuits the
/// rest of the expression; otherwise references are substituted and the
/// result is evaluated as arithmetic.
pub fn evaluate_expression<G: CellSource + ?Sized>(expr: &str, grid: &G) -> Result<f64> {
    if let Some(range) = parse_sum_range(expr) {
        let total = grid.sum(&range);
        if !total.is_finite() {
            return Err(FormulaError::NonFinite);
        }
        return Ok(total);
    }
    let substituted = substitute_references(expr, grid);
    eval_arithmetic(&substituted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_formatting() {
        assert_eq!(DisplayValue::Number(5.0).to_string(), "5");
        assert_eq!(DisplayValue::Text("hi".into()).to_string(), "hi");
        assert_eq!(DisplayValue::Error.to_string(), "#ERROR");
    }

    #[test]
    fn test_try_evaluate_reports_reason() {
        let grid: Vec<Vec<String>> = Vec::new();
        assert_eq!(try_evaluate("plain", &grid), Ok(None));
        assert_eq!(try_evaluate("=2*3", &grid), Ok(Some(6.0)));
        assert_eq!(try_evaluate("=1/0", &grid), Err(FormulaError::DivisionByZero));
    }

    #[test]
    fn test_try_evaluate_sum_overflow_is_non_finite() {
        let grid = vec![vec!["1e308".to_string(), "1e308".to_string()]];
        assert_eq!(try_evaluate("=SUM(A1:B1)", &grid), Err(FormulaError::NonFinite));
    }
}
