//! Formula preprocessing.
//!
//! Two passes run on the text after the leading `=`, in this order:
//!
//! - **Range detection**: an expression starting with `SUM(` is searched for
//!   `SUM(A1:B5)` on the raw text, since substitution would destroy the range
//!   syntax.
//! - **Reference substitution**: every single-letter reference such as `b12`
//!   is replaced by the number held in that cell.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::cell_ref::CellRef;
use super::format::format_number;
use super::grid::CellSource;
use super::range::CellRange;

/// Matches a standalone single-letter reference like `A1` or `z10`.
///
/// The word boundaries keep exponent literals (`1e3`) and longer identifiers
/// (`AB12`) intact; the latter then fail to parse as arithmetic.
pub fn cell_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z])([0-9]+)\b").expect("cell reference regex must compile")
    })
}

/// Matches `SUM(<col><row>:<col><row>)`.
///
/// Captures:
/// - group 1/2: start column letter and row number
/// - group 3/4: end column letter and row number
pub fn sum_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)SUM\(\s*([A-Z])([0-9]+)\s*:\s*([A-Z])([0-9]+)\s*\)")
            .expect("SUM range regex must compile")
    })
}

/// Whether an expression is a `SUM(` call, compared case-insensitively.
pub fn starts_with_sum(expr: &str) -> bool {
    expr.trim_start()
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("SUM("))
}

/// Extract the range of a `SUM(A1:B5)` expression.
///
/// Returns None when the expression does not start with `SUM(` or carries no
/// well-formed range, in which case the caller falls back to arithmetic.
pub fn parse_sum_range(expr: &str) -> Option<CellRange> {
    if !starts_with_sum(expr) {
        return None;
    }
    let caps = sum_range_re().captures(expr)?;
    let start = ref_from_caps(&caps, 1, 2)?;
    let end = ref_from_caps(&caps, 3, 4)?;
    Some(CellRange::new(start, end))
}

fn ref_from_caps(caps: &Captures, letter: usize, row: usize) -> Option<CellRef> {
    let letter = caps[letter].chars().next()?;
    CellRef::from_parts(letter, &caps[row])
}

/// Replace each cell reference with the number it holds.
///
/// Negative values are parenthesized so `5-A1` with `A1 = -3` becomes
/// `5-(-3)`. References that cannot be resolved (row 0, overflowing row
/// numbers) read as zero like any other missing cell.
pub fn substitute_references<G: CellSource + ?Sized>(expr: &str, grid: &G) -> String {
    cell_ref_re()
        .replace_all(expr, |caps: &Captures| {
            let value = ref_from_caps(caps, 1, 2)
                .map(|cell| grid.number(&cell))
                .unwrap_or(0.0);
            if value.is_sign_negative() && value != 0.0 {
                format!("({})", format_number(value))
            } else {
                format_number(value)
            }
        })
        .into_owned()
}
