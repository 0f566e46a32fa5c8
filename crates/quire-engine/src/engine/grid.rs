//! Read-only access to the caller's grid.
//!
//! The engine never owns cell storage. Anything that can hand out the raw
//! text of a cell by position implements [`CellSource`]; rows are
//! `Vec<String>` so plain `Vec<Vec<String>>` snapshots work directly.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;
use super::range::CellRange;

/// A grid row: raw cell text in column order.
pub type Row = Vec<String>;

/// Read-only view of a grid of raw cell strings.
pub trait CellSource {
    /// Number of rows present.
    fn row_count(&self) -> usize;

    /// Number of cells present in `row` (0 for a missing row).
    fn row_len(&self, row: usize) -> usize;

    /// Raw text at a position, or None when the row or column is missing.
    fn raw(&self, cell: &CellRef) -> Option<&str>;

    /// Numeric value of a cell. Missing cells and text without a leading
    /// number read as zero.
    fn number(&self, cell: &CellRef) -> f64 {
        self.raw(cell).and_then(parse_leading_number).unwrap_or(0.0)
    }

    /// Sum every cell in the range. Cells outside the grid contribute zero,
    /// so iteration is clamped to the populated area.
    fn sum(&self, range: &CellRange) -> f64 {
        let n = range.normalized();
        let rows = self.row_count();
        if n.start.row >= rows {
            return 0.0;
        }
        let last_row = n.end.row.min(rows - 1);
        let mut total = 0.0;
        for row in n.start.row..=last_row {
            let len = self.row_len(row);
            if n.start.col >= len {
                continue;
            }
            let last_col = n.end.col.min(len - 1);
            for col in n.start.col..=last_col {
                total += self.number(&CellRef::new(col, row));
            }
        }
        total
    }
}

impl CellSource for [Row] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_len(&self, row: usize) -> usize {
        self.get(row).map_or(0, Vec::len)
    }

    fn raw(&self, cell: &CellRef) -> Option<&str> {
        self.get(cell.row)?.get(cell.col).map(String::as_str)
    }
}

impl CellSource for Vec<Row> {
    fn row_count(&self) -> usize {
        self.as_slice().row_count()
    }

    fn row_len(&self, row: usize) -> usize {
        self.as_slice().row_len(row)
    }

    fn raw(&self, cell: &CellRef) -> Option<&str> {
        self.as_slice().raw(cell)
    }
}

impl<T: CellSource + ?Sized> CellSource for &T {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn row_len(&self, row: usize) -> usize {
        (**self).row_len(row)
    }

    fn raw(&self, cell: &CellRef) -> Option<&str> {
        (**self).raw(cell)
    }
}

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("leading number regex must compile")
    })
}

/// Parse the longest decimal literal at the start of `text`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12abc"`
/// reads as 12 and `" 3.5 kg"` as 3.5. Returns None when no digits lead the
/// text or the literal is not finite.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let m = leading_number_re().find(text.trim_start())?;
    let n = m.as_str().parse::<f64>().ok()?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Row> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("42"), Some(42.0));
        assert_eq!(parse_leading_number("  -3.5"), Some(-3.5));
        assert_eq!(parse_leading_number("12abc"), Some(12.0));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("1e3"), Some(1000.0));
        assert_eq!(parse_leading_number("7."), Some(7.0));
    }

    #[test]
    fn test_parse_leading_number_rejects_text() {
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("1e999"), None);
    }

    #[test]
    fn test_number_missing_cells_are_zero() {
        let g = grid(&[&["1", "x"]]);
        assert_eq!(g.number(&CellRef::new(0, 0)), 1.0);
        assert_eq!(g.number(&CellRef::new(1, 0)), 0.0);
        assert_eq!(g.number(&CellRef::new(5, 0)), 0.0);
        assert_eq!(g.number(&CellRef::new(0, 9)), 0.0);
    }

    #[test]
    fn test_sum_tolerates_ragged_rows() {
        let g = grid(&[&["1", "2", "3"], &["4"], &[]]);
        let range = CellRange::new(CellRef::new(0, 0), CellRef::new(2, 2));
        assert_eq!(g.sum(&range), 10.0);
    }

    #[test]
    fn test_sum_huge_range_is_clamped() {
        let g = grid(&[&["1", "2"]]);
        let range = CellRange::new(CellRef::new(0, 0), CellRef::new(25, usize::MAX - 1));
        assert_eq!(g.sum(&range), 3.0);
    }

    #[test]
    fn test_sum_outside_grid_is_zero() {
        let g = grid(&[&["1"]]);
        let range = CellRange::new(CellRef::new(3, 3), CellRef::new(4, 4));
        assert_eq!(g.sum(&range), 0.0);
    }
}
