//! Spreadsheet content: a grid of raw cell strings plus column widths.
//!
//! Serialized as `{ "rows": [[string]], "columnWidths": [number] }`. Cells
//! keep the text the user typed; formulas are evaluated on display.

use serde::{Deserialize, Serialize};

use crate::error::{QuireError, Result};
use quire_engine::engine::{CellRef, CellSource, DisplayValue, Row, evaluate};

/// Shape of a blank sheet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpreadsheetDefaults {
    pub rows: usize,
    pub columns: usize,
    pub column_width: f64,
}

impl Default for SpreadsheetDefaults {
    fn default() -> Self {
        SpreadsheetDefaults {
            rows: 10,
            columns: 8,
            column_width: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetContent {
    pub rows: Vec<Row>,
    #[serde(default, deserialize_with = "column_widths_or_default")]
    pub column_widths: Vec<f64>,
}

/// Missing or non-finite widths (JSON `null`) become the default width
/// instead of failing the whole sheet.
fn column_widths_or_default<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let default = SpreadsheetDefaults::default().column_width;
    let widths = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(widths
        .into_iter()
        .map(|w| w.filter(|w| w.is_finite() && *w > 0.0).unwrap_or(default))
        .collect())
}

impl SpreadsheetContent {
    /// An empty `rows × columns` grid.
    pub fn blank(defaults: &SpreadsheetDefaults) -> Self {
        SpreadsheetContent {
            rows: vec![vec![String::new(); defaults.columns]; defaults.rows],
            column_widths: vec![defaults.column_width; defaults.columns],
        }
    }

    /// Decode stored content, falling back to a blank default sheet when it
    /// is not valid spreadsheet JSON.
    pub fn from_content(content: &str) -> Self {
        match serde_json::from_str(content) {
            Ok(sheet) => sheet,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable spreadsheet content, starting blank");
                Self::blank(&SpreadsheetDefaults::default())
            }
        }
    }

    /// Build a sheet from imported rows, padding short rows so the grid is
    /// rectangular.
    pub fn from_rows(mut rows: Vec<Row>, column_width: f64) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, String::new());
        }
        SpreadsheetContent {
            rows,
            column_widths: vec![column_width; columns],
        }
    }

    pub fn to_content(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest of the column widths list and the longest row.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.column_widths.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Replace the raw text of one cell. A short row is padded up to the
    /// sheet's column count; cells outside the sheet are rejected.
    pub fn update_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        let columns = self.column_count();
        let Some(cells) = self.rows.get_mut(row) else {
            return Err(QuireError::CellOutOfRange { row, col });
        };
        if col >= cells.len() {
            if col >= columns {
                return Err(QuireError::CellOutOfRange { row, col });
            }
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
        Ok(())
    }

    /// Update a cell addressed in A1 notation.
    pub fn update_cell_a1(&mut self, cell: &str, value: &str) -> Result<()> {
        let cell_ref =
            CellRef::from_str(cell).ok_or_else(|| QuireError::InvalidCellRef(cell.to_string()))?;
        self.update_cell(cell_ref.row, cell_ref.col, value)
    }

    /// Append an empty row as wide as the first row, or as wide as the
    /// default sheet when there are no rows.
    pub fn add_row(&mut self) {
        let width = match self.rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => SpreadsheetDefaults::default().columns,
        };
        self.rows.push(vec![String::new(); width]);
    }

    /// Append an empty column. Its width copies the last column's, or the
    /// default width for a sheet with no widths.
    pub fn add_column(&mut self) {
        for row in &mut self.rows {
            row.push(String::new());
        }
        let width = self
            .column_widths
            .last()
            .copied()
            .unwrap_or(SpreadsheetDefaults::default().column_width);
        self.column_widths.push(width);
    }

    /// Evaluate one cell against the current grid. Missing cells show as
    /// empty text.
    pub fn display(&self, row: usize, col: usize) -> DisplayValue {
        match self.cell(row, col) {
            Some(raw) => evaluate(raw, self),
            None => DisplayValue::Text(String::new()),
        }
    }

    /// The whole grid as display strings, row by row.
    pub fn evaluated_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(r, cells)| {
                (0..cells.len())
                    .map(|c| self.display(r, c).to_string())
                    .collect()
            })
            .collect()
    }
}

impl CellSource for SpreadsheetContent {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_len(&self, row: usize) -> usize {
        self.rows.row_len(row)
    }

    fn raw(&self, cell: &CellRef) -> Option<&str> {
        self.rows.raw(cell)
    }
}
