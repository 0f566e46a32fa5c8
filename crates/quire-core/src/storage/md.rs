//! Markdown export functionality

use crate::document::SpreadsheetContent;
use crate::error::Result;
use quire_engine::engine::CellRef;
use std::fmt::Write;
use std::path::Path;

/// Write the evaluated sheet to a markdown file.
pub fn write_markdown(path: &Path, title: &str, sheet: &SpreadsheetContent) -> Result<()> {
    std::fs::write(path, write_markdown_content(title, sheet))?;
    Ok(())
}

/// Render the evaluated sheet as a markdown table under a `# title` heading.
pub fn write_markdown_content(title: &str, sheet: &SpreadsheetContent) -> String {
    let mut out = String::new();
    let columns = sheet.column_count();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# {}", escape_markdown(title));
    let _ = writeln!(out);

    if sheet.row_count() == 0 || columns == 0 {
        let _ = writeln!(out, "*Empty spreadsheet*");
        return out;
    }

    // Header with column letters
    out.push_str("|   |");
    for col in 0..columns {
        let _ = write!(out, " {} |", CellRef::col_to_letters(col));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in 0..columns {
        out.push_str("---|");
    }
    out.push('\n');

    for (row, cells) in sheet.evaluated_rows().into_iter().enumerate() {
        let _ = write!(out, "| {} |", row + 1); // 1-based row numbers
        for col in 0..columns {
            let display = cells.get(col).map(String::as_str).unwrap_or("");
            let _ = write!(out, " {} |", escape_markdown(display));
        }
        out.push('\n');
    }

    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
