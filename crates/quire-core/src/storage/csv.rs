//! CSV import/export functionality

use crate::document::SpreadsheetContent;
use crate::error::{QuireError, Result};
use quire_engine::engine::Row;
use std::path::Path;

/// Parse a CSV file into rows of raw cell text.
pub fn parse_csv(path: &Path) -> Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)?;
    parse_csv_content(&content)
}

/// Parse CSV text into rows. Fails on input with no fields at all.
pub fn parse_csv_content(content: &str) -> Result<Vec<Row>> {
    let rows: Vec<Row> = content.lines().map(parse_csv_line).collect();
    if rows.iter().flatten().all(String::is_empty) {
        return Err(QuireError::EmptyCsv);
    }
    Ok(rows)
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(std::mem::take(&mut current));
                    } else {
                        fields.push(current.trim().to_string());
                        current.clear();
                    }
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    fields
}

/// Evaluated sheet as CSV text, one line per row.
pub fn write_csv_content(sheet: &SpreadsheetContent) -> String {
    let mut out = String::new();
    for row in sheet.evaluated_rows() {
        let fields: Vec<String> = row.iter().map(|v| escape_csv_field(v)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn write_csv(path: &Path, sheet: &SpreadsheetContent) -> Result<()> {
    std::fs::write(path, write_csv_content(sheet))?;
    Ok(())
}

/// Escape a field for CSV output
pub fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps. Plain numbers
    // such as "-3" are left alone.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if matches!(first_non_space, Some('=' | '+' | '-' | '@'))
        && !is_plain_number(field)
    {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}

/// A decimal literal such as `-3`, `+2.5` or `-1e5`. Spellings like `-inf`
/// or `+nan` are text.
fn is_plain_number(field: &str) -> bool {
    let trimmed = field.trim();
    let body = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && trimmed.parse::<f64>().is_ok()
}
