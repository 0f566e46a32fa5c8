//! Spreadsheet import/export.

pub mod csv;
pub mod md;

pub use csv::{escape_csv_field, parse_csv, parse_csv_content, write_csv, write_csv_content};
pub use md::{write_markdown, write_markdown_content};
