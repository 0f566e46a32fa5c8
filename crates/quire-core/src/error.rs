//! Error types for Quire core.

use thiserror::Error;

use crate::document::DocumentKind;

/// Errors that can occur while working with documents, stores and settings.
#[derive(Error, Debug)]
pub enum QuireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document {id} is a {found}, not a {expected}")]
    WrongKind {
        id: String,
        expected: DocumentKind,
        found: DocumentKind,
    },

    #[error("Cell at row {row}, column {col} is outside the sheet")]
    CellOutOfRange { row: usize, col: usize },

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Slide {0} does not exist")]
    SlideOutOfRange(usize),

    #[error("Invalid value '{value}' for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("Not signed in")]
    NotSignedIn,

    #[error("CSV file is empty")]
    EmptyCsv,
}

pub type Result<T> = std::result::Result<T, QuireError>;
