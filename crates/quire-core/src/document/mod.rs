//! Document records and their typed content.
//!
//! Every document is stored as a flat record whose `content` field is a
//! string: HTML for rich text, JSON for spreadsheets and presentations. The
//! typed content views live in the submodules.

mod presentation;
mod spreadsheet;
mod text;

pub use presentation::{DEFAULT_SLIDE_BACKGROUND, PresentationContent, Slide, SlideField};
pub use spreadsheet::{SpreadsheetContent, SpreadsheetDefaults};
pub use text::{DEFAULT_RICH_TEXT, RichText};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QuireError, Result};

/// Title given to documents created without one.
pub const UNTITLED: &str = "Untitled";

/// The three editors a document can be opened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Document,
    Spreadsheet,
    Presentation,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Document,
        DocumentKind::Spreadsheet,
        DocumentKind::Presentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Document => "document",
            DocumentKind::Spreadsheet => "spreadsheet",
            DocumentKind::Presentation => "presentation",
        }
    }

    /// Serialized content a fresh document of this kind starts with.
    pub fn default_content(&self, defaults: &SpreadsheetDefaults) -> Result<String> {
        match self {
            DocumentKind::Document => Ok(DEFAULT_RICH_TEXT.to_string()),
            DocumentKind::Spreadsheet => SpreadsheetContent::blank(defaults).to_content(),
            DocumentKind::Presentation => PresentationContent::default().to_content(),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        DocumentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuireError::InvalidSetting {
                key: "type",
                value: s.to_string(),
            })
    }
}

/// A stored document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_by: String,
}

impl Document {
    /// Fail with [`QuireError::WrongKind`] unless this document is of `kind`.
    pub fn ensure_kind(&self, kind: DocumentKind) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(QuireError::WrongKind {
                id: self.id.clone(),
                expected: kind,
                found: self.kind,
            })
        }
    }

    /// Decode the spreadsheet grid. Unreadable content yields a blank sheet.
    pub fn spreadsheet(&self) -> Result<SpreadsheetContent> {
        self.ensure_kind(DocumentKind::Spreadsheet)?;
        Ok(SpreadsheetContent::from_content(&self.content))
    }

    /// Decode the slide deck. Unreadable content yields a single blank slide.
    pub fn presentation(&self) -> Result<PresentationContent> {
        self.ensure_kind(DocumentKind::Presentation)?;
        Ok(PresentationContent::from_content(&self.content))
    }

    pub fn rich_text(&self) -> Result<RichText> {
        self.ensure_kind(DocumentKind::Document)?;
        Ok(RichText::from_content(&self.content))
    }
}

/// Fields for a document about to be created; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: String,
    pub last_modified: DateTime<Utc>,
    pub is_favorite: bool,
    pub created_by: String,
}

impl NewDocument {
    /// A fresh document of `kind` holding that kind's default content.
    /// A blank title becomes [`UNTITLED`].
    pub fn new(
        kind: DocumentKind,
        title: &str,
        created_by: &str,
        defaults: &SpreadsheetDefaults,
    ) -> Result<Self> {
        let title = title.trim();
        Ok(NewDocument {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            kind,
            content: kind.default_content(defaults)?,
            last_modified: Utc::now(),
            is_favorite: false,
            created_by: created_by.to_string(),
        })
    }

    pub(crate) fn into_document(self, id: String) -> Document {
        Document {
            id,
            title: self.title,
            kind: self.kind,
            content: self.content,
            last_modified: self.last_modified,
            is_favorite: self.is_favorite,
            created_by: self.created_by,
        }
    }
}

/// A partial update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl DocumentPatch {
    /// The patch an editor sends on save: title, content and a fresh timestamp.
    pub fn save(title: &str, content: String) -> Self {
        DocumentPatch {
            title: Some(title.to_string()),
            content: Some(content),
            last_modified: Some(Utc::now()),
            is_favorite: None,
        }
    }

    pub fn rename(title: &str) -> Self {
        DocumentPatch {
            title: Some(title.to_string()),
            last_modified: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn apply(self, doc: &mut Document) {
        if let Some(title) = self.title {
            doc.title = title;
        }
        if let Some(content) = self.content {
            doc.content = content;
        }
        if let Some(last_modified) = self.last_modified {
            doc.last_modified = last_modified;
        }
        if let Some(is_favorite) = self.is_favorite {
            doc.is_favorite = is_favorite;
        }
    }
}
