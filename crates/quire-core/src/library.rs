//! The document library: search, category filters and favorites.

use std::fmt;
use std::str::FromStr;

use crate::document::{Document, DocumentKind, DocumentPatch};
use crate::error::{QuireError, Result};
use crate::store::DocumentStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LibraryFilter {
    #[default]
    All,
    Favorites,
    Documents,
    Spreadsheets,
    Presentations,
}

impl LibraryFilter {
    pub const ALL: [LibraryFilter; 5] = [
        LibraryFilter::All,
        LibraryFilter::Favorites,
        LibraryFilter::Documents,
        LibraryFilter::Spreadsheets,
        LibraryFilter::Presentations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryFilter::All => "all",
            LibraryFilter::Favorites => "favorites",
            LibraryFilter::Documents => "documents",
            LibraryFilter::Spreadsheets => "spreadsheets",
            LibraryFilter::Presentations => "presentations",
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            LibraryFilter::All => true,
            LibraryFilter::Favorites => doc.is_favorite,
            LibraryFilter::Documents => doc.kind == DocumentKind::Document,
            LibraryFilter::Spreadsheets => doc.kind == DocumentKind::Spreadsheet,
            LibraryFilter::Presentations => doc.kind == DocumentKind::Presentation,
        }
    }
}

impl fmt::Display for LibraryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryFilter {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        LibraryFilter::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuireError::InvalidSetting {
                key: "filter",
                value: s.to_string(),
            })
    }
}

/// Documents whose title contains `search` (case-insensitive) and that pass
/// `filter`. Input order is preserved.
pub fn filter_documents<'a>(
    docs: &'a [Document],
    search: &str,
    filter: LibraryFilter,
) -> Vec<&'a Document> {
    let needle = search.to_lowercase();
    docs.iter()
        .filter(|doc| doc.title.to_lowercase().contains(&needle) && filter.matches(doc))
        .collect()
}

/// Flip a document's favorite flag and return the updated record.
pub fn toggle_favorite(store: &dyn DocumentStore, id: &str) -> Result<Document> {
    let doc = store.get(id)?;
    store.update(
        id,
        DocumentPatch {
            is_favorite: Some(!doc.is_favorite),
            ..Default::default()
        },
    )
}
