//! Document stores.
//!
//! [`DocumentStore`] is the boundary to whatever actually keeps documents: a
//! keyed record store with create/read/update/delete and a filtered listing.
//! [`MemoryStore`] keeps records in a `DashMap`; [`JsonFileStore`] adds
//! persistence to a single JSON file.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::cmp::Ordering;
use std::str::FromStr;

use crate::document::{Document, DocumentKind, DocumentPatch, NewDocument};
use crate::error::{QuireError, Result};

pub trait DocumentStore: Send + Sync {
    /// Store a new document and return it with its assigned id.
    fn create(&self, new: NewDocument) -> Result<Document>;

    fn get(&self, id: &str) -> Result<Document>;

    /// Apply a partial update and return the updated record.
    fn update(&self, id: &str, patch: DocumentPatch) -> Result<Document>;

    fn delete(&self, id: &str) -> Result<()>;

    /// Documents matching `query`, in the query's sort order.
    fn filter(&self, query: &DocumentQuery) -> Result<Vec<Document>>;
}

/// Listing order. The string forms follow the `-field` convention for
/// descending sorts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// `-last_modified`: most recently edited first.
    #[default]
    LastModifiedDesc,
    /// `last_modified`
    LastModifiedAsc,
    /// `title`
    TitleAsc,
}

impl SortOrder {
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        match self {
            SortOrder::LastModifiedDesc => b
                .last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.id.cmp(&b.id)),
            SortOrder::LastModifiedAsc => a
                .last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.id.cmp(&b.id)),
            SortOrder::TitleAsc => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "-last_modified" => Ok(SortOrder::LastModifiedDesc),
            "last_modified" => Ok(SortOrder::LastModifiedAsc),
            "title" => Ok(SortOrder::TitleAsc),
            other => Err(QuireError::InvalidSetting {
                key: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Field filters for [`DocumentStore::filter`]. Unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentQuery {
    pub created_by: Option<String>,
    pub kind: Option<DocumentKind>,
    pub sort: SortOrder,
}

impl DocumentQuery {
    pub fn created_by(email: &str) -> Self {
        DocumentQuery {
            created_by: Some(email.to_string()),
            ..Default::default()
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.created_by
            .as_ref()
            .is_none_or(|email| &doc.created_by == email)
            && self.kind.is_none_or(|kind| doc.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(
            "-last_modified".parse::<SortOrder>().unwrap(),
            SortOrder::LastModifiedDesc
        );
        assert_eq!("title".parse::<SortOrder>().unwrap(), SortOrder::TitleAsc);
        assert!("size".parse::<SortOrder>().is_err());
    }
}
