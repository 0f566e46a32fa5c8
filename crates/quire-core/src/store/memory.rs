use dashmap::DashMap;
use uuid::Uuid;

use super::{DocumentQuery, DocumentStore};
use crate::document::{Document, DocumentPatch, NewDocument};
use crate::error::{QuireError, Result};

/// In-process document store. Clones share nothing; wrap in `Arc` to share.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: DashMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records, keyed by their ids.
    pub fn from_documents(docs: impl IntoIterator<Item = Document>) -> Self {
        let store = Self::new();
        for doc in docs {
            store.docs.insert(doc.id.clone(), doc);
        }
        store
    }

    /// Snapshot of every record, sorted by id for stable output.
    pub fn documents(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.docs.iter().map(|e| e.value().clone()).collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn create(&self, new: NewDocument) -> Result<Document> {
        let doc = new.into_document(Uuid::new_v4().to_string());
        tracing::info!(id = %doc.id, kind = %doc.kind, "document created");
        self.docs.insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    fn get(&self, id: &str) -> Result<Document> {
        self.docs
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| QuireError::NotFound(id.to_string()))
    }

    fn update(&self, id: &str, patch: DocumentPatch) -> Result<Document> {
        let mut entry = self
            .docs
            .get_mut(id)
            .ok_or_else(|| QuireError::NotFound(id.to_string()))?;
        patch.apply(entry.value_mut());
        Ok(entry.value().clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.docs
            .remove(id)
            .ok_or_else(|| QuireError::NotFound(id.to_string()))?;
        tracing::info!(id, "document deleted");
        Ok(())
    }

    fn filter(&self, query: &DocumentQuery) -> Result<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .docs
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by(|a, b| query.sort.compare(a, b));
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentKind, SpreadsheetDefaults};
    use crate::store::SortOrder;
    use chrono::{Duration, Utc};

    fn new_doc(kind: DocumentKind, title: &str, owner: &str) -> NewDocument {
        NewDocument::new(kind, title, owner, &SpreadsheetDefaults::default()).unwrap()
    }

    #[test]
    fn test_create_get_delete() {
        let store = MemoryStore::new();
        let doc = store
            .create(new_doc(DocumentKind::Document, "Notes", "a@x"))
            .unwrap();
        assert!(!doc.id.is_empty());
        assert_eq!(store.get(&doc.id).unwrap(), doc);

        store.delete(&doc.id).unwrap();
        assert!(matches!(store.get(&doc.id), Err(QuireError::NotFound(_))));
        assert!(matches!(store.delete(&doc.id), Err(QuireError::NotFound(_))));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = MemoryStore::new();
        let a = store.create(new_doc(DocumentKind::Document, "", "")).unwrap();
        let b = store.create(new_doc(DocumentKind::Document, "", "")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_missing_document() {
        let store = MemoryStore::new();
        let err = store.update("nope", DocumentPatch::default()).unwrap_err();
        assert!(matches!(err, QuireError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn test_filter_by_owner_sorted_newest_first() {
        let store = MemoryStore::new();
        let base = Utc::now();
        let mut ids = Vec::new();
        for (i, owner) in ["a@x", "b@x", "a@x", "a@x"].iter().enumerate() {
            let mut new = new_doc(DocumentKind::Spreadsheet, &format!("S{}", i), owner);
            new.last_modified = base + Duration::seconds(i as i64);
            ids.push(store.create(new).unwrap().id);
        }

        let docs = store.filter(&DocumentQuery::created_by("a@x")).unwrap();
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["S3", "S2", "S0"]);

        let query = DocumentQuery {
            sort: SortOrder::LastModifiedAsc,
            ..DocumentQuery::created_by("a@x")
        };
        let docs = store.filter(&query).unwrap();
        assert_eq!(docs[0].title, "S0");
    }

    #[test]
    fn test_filter_by_kind() {
        let store = MemoryStore::new();
        store.create(new_doc(DocumentKind::Document, "d", "")).unwrap();
        store
            .create(new_doc(DocumentKind::Presentation, "p", ""))
            .unwrap();
        let query = DocumentQuery {
            kind: Some(DocumentKind::Presentation),
            ..Default::default()
        };
        let docs = store.filter(&query).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "p");
    }
}
