use std::fs;
use std::path::{Path, PathBuf};

use super::{DocumentQuery, DocumentStore, MemoryStore};
use crate::document::{Document, DocumentPatch, NewDocument};
use crate::error::Result;

const MAX_STORE_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

/// A [`MemoryStore`] mirrored to a JSON array on disk.
///
/// The file is read once on open and rewritten after every successful
/// mutation. A missing file is an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let inner = if path.exists() {
            let meta = fs::metadata(path)?;
            if meta.len() > MAX_STORE_FILE_BYTES {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!(
                        "Refusing to read {}: store file too large ({} bytes, max {})",
                        path.display(),
                        meta.len(),
                        MAX_STORE_FILE_BYTES
                    ),
                )
                .into());
            }
            let content = fs::read_to_string(path)?;
            let docs: Vec<Document> = if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            };
            tracing::debug!(path = %path.display(), count = docs.len(), "store loaded");
            MemoryStore::from_documents(docs)
        } else {
            MemoryStore::new()
        };

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.inner.documents())?;
        fs::write(&self.path, json + "\n")?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn create(&self, new: NewDocument) -> Result<Document> {
        let doc = self.inner.create(new)?;
        self.persist()?;
        Ok(doc)
    }

    fn get(&self, id: &str) -> Result<Document> {
        self.inner.get(id)
    }

    fn update(&self, id: &str, patch: DocumentPatch) -> Result<Document> {
        let doc = self.inner.update(id, patch)?;
        self.persist()?;
        Ok(doc)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id)?;
        self.persist()
    }

    fn filter(&self, query: &DocumentQuery) -> Result<Vec<Document>> {
        self.inner.filter(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentKind, SpreadsheetDefaults};
    use crate::error::QuireError;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("docs.json")).unwrap();
        assert!(store.filter(&DocumentQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("docs.json");

        let store = JsonFileStore::open(&path).unwrap();
        let new = NewDocument::new(
            DocumentKind::Spreadsheet,
            "Budget",
            "me@x",
            &SpreadsheetDefaults::default(),
        )
        .unwrap();
        let doc = store.create(new).unwrap();
        let keep = store
            .create(
                NewDocument::new(
                    DocumentKind::Document,
                    "Keep",
                    "me@x",
                    &SpreadsheetDefaults::default(),
                )
                .unwrap(),
            )
            .unwrap();
        store
            .update(
                &doc.id,
                DocumentPatch {
                    is_favorite: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let loaded = reopened.get(&doc.id).unwrap();
        assert_eq!(loaded.title, "Budget");
        assert!(loaded.is_favorite);

        reopened.delete(&doc.id).unwrap();
        let again = JsonFileStore::open(&path).unwrap();
        assert!(matches!(again.get(&doc.id), Err(QuireError::NotFound(_))));
        assert_eq!(again.get(&keep.id).unwrap().title, "Keep");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(QuireError::Json(_))
        ));
    }
}
