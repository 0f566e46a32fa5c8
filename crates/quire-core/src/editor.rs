//! Editor sessions: an open document with debounced autosave.
//!
//! All three editors share one pattern. Every edit to the title or content
//! marks the session pending and restarts the autosave quiet period; once
//! the period passes, `{ title, content, last_modified }` is written back to
//! the store. A failed save is logged and the session stays pending until
//! the next edit or an explicit [`EditorSession::flush`].

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::autosave::{Debouncer, SaveStatus};
use crate::document::{
    Document, DocumentKind, DocumentPatch, PresentationContent, RichText, SpreadsheetContent,
};
use crate::error::Result;
use crate::store::DocumentStore;

/// Typed content an editor works on.
pub trait EditorContent: Sized {
    const KIND: DocumentKind;

    /// Decode stored content, falling back to the kind's default.
    fn decode(content: &str) -> Self;

    fn encode(&self) -> Result<String>;
}

impl EditorContent for SpreadsheetContent {
    const KIND: DocumentKind = DocumentKind::Spreadsheet;

    fn decode(content: &str) -> Self {
        SpreadsheetContent::from_content(content)
    }

    fn encode(&self) -> Result<String> {
        self.to_content()
    }
}

impl EditorContent for PresentationContent {
    const KIND: DocumentKind = DocumentKind::Presentation;

    fn decode(content: &str) -> Self {
        PresentationContent::from_content(content)
    }

    fn encode(&self) -> Result<String> {
        self.to_content()
    }
}

impl EditorContent for RichText {
    const KIND: DocumentKind = DocumentKind::Document;

    fn decode(content: &str) -> Self {
        RichText::from_content(content)
    }

    fn encode(&self) -> Result<String> {
        Ok(self.html().to_string())
    }
}

pub struct EditorSession<C: EditorContent> {
    id: String,
    title: String,
    content: C,
    debouncer: Debouncer,
    status: SaveStatus,
    last_saved: Option<DateTime<Utc>>,
}

impl<C: EditorContent> EditorSession<C> {
    /// Open `doc` for editing. Fails if it is not of the editor's kind.
    pub fn open(doc: &Document, delay: Duration) -> Result<Self> {
        doc.ensure_kind(C::KIND)?;
        Ok(EditorSession {
            id: doc.id.clone(),
            title: doc.title.clone(),
            content: C::decode(&doc.content),
            debouncer: Debouncer::new(delay),
            status: SaveStatus::Saved,
            last_saved: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn set_title(&mut self, title: &str, now: Instant) {
        self.title = title.to_string();
        self.mark_dirty(now);
    }

    /// Mutate the content. The edit counts even if the closure fails, so
    /// a partial change is still saved.
    pub fn edit<R>(&mut self, now: Instant, f: impl FnOnce(&mut C) -> R) -> R {
        let out = f(&mut self.content);
        self.mark_dirty(now);
        out
    }

    fn mark_dirty(&mut self, now: Instant) {
        self.status = SaveStatus::Pending;
        self.debouncer.touch(now);
    }

    /// Save if the quiet period has elapsed. Returns whether a save happened.
    pub fn tick(&mut self, now: Instant, store: &dyn DocumentStore) -> Result<bool> {
        if !self.debouncer.take(now) {
            return Ok(false);
        }
        self.save(store)?;
        Ok(true)
    }

    /// Save now if anything is pending, regardless of the quiet period.
    pub fn flush(&mut self, store: &dyn DocumentStore) -> Result<()> {
        self.debouncer.cancel();
        if self.status == SaveStatus::Saved {
            return Ok(());
        }
        self.save(store)
    }

    fn save(&mut self, store: &dyn DocumentStore) -> Result<()> {
        self.status = SaveStatus::Saving;
        let result = self
            .content
            .encode()
            .and_then(|content| store.update(&self.id, DocumentPatch::save(&self.title, content)));
        match result {
            Ok(doc) => {
                tracing::debug!(id = %self.id, "autosaved");
                self.status = SaveStatus::Saved;
                self.last_saved = Some(doc.last_modified);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "autosave failed");
                self.status = SaveStatus::Pending;
                Err(e)
            }
        }
    }
}
