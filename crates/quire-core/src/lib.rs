//! quire-core - UI-agnostic document model, stores, autosave and export.

pub mod account;
pub mod autosave;
pub mod document;
pub mod editor;
pub mod error;
pub mod library;
pub mod storage;
pub mod store;

pub use account::{AuthClient, FileAuth, Language, MemoryAuth, SettingsPatch, Theme, UserProfile};
pub use autosave::{DEFAULT_AUTOSAVE_DELAY, Debouncer, SaveStatus};
pub use document::{
    Document, DocumentKind, DocumentPatch, NewDocument, PresentationContent, RichText, Slide,
    SlideField, SpreadsheetContent, SpreadsheetDefaults,
};
pub use editor::{EditorContent, EditorSession};
pub use error::{QuireError, Result};
pub use library::{LibraryFilter, filter_documents, toggle_favorite};
pub use store::{DocumentQuery, DocumentStore, JsonFileStore, MemoryStore, SortOrder};

pub use quire_engine::engine::CellRef;
