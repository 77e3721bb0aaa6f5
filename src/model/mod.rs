//! Session data model: documents, the document store and request snapshots

pub mod document;
pub mod snapshot;
pub mod store;

pub use document::{Document, DocumentId, LanguageMode};
pub use snapshot::{ExecuteSnapshot, ExecutionResult, LintSnapshot};
pub use store::{DocumentStore, StoreError};
