//! Immutable copies of document state taken when a request is dispatched,
//! and the results that come back for them.

use std::sync::Arc;

use super::DocumentId;

/// Document state captured at lint dispatch time.
///
/// Diagnostics in the response are resolved against `content`, not against
/// whatever the buffer holds when the response arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSnapshot {
    pub document: DocumentId,
    pub name: String,
    pub content: Arc<str>,
    pub generation: u64,
}

/// Source captured for an execute request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteSnapshot {
    pub name: String,
    pub content: Arc<str>,
    pub generation: u64,
}

/// Output of one accepted execute request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub output_html: String,
    pub output_text: String,
    /// Error text rendered verbatim in the error panel
    pub error: Option<String>,
    pub generation: u64,
}

impl ExecutionResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
