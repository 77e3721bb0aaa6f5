//! A single named text buffer ("tab") within a session.

use std::fmt;

/// Stable identity of a document.
///
/// Allocated by the [`DocumentStore`](super::DocumentStore) and never reused
/// within a session. Renaming a document keeps its id, which is what lets an
/// in-flight lint response find its document after a rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Editor language mode, derived from the document name suffix.
///
/// Names ending in a lint suffix are Python.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageMode {
    Python,
    /// PRISM model description (never linted)
    Prism,
    PlainText,
}

impl LanguageMode {
    pub fn from_name(name: &str, lint_suffixes: &[String]) -> Self {
        if is_lint_eligible(name, lint_suffixes) {
            LanguageMode::Python
        } else if name.ends_with(".prism") {
            LanguageMode::Prism
        } else {
            LanguageMode::PlainText
        }
    }
}

/// Returns true if `name` ends with one of the lint suffixes
pub fn is_lint_eligible(name: &str, lint_suffixes: &[String]) -> bool {
    lint_suffixes
        .iter()
        .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
}

/// A named, independently editable text buffer.
///
/// Only the store hands out `&mut Document`; everything else sees documents
/// through shared references or snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    name: String,
    content: String,
    dirty: bool,
    lint_eligible: bool,
    mode: LanguageMode,
}

impl Document {
    pub(crate) fn new(
        id: DocumentId,
        name: String,
        content: String,
        lint_suffixes: &[String],
    ) -> Self {
        let lint_eligible = is_lint_eligible(&name, lint_suffixes);
        let mode = LanguageMode::from_name(&name, lint_suffixes);
        Self {
            id,
            name,
            content,
            dirty: false,
            lint_eligible,
            mode,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the content changed since the last explicit save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saved(&self) -> bool {
        !self.dirty
    }

    pub fn is_lint_eligible(&self) -> bool {
        self.lint_eligible
    }

    pub fn language_mode(&self) -> LanguageMode {
        self.mode
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
        self.dirty = true;
    }

    pub(crate) fn set_name(&mut self, name: String, lint_suffixes: &[String]) {
        self.lint_eligible = is_lint_eligible(&name, lint_suffixes);
        self.mode = LanguageMode::from_name(&name, lint_suffixes);
        self.name = name;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
