//! Document store: the single source of truth for which documents exist.
//!
//! The store owns the ordered document set and the active-document pointer.
//! Every operation either succeeds completely or leaves the store untouched,
//! and no sequence of operations can leave it empty or with a dangling
//! active pointer.

use thiserror::Error;

use super::document::{Document, DocumentId};

/// Structural session violations, always reported synchronously
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a document named {0:?} already exists")]
    NameConflict(String),

    #[error("no document named {0:?}")]
    NotFound(String),

    #[error("cannot close {0:?}: it is the last document")]
    LastDocument(String),

    #[error("invalid document name {0:?}")]
    InvalidName(String),

    #[error("a session needs at least one document")]
    EmptySet,
}

/// Ordered set of documents plus the active document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    documents: Vec<Document>,
    /// Index into `documents`; always in bounds
    active: usize,
    next_id: u64,
    lint_suffixes: Vec<String>,
}

/// Names become archive paths on export, so path separators are rejected.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl DocumentStore {
    /// Create a store holding a single empty document, which is active
    pub fn new(default_name: &str, lint_suffixes: Vec<String>) -> Result<Self, StoreError> {
        Self::from_entries(
            vec![(default_name.to_string(), String::new())],
            lint_suffixes,
        )
    }

    /// Build a store from ordered `(name, content)` pairs; the first is active
    pub fn from_entries(
        entries: Vec<(String, String)>,
        lint_suffixes: Vec<String>,
    ) -> Result<Self, StoreError> {
        let mut store = Self {
            documents: Vec::new(),
            active: 0,
            next_id: 0,
            lint_suffixes,
        };
        store.replace_all(entries)?;
        Ok(store)
    }

    fn allocate_id(&mut self) -> DocumentId {
        self.next_id += 1;
        DocumentId(self.next_id)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.name() == name)
    }

    fn require(&self, name: &str) -> Result<usize, StoreError> {
        self.index_of(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Add an empty document at the end of the set
    pub fn create(&mut self, name: &str) -> Result<&Document, StoreError> {
        validate_name(name)?;
        if self.index_of(name).is_some() {
            return Err(StoreError::NameConflict(name.to_string()));
        }

        let id = self.allocate_id();
        self.documents.push(Document::new(
            id,
            name.to_string(),
            String::new(),
            &self.lint_suffixes,
        ));
        Ok(&self.documents[self.documents.len() - 1])
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let idx = self.require(old)?;
        if old == new {
            return Ok(());
        }
        validate_name(new)?;
        if self.index_of(new).is_some() {
            return Err(StoreError::NameConflict(new.to_string()));
        }

        self.documents[idx].set_name(new.to_string(), &self.lint_suffixes);
        Ok(())
    }

    /// Remove a document.
    ///
    /// Removing the active document moves the active pointer to the previous
    /// document in insertion order, or to the new first document when the
    /// removed one was first.
    pub fn remove(&mut self, name: &str) -> Result<Document, StoreError> {
        let idx = self.require(name)?;
        if self.documents.len() == 1 {
            return Err(StoreError::LastDocument(name.to_string()));
        }

        let removed = self.documents.remove(idx);
        if idx < self.active || (idx == self.active && idx > 0) {
            self.active -= 1;
        }
        Ok(removed)
    }

    /// Replace a document's content and mark it dirty
    pub fn set_content(
        &mut self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<&Document, StoreError> {
        let idx = self.require(name)?;
        self.documents[idx].set_content(text.into());
        Ok(&self.documents[idx])
    }

    pub fn get(&self, name: &str) -> Result<&Document, StoreError> {
        self.require(name).map(|idx| &self.documents[idx])
    }

    pub fn get_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn active(&self) -> &Document {
        &self.documents[self.active]
    }

    pub fn set_active(&mut self, name: &str) -> Result<&Document, StoreError> {
        self.active = self.require(name)?;
        Ok(self.active())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.name().to_string()).collect()
    }

    /// Ordered `(name, content)` pairs, the unit of persistence and export
    pub fn entries(&self) -> Vec<(String, String)> {
        self.documents
            .iter()
            .map(|d| (d.name().to_string(), d.content().to_string()))
            .collect()
    }

    pub fn mark_all_saved(&mut self) {
        for doc in &mut self.documents {
            doc.mark_saved();
        }
    }

    pub fn lint_suffixes(&self) -> &[String] {
        &self.lint_suffixes
    }

    /// Replace the whole document set; the first entry becomes active.
    ///
    /// All names are validated before anything is touched.
    pub fn replace_all(&mut self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Err(StoreError::EmptySet);
        }
        for (i, (name, _)) in entries.iter().enumerate() {
            validate_name(name)?;
            if entries[..i].iter().any(|(other, _)| other == name) {
                return Err(StoreError::NameConflict(name.clone()));
            }
        }

        let mut documents = Vec::with_capacity(entries.len());
        for (name, content) in entries {
            let id = self.allocate_id();
            documents.push(Document::new(id, name, content, &self.lint_suffixes));
        }
        self.documents = documents;
        self.active = 0;
        Ok(())
    }

    /// First unused name of the form `"<prefix> <n>"`, starting at 1
    pub fn next_free_name(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{prefix} {n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| format!("{prefix} {}", self.documents.len() + 1))
    }
}
