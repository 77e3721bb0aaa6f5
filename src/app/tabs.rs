//! Tab operations on the session controller

use super::{Playground, SaveIndicator};
use crate::model::StoreError;

impl Playground {
    /// Replace a document's content.
    ///
    /// Restarts the document's debounce timer when it is lint-eligible and
    /// auto-saves the session.
    pub fn edit(&mut self, name: &str, text: impl Into<String>) -> Result<(), StoreError> {
        let doc = self.store.set_content(name, text)?;
        let (id, eligible) = (doc.id(), doc.is_lint_eligible());

        if eligible {
            let now = self.time.now();
            self.lint.note_edit(id, now);
        }
        self.save_indicator = SaveIndicator::Unsaved;
        self.auto_save();
        Ok(())
    }

    /// Add an empty tab with the next free default name and activate it
    pub fn add_tab(&mut self) -> Result<String, StoreError> {
        let name = self.store.next_free_name(&self.config.session.new_tab_prefix);
        self.add_tab_named(&name)?;
        Ok(name)
    }

    pub fn add_tab_named(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.create(name)?;
        self.activate(name)?;
        self.auto_save();
        Ok(())
    }

    pub fn rename_tab(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        self.store.rename(old, new)?;
        let doc = self.store.get(new)?;
        let (id, eligible) = (doc.id(), doc.is_lint_eligible());

        if !eligible {
            self.lint.forget(id);
            self.clear_diagnostics_for(id);
        } else if self.store.active().id() == id {
            self.relint_on_activation();
        }

        tracing::debug!("Renamed {:?} to {:?}", old, new);
        self.auto_save();
        Ok(())
    }

    /// Close a tab; closing the last one fails with `LastDocument`
    pub fn close_tab(&mut self, name: &str) -> Result<(), StoreError> {
        let was_active = self.store.active().name() == name;
        let removed = self.store.remove(name)?;

        self.lint.forget(removed.id());
        self.clear_diagnostics_for(removed.id());
        if was_active {
            self.relint_on_activation();
        }

        tracing::debug!(
            "Closed {:?}, active is now {:?}",
            name,
            self.store.active().name()
        );
        self.auto_save();
        Ok(())
    }

    /// Make `name` the active document.
    ///
    /// Diagnostics for the previous document are discarded. Pending lint
    /// timers keep running for every document.
    pub fn switch_tab(&mut self, name: &str) -> Result<(), StoreError> {
        if self.store.active().name() == name {
            return Ok(());
        }
        self.activate(name)
    }

    fn activate(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.set_active(name)?;
        self.diagnostics = None;
        self.lint_error = None;
        self.relint_on_activation();
        Ok(())
    }
}
