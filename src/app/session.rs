//! Session restore, save, examples and export
//!
//! Explicit saves and auto-saves write the same full mapping through the same
//! persistence adapter, so whichever runs last wins.

use super::Playground;
use crate::config::Config;
use crate::model::{DocumentStore, StoreError};
use crate::services::async_bridge::{Request, RequestSink};
use crate::services::examples::ExampleSet;
use crate::services::export::{self, ExportError};
use crate::services::persistence::{PersistError, SessionPersistence};
use crate::services::time_source::SharedTimeSource;

/// Toast shown after an explicit save
pub const SAVE_TOAST: &str = "The code has been saved successfully";

/// State of the Save button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIndicator {
    Unsaved,
    Saved,
}

impl Playground {
    /// Build the controller from persisted state.
    ///
    /// Falls back to the legacy single-document value, then to a single empty
    /// default document. Unreadable state is logged and replaced by the
    /// default; it never prevents the session from starting.
    pub fn restore(
        config: Config,
        mut persistence: SessionPersistence,
        sink: Box<dyn RequestSink>,
        time: SharedTimeSource,
    ) -> Result<Self, StoreError> {
        let suffixes = config.lint.suffixes.clone();
        let default_name = config.session.default_document.clone();

        let restored = match persistence.load() {
            Ok(Some(entries)) if !entries.is_empty() => {
                match DocumentStore::from_entries(entries, suffixes.clone()) {
                    Ok(store) => Some(store),
                    Err(e) => {
                        tracing::warn!("Ignoring stored session: {}", e);
                        None
                    }
                }
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Could not load stored session: {}", e);
                None
            }
        };

        let mut migrated = false;
        let mut store = match restored {
            Some(store) => store,
            None => {
                let mut store = DocumentStore::new(&default_name, suffixes)?;
                match persistence.load_legacy() {
                    Ok(Some(code)) => {
                        tracing::info!("Migrating legacy single-document session");
                        store.set_content(&default_name, code)?;
                        migrated = true;
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Could not read legacy session: {}", e),
                }
                store
            }
        };
        store.mark_all_saved();

        tracing::info!(
            "Restored {} documents, active {:?}",
            store.len(),
            store.active().name()
        );

        if migrated {
            let saved = persistence
                .save(&store.entries())
                .and_then(|()| persistence.clear_legacy());
            if let Err(e) = saved {
                tracing::warn!("Could not store migrated session: {}", e);
            }
        }

        Ok(Self::with_store(config, store, persistence, sink, time))
    }

    /// Explicit save: persists, marks every document saved and shows a toast
    pub fn save(&mut self) -> Result<(), PersistError> {
        self.persistence.save(&self.store.entries())?;
        self.store.mark_all_saved();
        self.save_indicator = SaveIndicator::Saved;
        self.toast = Some(SAVE_TOAST.to_string());
        tracing::info!("Saved {} documents", self.store.len());
        Ok(())
    }

    /// Persist after a mutation. Failures are logged, never surfaced.
    pub(super) fn auto_save(&mut self) {
        if !self.config.session.auto_save {
            return;
        }
        if let Err(e) = self.persistence.save(&self.store.entries()) {
            tracing::warn!("Auto-save failed: {}", e);
        }
    }

    pub fn save_indicator(&self) -> SaveIndicator {
        self.save_indicator
    }

    /// One-shot toast message, cleared once taken
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }

    /// Replace the whole session with an example set
    pub fn load_example(&mut self, example: &ExampleSet) -> Result<(), StoreError> {
        self.store.replace_all(example.files.clone())?;
        tracing::info!(
            "Loaded example {:?} with {} documents",
            example.title,
            example.files.len()
        );

        self.lint.clear();
        self.diagnostics = None;
        self.save_indicator = SaveIndicator::Unsaved;
        self.relint_on_activation();
        self.auto_save();
        Ok(())
    }

    /// Zip the current document set; returns the file name and bytes
    pub fn export_archive(&self) -> Result<(String, Vec<u8>), ExportError> {
        let folder = export::archive_folder(&self.config.export.app_name, self.time.today());
        let bytes = export::export_archive(&self.store.entries(), &folder)?;
        Ok((export::archive_file_name(&folder), bytes))
    }

    /// Release the remote context and save one last time
    pub fn shutdown(&mut self) -> Result<(), PersistError> {
        self.sink.dispatch(Request::Stop);
        self.save()
    }
}
