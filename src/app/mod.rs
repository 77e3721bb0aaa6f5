//! Session controller
//!
//! [`Playground`] owns the document store and is the only thing that mutates
//! it. User operations (tabs, edits, save, run) and completions coming back
//! from the remote service are all handled here, one at a time, each running
//! to completion before the next.
//!
//! The controller is split across files by concern:
//! - `tabs.rs`: add, rename, close, switch and edit
//! - `session.rs`: restore, save, examples, export and shutdown
//! - `lint_pipeline.rs` / `execute.rs`: request bookkeeping

mod execute;
mod lint_pipeline;
mod session;
mod tabs;

pub use execute::{ExecuteChannel, RunIndicator};
pub use lint_pipeline::{LintPipeline, LintState, Verdict};
pub use session::{SaveIndicator, SAVE_TOAST};

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::lint_diagnostics::{diagnostics_for_snapshot, ResolvedDiagnostic};
use crate::model::{
    Document, DocumentId, DocumentStore, ExecuteSnapshot, ExecutionResult, LintSnapshot,
    StoreError,
};
use crate::services::async_bridge::{AsyncBridge, AsyncMessage, Request, RequestSink};
use crate::services::persistence::SessionPersistence;
use crate::services::remote::{ExecuteReply, LintReply, RemoteError};
use crate::services::time_source::SharedTimeSource;

/// Longest the driver loop sleeps between checks
const MAX_WAIT: Duration = Duration::from_millis(50);

/// Diagnostics currently shown for the active document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsView {
    pub document: DocumentId,
    pub generation: u64,
    pub diagnostics: Vec<ResolvedDiagnostic>,
}

/// The session controller
pub struct Playground {
    config: Config,
    store: DocumentStore,
    lint: LintPipeline,
    execute: ExecuteChannel,
    persistence: SessionPersistence,
    sink: Box<dyn RequestSink>,
    time: SharedTimeSource,

    diagnostics: Option<DiagnosticsView>,
    output: Option<ExecutionResult>,
    save_indicator: SaveIndicator,
    toast: Option<String>,
    service_status: Option<String>,
    lint_error: Option<String>,
    startup_pending: bool,
}

impl Playground {
    fn with_store(
        config: Config,
        store: DocumentStore,
        persistence: SessionPersistence,
        sink: Box<dyn RequestSink>,
        time: SharedTimeSource,
    ) -> Self {
        let debounce = Duration::from_millis(config.lint.debounce_ms);
        Self {
            config,
            store,
            lint: LintPipeline::new(debounce),
            execute: ExecuteChannel::new(),
            persistence,
            sink,
            time,
            diagnostics: None,
            output: None,
            save_indicator: SaveIndicator::Saved,
            toast: None,
            service_status: None,
            lint_error: None,
            startup_pending: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn active_document(&self) -> &Document {
        self.store.active()
    }

    pub fn document(&self, name: &str) -> Result<&Document, StoreError> {
        self.store.get(name)
    }

    pub fn lint_state(&self, name: &str) -> Result<LintState, StoreError> {
        let id = self.store.get(name)?.id();
        Ok(self.lint.state(id))
    }

    /// Diagnostics for the active document, empty when none are shown
    pub fn displayed_diagnostics(&self) -> &[ResolvedDiagnostic] {
        self.diagnostics
            .as_ref()
            .map(|view| view.diagnostics.as_slice())
            .unwrap_or(&[])
    }

    pub fn diagnostics_view(&self) -> Option<&DiagnosticsView> {
        self.diagnostics.as_ref()
    }

    /// Latest accepted execution result
    pub fn output(&self) -> Option<&ExecutionResult> {
        self.output.as_ref()
    }

    pub fn run_indicator(&self) -> RunIndicator {
        self.execute.indicator()
    }

    pub fn service_status(&self) -> Option<&str> {
        self.service_status.as_deref()
    }

    /// Error from the latest current lint response for the active document
    pub fn lint_error(&self) -> Option<&str> {
        self.lint_error.as_deref()
    }

    // =========================================================================
    // Timers and requests
    // =========================================================================

    /// Dispatch lint requests whose debounce timer has expired
    pub fn tick(&mut self) {
        let now = self.time.now();
        for document in self.lint.due(now) {
            self.dispatch_lint(document);
        }
    }

    fn dispatch_lint(&mut self, document: DocumentId) {
        let Some(doc) = self.store.get_by_id(document) else {
            self.lint.forget(document);
            return;
        };
        if !doc.is_lint_eligible() {
            self.lint.cancel_timer(document);
            return;
        }
        let name = doc.name().to_string();
        let content: Arc<str> = Arc::from(doc.content());

        let generation = self.lint.begin_dispatch(document);
        self.sink.dispatch(Request::Lint(LintSnapshot {
            document,
            name,
            content,
            generation,
        }));
    }

    /// Lint a document immediately, skipping the debounce.
    ///
    /// Returns false when the document is not lint-eligible.
    pub fn lint_now(&mut self, name: &str) -> Result<bool, StoreError> {
        let doc = self.store.get(name)?;
        if !doc.is_lint_eligible() {
            return Ok(false);
        }
        let id = doc.id();
        self.dispatch_lint(id);
        Ok(true)
    }

    /// Lint the active document on activation unless a lint is already due
    fn relint_on_activation(&mut self) {
        let active = self.store.active();
        if active.is_lint_eligible() && self.lint.state(active.id()) == LintState::Clean {
            let id = active.id();
            self.dispatch_lint(id);
        }
    }

    /// Run the active document remotely; returns the execute generation
    pub fn execute(&mut self) -> u64 {
        let active = self.store.active();
        let name = active.name().to_string();
        let content: Arc<str> = Arc::from(active.content());

        let generation = self.execute.begin();
        self.sink.dispatch(Request::Execute(ExecuteSnapshot {
            name,
            content,
            generation,
        }));
        generation
    }

    /// Establish the remote execution context
    pub fn startup(&mut self) {
        self.startup_pending = true;
        self.sink.dispatch(Request::Startup);
    }

    // =========================================================================
    // Completions
    // =========================================================================

    pub fn handle_async(&mut self, message: AsyncMessage) {
        match message {
            AsyncMessage::LintFinished { snapshot, result } => {
                self.handle_lint_response(&snapshot, result)
            }
            AsyncMessage::ExecuteFinished { generation, result } => {
                self.handle_execute_response(generation, result)
            }
            AsyncMessage::StartupFinished(result) => self.handle_startup_response(result),
        }
    }

    pub fn handle_lint_response(
        &mut self,
        snapshot: &LintSnapshot,
        result: Result<LintReply, RemoteError>,
    ) {
        match self.lint.complete(snapshot.document, snapshot.generation) {
            Verdict::Current => {}
            Verdict::Stale | Verdict::UnknownDocument => {
                tracing::debug!(
                    "Dropping lint response for {} ({}) at generation {}",
                    snapshot.name,
                    snapshot.document,
                    snapshot.generation
                );
                return;
            }
        }

        if self.store.active().id() != snapshot.document {
            tracing::debug!(
                "Lint result for {} not shown: document is not active",
                snapshot.name
            );
            return;
        }

        let reply = match result {
            Ok(reply) => {
                self.lint_error = None;
                reply
            }
            Err(e) => {
                tracing::warn!("Lint request for {} failed: {}", snapshot.name, e);
                self.lint_error = Some(e.to_string());
                return;
            }
        };

        let diagnostics = diagnostics_for_snapshot(reply.output(), &snapshot.content);
        tracing::debug!(
            "Applying {} diagnostics to {} at generation {}",
            diagnostics.len(),
            snapshot.name,
            snapshot.generation
        );
        self.diagnostics = Some(DiagnosticsView {
            document: snapshot.document,
            generation: snapshot.generation,
            diagnostics,
        });
    }

    pub fn handle_execute_response(
        &mut self,
        generation: u64,
        result: Result<ExecuteReply, RemoteError>,
    ) {
        if !self.execute.complete(generation) {
            tracing::debug!("Dropping superseded execute response {}", generation);
            return;
        }

        self.output = Some(match result {
            Ok(reply) => ExecutionResult {
                error: reply.error_text(),
                output_html: reply.output_html,
                output_text: reply.output_non_html,
                generation,
            },
            Err(e) => {
                tracing::warn!("Execute request failed: {}", e);
                ExecutionResult {
                    error: Some(e.to_string()),
                    generation,
                    ..Default::default()
                }
            }
        });
    }

    fn handle_startup_response(&mut self, result: Result<String, RemoteError>) {
        self.startup_pending = false;
        let status = match result {
            Ok(status) => {
                tracing::info!("Remote service ready: {}", status);
                status
            }
            Err(e) => {
                tracing::warn!("Startup request failed: {}", e);
                e.to_string()
            }
        };
        self.service_status = Some(status);
    }

    fn clear_diagnostics_for(&mut self, document: DocumentId) {
        if self
            .diagnostics
            .as_ref()
            .is_some_and(|view| view.document == document)
        {
            self.diagnostics = None;
        }
    }

    // =========================================================================
    // Driving the event loop
    // =========================================================================

    /// True when no timer is running and no request is outstanding
    pub fn is_idle(&self) -> bool {
        self.lint.is_idle() && !self.execute.is_running() && !self.startup_pending
    }

    /// Earliest debounce expiry
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lint.next_deadline()
    }

    /// Apply every completion already waiting, then fire due timers
    pub fn drain(&mut self, bridge: &AsyncBridge) {
        while let Some(message) = bridge.try_recv() {
            self.handle_async(message);
        }
        self.tick();
    }

    /// Process events until idle or until `timeout` of wall time passes.
    ///
    /// Returns true if the session became idle.
    pub fn run_until_idle(&mut self, bridge: &AsyncBridge, timeout: Duration) -> bool {
        let give_up = Instant::now() + timeout;
        loop {
            self.drain(bridge);
            if self.is_idle() {
                return true;
            }

            let now = Instant::now();
            if now >= give_up {
                tracing::warn!("Session still busy after {:?}", timeout);
                return false;
            }

            let until_deadline = self
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(self.time.now()))
                .unwrap_or(MAX_WAIT);
            let wait = until_deadline.min(MAX_WAIT).min(give_up - now);

            if let Some(message) = bridge.recv_timeout(wait) {
                self.handle_async(message);
            }
        }
    }
}
