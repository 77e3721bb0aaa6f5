//! Test harness driving a [`Playground`] without a network.
//!
//! Requests are recorded instead of sent; tests deliver responses by hand, in
//! any order, through the same entry point the event loop uses.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use playground::app::Playground;
use playground::config::Config;
use playground::model::{ExecuteSnapshot, LintSnapshot};
use playground::services::async_bridge::{AsyncMessage, Request, RequestSink};
use playground::services::persistence::{MemoryStorage, SessionPersistence};
use playground::services::remote::{ExecuteReply, LintReply, RemoteError};
use playground::services::time_source::TestTimeSource;

use super::tracing::init_tracing_from_env;

/// Request sink that keeps everything it is given
#[derive(Clone, Default)]
pub struct RecordingSink {
    requests: Rc<RefCell<Vec<Request>>>,
}

impl RequestSink for RecordingSink {
    fn dispatch(&mut self, request: Request) {
        self.requests.borrow_mut().push(request);
    }
}

pub struct PlaygroundHarness {
    pub session: Playground,
    pub time: Arc<TestTimeSource>,
    pub storage: MemoryStorage,
    sink: RecordingSink,
}

impl PlaygroundHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_storage(config, MemoryStorage::new())
    }

    /// Restore a session from `storage`, as a page reload would
    pub fn with_storage(config: Config, storage: MemoryStorage) -> Self {
        init_tracing_from_env();

        let sink = RecordingSink::default();
        let time = TestTimeSource::shared();
        let session = Playground::restore(
            config,
            SessionPersistence::in_memory(storage.clone()),
            Box::new(sink.clone()),
            time.clone(),
        )
        .unwrap();

        Self {
            session,
            time,
            storage,
            sink,
        }
    }

    /// Debounce interval of the session's config
    pub fn debounce_ms(&self) -> u64 {
        self.session.config().lint.debounce_ms
    }

    /// Move the clock forward and fire due timers
    pub fn advance_ms(&mut self, millis: u64) {
        self.time.advance_ms(millis);
        self.session.tick();
    }

    /// Move past the debounce interval
    pub fn wait_debounce(&mut self) {
        self.advance_ms(self.debounce_ms());
    }

    /// Everything dispatched since the last call
    pub fn take_requests(&self) -> Vec<Request> {
        std::mem::take(&mut *self.sink.requests.borrow_mut())
    }

    pub fn take_lint_requests(&self) -> Vec<LintSnapshot> {
        self.take_requests()
            .into_iter()
            .filter_map(|request| match request {
                Request::Lint(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn take_execute_requests(&self) -> Vec<ExecuteSnapshot> {
        self.take_requests()
            .into_iter()
            .filter_map(|request| match request {
                Request::Execute(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    /// Deliver a lint reply carrying raw linter output
    pub fn deliver_lint(&mut self, snapshot: &LintSnapshot, output: &str) {
        let reply = LintReply {
            error: (!output.is_empty()).then(|| output.to_string()),
            status: None,
        };
        self.session.handle_async(AsyncMessage::LintFinished {
            snapshot: snapshot.clone(),
            result: Ok(reply),
        });
    }

    pub fn deliver_lint_failure(&mut self, snapshot: &LintSnapshot, message: &str) {
        self.session.handle_async(AsyncMessage::LintFinished {
            snapshot: snapshot.clone(),
            result: Err(transport_error("lint", message)),
        });
    }

    pub fn deliver_execute(&mut self, generation: u64, reply: ExecuteReply) {
        self.session.handle_async(AsyncMessage::ExecuteFinished {
            generation,
            result: Ok(reply),
        });
    }

    pub fn deliver_execute_failure(&mut self, generation: u64, message: &str) {
        self.session.handle_async(AsyncMessage::ExecuteFinished {
            generation,
            result: Err(transport_error("execute", message)),
        });
    }

    /// `(code, label)` of the diagnostics currently shown
    pub fn shown(&self) -> Vec<(String, String)> {
        self.session
            .displayed_diagnostics()
            .iter()
            .map(|d| (d.diagnostic.code.clone(), d.label()))
            .collect()
    }

    pub fn shown_codes(&self) -> Vec<String> {
        self.shown().into_iter().map(|(code, _)| code).collect()
    }
}

pub fn transport_error(endpoint: &str, message: &str) -> RemoteError {
    RemoteError::Transport {
        endpoint: endpoint.to_string(),
        message: message.to_string(),
    }
}

pub fn success_reply(text: &str, html: &str) -> ExecuteReply {
    ExecuteReply {
        output_html: html.to_string(),
        output_non_html: text.to_string(),
        message: None,
        error: None,
        status: Some("success".to_string()),
    }
}

pub fn error_reply(message: &str) -> ExecuteReply {
    ExecuteReply {
        message: Some(message.to_string()),
        status: Some("error".to_string()),
        ..Default::default()
    }
}
