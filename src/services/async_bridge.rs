//! Async Bridge: background remote calls feeding the single event loop
//!
//! Remote calls block, so each one runs on its own thread and reports back by
//! sending an [`AsyncMessage`] over a std mpsc channel. The controller drains
//! the channel between events; every message is applied to completion before
//! the next one is looked at.
//!
//! Dispatch goes through the [`RequestSink`] trait. Production code uses
//! [`ThreadedSink`]; tests record requests and feed responses back in
//! whatever order they like.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::model::{ExecuteSnapshot, LintSnapshot};
use crate::services::remote::{ExecuteReply, LintReply, RemoteError, RemoteService};

/// Outgoing request to the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Startup,
    Lint(LintSnapshot),
    Execute(ExecuteSnapshot),
    Stop,
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Startup => "startup",
            Request::Lint(_) => "lint",
            Request::Execute(_) => "execute",
            Request::Stop => "stop",
        }
    }
}

/// Completion of a remote call, delivered back to the event loop
#[derive(Debug)]
pub enum AsyncMessage {
    LintFinished {
        snapshot: LintSnapshot,
        result: Result<LintReply, RemoteError>,
    },
    ExecuteFinished {
        generation: u64,
        result: Result<ExecuteReply, RemoteError>,
    },
    StartupFinished(Result<String, RemoteError>),
}

/// Where the controller sends requests
pub trait RequestSink {
    fn dispatch(&mut self, request: Request);
}

/// Owns the response channel and the remote service handle
pub struct AsyncBridge {
    sender: mpsc::Sender<AsyncMessage>,
    receiver: mpsc::Receiver<AsyncMessage>,
    remote: Arc<dyn RemoteService>,
}

impl AsyncBridge {
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            remote,
        }
    }

    /// A sink that runs requests on background threads
    pub fn sink(&self) -> ThreadedSink {
        ThreadedSink {
            sender: self.sender.clone(),
            remote: Arc::clone(&self.remote),
        }
    }

    pub fn sender(&self) -> mpsc::Sender<AsyncMessage> {
        self.sender.clone()
    }

    /// Non-blocking receive
    pub fn try_recv(&self) -> Option<AsyncMessage> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next message
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AsyncMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

/// Production [`RequestSink`] backed by threads
#[derive(Clone)]
pub struct ThreadedSink {
    sender: mpsc::Sender<AsyncMessage>,
    remote: Arc<dyn RemoteService>,
}

impl RequestSink for ThreadedSink {
    fn dispatch(&mut self, request: Request) {
        tracing::debug!("Dispatching {} request", request.kind());
        let remote = Arc::clone(&self.remote);

        // Stop is sent on shutdown; nothing is left to receive a reply
        if request == Request::Stop {
            if let Err(e) = remote.stop() {
                tracing::warn!("Stop request failed: {}", e);
            }
            return;
        }

        let sender = self.sender.clone();
        thread::spawn(move || {
            let message = match request {
                Request::Startup => {
                    AsyncMessage::StartupFinished(remote.startup().map(|r| r.status_text()))
                }
                Request::Lint(snapshot) => {
                    let result = remote.lint(&snapshot.name, &snapshot.content);
                    AsyncMessage::LintFinished { snapshot, result }
                }
                Request::Execute(snapshot) => AsyncMessage::ExecuteFinished {
                    generation: snapshot.generation,
                    result: remote.execute(&snapshot.name, &snapshot.content),
                },
                Request::Stop => return,
            };
            // Receiver gone means the session is shutting down
            let _ = sender.send(message);
        });
    }
}
