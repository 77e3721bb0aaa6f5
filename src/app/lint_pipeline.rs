//! Per-document lint scheduling and staleness tracking
//!
//! Each lint-eligible document has a [`LintTracker`] holding a generation
//! counter, an optional debounce deadline and the generation of the most
//! recently dispatched request. Every edit and every dispatch advance the
//! counter. A response is current only when its generation equals the latest
//! dispatched one, whatever order responses arrive in.
//!
//! Network requests are never cancelled. A newer dispatch makes older
//! responses stale, and they are discarded when they arrive.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::DocumentId;

/// Lint lifecycle of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintState {
    /// No timer running and no request outstanding
    Clean,
    /// Edited; debounce timer running
    EditPending,
    /// Latest dispatched request has not answered yet
    LintInFlight,
}

/// Outcome of matching a response against its tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Current,
    Stale,
    /// The document was closed or stopped being lint-eligible
    UnknownDocument,
}

#[derive(Debug, Clone, Default)]
struct LintTracker {
    generation: u64,
    latest_dispatched: Option<u64>,
    debounce_deadline: Option<Instant>,
    in_flight: bool,
}

impl LintTracker {
    fn note_edit(&mut self, deadline: Instant) {
        self.generation += 1;
        // A newer edit restarts the timer
        self.debounce_deadline = Some(deadline);
    }

    fn is_due(&self, now: Instant) -> bool {
        self.debounce_deadline.is_some_and(|deadline| deadline <= now)
    }

    fn begin_dispatch(&mut self) -> u64 {
        self.generation += 1;
        self.latest_dispatched = Some(self.generation);
        self.debounce_deadline = None;
        self.in_flight = true;
        self.generation
    }

    fn complete(&mut self, generation: u64) -> bool {
        if self.latest_dispatched == Some(generation) {
            self.in_flight = false;
            true
        } else {
            false
        }
    }

    fn state(&self) -> LintState {
        if self.debounce_deadline.is_some() {
            LintState::EditPending
        } else if self.in_flight {
            LintState::LintInFlight
        } else {
            LintState::Clean
        }
    }
}

/// Debounce timers and generation counters for all documents
#[derive(Debug, Clone)]
pub struct LintPipeline {
    trackers: HashMap<DocumentId, LintTracker>,
    debounce: Duration,
}

impl LintPipeline {
    pub fn new(debounce: Duration) -> Self {
        Self {
            trackers: HashMap::new(),
            debounce,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record a content mutation and (re)start the debounce timer
    pub fn note_edit(&mut self, document: DocumentId, now: Instant) {
        let deadline = now + self.debounce;
        self.trackers.entry(document).or_default().note_edit(deadline);
    }

    /// Documents whose debounce timer has expired, in id order
    pub fn due(&self, now: Instant) -> Vec<DocumentId> {
        let mut due: Vec<DocumentId> = self
            .trackers
            .iter()
            .filter(|(_, tracker)| tracker.is_due(now))
            .map(|(id, _)| *id)
            .collect();
        due.sort();
        due
    }

    /// Start a dispatch and return the snapshot generation
    pub fn begin_dispatch(&mut self, document: DocumentId) -> u64 {
        let generation = self.trackers.entry(document).or_default().begin_dispatch();
        tracing::debug!("Lint {} dispatched at generation {}", document, generation);
        generation
    }

    /// Stop the debounce timer without dispatching
    pub fn cancel_timer(&mut self, document: DocumentId) {
        if let Some(tracker) = self.trackers.get_mut(&document) {
            tracker.debounce_deadline = None;
        }
    }

    /// Match a response generation against the latest dispatch
    pub fn complete(&mut self, document: DocumentId, generation: u64) -> Verdict {
        match self.trackers.get_mut(&document) {
            None => Verdict::UnknownDocument,
            Some(tracker) => {
                if tracker.complete(generation) {
                    Verdict::Current
                } else {
                    tracing::debug!(
                        "Lint response for {} at generation {} is stale (latest dispatched {:?})",
                        document,
                        generation,
                        tracker.latest_dispatched
                    );
                    Verdict::Stale
                }
            }
        }
    }

    pub fn forget(&mut self, document: DocumentId) {
        self.trackers.remove(&document);
    }

    pub fn clear(&mut self) {
        self.trackers.clear();
    }

    pub fn state(&self, document: DocumentId) -> LintState {
        self.trackers
            .get(&document)
            .map(LintTracker::state)
            .unwrap_or(LintState::Clean)
    }

    pub fn generation(&self, document: DocumentId) -> u64 {
        self.trackers
            .get(&document)
            .map(|t| t.generation)
            .unwrap_or(0)
    }

    pub fn latest_dispatched(&self, document: DocumentId) -> Option<u64> {
        self.trackers.get(&document).and_then(|t| t.latest_dispatched)
    }

    /// Earliest running debounce deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.trackers
            .values()
            .filter_map(|t| t.debounce_deadline)
            .min()
    }

    pub fn is_idle(&self) -> bool {
        self.trackers
            .values()
            .all(|t| t.state() == LintState::Clean)
    }
}
