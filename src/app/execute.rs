//! Execute channel: one outstanding run at a time.
//!
//! Starting a run bumps the channel generation, which supersedes whatever was
//! outstanding. Only the response for the latest generation is rendered;
//! superseded responses are dropped without being treated as errors.

/// State of the Run button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunIndicator {
    Ready,
    Running,
}

#[derive(Debug, Clone, Default)]
pub struct ExecuteChannel {
    generation: u64,
    outstanding: Option<u64>,
}

impl ExecuteChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run, superseding any outstanding one
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        if let Some(previous) = self.outstanding.replace(self.generation) {
            tracing::debug!(
                "Execute generation {} supersedes {}",
                self.generation,
                previous
            );
        }
        self.generation
    }

    /// True if `generation` is the outstanding run, which is then finished
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.outstanding == Some(generation) {
            self.outstanding = None;
            true
        } else {
            false
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn indicator(&self) -> RunIndicator {
        if self.is_running() {
            RunIndicator::Running
        } else {
            RunIndicator::Ready
        }
    }
}
