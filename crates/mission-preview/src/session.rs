//! Scan session: one preview at a time, last scan wins.
//!
//! A scan takes the lock and gets a ticket stamped with the current
//! generation. The preview it resolves is accepted only if no newer scan or
//! cancellation bumped the generation meanwhile. The lock holds until the
//! preview is dismissed.

use tracing::{debug, trace};

use crate::response::PreviewResponse;

/// Proof of a started scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTicket {
    generation: u64,
    target: String,
}

impl ScanTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Idle,
    /// Preview for `target` is being resolved.
    Resolving { target: String },
    /// Preview is on screen.
    Showing {
        target: String,
        preview: PreviewResponse,
    },
}

#[derive(Debug, Default)]
pub struct ScanSession {
    generation: u64,
    state: ScanState,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scans are ignored while one is resolving or shown.
    pub fn is_locked(&self) -> bool {
        !matches!(self.state, ScanState::Idle)
    }

    /// Start a scan of `target`, unless another one holds the lock.
    pub fn begin(&mut self, target: &str) -> Option<ScanTicket> {
        if self.is_locked() {
            trace!(target, "scan ignored while locked");
            return None;
        }
        self.generation += 1;
        self.state = ScanState::Resolving {
            target: target.to_string(),
        };
        debug!(generation = self.generation, target, "scan started");
        Some(ScanTicket {
            generation: self.generation,
            target: target.to_string(),
        })
    }

    /// Deliver the preview for `ticket`. Returns `false` for stale tickets.
    pub fn complete(&mut self, ticket: &ScanTicket, preview: PreviewResponse) -> bool {
        let current = matches!(
            &self.state,
            ScanState::Resolving { target } if *target == ticket.target
        );
        if ticket.generation != self.generation || !current {
            debug!(
                ticket = ticket.generation,
                generation = self.generation,
                "stale preview discarded"
            );
            return false;
        }
        self.state = ScanState::Showing {
            target: ticket.target.clone(),
            preview,
        };
        true
    }

    /// Close the shown preview and release the lock.
    pub fn dismiss(&mut self) {
        self.state = ScanState::Idle;
    }

    /// Abandon any in-flight scan; its preview will be discarded.
    pub fn cancel(&mut self) {
        if matches!(self.state, ScanState::Resolving { .. }) {
            self.generation += 1;
        }
        self.state = ScanState::Idle;
    }
}
