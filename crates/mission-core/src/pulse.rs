//! Transient cell highlights.
//!
//! A pulse marks a board cell for a short time after a tap. Pulses carry
//! their own expiry; hosts poll [`PulseBoard::active`] with the current time
//! and call [`PulseBoard::sweep`] to drop expired ones. Flashing a kind that
//! is already showing replaces it, so only the latest expiry counts.

use std::time::{Duration, Instant};

/// Default pulse lifetime.
pub const DEFAULT_PULSE_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulseKind {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub cell: usize,
    pub expires_at: Instant,
}

impl Pulse {
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// One pending pulse per kind.
#[derive(Debug, Clone)]
pub struct PulseBoard {
    duration: Duration,
    correct: Option<Pulse>,
    wrong: Option<Pulse>,
}

impl Default for PulseBoard {
    fn default() -> Self {
        Self::new(DEFAULT_PULSE_DURATION)
    }
}

impl PulseBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            correct: None,
            wrong: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn slot(&mut self, kind: PulseKind) -> &mut Option<Pulse> {
        match kind {
            PulseKind::Correct => &mut self.correct,
            PulseKind::Wrong => &mut self.wrong,
        }
    }

    /// Show `kind` on `cell` until `now + duration`, replacing any pending
    /// pulse of the same kind.
    pub fn flash(&mut self, kind: PulseKind, cell: usize, now: Instant) {
        let expires_at = now + self.duration;
        *self.slot(kind) = Some(Pulse { cell, expires_at });
    }

    /// Cell currently showing `kind`, if any.
    pub fn active(&self, kind: PulseKind, now: Instant) -> Option<usize> {
        let pulse = match kind {
            PulseKind::Correct => self.correct,
            PulseKind::Wrong => self.wrong,
        };
        pulse.filter(|pulse| pulse.is_live(now)).map(|pulse| pulse.cell)
    }

    /// Drop expired pulses. Returns how many were dropped.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let mut dropped = 0;
        for kind in [PulseKind::Correct, PulseKind::Wrong] {
            let slot = self.slot(kind);
            if slot.is_some_and(|pulse| !pulse.is_live(now)) {
                *slot = None;
                dropped += 1;
            }
        }
        dropped
    }

    /// Cancel all pending pulses.
    pub fn clear(&mut self) {
        self.correct = None;
        self.wrong = None;
    }

    pub fn is_idle(&self) -> bool {
        self.correct.is_none() && self.wrong.is_none()
    }
}
