//! Validation engine.

use mission_model::{BingoProgress, StageDefinition, SubmitOutcome};
use tracing::{debug, trace};

use crate::bingo;
use crate::normalize::{join_slots, normalize};
use crate::qr;
use crate::resolver::{PuzzleStrategy, resolve};

/// Input handed to [`ValidationEngine::submit`].
#[derive(Debug)]
pub enum Attempt<'b> {
    /// Per-character slots of a free-text or coordinate stage.
    Slots(&'b [String]),
    /// One qr-set entry plus the recorded fills it may update.
    Entry {
        entry: &'b str,
        filled: &'b mut [String],
    },
    /// The bingo final phrase.
    FinalPhrase {
        phrase: &'b str,
        progress: &'b BingoProgress,
    },
}

/// Applies the stage's strategy to submit attempts.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'a> {
    strategy: PuzzleStrategy<'a>,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(strategy: PuzzleStrategy<'a>) -> Self {
        Self { strategy }
    }

    pub fn for_stage(stage: &'a StageDefinition) -> Self {
        Self::new(resolve(stage))
    }

    pub fn strategy(&self) -> PuzzleStrategy<'a> {
        self.strategy
    }

    pub fn slot_count(&self) -> usize {
        self.strategy.slot_count()
    }

    /// Check one attempt. An attempt that does not fit the strategy is
    /// treated as incomplete.
    pub fn submit(&self, attempt: Attempt<'_>) -> SubmitOutcome {
        let outcome = match (self.strategy, attempt) {
            (PuzzleStrategy::Joined { expected, .. }, Attempt::Slots(slots)) => {
                check_joined(expected, slots)
            }
            (PuzzleStrategy::QrSet { members }, Attempt::Entry { entry, filled }) => {
                qr::submit_entry(members, entry, filled)
            }
            (PuzzleStrategy::Bingo { spec }, Attempt::FinalPhrase { phrase, progress }) => {
                bingo::submit_final(spec, progress, phrase)
            }
            (strategy, attempt) => {
                debug!(?strategy, ?attempt, "attempt does not fit strategy");
                SubmitOutcome::Incomplete
            }
        };
        debug!(?outcome, "submit evaluated");
        outcome
    }
}

fn check_joined(expected: &str, slots: &[String]) -> SubmitOutcome {
    let input = normalize(&join_slots(slots));
    if input.is_empty() {
        return SubmitOutcome::Incomplete;
    }
    trace!(input = %input, "joined answer");
    if input == normalize(expected) {
        SubmitOutcome::Correct
    } else {
        SubmitOutcome::Wrong
    }
}
