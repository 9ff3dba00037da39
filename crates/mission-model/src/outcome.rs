use serde::{Deserialize, Serialize};

/// Outcome of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum SubmitOutcome {
    /// Nothing to validate; no state changes.
    Incomplete,
    Wrong,
    /// Stage cleared.
    Correct,
    /// A qr-set member was recorded but others remain.
    CorrectPartial { filled: usize, total: usize },
    /// The qr-set member was recorded before.
    AlreadyEntered,
}

impl SubmitOutcome {
    pub fn is_cleared(&self) -> bool {
        matches!(self, SubmitOutcome::Correct)
    }

    pub fn is_wrong(&self) -> bool {
        matches!(self, SubmitOutcome::Wrong)
    }
}

/// Outcome of tapping a bingo board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum TapOutcome {
    /// The cell matched the next step.
    Hit { cell: usize, revealed: usize },
    /// The cell did not match; progress is unchanged.
    Miss { cell: usize },
    /// Tap not accepted (sequence complete, gate open, unknown cell).
    Ignored,
}
