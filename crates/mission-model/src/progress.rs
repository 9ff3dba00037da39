use serde::{Deserialize, Serialize};

/// Result of the last validation of the active stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Idle,
    Wrong,
    Cleared,
}

/// Where a bingo round currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BingoGate {
    /// Board is live, labels are being discovered.
    #[default]
    Sequence,
    /// Sequence complete, waiting for the player to confirm the gate.
    Confirm,
    /// Board is hidden and the final phrase slot is active.
    FinalPhrase,
}

/// Progress through a bingo sequence.
///
/// Fields are private so the revealed count, the branch choice and the gate
/// always move together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BingoProgress {
    revealed: usize,
    branch: Option<String>,
    gate: BingoGate,
}

impl BingoProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sequence steps discovered so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Alternative picked at the branch point, if it has been reached.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn gate(&self) -> BingoGate {
        self.gate
    }

    pub fn is_complete(&self, sequence_len: usize) -> bool {
        self.revealed >= sequence_len
    }

    /// Record one discovered step. `choice` is the alternative picked when the
    /// step is the branch point.
    pub fn reveal(&mut self, sequence_len: usize, choice: Option<String>) {
        if self.gate != BingoGate::Sequence || self.is_complete(sequence_len) {
            return;
        }
        self.revealed += 1;
        if let Some(choice) = choice {
            self.branch = Some(choice);
        }
        if self.is_complete(sequence_len) {
            self.gate = BingoGate::Confirm;
        }
    }

    /// Roll progress back to `index`, discarding every step after it. The
    /// branch choice is dropped when rewinding to or before `choice_index`.
    ///
    /// Returns false when there is nothing to rewind or the final phrase is
    /// already unlocked.
    pub fn rewind_to(&mut self, index: usize, choice_index: usize) -> bool {
        if self.gate == BingoGate::FinalPhrase || index >= self.revealed {
            return false;
        }
        self.revealed = index;
        if index <= choice_index {
            self.branch = None;
        }
        self.gate = BingoGate::Sequence;
        true
    }

    /// Confirm the gate and switch to the final phrase.
    pub fn unlock_final(&mut self) -> bool {
        if self.gate != BingoGate::Confirm {
            return false;
        }
        self.gate = BingoGate::FinalPhrase;
        true
    }
}
