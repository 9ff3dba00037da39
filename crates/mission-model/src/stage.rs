use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::{StageId, StageNumber};

/// Slot counts the coordinate input can be laid out with.
pub const COORDINATE_SLOT_COUNTS: &[usize] = &[4, 6, 8];

/// One narrative panel shown before the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroFrame {
    pub image: String,
    #[serde(default)]
    pub narration: Option<String>,
}

/// Puzzle configuration of a stage. Each variant carries exactly the answer
/// data its validation strategy needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum PuzzleMode {
    /// Drawer input, one slot per character of the answer. With `tokens`
    /// the slots hold whole cards instead, placed in answer order.
    FreeText {
        answer: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tokens: Vec<String>,
    },
    /// Fixed-width coordinate input.
    Coordinate { answer: String, slots: usize },
    /// Unordered set of scanned/typed tuples such as `"3,9,8"`.
    QrSet { answers: Vec<String> },
    /// Word hunt on a board followed by a final phrase.
    Bingo(BingoSpec),
}

impl PuzzleMode {
    pub fn kind(&self) -> PuzzleKind {
        match self {
            PuzzleMode::FreeText { .. } => PuzzleKind::FreeText,
            PuzzleMode::Coordinate { .. } => PuzzleKind::Coordinate,
            PuzzleMode::QrSet { .. } => PuzzleKind::QrSet,
            PuzzleMode::Bingo(_) => PuzzleKind::Bingo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleKind {
    FreeText,
    Coordinate,
    QrSet,
    Bingo,
}

impl PuzzleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleKind::FreeText => "free-text",
            PuzzleKind::Coordinate => "coordinate",
            PuzzleKind::QrSet => "qr-set",
            PuzzleKind::Bingo => "bingo",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_choice_index() -> usize {
    1
}

fn default_complement_index() -> usize {
    4
}

/// Binary branch of a bingo sequence.
///
/// At `choice_index` either alternative is accepted; at `complement_index`
/// only the alternative that was not chosen is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRule {
    #[serde(default = "default_choice_index")]
    pub choice_index: usize,
    #[serde(default = "default_complement_index")]
    pub complement_index: usize,
    pub alternatives: [String; 2],
}

impl BranchRule {
    pub fn is_alternative(&self, label: &str) -> bool {
        self.alternatives.iter().any(|alt| alt == label)
    }

    /// The other alternative, or `None` if `choice` is not one of them.
    pub fn complement_of(&self, choice: &str) -> Option<&str> {
        let [first, second] = &self.alternatives;
        if choice == first {
            Some(second.as_str())
        } else if choice == second {
            Some(first.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BingoSpec {
    /// Board rows as displayed; cells are addressed row-major.
    pub board: Vec<Vec<String>>,
    /// Labels to discover, in order.
    pub sequence: Vec<String>,
    pub branch: BranchRule,
    pub final_question: String,
    pub final_answer: String,
}

impl BingoSpec {
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.board.iter().flatten().map(String::as_str)
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells().nth(index)
    }

    pub fn cell_count(&self) -> usize {
        self.board.iter().map(Vec::len).sum()
    }

    /// Row-major index of the first cell holding `label`.
    pub fn find_cell(&self, label: &str) -> Option<usize> {
        self.cells().position(|cell| cell == label)
    }

    fn check(&self, stage: StageNumber) -> Result<()> {
        if self.cell_count() == 0 {
            return Err(ModelError::EmptyBoard { stage });
        }
        if self.final_answer.trim().is_empty() || self.sequence.is_empty() {
            return Err(ModelError::EmptyAnswer { stage });
        }
        let branch = &self.branch;
        let invalid = |reason: &str| ModelError::InvalidBranch {
            stage,
            reason: reason.to_string(),
        };
        if branch.choice_index >= branch.complement_index {
            return Err(invalid("choice index must come before complement index"));
        }
        if branch.complement_index >= self.sequence.len() {
            return Err(invalid("complement index is past the end of the sequence"));
        }
        if branch.alternatives[0] == branch.alternatives[1] {
            return Err(invalid("alternatives must differ"));
        }
        for label in self.sequence.iter().chain(branch.alternatives.iter()) {
            if self.find_cell(label).is_none() {
                return Err(ModelError::UnreachableLabel {
                    stage,
                    label: label.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Immutable configuration of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub number: StageNumber,
    pub title: String,
    #[serde(default)]
    pub puzzle_title: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub intro: Vec<IntroFrame>,
    pub puzzle: PuzzleMode,
}

impl StageDefinition {
    pub fn id(&self) -> StageId {
        self.number.stage_id()
    }

    pub fn intro_segment_count(&self) -> usize {
        self.intro.len()
    }

    pub fn kind(&self) -> PuzzleKind {
        self.puzzle.kind()
    }

    /// Check the structural invariants of the stage.
    pub fn check(&self) -> Result<()> {
        let stage = self.number;
        match &self.puzzle {
            PuzzleMode::FreeText { answer, tokens } => {
                if answer.trim().is_empty() {
                    return Err(ModelError::EmptyAnswer { stage });
                }
                if !tokens.is_empty()
                    && (tokens.iter().any(|token| token.trim().is_empty())
                        || tokens.concat() != *answer)
                {
                    return Err(ModelError::TokensMismatch { stage });
                }
            }
            PuzzleMode::Coordinate { answer, slots } => {
                if answer.trim().is_empty() {
                    return Err(ModelError::EmptyAnswer { stage });
                }
                if !COORDINATE_SLOT_COUNTS.contains(slots) {
                    return Err(ModelError::InvalidSlotCount {
                        stage,
                        slots: *slots,
                    });
                }
                let answer_len = answer.trim().chars().count();
                if answer_len > *slots {
                    return Err(ModelError::AnswerLongerThanSlots {
                        stage,
                        answer_len,
                        slots: *slots,
                    });
                }
            }
            PuzzleMode::QrSet { answers } => {
                if answers.is_empty() {
                    return Err(ModelError::EmptyAnswerSet { stage });
                }
                if answers.iter().any(|answer| answer.trim().is_empty()) {
                    return Err(ModelError::EmptyAnswer { stage });
                }
            }
            PuzzleMode::Bingo(spec) => spec.check(stage)?,
        }
        Ok(())
    }
}
