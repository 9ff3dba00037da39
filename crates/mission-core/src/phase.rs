use std::fmt;

use mission_model::SubmitOutcome;

/// Message waiting for the player to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Correct,
    Wrong,
    Partial { filled: usize, total: usize },
    AlreadyEntered,
    /// Bingo sequence complete; acknowledging opens the final phrase.
    GateOpen,
}

impl Notice {
    /// Notice raised by a submit, if any.
    pub fn from_outcome(outcome: SubmitOutcome) -> Option<Self> {
        match outcome {
            SubmitOutcome::Incomplete => None,
            SubmitOutcome::Wrong => Some(Notice::Wrong),
            SubmitOutcome::Correct => Some(Notice::Correct),
            SubmitOutcome::CorrectPartial { filled, total } => {
                Some(Notice::Partial { filled, total })
            }
            SubmitOutcome::AlreadyEntered => Some(Notice::AlreadyEntered),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::Correct => "정답입니다",
            Notice::Wrong => "오답입니다",
            Notice::Partial { .. } => "정답입니다",
            Notice::AlreadyEntered => "이미 입력한 좌표입니다",
            Notice::GateOpen => "문장대로 행동하세요.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Partial { filled, total } => {
                write!(f, "{} ({filled}/{total})", self.message())
            }
            _ => f.write_str(self.message()),
        }
    }
}

/// Shown when a route names no stage.
pub const NOT_FOUND_MESSAGE: &str = "존재하지 않는 스테이지입니다.";

/// Where the player is within the active stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Narrative frame `position` of `total`.
    Intro { position: usize, total: usize },
    /// Puzzle is accepting input.
    Editing,
    /// A notice is open; input waits until it is acknowledged.
    Submitting(Notice),
    /// Stage solved.
    Cleared,
    /// Requested stage does not exist.
    NotFound,
}

impl Phase {
    pub fn is_editing(&self) -> bool {
        matches!(self, Phase::Editing)
    }
}
