//! Puzzle mode resolution.
//!
//! Maps a stage definition to the strategy used to check its submissions and
//! the number of input slots the host lays out.

use mission_model::{BingoSpec, PuzzleKind, PuzzleMode, StageDefinition};

/// Validation strategy of one stage, borrowed from its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleStrategy<'a> {
    /// Slots are joined in order and compared as one answer
    /// (free-text and coordinate).
    Joined { expected: &'a str, slots: usize },
    /// Each entry is looked up in an unordered set.
    QrSet { members: &'a [String] },
    /// Board hunt followed by a single final phrase slot.
    Bingo { spec: &'a BingoSpec },
}

impl PuzzleStrategy<'_> {
    pub fn slot_count(&self) -> usize {
        match self {
            PuzzleStrategy::Joined { slots, .. } => (*slots).max(1),
            PuzzleStrategy::QrSet { members } => members.len().max(1),
            PuzzleStrategy::Bingo { .. } => 1,
        }
    }
}

/// Resolve the strategy for `stage`.
pub fn resolve(stage: &StageDefinition) -> PuzzleStrategy<'_> {
    match &stage.puzzle {
        PuzzleMode::FreeText { answer, tokens } => PuzzleStrategy::Joined {
            expected: answer,
            slots: if tokens.is_empty() {
                answer.chars().count()
            } else {
                tokens.len()
            },
        },
        PuzzleMode::Coordinate { answer, slots } => PuzzleStrategy::Joined {
            expected: answer,
            slots: *slots,
        },
        PuzzleMode::QrSet { answers } => PuzzleStrategy::QrSet { members: answers },
        PuzzleMode::Bingo(spec) => PuzzleStrategy::Bingo { spec },
    }
}

/// Number of input slots for `stage`. Always at least one.
pub fn slot_count(stage: &StageDefinition) -> usize {
    resolve(stage).slot_count()
}

/// Fresh input buffer for `stage`: `slot_count` empty strings.
pub fn blank_buffer(stage: &StageDefinition) -> Vec<String> {
    vec![String::new(); slot_count(stage)]
}

/// Cards a free-text stage is answered with, empty for plain drawer input.
pub fn card_tokens(stage: &StageDefinition) -> &[String] {
    match &stage.puzzle {
        PuzzleMode::FreeText { tokens, .. } => tokens,
        _ => &[],
    }
}

/// True when the host shows one field per character (drawer and coordinate
/// inputs) rather than a single freeform entry.
pub fn is_per_character(kind: PuzzleKind) -> bool {
    matches!(kind, PuzzleKind::FreeText | PuzzleKind::Coordinate)
}
