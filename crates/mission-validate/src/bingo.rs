//! Bingo word hunt.
//!
//! The player discovers the sequence one label at a time by tapping board
//! cells. At the branch's choice index either alternative is accepted and the
//! pick is remembered; at the complement index only the other alternative is.
//! Once the whole sequence is revealed a confirm gate opens, and confirming it
//! switches the stage to the final phrase.

use mission_model::{BingoGate, BingoProgress, BingoSpec, SubmitOutcome, TapOutcome};
use tracing::{debug, trace};

use crate::normalize::answers_match;

/// Label(s) accepted at the next sequence position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected<'a> {
    Either(&'a [String; 2]),
    Exactly(&'a str),
}

impl Expected<'_> {
    pub fn accepts(&self, label: &str) -> bool {
        match self {
            Expected::Either(alternatives) => alternatives.iter().any(|alt| alt == label),
            Expected::Exactly(expected) => *expected == label,
        }
    }
}

/// What the next tap must hit, or `None` once the sequence is complete.
pub fn expected_at<'a>(spec: &'a BingoSpec, progress: &BingoProgress) -> Option<Expected<'a>> {
    let index = progress.revealed();
    let label = spec.sequence.get(index)?;
    let branch = &spec.branch;
    if index == branch.choice_index {
        return Some(Expected::Either(&branch.alternatives));
    }
    if index == branch.complement_index {
        // Without a recorded choice the sequence's own label stands.
        let complement = progress
            .branch()
            .and_then(|choice| branch.complement_of(choice))
            .unwrap_or(label.as_str());
        return Some(Expected::Exactly(complement));
    }
    Some(Expected::Exactly(label.as_str()))
}

/// Tap the board cell at `cell` (row-major).
pub fn tap(spec: &BingoSpec, progress: &mut BingoProgress, cell: usize) -> TapOutcome {
    if progress.gate() != BingoGate::Sequence {
        return TapOutcome::Ignored;
    }
    let Some(label) = spec.cell(cell) else {
        return TapOutcome::Ignored;
    };
    let Some(expected) = expected_at(spec, progress) else {
        return TapOutcome::Ignored;
    };
    trace!(cell, label, "bingo tap");

    if !expected.accepts(label) {
        debug!(cell, revealed = progress.revealed(), "bingo miss");
        return TapOutcome::Miss { cell };
    }
    let choice = (progress.revealed() == spec.branch.choice_index).then(|| label.to_string());
    progress.reveal(spec.sequence.len(), choice);
    debug!(cell, revealed = progress.revealed(), gate = ?progress.gate(), "bingo hit");
    TapOutcome::Hit {
        cell,
        revealed: progress.revealed(),
    }
}

/// Roll back to `index`. Returns false when nothing changed.
pub fn rewind(spec: &BingoSpec, progress: &mut BingoProgress, index: usize) -> bool {
    let rewound = progress.rewind_to(index, spec.branch.choice_index);
    if rewound {
        debug!(index, branch = ?progress.branch(), "bingo rewound");
    }
    rewound
}

/// Confirm the gate that opens once the sequence is complete.
pub fn confirm_gate(progress: &mut BingoProgress) -> bool {
    progress.unlock_final()
}

/// Check the final phrase. Only meaningful once the gate was confirmed.
pub fn submit_final(spec: &BingoSpec, progress: &BingoProgress, phrase: &str) -> SubmitOutcome {
    if progress.gate() != BingoGate::FinalPhrase || phrase.trim().is_empty() {
        return SubmitOutcome::Incomplete;
    }
    if answers_match(phrase, &spec.final_answer) {
        SubmitOutcome::Correct
    } else {
        SubmitOutcome::Wrong
    }
}

/// Labels revealed so far, as the player discovered them.
pub fn revealed_labels<'a>(spec: &'a BingoSpec, progress: &BingoProgress) -> Vec<&'a str> {
    let branch = &spec.branch;
    let choice = progress
        .branch()
        .and_then(|choice| branch.alternatives.iter().find(|alt| *alt == choice));
    spec.sequence
        .iter()
        .take(progress.revealed())
        .enumerate()
        .map(|(index, label)| match choice {
            Some(choice) if index == branch.choice_index => choice.as_str(),
            Some(choice) if index == branch.complement_index => {
                branch.complement_of(choice).unwrap_or(label.as_str())
            }
            _ => label.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_model::BranchRule;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn spec() -> BingoSpec {
        BingoSpec {
            board: vec![
                labels(&["두쫀쿠", "안 쓴", "가방", "안경"]),
                labels(&["사람", "빵", "바지", "포크"]),
                labels(&["암송하기", "쓴", "나가서", "목사님"]),
                labels(&["안경", "의자", "사람과", "책"]),
                labels(&["옷", "한명씩", "거울", "쿠키"]),
            ],
            sequence: labels(&[
                "안경", "안 쓴", "사람과", "안경", "쓴", "사람", "한명씩", "나가서", "암송하기",
            ]),
            branch: BranchRule {
                choice_index: 1,
                complement_index: 4,
                alternatives: ["안 쓴".to_string(), "쓴".to_string()],
            },
            final_question: "구절?".to_string(),
            final_answer: "하나님의 사랑".to_string(),
        }
    }

    fn tap_label(spec: &BingoSpec, progress: &mut BingoProgress, label: &str) -> TapOutcome {
        let cell = spec.find_cell(label).expect("label on board");
        tap(spec, progress, cell)
    }

    #[test]
    fn either_alternative_at_choice_index() {
        let spec = spec();
        let mut progress = BingoProgress::new();
        tap_label(&spec, &mut progress, "안경");
        let outcome = tap_label(&spec, &mut progress, "쓴");
        assert!(matches!(outcome, TapOutcome::Hit { revealed: 2, .. }));
        assert_eq!(progress.branch(), Some("쓴"));
    }

    #[test]
    fn duplicate_labels_on_board_both_hit() {
        let spec = spec();
        let mut progress = BingoProgress::new();
        // second "안경" cell sits at row 3
        assert!(matches!(
            tap(&spec, &mut progress, 12),
            TapOutcome::Hit { revealed: 1, .. }
        ));
    }

    #[test]
    fn complement_without_choice_uses_sequence_label() {
        let spec = spec();
        let mut progress = BingoProgress::new();
        for _ in 0..4 {
            progress.reveal(spec.sequence.len(), None);
        }
        assert_eq!(progress.branch(), None);
        assert_eq!(expected_at(&spec, &progress), Some(Expected::Exactly("쓴")));
    }

    #[test]
    fn miss_keeps_progress() {
        let spec = spec();
        let mut progress = BingoProgress::new();
        assert_eq!(tap_label(&spec, &mut progress, "빵"), TapOutcome::Miss { cell: 5 });
        assert_eq!(progress.revealed(), 0);
        assert_eq!(tap(&spec, &mut progress, 99), TapOutcome::Ignored);
    }

    #[test]
    fn revealed_labels_follow_choice() {
        let spec = spec();
        let mut progress = BingoProgress::new();
        for label in ["안경", "쓴", "사람과", "안경", "안 쓴"] {
            tap_label(&spec, &mut progress, label);
        }
        assert_eq!(
            revealed_labels(&spec, &progress),
            vec!["안경", "쓴", "사람과", "안경", "안 쓴"]
        );
    }

    #[test]
    fn final_phrase_needs_gate() {
        let spec = spec();
        let mut progress = BingoProgress::new();
        assert_eq!(
            submit_final(&spec, &progress, "하나님의 사랑"),
            SubmitOutcome::Incomplete
        );
        for label in spec.sequence.clone() {
            tap_label(&spec, &mut progress, &label);
        }
        assert_eq!(progress.gate(), BingoGate::Confirm);
        assert_eq!(tap_label(&spec, &mut progress, "안경"), TapOutcome::Ignored);
        assert!(confirm_gate(&mut progress));
        assert_eq!(
            submit_final(&spec, &progress, " 하나님의 사랑 "),
            SubmitOutcome::Correct
        );
        assert_eq!(
            submit_final(&spec, &progress, "하나님의  사랑"),
            SubmitOutcome::Wrong
        );
    }
}
