//! Submit properties across the four puzzle modes.

use mission_model::{
    BingoProgress, BingoSpec, BranchRule, PuzzleMode, StageDefinition, StageNumber,
    SubmitOutcome, TapOutcome,
};
use mission_validate::{Attempt, ValidationEngine, blank_buffer, bingo, slot_count};
use proptest::prelude::*;

fn stage(puzzle: PuzzleMode) -> StageDefinition {
    StageDefinition {
        number: StageNumber::FIRST,
        title: "Stage".to_string(),
        puzzle_title: String::new(),
        question: String::new(),
        intro: vec![],
        puzzle,
    }
}

fn coordinate() -> StageDefinition {
    stage(PuzzleMode::Coordinate {
        answer: "요한일서49".to_string(),
        slots: 6,
    })
}

fn chars(value: &str) -> Vec<String> {
    value.chars().map(String::from).collect()
}

fn bingo_spec() -> BingoSpec {
    let row = |values: &[&str]| values.iter().map(|v| (*v).to_string()).collect::<Vec<_>>();
    BingoSpec {
        board: vec![
            row(&["두쫀쿠", "안 쓴", "가방", "안경"]),
            row(&["사람", "빵", "바지", "포크"]),
            row(&["암송하기", "쓴", "나가서", "목사님"]),
            row(&["안경", "의자", "사람과", "책"]),
            row(&["옷", "한명씩", "거울", "쿠키"]),
        ],
        sequence: row(&[
            "안경", "안 쓴", "사람과", "안경", "쓴", "사람", "한명씩", "나가서", "암송하기",
        ]),
        branch: BranchRule {
            choice_index: 1,
            complement_index: 4,
            alternatives: ["안 쓴".to_string(), "쓴".to_string()],
        },
        final_question: "구절".to_string(),
        final_answer: "말씀".to_string(),
    }
}

fn tap_label(spec: &BingoSpec, progress: &mut BingoProgress, label: &str) -> TapOutcome {
    let cell = spec.find_cell(label).expect("label on board");
    bingo::tap(spec, progress, cell)
}

#[test]
fn coordinate_exact_input_is_correct() {
    let stage = coordinate();
    let engine = ValidationEngine::for_stage(&stage);
    assert_eq!(slot_count(&stage), 6);
    assert_eq!(
        engine.submit(Attempt::Slots(&chars("요한일서49"))),
        SubmitOutcome::Correct
    );
    assert_eq!(
        engine.submit(Attempt::Slots(&chars("요한일서48"))),
        SubmitOutcome::Wrong
    );
}

#[test]
fn qr_set_sequence() {
    let stage = stage(PuzzleMode::QrSet {
        answers: vec!["3,9,8".to_string(), "1,12,27".to_string()],
    });
    let engine = ValidationEngine::for_stage(&stage);
    let mut filled = blank_buffer(&stage);

    let submit = |entry: &str, filled: &mut Vec<String>| {
        engine.submit(Attempt::Entry {
            entry,
            filled: filled.as_mut_slice(),
        })
    };
    assert_eq!(
        submit("3,9,8", &mut filled),
        SubmitOutcome::CorrectPartial {
            filled: 1,
            total: 2
        }
    );
    assert_eq!(submit("3,9,8", &mut filled), SubmitOutcome::AlreadyEntered);
    assert_eq!(submit("9,9,9", &mut filled), SubmitOutcome::Wrong);
    assert_eq!(mission_validate::filled_count(&filled), 1);
    assert_eq!(submit("1,12,27", &mut filled), SubmitOutcome::Correct);
}

#[test]
fn bingo_branch_forces_complement() {
    let spec = bingo_spec();
    for (choice, complement) in [("안 쓴", "쓴"), ("쓴", "안 쓴")] {
        let mut progress = BingoProgress::new();
        for label in ["안경", choice, "사람과", "안경"] {
            assert!(matches!(
                tap_label(&spec, &mut progress, label),
                TapOutcome::Hit { .. }
            ));
        }
        // the label picked at the choice index is rejected at the complement index
        assert!(matches!(
            tap_label(&spec, &mut progress, choice),
            TapOutcome::Miss { .. }
        ));
        assert_eq!(progress.revealed(), 4);
        assert!(matches!(
            tap_label(&spec, &mut progress, complement),
            TapOutcome::Hit { revealed: 5, .. }
        ));
    }
}

#[test]
fn bingo_rewind_to_choice_clears_branch() {
    let spec = bingo_spec();
    let mut progress = BingoProgress::new();
    for label in ["안경", "쓴", "사람과"] {
        tap_label(&spec, &mut progress, label);
    }
    assert!(bingo::rewind(&spec, &mut progress, 1));
    assert_eq!(progress.revealed(), 1);
    assert_eq!(progress.branch(), None);

    // choosing again may pick the other alternative
    assert!(matches!(
        tap_label(&spec, &mut progress, "안 쓴"),
        TapOutcome::Hit { revealed: 2, .. }
    ));
    assert_eq!(progress.branch(), Some("안 쓴"));
}

proptest! {
    #[test]
    fn blank_buffers_are_incomplete(blanks in prop::collection::vec("[ \\t]{0,3}", 6)) {
        let stage = coordinate();
        let engine = ValidationEngine::for_stage(&stage);
        prop_assert_eq!(engine.submit(Attempt::Slots(&blanks)), SubmitOutcome::Incomplete);
    }

    #[test]
    fn free_text_correct_iff_normalized_equal(input in "[사랑람 A-Za-z]{0,4}") {
        let stage = stage(PuzzleMode::FreeText {
            answer: "사랑".to_string(),
            tokens: vec![],
        });
        let engine = ValidationEngine::for_stage(&stage);
        let slots = chars(&input);
        let normalized = input.trim().to_lowercase();
        let outcome = engine.submit(Attempt::Slots(&slots));
        if normalized.is_empty() {
            prop_assert_eq!(outcome, SubmitOutcome::Incomplete);
        } else {
            prop_assert_eq!(outcome == SubmitOutcome::Correct, normalized == "사랑");
        }
    }
}
