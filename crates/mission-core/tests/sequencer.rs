//! Sequencer behavior across stages and modes.

use std::time::{Duration, Instant};

use mission_core::{
    FileStore, IntroStore, MemoryStore, NavigationPolicy, Notice, Phase, PulseKind, Sequencer,
    intro_key,
};
use mission_model::{StageId, StageNumber, SubmitOutcome, TapOutcome, ValidationStatus};
use mission_standards::{StageCatalog, load_default_catalog, parse_catalog};
use proptest::prelude::*;

const CATALOG: &str = r#"
[[stage]]
number = 1
title = "One"
question = "암호는?"

[[stage.intro]]
image = "intro-1.webp"
narration = "안녕?"

[[stage.intro]]
image = "intro-2.webp"

[[stage.intro]]
image = "intro-3.webp"

[stage.puzzle]
mode = "free-text"
answer = "사랑"

[[stage]]
number = 2
title = "Two"

[stage.puzzle]
mode = "qr-set"
answers = ["3,9,8", "1,12,27"]

[[stage]]
number = 3
title = "Three"

[stage.puzzle]
mode = "coordinate"
answer = "요한일서49"
slots = 6
"#;

fn catalog() -> StageCatalog {
    parse_catalog(CATALOG).expect("test catalog")
}

fn stage(n: u32) -> StageNumber {
    StageNumber::new(n).expect("stage number")
}

fn sequencer() -> Sequencer<MemoryStore> {
    Sequencer::new(catalog(), MemoryStore::new())
}

fn skip_intro<S: IntroStore>(sequencer: &mut Sequencer<S>) {
    while sequencer.advance_intro() {}
}

fn buffer<S: IntroStore>(sequencer: &Sequencer<S>) -> Vec<String> {
    sequencer.progress().expect("active stage").buffer().to_vec()
}

fn clear_current<S: IntroStore>(sequencer: &mut Sequencer<S>, answer: &str) {
    skip_intro(sequencer);
    assert!(sequencer.type_answer(answer));
    assert_eq!(sequencer.submit(), SubmitOutcome::Correct);
}

#[test]
fn intro_moves_and_persists() {
    let mut seq = sequencer();
    assert_eq!(seq.phase(), Phase::Intro { position: 0, total: 3 });
    assert!(!seq.retreat_intro());

    assert!(seq.advance_intro());
    assert!(seq.advance_intro());
    assert!(seq.retreat_intro());
    assert_eq!(seq.phase(), Phase::Intro { position: 1, total: 3 });

    skip_intro(&mut seq);
    assert_eq!(seq.phase(), Phase::Editing);
    // no-op at the end, and no way back into the intro from the puzzle
    assert!(!seq.advance_intro());
    assert!(!seq.retreat_intro());
    assert_eq!(
        seq.store().get(&intro_key(stage(1))).unwrap(),
        Some("3".to_string())
    );
}

#[test]
fn free_text_wrong_then_correct() {
    let mut seq = sequencer();
    skip_intro(&mut seq);
    assert_eq!(seq.prompt(), Some("암호는?"));

    seq.type_answer("사람");
    assert_eq!(seq.submit(), SubmitOutcome::Wrong);
    assert_eq!(buffer(&seq), vec![String::new(); 2]);
    assert_eq!(seq.phase(), Phase::Submitting(Notice::Wrong));
    assert_eq!(
        seq.progress().map(|p| p.status()),
        Some(ValidationStatus::Wrong)
    );
    // input is locked until the notice is acknowledged
    assert!(!seq.type_answer("사랑"));
    assert_eq!(seq.acknowledge(), Some(Notice::Wrong));
    assert_eq!(seq.phase(), Phase::Editing);
    assert_eq!(
        seq.progress().map(|p| p.status()),
        Some(ValidationStatus::Idle)
    );

    assert!(seq.set_slot(0, "사"));
    assert!(seq.set_slot(1, "랑 "));
    assert_eq!(seq.submit(), SubmitOutcome::Correct);
    assert_eq!(seq.phase(), Phase::Submitting(Notice::Correct));

    assert_eq!(seq.acknowledge(), Some(Notice::Correct));
    let progress = seq.progress().expect("stage 2");
    assert_eq!(progress.stage_number(), stage(2));
    assert_eq!(progress.buffer().len(), 2);
    assert_eq!(progress.status(), ValidationStatus::Idle);
}

#[test]
fn blank_submit_changes_nothing() {
    let mut seq = sequencer();
    skip_intro(&mut seq);
    seq.set_slot(0, "  ");
    assert_eq!(seq.submit(), SubmitOutcome::Incomplete);
    assert_eq!(seq.phase(), Phase::Editing);
    assert_eq!(
        seq.progress().map(|p| p.status()),
        Some(ValidationStatus::Idle)
    );
}

#[test]
fn stage_bounds() {
    let mut seq = sequencer();
    assert!(!seq.advance());
    assert!(!seq.retreat());

    clear_current(&mut seq, "사랑");
    assert!(seq.can_advance());
    assert!(seq.advance());
    assert!(seq.retreat());
    assert_eq!(seq.progress().map(|p| p.stage_number()), Some(stage(1)));

    assert!(seq.open(stage(3)));
    clear_current(&mut seq, "요한일서49");
    assert_eq!(seq.acknowledge(), Some(Notice::Correct));
    // last stage: acknowledging leaves the player on the cleared stage
    assert_eq!(seq.phase(), Phase::Cleared);
    assert!(!seq.advance());
}

#[test]
fn returning_to_a_stage_resumes_its_intro() {
    let mut seq = sequencer();
    clear_current(&mut seq, "사랑");
    assert_eq!(seq.acknowledge(), Some(Notice::Correct));
    assert_eq!(seq.progress().map(|p| p.stage_number()), Some(stage(2)));

    assert!(seq.retreat());
    let progress = seq.progress().expect("stage 1");
    assert_eq!(progress.stage_number(), stage(1));
    assert_eq!(progress.intro_position(), 3);
    assert_eq!(progress.status(), ValidationStatus::Idle);
    assert_eq!(buffer(&seq), vec![String::new(); 2]);
    assert_eq!(seq.phase(), Phase::Editing);

    // a half-read intro resumes mid-way
    let mut fresh = sequencer();
    assert!(fresh.advance_intro());
    assert!(fresh.open(stage(3)));
    assert!(fresh.open(stage(1)));
    assert_eq!(fresh.phase(), Phase::Intro { position: 1, total: 3 });
}

#[test]
fn card_stage_takes_one_word_per_slot() {
    let catalog = load_default_catalog().expect("embedded catalog");
    let mut seq = Sequencer::new(catalog, MemoryStore::new());
    assert!(seq.open(stage(6)));
    assert_eq!(seq.phase(), Phase::Editing);

    assert!(seq.type_answer("십자가 떡 물고기 사람"));
    assert_eq!(seq.submit(), SubmitOutcome::Wrong);
    assert_eq!(buffer(&seq), vec![String::new(); 4]);
    seq.acknowledge();

    assert!(seq.type_answer("떡, 십자가, 물고기, 사람"));
    assert_eq!(buffer(&seq), ["떡", "십자가", "물고기", "사람"]);
    assert_eq!(seq.submit(), SubmitOutcome::Correct);
    assert_eq!(seq.acknowledge(), Some(Notice::Correct));
    assert_eq!(seq.progress().map(|p| p.stage_number()), Some(stage(7)));
}

#[test]
fn retreat_can_be_disabled() {
    let policy = NavigationPolicy {
        allow_retreat: false,
    };
    let mut seq = Sequencer::with_policy(catalog(), MemoryStore::new(), policy);
    assert!(seq.open(stage(2)));
    assert!(!seq.can_retreat());
    assert!(!seq.retreat());
}

#[test]
fn qr_set_flow() {
    let mut seq = sequencer();
    seq.open(stage(2));
    assert!(!seq.set_slot(0, "3,9,8"));

    seq.type_answer("3,9,8");
    assert_eq!(
        seq.submit(),
        SubmitOutcome::CorrectPartial {
            filled: 1,
            total: 2
        }
    );
    seq.acknowledge();
    assert_eq!(seq.progress().map(|p| p.qr_entry()), Some(""));

    seq.type_answer("3,9,8");
    assert_eq!(seq.submit(), SubmitOutcome::AlreadyEntered);
    assert_eq!(seq.acknowledge(), Some(Notice::AlreadyEntered));

    seq.type_answer("9,9,9");
    assert_eq!(seq.submit(), SubmitOutcome::Wrong);
    seq.acknowledge();
    assert_eq!(buffer(&seq), vec!["3,9,8".to_string(), String::new()]);

    seq.type_answer(" 1,12,27 ");
    assert_eq!(seq.submit(), SubmitOutcome::Correct);
    assert!(seq.can_advance());
}

#[test]
fn coordinate_wrong_resets_all_slots() {
    let mut seq = sequencer();
    seq.open(stage(3));
    seq.type_answer("요한일서48");
    assert_eq!(seq.submit(), SubmitOutcome::Wrong);
    assert_eq!(buffer(&seq), vec![String::new(); 6]);
}

#[test]
fn unknown_stage_is_a_dead_end() {
    let mut seq = sequencer();
    assert!(!seq.open_route("99"));
    assert_eq!(seq.phase(), Phase::NotFound);
    assert!(!seq.advance());
    assert!(!seq.retreat());
    assert!(!seq.advance_intro());
    assert_eq!(seq.submit(), SubmitOutcome::Incomplete);

    assert!(!seq.open_route("abc"));
    assert!(!seq.open_id(&StageId::new("lobby").unwrap()));
    assert_eq!(seq.phase(), Phase::NotFound);

    seq.restart();
    assert_eq!(seq.progress().map(|p| p.stage_number()), Some(stage(1)));
    assert!(seq.open_id(&StageId::new("stage-2").unwrap()));
}

#[test]
fn intro_position_survives_file_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut seq = Sequencer::new(catalog(), FileStore::open(&path));
    seq.advance_intro();
    seq.advance_intro();
    drop(seq);

    let seq = Sequencer::new(catalog(), FileStore::open(&path));
    assert_eq!(seq.phase(), Phase::Intro { position: 2, total: 3 });
}

#[test]
fn bingo_stage_end_to_end() {
    let catalog = load_default_catalog().expect("embedded catalog");
    let mut seq = Sequencer::new(catalog, MemoryStore::new());
    seq.open(stage(4));
    let start = Instant::now();

    // "빵" is never the first label
    assert_eq!(seq.tap_cell(5, start), TapOutcome::Miss { cell: 5 });
    assert_eq!(seq.pulses().active(PulseKind::Wrong, start), Some(5));
    assert_eq!(seq.sweep_pulses(start + Duration::from_millis(600)), 1);

    // 안경 안 쓴 사람과 안경 쓴 사람 한명씩 나가서 암송하기
    for cell in [3, 1, 14, 3, 9, 4, 17, 10, 8] {
        assert!(matches!(seq.tap_cell(cell, start), TapOutcome::Hit { .. }));
    }
    assert_eq!(seq.phase(), Phase::Submitting(Notice::GateOpen));
    assert_eq!(seq.tap_cell(3, start), TapOutcome::Ignored);

    // rewinding closes the gate; finishing again reopens it
    assert!(seq.rewind_bingo(8));
    assert_eq!(seq.phase(), Phase::Editing);
    assert!(matches!(seq.tap_cell(8, start), TapOutcome::Hit { revealed: 9, .. }));
    assert_eq!(seq.revealed_labels().len(), 9);

    assert_eq!(seq.acknowledge(), Some(Notice::GateOpen));
    let question = seq.prompt().expect("prompt").to_string();
    assert!(question.starts_with("밖에서 2명이서"));
    assert!(!seq.rewind_bingo(0));

    seq.type_answer("하나님의 사랑");
    assert_eq!(seq.submit(), SubmitOutcome::Wrong);
    seq.acknowledge();
    assert_eq!(buffer(&seq), vec![String::new()]);

    seq.type_answer(
        "하나님의 사랑이 우리에게 이렇게 나타난 바 되었으니 하나님이 자기의 독생자를 세상에 보내심은 그로 말미암아 우리를 살리려 하심이라",
    );
    assert_eq!(seq.submit(), SubmitOutcome::Correct);
}

proptest! {
    #[test]
    fn persisted_intro_position_is_clamped(stored in 0usize..50) {
        let mut store = MemoryStore::new();
        store.set(&intro_key(stage(1)), &stored.to_string()).unwrap();
        let seq = Sequencer::new(catalog(), store);
        let position = seq.progress().map(|p| p.intro_position());
        prop_assert_eq!(position, Some(stored.min(3)));
    }
}
