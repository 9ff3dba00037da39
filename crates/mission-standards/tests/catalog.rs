//! Catalog loading tests.

use std::io::Write;

use mission_model::{ModelError, PuzzleMode};
use mission_standards::{CatalogError, load_catalog, load_default_catalog, parse_catalog};
use mission_validate::slot_count;

const TWO_STAGES: &str = r#"
[[stage]]
number = 1
title = "One"

[stage.puzzle]
mode = "free-text"
answer = "abc"

[[stage]]
number = 2
title = "Two"

[stage.puzzle]
mode = "qr-set"
answers = ["1,2", "3,4"]
"#;

#[test]
fn embedded_catalog_summary() {
    let catalog = load_default_catalog().expect("embedded catalog loads");
    let summary = catalog
        .iter()
        .map(|stage| {
            format!(
                "{} {} slots={} intro={}",
                stage.id(),
                stage.kind(),
                slot_count(stage),
                stage.intro_segment_count()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(summary, @r"
    stage-1 free-text slots=2 intro=9
    stage-2 qr-set slots=2 intro=0
    stage-3 coordinate slots=6 intro=0
    stage-4 bingo slots=1 intro=0
    stage-5 free-text slots=3 intro=0
    stage-6 free-text slots=4 intro=0
    stage-7 free-text slots=1 intro=0
    stage-8 free-text slots=18 intro=0
    ");
}

#[test]
fn embedded_card_stage_spells_its_answer() {
    let catalog = load_default_catalog().expect("embedded catalog loads");
    let cards = &catalog.stages()[5];
    assert_eq!(cards.title, "Stage 7");
    let PuzzleMode::FreeText { answer, tokens } = &cards.puzzle else {
        panic!("stage 6 is the card stage");
    };
    assert_eq!(tokens, &["떡", "십자가", "물고기", "사람"]);
    assert_eq!(&tokens.concat(), answer);
}

#[test]
fn embedded_bingo_stage_matches_board() {
    let catalog = load_default_catalog().expect("embedded catalog loads");
    let PuzzleMode::Bingo(spec) = &catalog.stages()[3].puzzle else {
        panic!("stage 4 is the bingo stage");
    };
    assert_eq!(spec.sequence.len(), 9);
    assert_eq!(spec.cell_count(), 20);
    assert_eq!(spec.branch.alternatives, ["안 쓴".to_string(), "쓴".to_string()]);
}

#[test]
fn parses_minimal_catalog() {
    let catalog = parse_catalog(TWO_STAGES).expect("parse catalog");
    assert_eq!(catalog.len(), 2);
    assert!(!catalog.is_empty());
}

#[test]
fn rejects_gaps_in_numbering() {
    let broken = TWO_STAGES.replace("number = 2", "number = 3");
    assert!(matches!(
        parse_catalog(&broken),
        Err(CatalogError::OutOfOrder { position: 1, .. })
    ));
}

#[test]
fn rejects_duplicate_numbers() {
    let broken = TWO_STAGES.replace("number = 2", "number = 1");
    assert!(matches!(
        parse_catalog(&broken),
        Err(CatalogError::DuplicateStage { .. })
    ));
}

#[test]
fn rejects_duplicate_qr_answers_after_normalization() {
    let broken = TWO_STAGES.replace(r#"["1,2", "3,4"]"#, r#"["1,2", " 1,2 "]"#);
    assert!(matches!(
        parse_catalog(&broken),
        Err(CatalogError::DuplicateAnswer { .. })
    ));
}

#[test]
fn rejects_stage_invariant_violations() {
    let broken = TWO_STAGES.replace(r#"answer = "abc""#, r#"answer = "  ""#);
    assert!(matches!(
        parse_catalog(&broken),
        Err(CatalogError::Model(ModelError::EmptyAnswer { .. }))
    ));
}

#[test]
fn rejects_unknown_mode() {
    let broken = TWO_STAGES.replace("free-text", "riddle");
    assert!(matches!(parse_catalog(&broken), Err(CatalogError::Toml(_))));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(TWO_STAGES.as_bytes()).expect("write catalog");
    let catalog = load_catalog(file.path()).expect("load catalog");
    assert_eq!(catalog.len(), 2);

    let missing = file.path().with_extension("missing");
    assert!(matches!(
        load_catalog(&missing),
        Err(CatalogError::Io { .. })
    ));
}
