use thiserror::Error;

use crate::ids::StageNumber;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid stage number: {0:?}")]
    InvalidStageNumber(String),
    #[error("invalid stage id: {0:?}")]
    InvalidStageId(String),
    #[error("stage {stage}: answer is empty")]
    EmptyAnswer { stage: StageNumber },
    #[error("stage {stage}: coordinate slot count {slots} is not one of 4, 6 or 8")]
    InvalidSlotCount { stage: StageNumber, slots: usize },
    #[error("stage {stage}: answer has {answer_len} characters but only {slots} slots")]
    AnswerLongerThanSlots {
        stage: StageNumber,
        answer_len: usize,
        slots: usize,
    },
    #[error("stage {stage}: cards do not spell the answer in order")]
    TokensMismatch { stage: StageNumber },
    #[error("stage {stage}: qr answer set is empty")]
    EmptyAnswerSet { stage: StageNumber },
    #[error("stage {stage}: bingo board has no cells")]
    EmptyBoard { stage: StageNumber },
    #[error("stage {stage}: invalid bingo branch: {reason}")]
    InvalidBranch { stage: StageNumber, reason: String },
    #[error("stage {stage}: bingo label {label:?} does not appear on the board")]
    UnreachableLabel { stage: StageNumber, label: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
