//! Per-stage progress.

use mission_model::{BingoProgress, PuzzleMode, StageDefinition, StageNumber, ValidationStatus};
use mission_validate::blank_buffer;

/// Mutable state of the active stage. Built fresh whenever a stage becomes
/// active, so the buffer always matches the stage's slot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    stage_index: usize,
    intro_position: usize,
    intro_segment_count: usize,
    buffer: Vec<String>,
    qr_entry: String,
    status: ValidationStatus,
    bingo: Option<BingoProgress>,
}

impl StageProgress {
    pub fn new(stage_index: usize, stage: &StageDefinition, intro_position: usize) -> Self {
        let intro_segment_count = stage.intro_segment_count();
        Self {
            stage_index,
            intro_position: intro_position.min(intro_segment_count),
            intro_segment_count,
            buffer: blank_buffer(stage),
            qr_entry: String::new(),
            status: ValidationStatus::Idle,
            bingo: matches!(stage.puzzle, PuzzleMode::Bingo(_)).then(BingoProgress::new),
        }
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn stage_number(&self) -> StageNumber {
        StageNumber::from_index(self.stage_index)
    }

    /// Intro position, clamped to the segment count.
    pub fn intro_position(&self) -> usize {
        self.intro_position.min(self.intro_segment_count)
    }

    pub fn intro_segment_count(&self) -> usize {
        self.intro_segment_count
    }

    pub fn in_intro(&self) -> bool {
        self.intro_position() < self.intro_segment_count
    }

    pub(crate) fn set_intro_position(&mut self, position: usize) {
        self.intro_position = position.min(self.intro_segment_count);
    }

    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [String] {
        &mut self.buffer
    }

    /// Overwrite one slot. Returns false when `index` is out of range.
    pub(crate) fn set_slot(&mut self, index: usize, value: &str) -> bool {
        match self.buffer.get_mut(index) {
            Some(slot) => {
                value.clone_into(slot);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_buffer(&mut self) {
        self.buffer.iter_mut().for_each(String::clear);
    }

    pub fn qr_entry(&self) -> &str {
        &self.qr_entry
    }

    pub(crate) fn set_qr_entry(&mut self, entry: &str) {
        entry.clone_into(&mut self.qr_entry);
    }

    pub(crate) fn clear_qr_entry(&mut self) {
        self.qr_entry.clear();
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: ValidationStatus) {
        self.status = status;
    }

    pub fn is_cleared(&self) -> bool {
        self.status == ValidationStatus::Cleared
    }

    pub fn bingo(&self) -> Option<&BingoProgress> {
        self.bingo.as_ref()
    }

    pub(crate) fn bingo_mut(&mut self) -> Option<&mut BingoProgress> {
        self.bingo.as_mut()
    }
}
