//! Stage sequencer.
//!
//! Owns the catalog, the active stage's progress and the intro store, and
//! moves the player between intro and puzzle phases and between stages.

use std::time::{Duration, Instant};

use mission_model::{
    BingoGate, PuzzleKind, PuzzleMode, StageDefinition, StageId, StageNumber, SubmitOutcome,
    TapOutcome, ValidationStatus,
};
use mission_standards::StageCatalog;
use mission_validate::{
    Attempt, PuzzleStrategy, ValidationEngine, bingo, card_tokens, is_per_character,
};
use tracing::{debug, info, warn};

use crate::persistence::{IntroStore, load_intro_position, save_intro_position};
use crate::phase::{Notice, Phase};
use crate::pulse::{PulseBoard, PulseKind};
use crate::store::StageProgress;

/// Which stage moves are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPolicy {
    /// Allow going back to the previous stage.
    pub allow_retreat: bool,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            allow_retreat: true,
        }
    }
}

#[derive(Debug, Clone)]
enum Location {
    Stage(StageProgress),
    NotFound,
}

/// Drives one player's session through the catalog.
#[derive(Debug)]
pub struct Sequencer<S: IntroStore> {
    catalog: StageCatalog,
    store: S,
    policy: NavigationPolicy,
    pulses: PulseBoard,
    location: Location,
    notice: Option<Notice>,
}

impl<S: IntroStore> Sequencer<S> {
    /// Start at stage 1 with the default policy.
    pub fn new(catalog: StageCatalog, store: S) -> Self {
        Self::with_policy(catalog, store, NavigationPolicy::default())
    }

    pub fn with_policy(catalog: StageCatalog, store: S, policy: NavigationPolicy) -> Self {
        let mut sequencer = Self {
            catalog,
            store,
            policy,
            pulses: PulseBoard::default(),
            location: Location::NotFound,
            notice: None,
        };
        sequencer.open(StageNumber::FIRST);
        sequencer
    }

    pub fn with_pulse_duration(mut self, duration: Duration) -> Self {
        self.pulses = PulseBoard::new(duration);
        self
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn pulses(&self) -> &PulseBoard {
        &self.pulses
    }

    /// Drop expired pulses.
    pub fn sweep_pulses(&mut self, now: Instant) -> usize {
        self.pulses.sweep(now)
    }

    /// Progress of the active stage, `None` in the not-found phase.
    pub fn progress(&self) -> Option<&StageProgress> {
        match &self.location {
            Location::Stage(progress) => Some(progress),
            Location::NotFound => None,
        }
    }

    pub fn stage(&self) -> Option<&StageDefinition> {
        self.progress()
            .and_then(|progress| self.catalog.by_index(progress.stage_index()))
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn phase(&self) -> Phase {
        let Location::Stage(progress) = &self.location else {
            return Phase::NotFound;
        };
        if let Some(notice) = self.notice {
            return Phase::Submitting(notice);
        }
        if progress.in_intro() {
            return Phase::Intro {
                position: progress.intro_position(),
                total: progress.intro_segment_count(),
            };
        }
        if progress.is_cleared() {
            return Phase::Cleared;
        }
        Phase::Editing
    }

    /// Question shown above the puzzle. Switches to the final question once a
    /// bingo stage reaches its final phrase.
    pub fn prompt(&self) -> Option<&str> {
        let stage = self.stage()?;
        let progress = self.progress()?;
        if let PuzzleMode::Bingo(spec) = &stage.puzzle
            && progress
                .bingo()
                .is_some_and(|bingo| bingo.gate() == BingoGate::FinalPhrase)
        {
            return Some(&spec.final_question);
        }
        Some(&stage.question)
    }

    pub fn can_advance(&self) -> bool {
        self.progress().is_some_and(|progress| {
            progress.is_cleared() && progress.stage_index() + 1 < self.catalog.len()
        })
    }

    pub fn can_retreat(&self) -> bool {
        self.policy.allow_retreat
            && self
                .progress()
                .is_some_and(|progress| progress.stage_index() > 0)
    }

    // --- stage navigation ---

    /// Activate `number`. Unknown stages lead to the not-found phase.
    pub fn open(&mut self, number: StageNumber) -> bool {
        self.notice = None;
        self.pulses.clear();
        let Some(stage) = self.catalog.get(number) else {
            warn!(stage = %number, "stage not found");
            self.location = Location::NotFound;
            return false;
        };
        let position = load_intro_position(&self.store, number, stage.intro_segment_count());
        let progress = StageProgress::new(number.index(), stage, position);
        info!(
            stage = %number,
            kind = %stage.kind(),
            intro_position = position,
            "stage opened"
        );
        self.location = Location::Stage(progress);
        true
    }

    /// Activate a stage from a route segment such as `"3"`.
    pub fn open_route(&mut self, route: &str) -> bool {
        match route.parse::<StageNumber>() {
            Ok(number) => self.open(number),
            Err(err) => {
                warn!(route, error = %err, "invalid stage route");
                self.enter_not_found();
                false
            }
        }
    }

    pub fn open_id(&mut self, id: &StageId) -> bool {
        match id.number() {
            Some(number) => self.open(number),
            None => {
                warn!(%id, "unknown stage id");
                self.enter_not_found();
                false
            }
        }
    }

    fn enter_not_found(&mut self) {
        self.notice = None;
        self.pulses.clear();
        self.location = Location::NotFound;
    }

    /// Back to stage 1. The only way out of the not-found phase.
    pub fn restart(&mut self) {
        self.open(StageNumber::FIRST);
    }

    /// Move to the next stage. Requires the active stage to be cleared.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        let Some(index) = self.progress().map(StageProgress::stage_index) else {
            return false;
        };
        self.open(StageNumber::from_index(index + 1))
    }

    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        let Some(index) = self.progress().map(StageProgress::stage_index) else {
            return false;
        };
        self.open(StageNumber::from_index(index - 1))
    }

    // --- intro navigation ---

    /// Next intro frame. Past the last frame the puzzle starts.
    pub fn advance_intro(&mut self) -> bool {
        if self.notice.is_some() {
            return false;
        }
        let Location::Stage(progress) = &mut self.location else {
            return false;
        };
        if !progress.in_intro() {
            return false;
        }
        let position = progress.intro_position() + 1;
        progress.set_intro_position(position);
        let number = progress.stage_number();
        debug!(stage = %number, position, "intro advanced");
        self.persist_intro(number, position);
        true
    }

    /// Previous intro frame. Only moves within the intro.
    pub fn retreat_intro(&mut self) -> bool {
        if self.notice.is_some() {
            return false;
        }
        let Location::Stage(progress) = &mut self.location else {
            return false;
        };
        if !progress.in_intro() || progress.intro_position() == 0 {
            return false;
        }
        let position = progress.intro_position() - 1;
        progress.set_intro_position(position);
        let number = progress.stage_number();
        debug!(stage = %number, position, "intro retreated");
        self.persist_intro(number, position);
        true
    }

    fn persist_intro(&mut self, number: StageNumber, position: usize) {
        if let Err(err) = save_intro_position(&mut self.store, number, position) {
            warn!(stage = %number, error = %err, "{}", err.user_message());
        }
    }

    // --- puzzle input ---

    fn editing(&mut self) -> Option<&mut StageProgress> {
        if !self.phase().is_editing() {
            return None;
        }
        match &mut self.location {
            Location::Stage(progress) => Some(progress),
            Location::NotFound => None,
        }
    }

    fn kind(&self) -> Option<PuzzleKind> {
        self.stage().map(StageDefinition::kind)
    }

    /// Overwrite one input slot. Accepted for per-character inputs and for
    /// the bingo final phrase (slot 0).
    pub fn set_slot(&mut self, index: usize, value: &str) -> bool {
        let Some(kind) = self.kind() else {
            return false;
        };
        let Some(progress) = self.editing() else {
            return false;
        };
        let accepts = match kind {
            PuzzleKind::Bingo => progress
                .bingo()
                .is_some_and(|bingo| bingo.gate() == BingoGate::FinalPhrase),
            kind => is_per_character(kind),
        };
        accepts && progress.set_slot(index, value)
    }

    /// Set the freeform qr-set entry.
    pub fn set_entry(&mut self, entry: &str) -> bool {
        if self.kind() != Some(PuzzleKind::QrSet) {
            return false;
        }
        let Some(progress) = self.editing() else {
            return false;
        };
        progress.set_qr_entry(entry);
        true
    }

    /// Enter a whole answer at once. Per-character inputs receive one
    /// character per slot with any overflow kept in the last slot; card
    /// inputs receive one word per slot.
    pub fn type_answer(&mut self, text: &str) -> bool {
        match self.kind() {
            Some(kind) if is_per_character(kind) => {
                let by_word = self
                    .stage()
                    .is_some_and(|stage| !card_tokens(stage).is_empty());
                let Some(progress) = self.editing() else {
                    return false;
                };
                let slots = progress.buffer().len();
                let values = if by_word {
                    spread_words(text, slots)
                } else {
                    spread(text, slots)
                };
                for (index, value) in values.iter().enumerate() {
                    progress.set_slot(index, value);
                }
                true
            }
            Some(PuzzleKind::QrSet) => self.set_entry(text),
            Some(PuzzleKind::Bingo) => self.set_slot(0, text),
            _ => false,
        }
    }

    /// Clear the input of the active stage and return to idle.
    pub fn reset_input(&mut self) -> bool {
        let Some(progress) = self.editing() else {
            return false;
        };
        progress.clear_buffer();
        progress.clear_qr_entry();
        progress.set_status(ValidationStatus::Idle);
        true
    }

    /// Validate the current input.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.phase().is_editing() {
            return SubmitOutcome::Incomplete;
        }
        let Location::Stage(progress) = &mut self.location else {
            return SubmitOutcome::Incomplete;
        };
        let Some(stage) = self.catalog.by_index(progress.stage_index()) else {
            return SubmitOutcome::Incomplete;
        };
        let engine = ValidationEngine::for_stage(stage);

        let outcome = match engine.strategy() {
            PuzzleStrategy::Joined { .. } => {
                let outcome = engine.submit(Attempt::Slots(progress.buffer()));
                if outcome.is_wrong() {
                    progress.clear_buffer();
                }
                outcome
            }
            PuzzleStrategy::QrSet { .. } => {
                let entry = progress.qr_entry().to_string();
                let outcome = engine.submit(Attempt::Entry {
                    entry: &entry,
                    filled: progress.buffer_mut(),
                });
                if !matches!(
                    outcome,
                    SubmitOutcome::Incomplete | SubmitOutcome::AlreadyEntered
                ) {
                    progress.clear_qr_entry();
                }
                outcome
            }
            PuzzleStrategy::Bingo { .. } => {
                let Some(bingo) = progress.bingo() else {
                    return SubmitOutcome::Incomplete;
                };
                let phrase = progress.buffer().first().map_or("", String::as_str);
                let outcome = engine.submit(Attempt::FinalPhrase {
                    phrase,
                    progress: bingo,
                });
                if outcome.is_wrong() {
                    progress.clear_buffer();
                }
                outcome
            }
        };

        match outcome {
            SubmitOutcome::Wrong => progress.set_status(ValidationStatus::Wrong),
            SubmitOutcome::Correct => progress.set_status(ValidationStatus::Cleared),
            _ => {}
        }
        debug!(stage = %stage.number, ?outcome, status = ?progress.status(), "submitted");
        if outcome.is_cleared() {
            info!(stage = %stage.number, "stage cleared");
        }
        if let Some(notice) = Notice::from_outcome(outcome) {
            self.notice = Some(notice);
        }
        outcome
    }

    /// Close the open notice. Acknowledging a wrong answer returns the stage
    /// to idle, acknowledging a correct answer moves on when there is a next
    /// stage, and acknowledging the bingo gate unlocks the final phrase.
    pub fn acknowledge(&mut self) -> Option<Notice> {
        let notice = self.notice.take()?;
        match notice {
            Notice::Wrong => {
                if let Location::Stage(progress) = &mut self.location {
                    progress.set_status(ValidationStatus::Idle);
                }
            }
            Notice::Correct => {
                self.advance();
            }
            Notice::GateOpen => {
                self.confirm_gate();
            }
            _ => {}
        }
        Some(notice)
    }

    // --- bingo ---

    /// Tap a board cell. Hits and misses flash a pulse on the cell.
    pub fn tap_cell(&mut self, cell: usize, now: Instant) -> TapOutcome {
        if !self.phase().is_editing() {
            return TapOutcome::Ignored;
        }
        let Location::Stage(progress) = &mut self.location else {
            return TapOutcome::Ignored;
        };
        let Some(stage) = self.catalog.by_index(progress.stage_index()) else {
            return TapOutcome::Ignored;
        };
        let PuzzleMode::Bingo(spec) = &stage.puzzle else {
            return TapOutcome::Ignored;
        };
        let Some(state) = progress.bingo_mut() else {
            return TapOutcome::Ignored;
        };

        let outcome = bingo::tap(spec, state, cell);
        match outcome {
            TapOutcome::Hit { cell, .. } => self.pulses.flash(PulseKind::Correct, cell, now),
            TapOutcome::Miss { cell } => self.pulses.flash(PulseKind::Wrong, cell, now),
            TapOutcome::Ignored => {}
        }
        if state.gate() == BingoGate::Confirm {
            debug!(stage = %stage.number, "bingo sequence complete");
            self.notice = Some(Notice::GateOpen);
        }
        outcome
    }

    /// Rewind bingo progress to `index`. Also closes an open gate.
    pub fn rewind_bingo(&mut self, index: usize) -> bool {
        let gate_open = self.notice == Some(Notice::GateOpen);
        if !gate_open && !self.phase().is_editing() {
            return false;
        }
        let Location::Stage(progress) = &mut self.location else {
            return false;
        };
        let Some(stage) = self.catalog.by_index(progress.stage_index()) else {
            return false;
        };
        let PuzzleMode::Bingo(spec) = &stage.puzzle else {
            return false;
        };
        let Some(state) = progress.bingo_mut() else {
            return false;
        };
        if !bingo::rewind(spec, state, index) {
            return false;
        }
        if gate_open {
            self.notice = None;
        }
        true
    }

    /// Confirm the bingo gate and switch to the final phrase.
    pub fn confirm_gate(&mut self) -> bool {
        let Location::Stage(progress) = &mut self.location else {
            return false;
        };
        let Some(state) = progress.bingo_mut() else {
            return false;
        };
        if !bingo::confirm_gate(state) {
            return false;
        }
        progress.clear_buffer();
        if self.notice == Some(Notice::GateOpen) {
            self.notice = None;
        }
        info!(stage = %progress.stage_number(), "final phrase unlocked");
        true
    }

    /// Labels revealed so far on a bingo stage.
    pub fn revealed_labels(&self) -> Vec<&str> {
        let (Some(stage), Some(progress)) = (self.stage(), self.progress()) else {
            return Vec::new();
        };
        match (&stage.puzzle, progress.bingo()) {
            (PuzzleMode::Bingo(spec), Some(state)) => bingo::revealed_labels(spec, state),
            _ => Vec::new(),
        }
    }
}

/// Spread `text` over `slots` slots, one character each, overflow in the
/// last slot.
fn spread(text: &str, slots: usize) -> Vec<String> {
    let chars: Vec<char> = text.trim().chars().collect();
    (0..slots)
        .map(|index| {
            if index + 1 == slots {
                chars.get(index..).map(String::from_iter).unwrap_or_default()
            } else {
                chars.get(index).map(char::to_string).unwrap_or_default()
            }
        })
        .collect()
}

/// Spread whitespace or comma separated words over `slots` slots, extra
/// words joined into the last slot.
fn spread_words(text: &str, slots: usize) -> Vec<String> {
    let words: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .collect();
    (0..slots)
        .map(|index| {
            if index + 1 == slots {
                words.get(index..).map(|rest| rest.concat()).unwrap_or_default()
            } else {
                words.get(index).map(|word| (*word).to_string()).unwrap_or_default()
            }
        })
        .collect()
}
