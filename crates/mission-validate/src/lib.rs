//! Answer validation for mission stages.
//!
//! - [`normalize`]: trim and case-fold applied to both sides of a comparison
//! - [`resolver`]: picks the validation strategy and slot count of a stage
//! - [`engine`]: runs a submit attempt against the strategy
//! - [`qr`] and [`bingo`]: the stateful rules of the qr-set and bingo modes

pub mod bingo;
pub mod engine;
pub mod normalize;
pub mod qr;
pub mod resolver;

pub use bingo::{
    Expected, confirm_gate, expected_at, revealed_labels, rewind, submit_final, tap,
};
pub use engine::{Attempt, ValidationEngine};
pub use normalize::{answers_match, join_slots, normalize};
pub use qr::{filled_count, submit_entry};
pub use resolver::{
    PuzzleStrategy, blank_buffer, card_tokens, is_per_character, resolve, slot_count,
};
