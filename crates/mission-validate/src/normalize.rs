//! Answer normalization.
//!
//! Both the player's input and the expected answer pass through
//! [`normalize`] before they are compared. Internal whitespace is kept as is,
//! so phrases must match their spacing exactly.

/// Trim surrounding whitespace and case-fold.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Concatenate input slots in order.
pub fn join_slots(slots: &[String]) -> String {
    slots.concat()
}

pub fn answers_match(input: &str, expected: &str) -> bool {
    normalize(input) == normalize(expected)
}
