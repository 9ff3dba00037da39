//! qr-set submissions.
//!
//! Members of the answer set are matched one entry at a time, in any order.
//! `filled` holds one slot per member (same order as the set); a recorded
//! slot carries the member's canonical spelling.

use mission_model::SubmitOutcome;
use tracing::{debug, trace};

use crate::normalize::normalize;

/// Match one freeform entry against `members` and record it in `filled`.
pub fn submit_entry(members: &[String], entry: &str, filled: &mut [String]) -> SubmitOutcome {
    let needle = normalize(entry);
    if needle.is_empty() {
        return SubmitOutcome::Incomplete;
    }
    trace!(entry = %needle, "qr-set entry");

    let Some(index) = members.iter().position(|member| normalize(member) == needle) else {
        debug!("qr-set entry matches no member");
        return SubmitOutcome::Wrong;
    };
    let Some(slot) = filled.get_mut(index) else {
        debug!(index, slots = filled.len(), "qr-set buffer shorter than answer set");
        return SubmitOutcome::Incomplete;
    };
    if !slot.is_empty() {
        debug!(index, "qr-set member already entered");
        return SubmitOutcome::AlreadyEntered;
    }
    slot.clone_from(&members[index]);

    let count = filled_count(filled);
    let total = members.len();
    debug!(filled = count, total, "qr-set member recorded");
    if count >= total {
        SubmitOutcome::Correct
    } else {
        SubmitOutcome::CorrectPartial {
            filled: count,
            total,
        }
    }
}

/// Number of recorded slots.
pub fn filled_count(filled: &[String]) -> usize {
    filled.iter().filter(|slot| !slot.is_empty()).count()
}
