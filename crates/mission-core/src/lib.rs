//! Stage progression for the mission stage engine.
//!
//! # Module Organization
//!
//! - [`sequencer`]: stage and intro navigation, submits, bingo taps
//! - [`store`]: mutable progress of the active stage
//! - [`persistence`]: intro position stores (memory and JSON file)
//! - [`pulse`]: transient cell highlights with explicit expiry
//! - [`phase`]: the per-stage phase and the notices it can carry

pub mod error;
pub mod persistence;
pub mod phase;
pub mod pulse;
pub mod sequencer;
pub mod store;

pub use error::{PersistenceError, Result};
pub use persistence::{
    FileStore, IntroStore, MemoryStore, intro_key, load_intro_position, save_intro_position,
};
pub use phase::{NOT_FOUND_MESSAGE, Notice, Phase};
pub use pulse::{DEFAULT_PULSE_DURATION, Pulse, PulseBoard, PulseKind};
pub use sequencer::{NavigationPolicy, Sequencer};
pub use store::StageProgress;
