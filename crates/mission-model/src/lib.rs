pub mod error;
pub mod ids;
pub mod outcome;
pub mod progress;
pub mod stage;

pub use error::{ModelError, Result};
pub use ids::{StageId, StageNumber};
pub use outcome::{SubmitOutcome, TapOutcome};
pub use progress::{BingoGate, BingoProgress, ValidationStatus};
pub use stage::{
    BingoSpec, BranchRule, COORDINATE_SLOT_COUNTS, IntroFrame, PuzzleKind, PuzzleMode,
    StageDefinition,
};
