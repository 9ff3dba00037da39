use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

const STAGE_ID_PREFIX: &str = "stage-";

/// One-based position of a stage in the catalog, as it appears in routes
/// (`/stage/3`) and persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StageNumber(u32);

impl StageNumber {
    pub const FIRST: StageNumber = StageNumber(1);

    pub fn new(value: u32) -> Result<Self, ModelError> {
        if value == 0 {
            return Err(ModelError::InvalidStageNumber(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Stage number for a zero-based catalog index.
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1)))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based catalog index.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn stage_id(self) -> StageId {
        StageId(format!("{STAGE_ID_PREFIX}{}", self.0))
    }
}

impl TryFrom<u32> for StageNumber {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageNumber> for u32 {
    fn from(value: StageNumber) -> Self {
        value.0
    }
}

impl FromStr for StageNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ModelError::InvalidStageNumber(s.to_string()))?;
        Self::new(parsed).map_err(|_| ModelError::InvalidStageNumber(s.to_string()))
    }
}

impl fmt::Display for StageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Textual stage identifier (`stage-3`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageId(String);

impl StageId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidStageId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stage number encoded in a `stage-N` identifier, if any.
    pub fn number(&self) -> Option<StageNumber> {
        self.0
            .strip_prefix(STAGE_ID_PREFIX)
            .and_then(|rest| rest.parse::<StageNumber>().ok())
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
