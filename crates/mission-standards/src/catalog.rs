//! Stage catalog.
//!
//! A catalog is a TOML document with one `[[stage]]` table per stage, in play
//! order. Loading checks every stage's own invariants plus the catalog-wide
//! ones: numbering is contiguous from 1 and qr-set members stay distinct after
//! normalization.

use std::collections::BTreeSet;
use std::path::Path;

use mission_model::{PuzzleMode, StageDefinition, StageId, StageNumber};
use mission_validate::normalize;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// Catalog shipped with the crate.
pub const EMBEDDED_CATALOG: &str = include_str!("../data/stages.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    stage: Vec<StageDefinition>,
}

/// Ordered, validated list of stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalog {
    stages: Vec<StageDefinition>,
}

impl StageCatalog {
    /// Build a catalog, checking all invariants.
    pub fn new(stages: Vec<StageDefinition>) -> Result<Self> {
        check_stages(&stages)?;
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, number: StageNumber) -> Option<&StageDefinition> {
        self.stages.get(number.index())
    }

    /// Stage at a zero-based position.
    pub fn by_index(&self, index: usize) -> Option<&StageDefinition> {
        self.stages.get(index)
    }

    pub fn by_id(&self, id: &StageId) -> Option<&StageDefinition> {
        id.number().and_then(|number| self.get(number))
    }

    pub fn contains(&self, number: StageNumber) -> bool {
        number.index() < self.stages.len()
    }

    pub fn last_number(&self) -> StageNumber {
        StageNumber::from_index(self.stages.len().saturating_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageDefinition> {
        self.stages.iter()
    }

    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }
}

impl<'a> IntoIterator for &'a StageCatalog {
    type Item = &'a StageDefinition;
    type IntoIter = std::slice::Iter<'a, StageDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

/// Parse and validate a catalog from TOML source.
pub fn parse_catalog(source: &str) -> Result<StageCatalog> {
    let file: CatalogFile = toml::from_str(source)?;
    let catalog = StageCatalog::new(file.stage)?;
    debug!(stages = catalog.len(), "catalog parsed");
    Ok(catalog)
}

/// Load a catalog file from disk.
pub fn load_catalog(path: &Path) -> Result<StageCatalog> {
    let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&source)?;
    info!(path = %path.display(), stages = catalog.len(), "loaded stage catalog");
    Ok(catalog)
}

/// Load the embedded catalog.
pub fn load_default_catalog() -> Result<StageCatalog> {
    let catalog = parse_catalog(EMBEDDED_CATALOG)?;
    info!(stages = catalog.len(), "loaded embedded stage catalog");
    Ok(catalog)
}

fn check_stages(stages: &[StageDefinition]) -> Result<()> {
    if stages.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = BTreeSet::new();
    for (position, stage) in stages.iter().enumerate() {
        let expected = StageNumber::from_index(position);
        if !seen.insert(stage.number) {
            return Err(CatalogError::DuplicateStage {
                number: stage.number,
            });
        }
        if stage.number != expected {
            return Err(CatalogError::OutOfOrder {
                position,
                expected,
                found: stage.number,
            });
        }
        stage.check()?;
        if let PuzzleMode::QrSet { answers } = &stage.puzzle {
            check_distinct_answers(stage.number, answers)?;
        }
    }
    Ok(())
}

fn check_distinct_answers(stage: StageNumber, answers: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for answer in answers {
        if !seen.insert(normalize(answer)) {
            return Err(CatalogError::DuplicateAnswer {
                stage,
                answer: answer.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_number_and_id() {
        let catalog = load_default_catalog().unwrap();
        let third = StageNumber::new(3).unwrap();
        assert_eq!(catalog.get(third).map(|s| s.number), Some(third));
        let id = StageId::new("stage-3").unwrap();
        assert_eq!(catalog.by_id(&id).map(|s| s.number), Some(third));
        assert!(catalog.by_id(&StageId::new("stage-99").unwrap()).is_none());
        assert!(catalog.by_id(&StageId::new("intro").unwrap()).is_none());
        assert_eq!(catalog.last_number().get() as usize, catalog.len());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(parse_catalog(""), Err(CatalogError::Empty)));
    }
}
