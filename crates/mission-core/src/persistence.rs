//! Intro position persistence.
//!
//! Each stage's last intro position is stored under `stage-intro-{n}` as a
//! decimal string. Reads never fail the caller: missing, unreadable or
//! unparseable values count as absent and out-of-range values are clamped.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mission_model::StageNumber;
use tracing::{debug, warn};

use crate::error::{PersistenceError, Result};

/// Key/value store for intro positions.
pub trait IntroStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage key for the intro position of `stage`.
pub fn intro_key(stage: StageNumber) -> String {
    format!("stage-intro-{stage}")
}

/// Read the persisted intro position of `stage`, clamped to
/// `[0, segment_count]`.
pub fn load_intro_position<S: IntroStore + ?Sized>(
    store: &S,
    stage: StageNumber,
    segment_count: usize,
) -> usize {
    let key = intro_key(stage);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return 0,
        Err(err) => {
            warn!(%key, error = %err, "could not read intro position");
            return 0;
        }
    };
    let Ok(parsed) = raw.trim().parse::<i64>() else {
        warn!(%key, value = %raw, "ignoring unparseable intro position");
        return 0;
    };
    let clamped = usize::try_from(parsed.max(0))
        .unwrap_or(usize::MAX)
        .min(segment_count);
    if i64::try_from(clamped).ok() != Some(parsed) {
        warn!(%key, stored = parsed, clamped, "intro position out of range");
    }
    clamped
}

/// Persist the intro position of `stage`.
pub fn save_intro_position<S: IntroStore + ?Sized>(
    store: &mut S,
    stage: StageNumber,
    position: usize,
) -> Result<()> {
    store.set(&intro_key(stage), &position.to_string())
}

/// Session-scoped store. Positions are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntroStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file store. Every write replaces the file atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the session file, starting empty when it is missing or damaged.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_open(&path) {
            Ok(store) => store,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "starting with an empty session");
                Self {
                    path,
                    entries: BTreeMap::new(),
                }
            }
        }
    }

    /// Open the session file, failing on read or parse errors. A missing
    /// file is an empty session.
    pub fn try_open(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(text) => {
                serde_json::from_str(&text).map_err(|source| PersistenceError::InvalidFormat {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(PersistenceError::Io {
                    operation: "read",
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        debug!(path = %path.display(), "opened session file");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries)
            .map_err(|source| PersistenceError::Serialization { source })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|source| PersistenceError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| PersistenceError::Io {
            operation: "write",
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| PersistenceError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|source| {
            PersistenceError::AtomicWriteFailed {
                temp_path: temp_path.clone(),
                target_path: self.path.clone(),
                source,
            }
        })
    }
}

impl IntroStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(n: u32) -> StageNumber {
        StageNumber::new(n).unwrap()
    }

    #[test]
    fn key_layout() {
        assert_eq!(intro_key(stage(3)), "stage-intro-3");
    }

    #[test]
    fn absent_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_intro_position(&store, stage(1), 4), 0);
    }

    #[test]
    fn clamps_and_ignores_garbage() {
        let mut store = MemoryStore::new();
        let key = intro_key(stage(1));
        store.set(&key, "12").unwrap();
        assert_eq!(load_intro_position(&store, stage(1), 4), 4);
        store.set(&key, "-3").unwrap();
        assert_eq!(load_intro_position(&store, stage(1), 4), 0);
        store.set(&key, "two").unwrap();
        assert_eq!(load_intro_position(&store, stage(1), 4), 0);
        store.set(&key, " 2 ").unwrap();
        assert_eq!(load_intro_position(&store, stage(1), 4), 2);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut store = FileStore::open(&path);
        save_intro_position(&mut store, stage(2), 3).unwrap();

        let reopened = FileStore::try_open(&path).unwrap();
        assert_eq!(load_intro_position(&reopened, stage(2), 9), 3);
    }

    #[test]
    fn damaged_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::try_open(&path),
            Err(PersistenceError::InvalidFormat { .. })
        ));
        let store = FileStore::open(&path);
        assert_eq!(load_intro_position(&store, stage(1), 4), 0);
    }
}
