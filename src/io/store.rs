use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::board::ThemeChoice;
use crate::model::task::Task;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Flat key-value persistence: one JSON file per key inside the data
/// directory. Two keys exist: `tasks` and `theme`. Reads tolerate missing
/// or corrupt files (the board falls back to seeded state); writes are
/// atomic via a temp file in the same directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the task collection. None on a missing or unreadable key.
    pub fn load_tasks(&self) -> Option<Vec<Task>> {
        let content = fs::read_to_string(self.dir.join("tasks.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Serialize the whole collection. Called after every mutation.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(tasks).map_err(|e| StoreError::Serialize {
            key: "tasks",
            source: e,
        })?;
        self.write_atomic("tasks.json", &content)
    }

    pub fn load_theme(&self) -> Option<ThemeChoice> {
        let content = fs::read_to_string(self.dir.join("theme.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save_theme(&self, theme: ThemeChoice) -> Result<(), StoreError> {
        let content = serde_json::to_string(&theme).map_err(|e| StoreError::Serialize {
            key: "theme",
            source: e,
        })?;
        self.write_atomic("theme.json", &content)
    }

    /// Write via a temp file in the same directory, then rename over the
    /// target so readers never observe a half-written file.
    fn write_atomic(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::Write {
            path: path.clone(),
            source: e,
        })?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StoreError::Write {
                path: path.clone(),
                source: e,
            })?;
        tmp.persist(&path).map_err(|e| StoreError::Write {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}
