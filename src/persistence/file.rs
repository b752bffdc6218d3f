//! JSON file backend
//!
//! The record is written to a temporary sibling and renamed over the real
//! file, so a crash mid-write leaves the previous best intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BestScoreStore, PersistError};

/// On-disk record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub version: u32,
    pub best: u64,
}

impl BestScoreRecord {
    pub const VERSION: u32 = 1;
}

/// Best score stored as a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BestScoreStore for JsonFileStore {
    /// A missing file means no best score yet
    fn load_best(&mut self) -> Result<u64, PersistError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: BestScoreRecord = serde_json::from_str(&json)?;
        if record.version > BestScoreRecord::VERSION {
            return Err(PersistError::InvalidValue(format!(
                "record version {} is newer than supported {}",
                record.version,
                BestScoreRecord::VERSION
            )));
        }
        Ok(record.best)
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let record = BestScoreRecord {
            version: BestScoreRecord::VERSION,
            best,
        };
        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_string_pretty(&record)?)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Best score {} saved to {}", best, self.path.display());
        Ok(())
    }
}
