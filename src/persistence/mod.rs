//! Best-score persistence
//!
//! The only state that outlives a run is one best-score integer. It is read
//! once per session and written at most once per run, through the
//! `BestScoreStore` port so the simulation never touches storage directly.
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and storage-less hosts
//! - `JsonFileStore`: JSON record on disk with atomic replace
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)

pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use thiserror::Error;

/// Storage failures. Callers degrade rather than propagate these into a run.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid stored value {0:?}")]
    InvalidValue(String),
}

/// Read/write access to the persisted best score
pub trait BestScoreStore {
    fn load_best(&mut self) -> Result<u64, PersistError>;
    fn save_best(&mut self, best: u64) -> Result<(), PersistError>;
}

impl<T: BestScoreStore + ?Sized> BestScoreStore for Box<T> {
    fn load_best(&mut self) -> Result<u64, PersistError> {
        (**self).load_best()
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistError> {
        (**self).save_best(best)
    }
}

/// Load the best score, treating any failure as "no best yet"
pub fn load_or_default<S: BestScoreStore + ?Sized>(store: &mut S) -> u64 {
    match store.load_best() {
        Ok(best) => {
            log::info!("Loaded best score {}", best);
            best
        }
        Err(e) => {
            log::warn!("Best score unavailable, starting from 0: {}", e);
            0
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u64,
    writes: u32,
}

impl MemoryStore {
    pub fn new(best: u64) -> Self {
        Self { best, writes: 0 }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Number of successful saves
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best(&mut self) -> Result<u64, PersistError> {
        Ok(self.best)
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistError> {
        self.best = best;
        self.writes += 1;
        Ok(())
    }
}

/// Parse a stored best score. Accepts the integer form and the legacy
/// floating-point form (fractions are dropped).
pub fn parse_best(raw: &str) -> Result<u64, PersistError> {
    let trimmed = raw.trim();
    if let Ok(best) = trimmed.parse::<u64>() {
        return Ok(best);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value.floor() as u64),
        _ => Err(PersistError::InvalidValue(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn load_best(&mut self) -> Result<u64, PersistError> {
            Err(PersistError::Unavailable("no storage".to_string()))
        }

        fn save_best(&mut self, _best: u64) -> Result<(), PersistError> {
            Err(PersistError::Unavailable("no storage".to_string()))
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new(12);
        assert_eq!(store.load_best().ok(), Some(12));
        store.save_best(99).expect("memory save cannot fail");
        assert_eq!(store.best(), 99);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_failed_load_degrades_to_zero() {
        let mut store = BrokenStore;
        assert_eq!(load_or_default(&mut store), 0);
        let mut boxed: Box<dyn BestScoreStore> = Box::new(BrokenStore);
        assert_eq!(load_or_default(&mut boxed), 0);
    }

    #[test]
    fn test_parse_best() {
        assert_eq!(parse_best("420").ok(), Some(420));
        assert_eq!(parse_best(" 87.9 ").ok(), Some(87));
        assert!(parse_best("-3").is_err());
        assert!(parse_best("lots").is_err());
        assert!(parse_best("NaN").is_err());
    }
}
