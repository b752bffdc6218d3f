//! Browser LocalStorage backend (wasm32 only)

use super::{BestScoreStore, PersistError, parse_best};

/// LocalStorage key holding the best score as a decimal string
pub const STORAGE_KEY: &str = "runner_best";

/// Best score kept in `window.localStorage`
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .ok_or_else(|| PersistError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| PersistError::Unavailable("localStorage disabled".to_string()))
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load_best(&mut self) -> Result<u64, PersistError> {
        let storage = Self::storage()?;
        match storage
            .get_item(STORAGE_KEY)
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?
        {
            Some(raw) => parse_best(&raw),
            None => Ok(0),
        }
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        storage
            .set_item(STORAGE_KEY, &best.to_string())
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?;
        log::info!("Best score {} saved", best);
        Ok(())
    }
}
