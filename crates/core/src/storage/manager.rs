use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::trade::{parse_trades, Trade};

use super::format;

/// High-level storage operations: save/load the ledger to/from JSON.
pub struct StorageManager;

impl StorageManager {
    /// Ledger → versioned JSON document.
    pub fn save_to_string(ledger: &Ledger) -> Result<String, CoreError> {
        format::write_document(ledger)
    }

    /// Versioned JSON document → ledger. Every trade is validated on the way in.
    pub fn load_from_str(data: &str) -> Result<Ledger, CoreError> {
        format::read_document(data)
    }

    /// Import a bare JSON array of trade records (e.g. an export from the
    /// old document store).
    pub fn import_trades(data: &str) -> Result<Vec<Trade>, CoreError> {
        parse_trades(data)
    }

    /// Save the ledger to disk (native only).
    ///
    /// Writes to a sibling temp file first, then renames over the target.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(ledger: &Ledger, path: &str) -> Result<(), CoreError> {
        let document = Self::save_to_string(ledger)?;
        let tmp_path = format!("{path}.tmp");
        std::fs::write(&tmp_path, document)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load the ledger from disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Ledger, CoreError> {
        let data = std::fs::read_to_string(path)?;
        Self::load_from_str(&data)
    }
}
