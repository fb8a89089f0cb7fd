//! JSON file persistence for the exported shapes.
//!
//! Thin serialize/deserialize wrappers; the structures themselves are
//! defined in [`crate::export`] and carry their own wire encoding.

use crate::error::{VaultError, VaultResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes `value` to `path` as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> VaultResult<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| VaultError::Storage(e.to_string()))?;
    fs::write(path, json).map_err(|e| VaultError::Storage(e.to_string()))?;
    debug!("saved {}", path.display());
    Ok(())
}

/// Reads a JSON value of type `T` from `path`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> VaultResult<T> {
    let bytes = fs::read(path).map_err(|e| VaultError::Storage(e.to_string()))?;
    let value = serde_json::from_slice(&bytes).map_err(|e| VaultError::Storage(e.to_string()))?;
    debug!("loaded {}", path.display());
    Ok(value)
}
