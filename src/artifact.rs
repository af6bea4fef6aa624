//! Artifact persistence
//!
//! The fitted preprocessor is serialized to a JSON file. Saving creates
//! parent directories and replaces any existing artifact wholesale; loading
//! a missing or structurally invalid artifact is a serialization error.

use crate::error::{GemstoneError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serialize `value` to `path`, creating parent directories as needed
pub fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                GemstoneError::Serialization(format!(
                    "cannot create artifact directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| {
        GemstoneError::Serialization(format!(
            "cannot write artifact '{}': {e}",
            path.display()
        ))
    })?;
    Ok(())
}

/// Deserialize a value previously written by [`save`]
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|e| {
        GemstoneError::Serialization(format!(
            "cannot read artifact '{}': {e}",
            path.display()
        ))
    })?;
    let value = serde_json::from_str(&json)?;
    Ok(value)
}
