//! JSON model artifacts.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use meishi_core::error::{MeishiError, Result};

fn persistence_error(path: &Path, reason: impl ToString) -> MeishiError {
    MeishiError::Persistence {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Write `model` to `path` as pretty-printed JSON, creating parent
/// directories as needed. An existing file is replaced.
pub fn save<M: Serialize>(model: &M, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| persistence_error(path, e))?;
    }

    let json = serde_json::to_string_pretty(model).map_err(|e| persistence_error(path, e))?;
    fs::write(path, json).map_err(|e| persistence_error(path, e))?;

    info!(path = %path.display(), "model saved");
    Ok(())
}

/// Read a model previously written by [`save`].
pub fn load<M: DeserializeOwned>(path: impl AsRef<Path>) -> Result<M> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| persistence_error(path, e))?;
    let model = serde_json::from_str(&content).map_err(|e| persistence_error(path, e))?;

    info!(path = %path.display(), "model loaded");
    Ok(model)
}
