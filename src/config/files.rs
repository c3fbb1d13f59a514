//! Optional list files read from the configuration directory

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Base name of the registry rename table
pub const REGISTRY_RENAME_FILE: &str = "registry-rename";

/// Base name of the image negative list
pub const NEGATIVE_LIST_FILE: &str = "imageNegativeList";

/// One literal substring replacement applied to image references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRename {
    pub original: String,
    pub replacement: String,
}

/// Load the registry rename table, empty when no file exists
pub fn load_registry_renames(dir: &Path) -> Result<Vec<RegistryRename>, ConfigError> {
    load_list(dir, REGISTRY_RENAME_FILE)
}

/// Load the image negative list, empty when no file exists
pub fn load_negative_list(dir: &Path) -> Result<Vec<String>, ConfigError> {
    load_list(dir, NEGATIVE_LIST_FILE)
}

fn find_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["json", "yaml", "yml"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
}

fn load_list<T: DeserializeOwned>(dir: &Path, stem: &str) -> Result<Vec<T>, ConfigError> {
    let Some(path) = find_file(dir, stem) else {
        log::info!("{}/{}.json doesn't exist, skipping", dir.display(), stem);
        return Ok(Vec::new());
    };

    log::info!("Loading {}", path.display());

    let parse_error = |reason: String| ConfigError::ParseError {
        path: path.display().to_string(),
        reason,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| parse_error(e.to_string()))?;

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))
    } else {
        serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))
    }
}
