use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::parser::types::ManifestFormat;

// =============================================================================
// Cache file constants
// =============================================================================

/// Date stamp of a cache file name (`2024-06-28.json`)
pub const CACHE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Release timestamp stored in a cache file
pub const CACHE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Directory name of the cache root under the user cache directory
pub const CACHE_DIR_NAME: &str = "deltaver";

/// Cache directory used when no user cache directory can be found
pub const FALLBACK_CACHE_DIR: &str = ".deltaver_cache";

/// Settings read from the `[tool.deltaver]` table of a pyproject.toml
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub path_to_file: Option<PathBuf>,
    pub file_format: Option<ManifestFormat>,
    pub excluded: Vec<String>,
    pub fail_on_avg: Option<u64>,
    pub fail_on_max: Option<u64>,
    pub cache_dir: Option<PathBuf>,
    pub overtaking_safe: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Pyproject {
    #[serde(default)]
    tool: Tool,
}

#[derive(Debug, Default, Deserialize)]
struct Tool {
    deltaver: Option<FileConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load `[tool.deltaver]` from a pyproject.toml.
/// Returns `None` when the file does not exist or has no such table.
pub fn load_pyproject(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pyproject(&content).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_pyproject(content: &str) -> Result<Option<FileConfig>, toml::de::Error> {
    let pyproject: Pyproject = toml::from_str(content)?;
    Ok(pyproject.tool.deltaver)
}

/// Returns the default cache root.
/// Uses $XDG_CACHE_HOME/deltaver if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/deltaver,
/// or ./.deltaver_cache if neither is available.
pub fn cache_dir() -> PathBuf {
    cache_dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir())
}

fn cache_dir_with_env(xdg_cache_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_cache_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}
