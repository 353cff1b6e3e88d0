//! Path resolution for tensu data directories.
//!
//! Resolution order for the data root:
//! 1. `TENSU_DATA_DIR` environment variable (highest priority)
//! 2. System data directory (e.g., `~/.local/share/tensu`)

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ports::AUDIO_CACHE_NAMESPACE;
use crate::settings::SETTINGS_STORAGE_KEY;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "TENSU_DATA_DIR";

const APP_DIR_NAME: &str = "tensu";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Get the root directory for application data.
pub fn data_root() -> Result<PathBuf, PathError> {
    resolve_data_root(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

/// Resolve the data root from an explicit override, falling back to the
/// system data directory. Empty overrides are rejected.
pub fn resolve_data_root(override_dir: Option<PathBuf>) -> Result<PathBuf, PathError> {
    match override_dir {
        Some(dir) if dir.as_os_str().is_empty() => Err(PathError::EmptyPath),
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .ok_or(PathError::NoDataDir),
    }
}

/// Directory holding cached clips.
#[must_use]
pub fn audio_cache_dir(root: &Path) -> PathBuf {
    root.join(AUDIO_CACHE_NAMESPACE)
}

/// File holding persisted settings.
#[must_use]
pub fn settings_path(root: &Path) -> PathBuf {
    root.join(format!("{SETTINGS_STORAGE_KEY}.json"))
}

/// Create `path` (and parents) if missing.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let root = resolve_data_root(Some(PathBuf::from("/tmp/tensu-x"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/tensu-x"));
    }

    #[test]
    fn empty_override_rejected() {
        assert!(matches!(
            resolve_data_root(Some(PathBuf::new())),
            Err(PathError::EmptyPath)
        ));
    }

    #[test]
    fn derived_paths() {
        let root = Path::new("/data");
        assert_eq!(audio_cache_dir(root), PathBuf::from("/data/audio-cache"));
        assert_eq!(
            settings_path(root),
            PathBuf::from("/data/mahjong-score-settings.json")
        );
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = std::env::temp_dir().join(format!("tensu-paths-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("plain");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_directory(&file),
            Err(PathError::NotADirectory(_))
        ));
        ensure_directory(&dir.join("a/b")).unwrap();
        assert!(dir.join("a/b").is_dir());
        fs::remove_dir_all(&dir).unwrap();
    }
}
