use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{FetchError, Result};

/// Environment variable overriding the default cache root.
pub const DATA_ENV: &str = "ATLAS_FETCH_DATA";

const DEFAULT_DIR_NAME: &str = "atlas_fetch_data";

/// Cache root used when the caller gives no directory.
///
/// `$ATLAS_FETCH_DATA` if set and non-empty, otherwise
/// `~/atlas_fetch_data` (or `./atlas_fetch_data` without a home directory).
pub fn default_data_root() -> PathBuf {
    match env::var_os(DATA_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME),
    }
}

/// Absolute directory for `dataset_name`, created if it does not exist.
pub fn dataset_dir(dataset_name: &str, data_dir: Option<&Path>, verbose: u8) -> Result<PathBuf> {
    let root = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_data_root(),
    };
    let dir = root.join(dataset_name);
    let dir = std::path::absolute(&dir).map_err(|e| FetchError::io(&dir, e))?;

    if !dir.is_dir() {
        std::fs::create_dir_all(&dir).map_err(|e| FetchError::io(&dir, e))?;
        if verbose > 1 {
            debug!("Created dataset directory {}", dir.display());
        }
    } else if verbose > 1 {
        debug!("Using dataset directory {}", dir.display());
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_dataset_subdirectory() {
        let root = tempfile::tempdir().unwrap();
        let dir = dataset_dir("yeo_2011", Some(root.path()), 0).unwrap();
        assert_eq!(dir, root.path().join("yeo_2011"));
        assert!(dir.is_dir());
    }

    #[test]
    fn existing_directory_is_reused() {
        let root = tempfile::tempdir().unwrap();
        let first = dataset_dir("mdbt_atlases_2019", Some(root.path()), 2).unwrap();
        std::fs::write(first.join("keep.txt"), "x").unwrap();
        let second = dataset_dir("mdbt_atlases_2019", Some(root.path()), 2).unwrap();
        assert_eq!(first, second);
        assert!(second.join("keep.txt").exists());
    }

    #[test]
    fn result_is_absolute() {
        let root = tempfile::tempdir().unwrap();
        let dir = dataset_dir("x", Some(root.path()), 0).unwrap();
        assert!(dir.is_absolute());
    }
}
