//! File-based KeyValueStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, RepositoryError, Result};

/// Stores each key as its own JSON file.
///
/// # File Format
///
/// A key `gauntlet.character.hero` is written to
/// `<base_dir>/gauntlet.character.hero.json`. Writes go to a `.json.tmp`
/// sibling first and are renamed into place, so a crash never leaves a
/// half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path of the file backing `key`.
    fn item_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(RepositoryError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        tracing::debug!("Loaded {} from {}", key, path.display());
        Ok(Some(raw))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        // Write to temp file
        fs::write(&temp_path, value)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved {} to {}", key, path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted {}", key);
        }

        Ok(())
    }
}
