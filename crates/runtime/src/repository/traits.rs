//! Persistence contract for encounter data.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{RepositoryError, Result};

/// String key/value storage holding JSON documents.
///
/// This is the whole persistence surface the session needs: grudges,
/// character sheets, and staged loot each live under their own key.
/// Implementations must be usable from several owners at once.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait JsonStoreExt: KeyValueStore {
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RepositoryError::CorruptedData {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| RepositoryError::Json(e.to_string()))?;
        self.set_item(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}
