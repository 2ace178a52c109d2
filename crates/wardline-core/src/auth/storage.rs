//! Durable key-value backends for the credential store.
//!
//! The credential store persists through the `TokenStorage` trait so the
//! durable medium is substitutable: a JSON file in the platform config
//! directory, the OS keychain, or plain memory for tests and incognito-style
//! sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;

/// Application name used for storage paths and keychain entries
const APP_NAME: &str = "wardline";

/// Credential file name in the storage directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// Durable key-value surface consumed by the credential store.
///
/// Implementations must be safe to call from multiple threads; callers
/// serialize access themselves, so no internal ordering guarantees are
/// required beyond that.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage: a flat JSON object under the platform config dir.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at the default location (`<config_dir>/wardline/credentials.json`)
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(Self {
            path: config_dir.join(APP_NAME).join(CREDENTIALS_FILE),
        })
    }

    /// Storage at an explicit file path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read credentials file")?;
        serde_json::from_str(&contents).context("Failed to parse credentials file")
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// OS keychain storage via the system keyring
pub struct KeyringStorage;

impl KeyringStorage {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str) -> Result<Entry> {
        Entry::new(APP_NAME, key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read credential from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store credential in keychain")
    }

    fn remove(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

/// In-memory storage: nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::at(dir.path().join("credentials.json"));

        assert!(storage.get("access_token").unwrap().is_none());
        storage.set("access_token", "A1").unwrap();
        storage.set("refresh_token", "R1").unwrap();
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("A1"));

        // A fresh instance over the same file sees the persisted values
        let reopened = FileStorage::at(dir.path().join("credentials.json"));
        assert_eq!(reopened.get("refresh_token").unwrap().as_deref(), Some("R1"));

        reopened.remove("refresh_token").unwrap();
        assert!(reopened.get("refresh_token").unwrap().is_none());
        assert_eq!(reopened.get("access_token").unwrap().as_deref(), Some("A1"));
    }

    #[test]
    fn file_storage_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::at(dir.path().join("credentials.json"));
        storage.remove("access_token").unwrap();
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.set("refresh_token", "R1").unwrap();
        assert_eq!(storage.get("refresh_token").unwrap().as_deref(), Some("R1"));
        storage.remove("refresh_token").unwrap();
        assert!(storage.get("refresh_token").unwrap().is_none());
    }
}
