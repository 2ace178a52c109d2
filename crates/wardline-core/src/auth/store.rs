//! Process-wide holder of the session credential.

use std::sync::Mutex;

use tracing::warn;

use super::storage::TokenStorage;

/// Storage keys for the persisted credential fields
const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const AUTH_ENDPOINT_KEY: &str = "auth_endpoint";

#[derive(Default)]
struct CredentialState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    auth_endpoint: Option<String>,
}

/// Synchronized holder of access token, refresh token and auth endpoint.
///
/// This is a dumb holder: no validation happens here. Setters write through
/// to durable storage, getters fall back to the durable copy when the
/// in-memory one is uninitialized, and `clear` wipes both sides under a
/// single lock acquisition so concurrent readers never observe a
/// half-cleared credential. Storage failures are logged and swallowed - the
/// in-memory copy stays authoritative for the rest of the process.
pub struct CredentialStore {
    state: Mutex<CredentialState>,
    storage: Box<dyn TokenStorage>,
}

impl CredentialStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            state: Mutex::new(CredentialState::default()),
            storage,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        Self::read_through(&mut state.access_token, &*self.storage, ACCESS_TOKEN_KEY)
    }

    pub fn set_access_token(&self, token: &str) {
        let mut state = self.state.lock().unwrap();
        state.access_token = Some(token.to_string());
        self.persist(ACCESS_TOKEN_KEY, token);
    }

    pub fn refresh_token(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        Self::read_through(&mut state.refresh_token, &*self.storage, REFRESH_TOKEN_KEY)
    }

    pub fn set_refresh_token(&self, token: &str) {
        let mut state = self.state.lock().unwrap();
        state.refresh_token = Some(token.to_string());
        self.persist(REFRESH_TOKEN_KEY, token);
    }

    pub fn auth_endpoint(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        Self::read_through(&mut state.auth_endpoint, &*self.storage, AUTH_ENDPOINT_KEY)
    }

    pub fn set_auth_endpoint(&self, url: &str) {
        let mut state = self.state.lock().unwrap();
        state.auth_endpoint = Some(url.to_string());
        self.persist(AUTH_ENDPOINT_KEY, url);
    }

    /// Remove the whole credential, in memory and in durable storage.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, AUTH_ENDPOINT_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove credential from storage");
            }
        }
        // Pin the in-memory fields to empty rather than uninitialized so a
        // later read can not resurrect a removed value from storage.
        state.access_token = Some(String::new());
        state.refresh_token = Some(String::new());
        state.auth_endpoint = Some(String::new());
    }

    /// Read a field, falling back to durable storage when uninitialized.
    /// Must be called with the state lock held (enforced by the `&mut`
    /// borrow of the field).
    fn read_through(
        field: &mut Option<String>,
        storage: &dyn TokenStorage,
        key: &str,
    ) -> Option<String> {
        if field.is_none() {
            match storage.get(key) {
                Ok(stored) => *field = Some(stored.unwrap_or_default()),
                Err(e) => {
                    warn!(key, error = %e, "Failed to read credential from storage");
                    *field = Some(String::new());
                }
            }
        }
        field.as_ref().filter(|v| !v.is_empty()).cloned()
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Failed to persist credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::storage::{FileStorage, MemoryStorage};
    use super::*;

    fn memory_store() -> CredentialStore {
        CredentialStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn tokens_are_independently_replaceable() {
        let store = memory_store();
        store.set_access_token("A1");
        store.set_refresh_token("R1");

        store.set_access_token("A2");
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn clear_empties_memory_and_storage() {
        let store = memory_store();
        store.set_access_token("A1");
        store.set_refresh_token("R1");
        store.set_auth_endpoint("https://auth.example");

        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.auth_endpoint().is_none());

        // Idempotent
        store.clear();
        assert!(store.access_token().is_none());
    }

    #[test]
    fn reads_through_to_durable_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = CredentialStore::new(Box::new(FileStorage::at(path.clone())));
        store.set_access_token("A1");
        store.set_refresh_token("R1");
        drop(store);

        // A fresh store over the same file behaves like a process restart
        let restarted = CredentialStore::new(Box::new(FileStorage::at(path)));
        assert_eq!(restarted.access_token().as_deref(), Some("A1"));
        assert_eq!(restarted.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn cleared_value_does_not_resurrect_from_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = CredentialStore::new(Box::new(FileStorage::at(path)));
        store.set_access_token("A1");
        store.clear();
        assert!(store.access_token().is_none());
    }
}
