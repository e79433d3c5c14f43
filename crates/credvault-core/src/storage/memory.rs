//! In-process secret store
//!
//! Values live only as long as the store. Used for tests and for sessions
//! that must not touch the host keychain.

use std::collections::HashMap;
use std::sync::RwLock;

use zeroize::Zeroizing;

use super::SecretStore;
use crate::error::{Result, VaultError};

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), Zeroizing<Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish()
    }
}

fn poisoned<T>(_: T) -> VaultError {
    VaultError::SecretStore("memory store lock poisoned".to_string())
}

impl SecretStore for MemoryStore {
    fn store(&self, service: &str, account: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(
            (service.to_string(), account.to_string()),
            Zeroizing::new(value.to_vec()),
        );
        Ok(())
    }

    fn retrieve(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .get(&(service.to_string(), account.to_string()))
            .map(|v| v.to_vec()))
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(&(service.to_string(), account.to_string()));
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_retrieve() {
        let store = MemoryStore::new();

        store.store("svc", "acct", b"value").unwrap();

        assert_eq!(store.retrieve("svc", "acct").unwrap(), Some(b"value".to_vec()));
        assert_eq!(store.retrieve("svc", "other").unwrap(), None);
        assert_eq!(store.retrieve("other", "acct").unwrap(), None);
    }

    #[test]
    fn test_overwrite_and_delete() {
        let store = MemoryStore::new();

        store.store("svc", "acct", b"first").unwrap();
        store.store("svc", "acct", b"second").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.retrieve("svc", "acct").unwrap(), Some(b"second".to_vec()));

        store.delete("svc", "acct").unwrap();
        store.delete("svc", "acct").unwrap();
        assert!(store.is_empty());
    }
}
