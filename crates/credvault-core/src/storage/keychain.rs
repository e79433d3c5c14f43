//! OS Keychain storage backend
//!
//! Uses the system keychain for secure storage:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use base64::Engine;
use keyring::Entry;
use tracing::debug;

use super::SecretStore;
use crate::error::{Result, VaultError};

/// Account name used when checking keychain availability
const CHECK_ACCOUNT: &str = "__credvault_check__";
const CHECK_VALUE: &str = "credvault-availability-check";

/// OS Keychain storage backend
#[derive(Debug, Clone, Default)]
pub struct KeychainStore;

impl KeychainStore {
    pub fn new() -> Self {
        Self
    }

    /// Return a keychain store if the host keychain persists entries.
    ///
    /// Writes a throwaway entry under `service`, reads it back through a
    /// separate handle, then deletes it. A backend that accepts the write but
    /// cannot return it from a fresh handle is not persistent.
    pub fn detect(service: &str) -> Option<Self> {
        let writer = Entry::new(service, CHECK_ACCOUNT).ok()?;
        if let Err(e) = writer.set_password(CHECK_VALUE) {
            debug!("Keychain storage is not available: {}", e);
            return None;
        }

        let read_back = Entry::new(service, CHECK_ACCOUNT).and_then(|reader| reader.get_password());
        let _ = writer.delete_password();

        match read_back {
            Ok(value) if value == CHECK_VALUE => {
                debug!("Keychain storage is available");
                Some(Self)
            }
            Ok(_) => {
                debug!("Keychain returned a different value on read-back");
                None
            }
            Err(e) => {
                debug!("Keychain entry did not persist: {}", e);
                None
            }
        }
    }

    fn entry(service: &str, account: &str) -> Result<Entry> {
        Entry::new(service, account).map_err(|e| VaultError::SecretStore(e.to_string()))
    }
}

impl SecretStore for KeychainStore {
    fn store(&self, service: &str, account: &str, value: &[u8]) -> Result<()> {
        let entry = Self::entry(service, account)?;

        // Keychain stores strings
        let encoded = zeroize::Zeroizing::new(base64_encode(value));

        entry
            .set_password(&encoded)
            .map_err(|e| VaultError::SecretStore(e.to_string()))?;

        debug!("Stored entry in keychain: {}/{}", service, account);
        Ok(())
    }

    fn retrieve(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>> {
        let entry = Self::entry(service, account)?;

        match entry.get_password() {
            Ok(encoded) => {
                let encoded = zeroize::Zeroizing::new(encoded);
                let decoded = base64_decode(&encoded)?;
                debug!("Retrieved entry from keychain: {}/{}", service, account);
                Ok(Some(decoded))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("Entry not found in keychain: {}/{}", service, account);
                Ok(None)
            }
            Err(e) => Err(VaultError::SecretStore(e.to_string())),
        }
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        let entry = Self::entry(service, account)?;

        match entry.delete_password() {
            Ok(()) => {
                debug!("Deleted entry from keychain: {}/{}", service, account);
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::SecretStore(e.to_string())),
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "windows")]
        return "Windows Credential Manager";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        return "System Keychain";
    }
}

fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| VaultError::KeyMaterialCorrupt(format!("Base64 decode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keychain_detection() {
        // Availability check must not panic on any host
        let _ = KeychainStore::detect("credvault-test");
    }

    #[test]
    fn test_detection_rejects_non_persistent_backend() {
        // keyring's mock keeps each credential inside its own Entry, so a
        // fresh handle never sees the earlier write
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());

        assert!(KeychainStore::detect("credvault-test").is_none());
    }

    #[test]
    fn test_base64_roundtrip() {
        let bytes = [0u8, 1, 254, 255];
        assert_eq!(base64_decode(&base64_encode(&bytes)).unwrap(), bytes);
        assert!(matches!(
            base64_decode("not base64!").unwrap_err(),
            VaultError::KeyMaterialCorrupt(_)
        ));
    }
}
