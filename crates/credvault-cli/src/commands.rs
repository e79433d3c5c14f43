//! Command implementations
//!
//! Each command takes an already-wired [`KeyManager`] so it can run against
//! any secret store. Calls are blocking; the binary runs them off the async
//! runtime.

use tracing::info;

use credvault_core::{verify_secret, KeyManager, KeyOrigin, SecretRecord};

use crate::error::{CliError, Result};

/// Outcome of `credvault init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub origin: KeyOrigin,
    pub persistent: bool,
}

/// Outcome of `credvault status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub backend: &'static str,
    pub persistent: bool,
    pub key_present: bool,
}

/// Load the master key, creating and saving one when none exists yet
pub fn init(manager: &KeyManager) -> Result<InitReport> {
    let (_key, origin) = manager.load_or_generate()?;

    if origin == KeyOrigin::Generated {
        info!("Created master key in {}", manager.backend_name());
    }

    Ok(InitReport {
        origin,
        persistent: manager.is_persistent(),
    })
}

pub fn status(manager: &KeyManager) -> Result<StatusReport> {
    Ok(StatusReport {
        backend: manager.backend_name(),
        persistent: manager.is_persistent(),
        key_present: manager.get_key()?.is_some(),
    })
}

/// Encrypt `secret` under the stored master key
pub fn encrypt(manager: &KeyManager, secret: &str) -> Result<SecretRecord> {
    let key = manager.get_key()?.ok_or(CliError::KeyMissing)?;
    Ok(SecretRecord::seal_plaintext(secret, &key)?)
}

/// Check `candidate` against a JSON-encoded [`SecretRecord`]
pub fn verify(manager: &KeyManager, record_json: &str, candidate: &str) -> Result<bool> {
    let record: SecretRecord = serde_json::from_str(record_json)?;
    let key = manager.get_key()?.ok_or(CliError::KeyMissing)?;
    Ok(verify_secret(candidate, &record, &key)?)
}

/// Delete the stored master key
pub fn reset(manager: &KeyManager, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(CliError::NotConfirmed);
    }
    manager.delete_key()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credvault_core::{KeyIdentity, MemoryStore, UnavailableStore};
    use std::sync::Arc;

    fn memory_manager() -> KeyManager {
        KeyManager::new(Arc::new(MemoryStore::new()), KeyIdentity::default())
    }

    #[test]
    fn test_init_is_idempotent() {
        let manager = memory_manager();

        let first = init(&manager).unwrap();
        assert_eq!(first.origin, KeyOrigin::Generated);
        assert!(first.persistent);

        let second = init(&manager).unwrap();
        assert_eq!(second.origin, KeyOrigin::Loaded);
    }

    #[test]
    fn test_status_reflects_key_presence() {
        let manager = memory_manager();
        assert!(!status(&manager).unwrap().key_present);

        init(&manager).unwrap();

        let report = status(&manager).unwrap();
        assert!(report.key_present);
        assert_eq!(report.backend, "In-Memory Store");
    }

    #[test]
    fn test_encrypt_then_verify() {
        let manager = memory_manager();
        init(&manager).unwrap();

        let record = encrypt(&manager, "hunter2").unwrap();
        let json = serde_json::to_string(&record).unwrap();

        assert!(verify(&manager, &json, "hunter2").unwrap());
        assert!(!verify(&manager, &json, "hunter3").unwrap());
    }

    #[test]
    fn test_encrypt_without_key() {
        let manager = memory_manager();
        assert!(matches!(
            encrypt(&manager, "hunter2").unwrap_err(),
            CliError::KeyMissing
        ));
    }

    #[test]
    fn test_unavailable_store_never_has_key() {
        let manager = KeyManager::new(Arc::new(UnavailableStore), KeyIdentity::default());

        let report = init(&manager).unwrap();
        assert!(!report.persistent);
        assert!(matches!(
            encrypt(&manager, "hunter2").unwrap_err(),
            CliError::KeyMissing
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_record() {
        let manager = memory_manager();
        init(&manager).unwrap();

        assert!(matches!(
            verify(&manager, "{\"ciphertext\":\"zz\"}", "x").unwrap_err(),
            CliError::InvalidRecord(_)
        ));
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let manager = memory_manager();
        init(&manager).unwrap();

        assert!(matches!(reset(&manager, false).unwrap_err(), CliError::NotConfirmed));
        assert!(status(&manager).unwrap().key_present);

        reset(&manager, true).unwrap();
        assert!(!status(&manager).unwrap().key_present);
    }
}
