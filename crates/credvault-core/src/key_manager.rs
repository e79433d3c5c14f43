//! Master key lifecycle: generate, persist, retrieve

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::crypto::{fill_random, MasterKey, KEY_LEN};
use crate::error::{Result, VaultError};
use crate::storage::SecretStore;

/// Fixed (service, account) pair addressing the master key in the secret store.
///
/// Must be identical on every launch or the stored key will not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyIdentity {
    pub service: String,
    pub account: String,
}

impl KeyIdentity {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

impl Default for KeyIdentity {
    fn default() -> Self {
        Self::new("credvault", "credvault-master-key")
    }
}

/// Where the key returned by [`KeyManager::load_or_generate`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Found in the secret store
    Loaded,
    /// Freshly generated and handed to the secret store
    Generated,
}

/// Produces, persists and retrieves the single master key.
pub struct KeyManager {
    store: Arc<dyn SecretStore>,
    identity: KeyIdentity,
    warned_unavailable: AtomicBool,
}

impl KeyManager {
    /// Create a key manager over an injected secret store
    pub fn new(store: Arc<dyn SecretStore>, identity: KeyIdentity) -> Self {
        Self {
            store,
            identity,
            warned_unavailable: AtomicBool::new(false),
        }
    }

    /// Generate a new random 256-bit master key from the OS random source
    pub fn generate_key() -> Result<MasterKey> {
        let mut bytes = zeroize::Zeroizing::new([0u8; KEY_LEN]);
        fill_random(&mut bytes[..])?;
        Ok(MasterKey::new(*bytes))
    }

    /// Persist `key` in the secret store.
    ///
    /// On a store without secure storage this is a silent no-op: the key will
    /// not survive a restart.
    pub fn save_key(&self, key: &MasterKey) -> Result<()> {
        if !self.store.is_available() {
            self.warn_unavailable_once();
            return Ok(());
        }

        self.store
            .store(&self.identity.service, &self.identity.account, key.as_bytes())?;

        debug!(
            "Saved master key to {} ({}/{})",
            self.store.backend_name(),
            self.identity.service,
            self.identity.account
        );
        Ok(())
    }

    /// Log the missing-persistence warning the first time only. Returns
    /// whether this call emitted it.
    fn warn_unavailable_once(&self) -> bool {
        if self.warned_unavailable.swap(true, Ordering::Relaxed) {
            return false;
        }
        warn!(
            "No secure storage available ({}); master key will not persist across restarts",
            self.store.backend_name()
        );
        true
    }

    /// Look up the stored master key. Never generates one.
    pub fn get_key(&self) -> Result<Option<MasterKey>> {
        if !self.store.is_available() {
            return Ok(None);
        }

        let stored = self
            .store
            .retrieve(&self.identity.service, &self.identity.account)?;

        match stored {
            Some(bytes) => {
                let bytes = zeroize::Zeroizing::new(bytes);
                let key = MasterKey::from_slice(&bytes).map_err(|_| {
                    VaultError::KeyMaterialCorrupt(format!(
                        "expected {} bytes, found {}",
                        KEY_LEN,
                        bytes.len()
                    ))
                })?;
                debug!("Loaded master key from {}", self.store.backend_name());
                Ok(Some(key))
            }
            None => {
                debug!("No master key in {}", self.store.backend_name());
                Ok(None)
            }
        }
    }

    /// Remove the stored master key. Secrets encrypted under it become unrecoverable.
    pub fn delete_key(&self) -> Result<()> {
        self.store
            .delete(&self.identity.service, &self.identity.account)?;
        info!("Deleted master key from {}", self.store.backend_name());
        Ok(())
    }

    /// Return the stored key, or generate and save a new one when absent
    pub fn load_or_generate(&self) -> Result<(MasterKey, KeyOrigin)> {
        if let Some(key) = self.get_key()? {
            return Ok((key, KeyOrigin::Loaded));
        }

        let key = Self::generate_key()?;
        self.save_key(&key)?;
        info!("Generated new master key");
        Ok((key, KeyOrigin::Generated))
    }

    /// Whether saved keys survive process restart
    pub fn is_persistent(&self) -> bool {
        self.store.is_available()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn identity(&self) -> &KeyIdentity {
        &self.identity
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("backend", &self.store.backend_name())
            .field("identity", &self.identity)
            .finish()
    }
}
