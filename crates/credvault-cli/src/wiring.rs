//! Startup platform detection: choose the secret store and build the key manager

use std::sync::Arc;
use tracing::{debug, info};

use credvault_core::{
    KeyManager, KeychainStore, SecretStore, Settings, StoreBackend, UnavailableStore,
};

use crate::error::{CliError, Result};

/// Pick a secret store for `backend`.
///
/// `Auto` checks the OS keychain and falls back to [`UnavailableStore`].
/// `Keychain` fails when that check does.
pub fn select_store(backend: StoreBackend, service: &str) -> Result<Arc<dyn SecretStore>> {
    match backend {
        StoreBackend::None => Ok(Arc::new(UnavailableStore)),
        StoreBackend::Keychain => KeychainStore::detect(service)
            .map(|store| Arc::new(store) as Arc<dyn SecretStore>)
            .ok_or(CliError::KeychainUnavailable),
        StoreBackend::Auto => match KeychainStore::detect(service) {
            Some(store) => {
                info!("Using {}", store.backend_name());
                Ok(Arc::new(store))
            }
            None => {
                // KeyManager warns on the first save that cannot persist
                debug!("OS keychain not available, falling back to no persistence");
                Ok(Arc::new(UnavailableStore))
            }
        },
    }
}

/// Build a key manager from settings. The keychain check runs on a blocking thread.
pub async fn build_key_manager(settings: &Settings, backend: StoreBackend) -> Result<KeyManager> {
    let service = settings.key_service.clone();
    let store = tokio::task::spawn_blocking(move || select_store(backend, &service)).await??;
    Ok(KeyManager::new(store, settings.key_identity()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_backend_is_unavailable() {
        let store = select_store(StoreBackend::None, "credvault-test").unwrap();
        assert!(!store.is_available());
    }

    #[tokio::test]
    async fn test_build_key_manager_uses_settings_identity() {
        let mut settings = Settings::default();
        settings.key_account = "test-account".to_string();

        let manager = build_key_manager(&settings, StoreBackend::None).await.unwrap();

        assert_eq!(manager.identity().account, "test-account");
        assert!(!manager.is_persistent());
    }
}
