//! # credvault-core
//!
//! Credential protection for applications that store secrets at rest:
//! - Random 256-bit master key, persisted in the OS keychain where one exists
//! - AES-256-CBC encryption with a fresh IV per secret
//! - AES-256-GCM sealing for callers that need tamper detection
//! - Zeroize-on-drop key and plaintext handling

pub mod crypto;
pub mod error;
pub mod key_manager;
pub mod record;
pub mod settings;
pub mod storage;

pub use crypto::{decrypt, encrypt, open, seal, Iv, MasterKey, SealedSecret, SecretString};
pub use error::{DecryptFailure, Result, VaultError};
pub use key_manager::{KeyIdentity, KeyManager, KeyOrigin};
pub use record::{verify_secret, SecretRecord};
pub use settings::{Settings, SettingsManager, StoreBackend};
pub use storage::{KeychainStore, MemoryStore, SecretStore, UnavailableStore};
