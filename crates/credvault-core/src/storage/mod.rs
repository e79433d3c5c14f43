//! Secret store backends for master key persistence
//!
//! This module provides three backends:
//! 1. OS Keychain (macOS Keychain, Windows Credential Manager, Secret Service)
//! 2. In-memory (tests and ephemeral sessions)
//! 3. Unavailable (hosts with no secure storage facility)

mod keychain;
mod memory;
mod traits;
mod unavailable;

pub use keychain::KeychainStore;
pub use memory::MemoryStore;
pub use traits::SecretStore;
pub use unavailable::UnavailableStore;
