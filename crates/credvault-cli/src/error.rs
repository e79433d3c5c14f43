//! Error types for the credvault CLI

use thiserror::Error;

use credvault_core::VaultError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("No master key found - run `credvault init` first")]
    KeyMissing,

    #[error("OS keychain is not available on this host")]
    KeychainUnavailable,

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("Refusing to delete the master key without --yes")]
    NotConfirmed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
