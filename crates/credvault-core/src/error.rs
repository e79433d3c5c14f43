//! Error types for credvault-core

use thiserror::Error;

/// Result type alias for credvault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Why a decryption did not validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
    /// Ciphertext is empty or not a whole number of cipher blocks
    Length,
    /// Padding was invalid after decryption (wrong key, wrong IV or corrupted data)
    Padding,
    /// Decrypted bytes are not valid UTF-8
    Encoding,
    /// Authentication tag did not match (sealed secrets only)
    Authentication,
}

impl std::fmt::Display for DecryptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            DecryptFailure::Length => "ciphertext length is not a multiple of the block size",
            DecryptFailure::Padding => "invalid padding",
            DecryptFailure::Encoding => "plaintext is not valid UTF-8",
            DecryptFailure::Authentication => "authentication tag mismatch",
        };
        f.write_str(reason)
    }
}

/// Credential vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("Decryption failed: {0}")]
    Decryption(DecryptFailure),

    #[error("Stored key material is corrupt: {0}")]
    KeyMaterialCorrupt(String),

    #[error("Secret store error: {0}")]
    SecretStore(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VaultError {
    /// True when the error is an expected negative result of decryption
    /// (wrong key, wrong IV, corrupted record) rather than a programmer error
    /// or an operational failure.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, VaultError::Decryption(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_failure_classification() {
        assert!(VaultError::Decryption(DecryptFailure::Padding).is_decryption_failure());
        assert!(!VaultError::InvalidKeyLength { expected: 32, actual: 16 }.is_decryption_failure());
        assert!(!VaultError::Entropy("exhausted".to_string()).is_decryption_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = VaultError::InvalidKeyLength { expected: 32, actual: 31 };
        assert_eq!(err.to_string(), "Invalid key length: expected 32 bytes, got 31");

        let err = VaultError::Decryption(DecryptFailure::Padding);
        assert_eq!(err.to_string(), "Decryption failed: invalid padding");
    }

    #[test]
    fn test_codec_errors_convert() {
        let err: VaultError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, VaultError::Io(_)));

        let err: VaultError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, VaultError::Serialization(_)));
        assert!(!err.is_decryption_failure());
    }
}
