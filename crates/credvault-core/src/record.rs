//! Secret records and credential verification
//!
//! A [`SecretRecord`] is what a caller persists for one protected value: the
//! CBC ciphertext and its IV as two sibling fields. This crate never writes
//! records anywhere itself.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::crypto::{decrypt, encrypt, Iv, MasterKey, SecretString};
use crate::error::{Result, VaultError};

/// Ciphertext plus the IV it was produced with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    #[serde(with = "hex_bytes")]
    pub ciphertext: Vec<u8>,
    pub iv: Iv,
}

impl SecretRecord {
    /// Encrypt `plaintext` under `key` with a fresh IV
    pub fn seal_plaintext(plaintext: &str, key: &MasterKey) -> Result<Self> {
        let (ciphertext, iv) = encrypt(plaintext, key)?;
        Ok(Self { ciphertext, iv })
    }

    /// Rebuild a record from separately stored columns
    pub fn from_parts(ciphertext: Vec<u8>, iv: &[u8]) -> Result<Self> {
        Ok(Self {
            ciphertext,
            iv: Iv::from_slice(iv)?,
        })
    }

    /// Decrypt the record
    pub fn open(&self, key: &MasterKey) -> Result<SecretString> {
        decrypt(&self.ciphertext, &self.iv, key)
    }
}

/// Check a candidate secret (e.g. a password typed at login) against a record.
///
/// Returns `Ok(false)` when the record does not decrypt under `key` or the
/// plaintext differs. Programmer errors and entropy failures still propagate.
pub fn verify_secret(candidate: &str, record: &SecretRecord, key: &MasterKey) -> Result<bool> {
    match record.open(key) {
        Ok(stored) => Ok(stored.expose().as_bytes().ct_eq(candidate.as_bytes()).into()),
        Err(VaultError::Decryption(reason)) => {
            debug!("Record did not decrypt during verification: {}", reason);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
