//! AES-256-GCM authenticated sealing
//!
//! Text format: `{nonce_hex}:{tag_hex}:{ciphertext_hex}`
//! - Nonce: 12 bytes (96 bits) - standard for GCM
//! - Auth tag: 16 bytes (128 bits)
//! - Ciphertext: variable length
//!
//! Unlike the CBC cipher, any change to the nonce, tag, ciphertext or
//! associated data is detected on open.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};

use zeroize::Zeroizing;

use super::cipher::plaintext_to_secret;
use super::{fill_random, MasterKey, SecretString};
use crate::error::{DecryptFailure, Result, VaultError};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Sealed secret with nonce and auth tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    /// Nonce (12 bytes for GCM)
    pub nonce: [u8; NONCE_LEN],
    /// Authentication tag (16 bytes)
    pub tag: [u8; TAG_LEN],
    /// Encrypted ciphertext
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Display for SealedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl std::str::FromStr for SealedSecret {
    type Err = VaultError;

    /// Parse from the format: `{nonce_hex}:{tag_hex}:{ciphertext_hex}`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(VaultError::Encoding(
                "Invalid sealed secret format: expected nonce:tag:ciphertext".to_string(),
            ));
        }

        let nonce_bytes = hex::decode(parts[0])
            .map_err(|e| VaultError::Encoding(format!("Invalid nonce hex: {}", e)))?;
        let tag_bytes = hex::decode(parts[1])
            .map_err(|e| VaultError::Encoding(format!("Invalid tag hex: {}", e)))?;
        let ciphertext = hex::decode(parts[2])
            .map_err(|e| VaultError::Encoding(format!("Invalid ciphertext hex: {}", e)))?;

        let nonce: [u8; NONCE_LEN] = nonce_bytes.as_slice().try_into().map_err(|_| {
            VaultError::Encoding(format!(
                "Invalid nonce length: expected {}, got {}",
                NONCE_LEN,
                nonce_bytes.len()
            ))
        })?;
        let tag: [u8; TAG_LEN] = tag_bytes.as_slice().try_into().map_err(|_| {
            VaultError::Encoding(format!(
                "Invalid tag length: expected {}, got {}",
                TAG_LEN,
                tag_bytes.len()
            ))
        })?;

        Ok(Self {
            nonce,
            tag,
            ciphertext,
        })
    }
}

fn cipher_for(key: &MasterKey) -> Aes256Gcm {
    Aes256Gcm::new(key.as_bytes().into())
}

/// Seal plaintext using AES-256-GCM
///
/// `aad` is authenticated but not encrypted; the same bytes must be passed to
/// [`open`]. Use it to bind a secret to its owner (e.g. a profile name).
pub fn seal(plaintext: &str, key: &MasterKey, aad: &[u8]) -> Result<SealedSecret> {
    let cipher = cipher_for(key);

    let mut nonce = [0u8; NONCE_LEN];
    fill_random(&mut nonce)?;

    // aes-gcm appends the auth tag to the ciphertext
    let mut ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext.as_bytes(),
                aad,
            },
        )
        .map_err(|e| VaultError::Encoding(format!("Sealing failed: {}", e)))?;

    let tag_start = ciphertext.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&ciphertext[tag_start..]);
    ciphertext.truncate(tag_start);

    Ok(SealedSecret {
        nonce,
        tag,
        ciphertext,
    })
}

/// Open a [`SealedSecret`], verifying its tag over ciphertext and `aad`
pub fn open(sealed: &SealedSecret, key: &MasterKey, aad: &[u8]) -> Result<SecretString> {
    let cipher = cipher_for(key);

    // Reconstruct ciphertext with tag appended (as expected by aes-gcm)
    let mut ciphertext_with_tag = Vec::with_capacity(sealed.ciphertext.len() + TAG_LEN);
    ciphertext_with_tag.extend_from_slice(&sealed.ciphertext);
    ciphertext_with_tag.extend_from_slice(&sealed.tag);

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&sealed.nonce),
            Payload {
                msg: &ciphertext_with_tag,
                aad,
            },
        )
        .map(Zeroizing::new)
        .map_err(|_| VaultError::Decryption(DecryptFailure::Authentication))?;

    plaintext_to_secret(&plaintext)
}
