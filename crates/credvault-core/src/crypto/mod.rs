//! Cryptographic primitives for credential protection
//!
//! This module provides:
//! - AES-256-CBC encryption with a fresh random IV per call
//! - AES-256-GCM authenticated sealing
//! - Secure memory handling with zeroize

mod cipher;
mod sealed;
mod secure_memory;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, VaultError};

pub use cipher::{decrypt, encrypt, BLOCK_LEN};
pub use sealed::{open, seal, SealedSecret};
pub use secure_memory::{Iv, MasterKey, SecretString, IV_LEN, KEY_LEN};

/// Fill `buf` from the operating system's secure random source.
///
/// Never falls back to a userspace generator.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| VaultError::Entropy(e.to_string()))
}
