//! AES-256-CBC encryption with PKCS#7 padding
//!
//! Ciphertext is raw block cipher output: no header, no embedded IV, no
//! length prefix. The IV is returned separately and must be stored by the
//! caller next to the ciphertext.
//!
//! This mode provides confidentiality only. A wrong key or IV can decrypt to
//! garbage without an error; see [`super::seal`] for tamper detection.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;

use zeroize::Zeroizing;

use super::{fill_random, Iv, MasterKey, SecretString, IV_LEN};
use crate::error::{DecryptFailure, Result, VaultError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes
pub const BLOCK_LEN: usize = 16;

/// Encrypt a string using AES-256-CBC under a freshly generated IV
///
/// # Arguments
/// * `plaintext` - The secret to encrypt, encoded as UTF-8
/// * `key` - The 256-bit master key
///
/// # Returns
/// The ciphertext and the IV it was produced with
pub fn encrypt(plaintext: &str, key: &MasterKey) -> Result<(Vec<u8>, Iv)> {
    let mut iv = [0u8; IV_LEN];
    fill_random(&mut iv)?;
    let iv = Iv::new(iv);

    let ciphertext = encrypt_with_iv(plaintext.as_bytes(), key, &iv)?;
    Ok((ciphertext, iv))
}

pub(crate) fn encrypt_with_iv(plaintext: &[u8], key: &MasterKey, iv: &Iv) -> Result<Vec<u8>> {
    // Key schedule is zeroized when the encryptor drops
    let encryptor = Aes256CbcEnc::new(key.as_bytes().into(), iv.as_bytes().into());

    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext produced by [`encrypt`]
///
/// Requires the exact key and IV used for encryption. Fails with
/// [`VaultError::Decryption`] when the ciphertext is malformed, the padding
/// does not validate, or the result is not UTF-8. A wrong key or IV may
/// still "succeed" and return different text.
pub fn decrypt(ciphertext: &[u8], iv: &Iv, key: &MasterKey) -> Result<SecretString> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(VaultError::Decryption(DecryptFailure::Length));
    }

    let decryptor = Aes256CbcDec::new(key.as_bytes().into(), iv.as_bytes().into());

    // Decrypt in place so every exit path wipes the plaintext blocks
    let mut buf = Zeroizing::new(ciphertext.to_vec());
    let len = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buf[..])
        .map_err(|_| VaultError::Decryption(DecryptFailure::Padding))?
        .len();

    plaintext_to_secret(&buf[..len])
}

/// UTF-8 decode a decrypted buffer owned (and wiped) by the caller
pub(crate) fn plaintext_to_secret(bytes: &[u8]) -> Result<SecretString> {
    std::str::from_utf8(bytes)
        .map(|text| SecretString::new(text.to_owned()))
        .map_err(|_| VaultError::Decryption(DecryptFailure::Encoding))
}
