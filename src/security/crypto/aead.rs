//! Authenticated encryption.
//!
//! AES-128-GCM with a fresh random nonce per seal. Sealed blobs are laid out
//! as `nonce || ciphertext || tag` and carry no other framing.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes128Gcm, Nonce};
use std::fmt;

use crate::config::{LoginError, Result};

/// Required key length in bytes.
pub const KEY_LEN: usize = 16;
/// Nonce length in bytes, prefixed to every blob.
pub const NONCE_LEN: usize = 12;
/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// AES-GCM cipher bound to a validated key.
///
/// Cloning is cheap and every call is independent, so one instance can be
/// shared across any number of concurrent requests.
#[derive(Clone)]
pub struct CookieCrypto {
    cipher: Aes128Gcm,
}

impl CookieCrypto {
    /// Creates a cipher from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Config` unless `key` is exactly [`KEY_LEN`] bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(LoginError::Config(format!(
                "cookie key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        let cipher = Aes128Gcm::new_from_slice(key)
            .map_err(|_| LoginError::Config("invalid AES-128 key".to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypts `plaintext` under a freshly generated nonce.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Encryption` if the OS random source or the cipher fails.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| LoginError::Encryption(format!("random source unavailable: {e}")))?;

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| LoginError::Encryption("AES-GCM seal failed".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&sealed);
        Ok(blob)
    }

    /// Decrypts and authenticates a blob produced by [`CookieCrypto::seal`].
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Authentication` for any blob that does not open,
    /// whatever the reason.
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(LoginError::Authentication);
        }

        let (nonce, sealed) = blob.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| LoginError::Authentication)
    }
}

impl fmt::Debug for CookieCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieCrypto").finish_non_exhaustive()
    }
}

/// One-shot encryption under a raw key.
///
/// # Errors
///
/// `LoginError::Config` on a wrong key length, `LoginError::Encryption` if sealing fails.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    CookieCrypto::new(key)?.seal(plaintext)
}

/// One-shot decryption under a raw key.
///
/// # Errors
///
/// `LoginError::Config` on a wrong key length, `LoginError::Authentication` otherwise.
pub fn decrypt(key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    CookieCrypto::new(key)?.open(blob)
}
