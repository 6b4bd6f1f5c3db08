//! Cryptographic utilities.
//!
//! Provides the AEAD codec and the encrypted cookie protocol built on it.

pub mod aead;
pub mod cookie;

pub use aead::{CookieCrypto, KEY_LEN, NONCE_LEN, TAG_LEN, decrypt, encrypt};
pub use cookie::{
    CookieAttributes, DEFAULT_COOKIE_NAME, DEFAULT_MAX_AGE_SECS, clear_secure_cookie,
    decode_secure_cookie, encode_secure_cookie,
};
