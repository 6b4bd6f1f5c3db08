//! Library definitions.
//!
//! Stateless login sessions carried in AES-GCM encrypted cookies, with
//! pluggable credential checking and session persistence.

pub mod config;
pub mod core;
pub mod security;
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use config::{Config, DemoAccount, LoginError, Result};
pub use core::{
    Checker, CheckerFn, CookieSession, FailureReporter, Identity, LoginHandler, LoginKey, Reader,
    ReaderFn, StaticChecker, TracingReporter, Writer, WriterFn,
};
pub use security::crypto::{
    CookieAttributes, CookieCrypto, clear_secure_cookie, decode_secure_cookie, decrypt,
    encode_secure_cookie, encrypt,
};
pub use web::{AppState, route, run, serve};
