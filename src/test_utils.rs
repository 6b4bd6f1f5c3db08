//! Test utilities and shared configuration.
//!
//! Common helpers for unit tests and, behind the `testing` feature, for
//! downstream integration tests.

use http::request::Parts;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use crate::config::{Config, DemoAccount, LoginError};
use crate::core::collaborators::{Checker, StaticChecker};
use crate::core::report::FailureReporter;
use crate::security::crypto::{CookieAttributes, CookieCrypto};

/// Fixed key used by test configurations.
pub const TEST_KEY: [u8; 16] = *b"0123456789abcdef";

/// The account from the login walkthrough: `you@example.com` / `testtest` → `u123`.
#[must_use]
pub fn example_account() -> DemoAccount {
    DemoAccount {
        username: "you@example.com".to_string(),
        password: "testtest".to_string(),
        login_key: "u123".to_string(),
    }
}

/// Checker accepting only [`example_account`].
#[must_use]
pub fn example_checker() -> impl Checker {
    StaticChecker::new(example_account())
}

/// Creates a standard configuration for testing purposes.
///
/// # Panics
///
/// Panics if [`TEST_KEY`] is rejected, which would be a bug in the cipher setup.
#[must_use]
pub fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        crypto: CookieCrypto::new(&TEST_KEY).expect("test key is 16 bytes"),
        cookie: CookieAttributes {
            path: Some("/".to_string()),
            ..CookieAttributes::default()
        },
        method_override_param: Some("_method".to_string()),
        max_body_bytes: 1024,
        concurrency_limit: 16,
        demo_account: Some(example_account()),
        log_format: "pretty".to_string(),
    })
}

/// Failure reporter that keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Recorded error messages, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if a reporting thread panicked while holding the lock.
    #[must_use]
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().expect("reporter lock").clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports().is_empty()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, _request: &Parts, error: &LoginError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(error.to_string());
        }
    }
}
