//! Authenticated identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unique key associated with a successful login.
pub trait Identity: Send + Sync {
    fn login_key(&self) -> &str;
}

/// Plain string identity, serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginKey(String);

impl LoginKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl Identity for LoginKey {
    fn login_key(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LoginKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for LoginKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for LoginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
