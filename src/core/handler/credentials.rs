//! Login credential extraction.

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use serde::Deserialize;
use std::fmt;

use crate::config::{LoginError, Result};

/// Username and password from a login request. Lives for one check only.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parses a JSON body when the content type says so, form fields otherwise.
    ///
    /// Missing fields are left empty for the checker to reject.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::BadInput` if a JSON body does not parse.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self> {
        if is_json(headers) {
            return serde_json::from_slice(body).map_err(|e| LoginError::BadInput(e.to_string()));
        }

        let mut credentials = Self::default();
        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "username" => credentials.username = value.into_owned(),
                "password" => credentials.password = value.into_owned(),
                _ => {}
            }
        }
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}
