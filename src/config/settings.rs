//! Configuration settings.
//!
//! Defines the main `Config` struct and environment variable loading logic.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use cookie::SameSite;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use super::error::{LoginError, Result};
use crate::core::handler::DEFAULT_METHOD_OVERRIDE_PARAM;
use crate::security::crypto::{
    CookieAttributes, CookieCrypto, DEFAULT_COOKIE_NAME, DEFAULT_MAX_AGE_SECS, KEY_LEN,
};

/// Single demo account accepted by the bundled server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoAccount {
    pub username: String,
    pub password: String,
    pub login_key: String,
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub listen_addr: SocketAddr,
    /// Cipher for the login cookie, built from `COOKIE_KEY`.
    pub crypto: CookieCrypto,
    /// Login cookie transport attributes.
    pub cookie: CookieAttributes,
    /// Query parameter that overrides the request method; `None` disables overrides.
    pub method_override_param: Option<String>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Maximum number of connections served at once.
    pub concurrency_limit: usize,
    /// Optional account for the bundled checker.
    pub demo_account: Option<DemoAccount>,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Config` if `COOKIE_KEY` is missing or is not 16 bytes
    /// of hex/base64 key material, or if any other variable has an invalid value.
    pub fn from_env() -> Result<Arc<Self>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Arc<Self>> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = parse_or(&get, "LISTEN_ADDR", "127.0.0.1:8080".parse().ok())?;

        let raw_key = get("COOKIE_KEY")
            .ok_or_else(|| LoginError::Config("COOKIE_KEY must be set".to_string()))?;
        let key = parse_key_material(&raw_key).ok_or_else(|| {
            LoginError::Config(format!(
                "COOKIE_KEY must be {KEY_LEN} bytes encoded as hex or base64"
            ))
        })?;
        let crypto = CookieCrypto::new(&key)?;

        let same_site = get("COOKIE_SAME_SITE")
            .map(|v| parse_same_site(&v))
            .transpose()?;
        let max_age_secs: i64 = parse_or(&get, "COOKIE_MAX_AGE_SECS", Some(DEFAULT_MAX_AGE_SECS))?;
        if max_age_secs < 0 {
            return Err(LoginError::Config(format!(
                "COOKIE_MAX_AGE_SECS must not be negative, got {max_age_secs}"
            )));
        }

        let cookie = CookieAttributes {
            name: get("COOKIE_NAME").unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            max_age_secs,
            http_only: Some(true),
            secure: get("COOKIE_SECURE").is_some_and(|v| parse_bool(&v)),
            same_site,
            path: Some(get("COOKIE_PATH").unwrap_or_else(|| "/".to_string())),
            domain: get("COOKIE_DOMAIN"),
        };

        // Present-but-empty disables the override, absent keeps the default.
        let method_override_param = match lookup("METHOD_OVERRIDE_PARAM") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => Some(DEFAULT_METHOD_OVERRIDE_PARAM.to_string()),
        };

        let demo_account = match get("DEMO_USERNAME") {
            Some(username) => Some(DemoAccount {
                username,
                password: get("DEMO_PASSWORD").ok_or_else(|| {
                    LoginError::Config("DEMO_PASSWORD must be set with DEMO_USERNAME".to_string())
                })?,
                login_key: get("DEMO_LOGIN_KEY").ok_or_else(|| {
                    LoginError::Config("DEMO_LOGIN_KEY must be set with DEMO_USERNAME".to_string())
                })?,
            }),
            None => None,
        };

        let max_body_bytes: usize = parse_or(&get, "MAX_BODY_BYTES", Some(64 * 1024))?;
        if max_body_bytes == 0 {
            return Err(LoginError::Config(
                "MAX_BODY_BYTES must be greater than zero".to_string(),
            ));
        }

        Ok(Arc::new(Self {
            listen_addr,
            crypto,
            cookie,
            method_override_param,
            max_body_bytes,
            concurrency_limit: parse_or(&get, "CONCURRENCY_LIMIT", Some(1024))?,
            demo_account,
            log_format: get("LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
        }))
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Option<T>,
) -> Result<T> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LoginError::Config(format!("{key} has an invalid value: {raw}"))),
        None => default.ok_or_else(|| LoginError::Config(format!("{key} must be set"))),
    }
}

fn parse_bool(raw: &str) -> bool {
    let v = raw.trim();
    v.eq_ignore_ascii_case("true") || v == "1"
}

fn parse_same_site(raw: &str) -> Result<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" => Ok(SameSite::None),
        other => Err(LoginError::Config(format!(
            "COOKIE_SAME_SITE must be strict, lax or none, got {other}"
        ))),
    }
}

/// Decodes a 16-byte key given as hex, unpadded base64url or standard base64.
#[must_use]
pub fn parse_key_material(raw: &str) -> Option<[u8; KEY_LEN]> {
    let trimmed = raw.trim();

    if trimmed.len() == KEY_LEN * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(trimmed).ok()?.try_into().ok();
    }

    if let Ok(bytes) = URL_SAFE_NO_PAD.decode(trimmed) {
        if let Ok(key) = bytes.try_into() {
            return Some(key);
        }
    }

    STANDARD.decode(trimmed).ok()?.try_into().ok()
}
