//! Encrypted JSON cookies.
//!
//! Serializes a value to JSON, seals it with [`CookieCrypto`] and carries the
//! blob as an unpadded base64url cookie value.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use http::HeaderMap;
use http::header::{COOKIE, HeaderValue, SET_COOKIE};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::aead::CookieCrypto;
use crate::config::{LoginError, Result};

pub const DEFAULT_COOKIE_NAME: &str = "login";
pub const DEFAULT_MAX_AGE_SECS: i64 = 8 * 60 * 60;

/// Transport attributes of the token cookie.
///
/// Empty or zero fields fall back to the defaults: name `login`, eight hours
/// max-age, HTTP-only. `secure`, `same_site`, `path` and `domain` have no
/// default and are only emitted when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAttributes {
    pub name: String,
    pub max_age_secs: i64,
    pub http_only: Option<bool>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub path: Option<String>,
    pub domain: Option<String>,
}

impl CookieAttributes {
    #[must_use]
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_COOKIE_NAME
        } else {
            &self.name
        }
    }

    #[must_use]
    pub fn max_age_secs(&self) -> i64 {
        if self.max_age_secs == 0 {
            DEFAULT_MAX_AGE_SECS
        } else {
            self.max_age_secs
        }
    }

    #[must_use]
    pub fn http_only(&self) -> bool {
        self.http_only.unwrap_or(true)
    }

    fn build(&self, value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name().to_string(), value))
            .max_age(Duration::seconds(self.max_age_secs()))
            .http_only(self.http_only());

        if self.secure {
            builder = builder.secure(true);
        }
        if let Some(same_site) = self.same_site {
            builder = builder.same_site(same_site);
        }
        if let Some(path) = &self.path {
            builder = builder.path(path.clone());
        }
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        builder.build()
    }
}

/// Seals `value` and appends it to `headers` as a `Set-Cookie`.
///
/// `attributes` of `None` means all defaults.
///
/// # Errors
///
/// `LoginError::Serialization` if `value` is not representable as JSON,
/// `LoginError::Encryption` if sealing fails and `LoginError::Storage` if the
/// cookie cannot be turned into a header value.
pub fn encode_secure_cookie<T: Serialize + ?Sized>(
    headers: &mut HeaderMap,
    attributes: Option<&CookieAttributes>,
    crypto: &CookieCrypto,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_vec(value).map_err(LoginError::Serialization)?;
    let blob = crypto.seal(&json)?;

    let defaults = CookieAttributes::default();
    let cookie = attributes
        .unwrap_or(&defaults)
        .build(URL_SAFE_NO_PAD.encode(blob));
    append_set_cookie(headers, &cookie)
}

/// Reads the named cookie from request headers and opens it into `T`.
///
/// An empty `name` means [`DEFAULT_COOKIE_NAME`].
///
/// # Errors
///
/// `LoginError::NotFound` when the cookie is absent or empty. A present but
/// unusable cookie yields `Decode`, `Authentication` or `Deserialization`;
/// [`LoginError::is_invalid_token`] covers all three.
pub fn decode_secure_cookie<T: DeserializeOwned>(
    headers: &HeaderMap,
    name: &str,
    crypto: &CookieCrypto,
) -> Result<T> {
    let name = if name.is_empty() {
        DEFAULT_COOKIE_NAME
    } else {
        name
    };

    let value = find_cookie(headers, name).ok_or(LoginError::NotFound)?;
    let blob = URL_SAFE_NO_PAD
        .decode(value.as_bytes())
        .map_err(|_| LoginError::Decode)?;
    let json = crypto.open(&blob)?;
    serde_json::from_slice(&json).map_err(LoginError::Deserialization)
}

/// Appends a removal cookie (empty value, zero max-age, expiry in the past).
///
/// Name, path and domain must match the cookie being cleared.
///
/// # Errors
///
/// `LoginError::Storage` if the cookie cannot be turned into a header value.
pub fn clear_secure_cookie(
    headers: &mut HeaderMap,
    attributes: Option<&CookieAttributes>,
) -> Result<()> {
    let defaults = CookieAttributes::default();
    let mut cookie = attributes.unwrap_or(&defaults).build(String::new());
    cookie.make_removal();
    append_set_cookie(headers, &cookie)
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) -> Result<()> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| LoginError::Storage(format!("invalid Set-Cookie header: {e}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| Cookie::split_parse(header))
        .filter_map(std::result::Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
