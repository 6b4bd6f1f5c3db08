//! Cookie-backed sessions.
//!
//! Carries the login key in an encrypted cookie. Acts as both the [`Writer`]
//! for the login handler and the [`Reader`] for routes that need to know who
//! is logged in.

use async_trait::async_trait;
use http::HeaderMap;
use http::request::Parts;

use super::collaborators::{Reader, Writer};
use super::identity::{Identity, LoginKey};
use crate::config::{Config, Result};
use crate::security::crypto::{
    CookieAttributes, CookieCrypto, clear_secure_cookie, decode_secure_cookie,
    encode_secure_cookie,
};

#[derive(Debug, Clone)]
pub struct CookieSession {
    crypto: CookieCrypto,
    attributes: CookieAttributes,
}

impl CookieSession {
    #[must_use]
    pub fn new(crypto: CookieCrypto, attributes: CookieAttributes) -> Self {
        Self { crypto, attributes }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.crypto.clone(), config.cookie.clone())
    }
}

#[async_trait]
impl Writer for CookieSession {
    async fn write(
        &self,
        _request: &Parts,
        response_headers: &mut HeaderMap,
        identity: Option<&dyn Identity>,
    ) -> Result<()> {
        match identity {
            Some(identity) => encode_secure_cookie(
                response_headers,
                Some(&self.attributes),
                &self.crypto,
                identity.login_key(),
            ),
            None => clear_secure_cookie(response_headers, Some(&self.attributes)),
        }
    }
}

#[async_trait]
impl Reader for CookieSession {
    async fn read(&self, request: &Parts) -> Result<Option<Box<dyn Identity>>> {
        match decode_secure_cookie::<LoginKey>(
            &request.headers,
            self.attributes.name(),
            &self.crypto,
        ) {
            Ok(key) => Ok(Some(Box::new(key))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
