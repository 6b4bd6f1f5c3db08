//! Pluggable login collaborators.
//!
//! A [`Checker`] decides who is allowed in, a [`Writer`] attaches or clears the
//! resulting identity on a response, and a [`Reader`] recovers it from a later
//! request. Each role is a single-method trait; the `*Fn` adapters let plain
//! closures fill a role.

use async_trait::async_trait;
use http::HeaderMap;
use http::request::Parts;

use super::identity::{Identity, LoginKey};
use crate::config::{DemoAccount, LoginError, Result};

/// Validates credentials.
///
/// Rejected credentials must be reported as `LoginError::CredentialsRejected`;
/// any other error is reported as an operational failure.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, username: &str, password: &str) -> Result<Box<dyn Identity>>;
}

/// Persists an identity onto a response. `None` means log out.
#[async_trait]
pub trait Writer: Send + Sync {
    async fn write(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        identity: Option<&dyn Identity>,
    ) -> Result<()>;
}

/// Recovers the identity carried by a request. `Ok(None)` means nobody is logged in.
#[async_trait]
pub trait Reader: Send + Sync {
    async fn read(&self, request: &Parts) -> Result<Option<Box<dyn Identity>>>;
}

/// [`Checker`] backed by a closure.
pub struct CheckerFn<F>(F);

impl<F> CheckerFn<F>
where
    F: Fn(&str, &str) -> Result<Box<dyn Identity>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Checker for CheckerFn<F>
where
    F: Fn(&str, &str) -> Result<Box<dyn Identity>> + Send + Sync,
{
    async fn check(&self, username: &str, password: &str) -> Result<Box<dyn Identity>> {
        (self.0)(username, password)
    }
}

/// [`Writer`] backed by a closure.
pub struct WriterFn<F>(F);

impl<F> WriterFn<F>
where
    F: Fn(&Parts, &mut HeaderMap, Option<&dyn Identity>) -> Result<()> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Writer for WriterFn<F>
where
    F: Fn(&Parts, &mut HeaderMap, Option<&dyn Identity>) -> Result<()> + Send + Sync,
{
    async fn write(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        identity: Option<&dyn Identity>,
    ) -> Result<()> {
        (self.0)(request, response_headers, identity)
    }
}

/// [`Reader`] backed by a closure.
pub struct ReaderFn<F>(F);

impl<F> ReaderFn<F>
where
    F: Fn(&Parts) -> Result<Option<Box<dyn Identity>>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Reader for ReaderFn<F>
where
    F: Fn(&Parts) -> Result<Option<Box<dyn Identity>>> + Send + Sync,
{
    async fn read(&self, request: &Parts) -> Result<Option<Box<dyn Identity>>> {
        (self.0)(request)
    }
}

/// Accepts exactly one username/password pair.
#[derive(Debug, Clone)]
pub struct StaticChecker {
    account: DemoAccount,
}

impl StaticChecker {
    #[must_use]
    pub fn new(account: DemoAccount) -> Self {
        Self { account }
    }
}

#[async_trait]
impl Checker for StaticChecker {
    async fn check(&self, username: &str, password: &str) -> Result<Box<dyn Identity>> {
        if username == self.account.username && password == self.account.password {
            Ok(Box::new(LoginKey::new(self.account.login_key.clone())))
        } else {
            Err(LoginError::CredentialsRejected)
        }
    }
}
