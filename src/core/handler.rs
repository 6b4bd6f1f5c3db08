//! Login API handler.
//!
//! `POST` checks credentials and writes the resulting identity onto the
//! response, `DELETE` asks the writer to clear it, every other method is
//! refused. There is no server-side session state; reading the current
//! identity is left to a [`Reader`](super::collaborators::Reader).

mod credentials;
pub mod response;

pub use credentials::Credentials;
pub use response::HttpResponse;

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Request, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::collaborators::{Checker, Writer};
use super::report::{FailureReporter, TracingReporter};
use crate::config::LoginError;

/// Default query parameter that overrides the transport method.
pub const DEFAULT_METHOD_OVERRIDE_PARAM: &str = "_method";

#[derive(Serialize)]
struct LoginResponse<'a> {
    login_key: &'a str,
}

/// Dispatches login and logout requests to the configured collaborators.
#[derive(Clone)]
pub struct LoginHandler {
    checker: Arc<dyn Checker>,
    writer: Arc<dyn Writer>,
    reporter: Arc<dyn FailureReporter>,
    method_override: Option<String>,
}

impl LoginHandler {
    /// Creates a handler that reports failures through `tracing` and honours
    /// the `_method` override parameter.
    pub fn new(checker: Arc<dyn Checker>, writer: Arc<dyn Writer>) -> Self {
        Self {
            checker,
            writer,
            reporter: Arc::new(TracingReporter),
            method_override: Some(DEFAULT_METHOD_OVERRIDE_PARAM.to_string()),
        }
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the override query parameter; `None` disables overrides.
    #[must_use]
    pub fn with_method_override(mut self, param: Option<String>) -> Self {
        self.method_override = param;
        self
    }

    /// The override query parameter if present and valid, else the request method.
    #[must_use]
    pub fn effective_method(&self, parts: &Parts) -> Method {
        let overridden = self.method_override.as_deref().and_then(|param| {
            let query = parts.uri.query()?;
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == param)
                .and_then(|(_, value)| {
                    Method::from_bytes(value.trim().to_ascii_uppercase().as_bytes()).ok()
                })
        });
        overridden.unwrap_or_else(|| parts.method.clone())
    }

    pub async fn handle(&self, request: Request<Bytes>) -> HttpResponse {
        let (parts, body) = request.into_parts();
        match self.effective_method(&parts) {
            Method::POST => self.login(&parts, &body).await,
            Method::DELETE => self.logout(&parts).await,
            _ => response::method_not_allowed(),
        }
    }

    async fn login(&self, parts: &Parts, body: &[u8]) -> HttpResponse {
        let credentials = match Credentials::from_body(&parts.headers, body) {
            Ok(credentials) => credentials,
            Err(e) => {
                debug!(error = %e, "Malformed login body");
                return response::empty(e.status_code());
            }
        };

        let identity = match self
            .checker
            .check(&credentials.username, &credentials.password)
            .await
        {
            Ok(identity) => identity,
            Err(LoginError::CredentialsRejected) => {
                debug!("Login credentials rejected");
                return response::empty(StatusCode::FORBIDDEN);
            }
            Err(e) => return self.fail(parts, &e),
        };
        drop(credentials);

        let mut headers = HeaderMap::new();
        if let Err(e) = self
            .writer
            .write(parts, &mut headers, Some(&*identity))
            .await
        {
            return self.fail(parts, &e);
        }

        let body = match serde_json::to_vec(&LoginResponse {
            login_key: identity.login_key(),
        }) {
            Ok(body) => body,
            Err(e) => return self.fail(parts, &LoginError::Serialization(e)),
        };

        debug!(login_key = %identity.login_key(), "Login succeeded");
        response::json(StatusCode::OK, headers, body)
    }

    async fn logout(&self, parts: &Parts) -> HttpResponse {
        let mut headers = HeaderMap::new();
        match self.writer.write(parts, &mut headers, None).await {
            Ok(()) => {
                debug!("Logout succeeded");
                response::with_headers(StatusCode::NO_CONTENT, headers)
            }
            Err(e) => self.fail(parts, &e),
        }
    }

    /// Reports an operational failure and answers 500 without details.
    fn fail(&self, parts: &Parts, error: &LoginError) -> HttpResponse {
        self.reporter.report(parts, error);
        response::empty(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
