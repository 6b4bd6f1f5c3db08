//! Operational-failure reporting.
//!
//! Failures that are not a client's fault (storage, collaborator outages,
//! misconfiguration) go through a [`FailureReporter`] so the host decides where
//! they end up. Rejected credentials and bad input never reach it.

use http::request::Parts;
use tracing::error;

use crate::config::LoginError;

pub trait FailureReporter: Send + Sync {
    fn report(&self, request: &Parts, error: &LoginError);
}

/// Reports through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, request: &Parts, error: &LoginError) {
        error!(
            method = %request.method,
            path = %request.uri.path(),
            error = %error,
            "Login request failed"
        );
    }
}
