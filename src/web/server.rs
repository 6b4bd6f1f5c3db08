//! HTTP server.
//!
//! Serves the login endpoint and a whoami endpoint that reads the cookie
//! back, on hyper's HTTP/1 connection handling.

use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::config::{Config, LoginError, Result};
use crate::core::collaborators::{Checker, Reader};
use crate::core::handler::response::{self, HttpResponse};
use crate::core::handler::LoginHandler;
use crate::core::report::FailureReporter;
use crate::core::session::CookieSession;

pub const LOGIN_PATH: &str = "/api/login";
pub const WHOAMI_PATH: &str = "/api/whoami";

/// Everything a request needs, shared across connections.
#[derive(Clone)]
pub struct AppState {
    handler: LoginHandler,
    reader: Arc<dyn Reader>,
    max_body_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(handler: LoginHandler, reader: Arc<dyn Reader>, max_body_bytes: usize) -> Self {
        Self {
            handler,
            reader,
            max_body_bytes,
        }
    }

    /// Wires `checker` to a [`CookieSession`] built from `config`.
    #[must_use]
    pub fn from_config(config: &Config, checker: Arc<dyn Checker>) -> Self {
        let session = Arc::new(CookieSession::from_config(config));
        let handler = LoginHandler::new(checker, session.clone())
            .with_method_override(config.method_override_param.clone());
        Self::new(handler, session, config.max_body_bytes)
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.handler = self.handler.with_reporter(reporter);
        self
    }
}

/// Routes a request whose body has already been read.
pub async fn route(state: &AppState, request: Request<Bytes>) -> HttpResponse {
    match request.uri().path() {
        LOGIN_PATH => state.handler.handle(request).await,
        WHOAMI_PATH => whoami(state, request).await,
        _ => response::empty(StatusCode::NOT_FOUND),
    }
}

/// Answers with the current login key, or 403 when nobody is logged in.
async fn whoami(state: &AppState, request: Request<Bytes>) -> HttpResponse {
    let (parts, _) = request.into_parts();
    match state.reader.read(&parts).await {
        Ok(Some(identity)) => response::text(StatusCode::OK, identity.login_key().to_string()),
        Ok(None) => response::empty(StatusCode::FORBIDDEN),
        Err(e) if !e.is_operational() => {
            debug!(error = %e, "Ignoring invalid login cookie");
            response::empty(e.status_code())
        }
        Err(e) => {
            error!(error = %e, "Failed to read login cookie");
            response::empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn serve_request(
    state: &AppState,
    request: Request<Incoming>,
) -> std::result::Result<HttpResponse, Infallible> {
    let (parts, body) = request.into_parts();

    let bytes = match Limited::new(body, state.max_body_bytes).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            let err = LoginError::PayloadTooLarge {
                limit: state.max_body_bytes,
            };
            debug!(error = %err, "Rejected request body");
            return Ok(response::empty(err.status_code()));
        }
        Err(e) => {
            debug!(error = %e, "Failed to read request body");
            return Ok(response::empty(StatusCode::BAD_REQUEST));
        }
    };

    Ok(route(state, Request::from_parts(parts, bytes)).await)
}

/// Accepts connections until the listener fails permanently.
///
/// At most `concurrency_limit` connections are served at once.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, concurrency_limit: usize) {
    let connection_limit = Arc::new(Semaphore::new(concurrency_limit.max(1)));

    loop {
        let Ok(permit) = connection_limit.clone().acquire_owned().await else {
            break;
        };

        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    let service = service_fn(move |request| {
                        let state = state.clone();
                        async move { serve_request(&state, request).await }
                    });
                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        debug!(peer_addr = %peer_addr, error = %e, "Connection error");
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "Accept error");
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        }
    }
}

/// Binds `config.listen_addr` and serves until the process exits.
///
/// # Errors
///
/// Returns `LoginError::Io` if the listener cannot be bound.
pub async fn run(config: Arc<Config>, checker: Arc<dyn Checker>) -> Result<()> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "Login server listening");

    let state = Arc::new(AppState::from_config(&config, checker));
    serve(listener, state, config.concurrency_limit).await;
    Ok(())
}
