//! `securelogin` - demo login server.
//!
//! SPDX-License-Identifier: MIT
//!
//! Loads configuration, sets up logging, and serves the login API with the
//! optional demo account as the credential checker.

use securelogin::{Checker, CheckerFn, Config, LoginError, StaticChecker, run};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        listen_addr = %config.listen_addr,
        cookie_name = %config.cookie.name(),
        cookie_max_age_secs = config.cookie.max_age_secs(),
        cookie_secure = config.cookie.secure,
        method_override = ?config.method_override_param,
        log_format = %config.log_format,
        "Server initialized"
    );

    let checker: Arc<dyn Checker> = match config.demo_account.clone() {
        Some(account) => Arc::new(StaticChecker::new(account)),
        None => {
            warn!("No demo account configured, every login will be rejected");
            Arc::new(CheckerFn::new(|_, _| Err(LoginError::CredentialsRejected)))
        }
    };

    if let Err(e) = run(config, checker).await {
        error!(error = %e, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
