//! Core login components.
//!
//! Identities, the collaborator roles, the cookie-backed session and the login handler.

pub mod collaborators;
pub mod handler;
pub mod identity;
pub mod report;
pub mod session;

pub use collaborators::{Checker, CheckerFn, Reader, ReaderFn, StaticChecker, Writer, WriterFn};
pub use handler::LoginHandler;
pub use identity::{Identity, LoginKey};
pub use report::{FailureReporter, TracingReporter};
pub use session::CookieSession;
