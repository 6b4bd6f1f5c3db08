//! HTTP surface.
//!
//! Hyper server exposing the login handler and a read-side whoami route.

pub mod server;

pub use server::{AppState, LOGIN_PATH, WHOAMI_PATH, route, run, serve};
