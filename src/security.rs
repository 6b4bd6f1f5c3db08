//! Security primitives.
//!
//! Token encryption and the cookie encoding used to carry identities between requests.

pub mod crypto;
