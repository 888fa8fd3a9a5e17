//! Session-based authentication
//!
//! Login issues an opaque bearer token; the token identifies the user on
//! later requests until logout, expiry, a password change or deletion.

pub mod bearer;
pub mod handlers;
pub mod session;
