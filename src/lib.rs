//! Vendor Admin Service
//!
//! REST backend for the admin and vendor dashboards, built with Actix-web.
//! Manages clients, sub-vendors and admins in a single user store with
//! paginated listings, Argon2 credentials and session tokens.

pub mod auth;
pub mod config;
pub mod health;
pub mod postgres;
pub mod server;
pub mod state;
pub mod types;
pub mod user;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "vendor-admin";
