//! PostgreSQL persistence

pub mod config;
pub mod user_store;

pub use user_store::PgUserStore;
