//! User module
//!
//! Clients, sub-vendors and admins: storage, list queries, credentials
//! and the HTTP surface over them.

pub mod credentials;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod routes;
pub mod service;
