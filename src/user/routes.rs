//! User management routes
//!
//! Configuration of all user-related HTTP endpoints.

use crate::auth::handlers as auth_handlers;
use crate::user::handlers;
use actix_web::{web, Scope};

/// `/api/user`: account lifecycle and sessions
pub fn configure_user_routes() -> Scope {
    web::scope("/api/user")
        .route("/signup", web::post().to(handlers::signup))
        .route("/login", web::post().to(auth_handlers::login))
        .route("/logout", web::post().to(auth_handlers::logout))
        .route("/me", web::get().to(auth_handlers::me))
        .route("/update-password/{id}", web::patch().to(handlers::update_password))
        .route("/{id}", web::patch().to(handlers::update_user))
        .route("/{id}", web::delete().to(handlers::delete_user))
}

/// Paginated list endpoints, one per user type
pub fn configure_list_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/client", web::get().to(handlers::list_clients))
        .route("/api/sub-vendor", web::get().to(handlers::list_sub_vendors))
        .route("/api/admin", web::get().to(handlers::list_admins));
}

/// Every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(configure_user_routes());
    configure_list_routes(cfg);
}
