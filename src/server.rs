//! Server bootstrap: store selection, app state and the actix `App`

use crate::auth::session::SessionStore;
use crate::health::configure_health_routes;
use crate::postgres::config::create_pool;
use crate::postgres::PgUserStore;
use crate::state::AppState;
use crate::types::{AppConfig, StartupError};
use crate::user::credentials::Argon2Hasher;
use crate::user::error::ErrorResponse;
use crate::user::repository::{InMemoryUserStore, UserStore};
use crate::user::routes;
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use log::{info, warn};
use std::sync::Arc;

/// Picks the store from the configuration and wires the app state.
///
/// With `DATABASE_URL` set the PostgreSQL store must be reachable, otherwise
/// startup fails.
pub async fn build_state(config: &AppConfig) -> Result<web::Data<AppState>, StartupError> {
    let store: Arc<dyn UserStore> = match config.database.url {
        Some(_) => {
            let store = PgUserStore::new(create_pool(&config.database)?);
            store.ping().await.map_err(|e| StartupError::Store(e.to_string()))?;
            store.ensure_schema().await.map_err(|e| StartupError::Store(e.to_string()))?;
            info!("Connected to PostgreSQL user store");
            Arc::new(store)
        },
        None => {
            warn!("DATABASE_URL not set, using in-memory user store; data is lost on restart");
            Arc::new(InMemoryUserStore::new())
        },
    };

    let sessions = Arc::new(SessionStore::with_ttl_hours(config.session_ttl_hours));
    Ok(web::Data::new(AppState::new(store, Arc::new(Argon2Hasher::default()), sessions)))
}

/// Malformed JSON bodies answer in the same shape as other errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse {
            status: 400,
            message: err.to_string(),
            code: Some("INVALID_JSON".to_string()),
            reason: None,
        };
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

pub fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default().allow_any_method().allow_any_header().max_age(3600);
    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Routes, JSON config and shared state; used by the server and the tests
pub fn configure_app(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state).app_data(json_config());
        configure_health_routes(cfg);
        routes::configure(cfg);
    }
}

pub async fn run(config: AppConfig, state: web::Data<AppState>) -> Result<(), StartupError> {
    let bind_address = config.bind_address();
    let cors_origins = config.cors_origins.clone();
    info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors(&cors_origins))
            .configure(configure_app(state.clone()))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .map_err(|e| StartupError::ServerBind(e.to_string()))?
    .run()
    .await
    .map_err(|e| StartupError::ServerBind(e.to_string()))
}
