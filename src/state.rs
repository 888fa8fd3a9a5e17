//! Shared application state handed to every handler through `web::Data`

use crate::auth::session::SessionStore;
use crate::user::credentials::CredentialHasher;
use crate::user::repository::UserStore;
use crate::user::service::UserService;
use std::sync::Arc;

pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            users: UserService::new(store, hasher, sessions),
        }
    }
}
