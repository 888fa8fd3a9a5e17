//! Session endpoints: login, logout and the current user

use crate::auth::bearer::BearerToken;
use crate::state::AppState;
use crate::user::dto::{LoginRequest, LoginResponse, SuccessResponse, UserEnvelope};
use crate::user::error::UserError;
use actix_web::{web, HttpResponse};

/// Verifies email/password and returns a bearer token
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, UserError> {
    let (user, tokens) = state.users.login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        user: user.into(),
        token: tokens.token,
        expires_at: tokens.expires_at,
    }))
}

pub async fn logout(
    state: web::Data<AppState>,
    token: BearerToken,
) -> Result<HttpResponse, UserError> {
    state.users.logout(token.as_str()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// Profile of the session owner
pub async fn me(state: web::Data<AppState>, token: BearerToken) -> Result<HttpResponse, UserError> {
    let user = state.users.current_user(token.as_str()).await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        user: user.into(),
    }))
}
