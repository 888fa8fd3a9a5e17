//! User API handlers
//!
//! Thin actix-web functions: extract the request, call [`UserService`],
//! and shape the JSON the dashboards expect.
//!
//! [`UserService`]: crate::user::service::UserService

use crate::state::AppState;
use crate::user::dto::{
    SignupRequest, SuccessResponse, UpdatePasswordRequest, UpdateUserRequest, UserEnvelope,
    UserResponse, UserTypeRequest,
};
use crate::user::error::UserError;
use crate::user::models::{User, UserType};
use crate::user::query::{ListParams, Page};
use actix_web::{web, HttpResponse};
use serde_json::json;

/// `{<key>: [...], totalPages, total}`
fn list_response(key: &str, page: Page<User>) -> HttpResponse {
    let page = page.map(UserResponse::from);
    HttpResponse::Ok().json(json!({
        key: page.items,
        "totalPages": page.total_pages,
        "total": page.total,
    }))
}

async fn list_of_type(
    state: &AppState,
    user_type: UserType,
    key: &str,
    params: &ListParams,
) -> Result<HttpResponse, UserError> {
    let page = state.users.list(user_type, params).await?;
    Ok(list_response(key, page))
}

/// `GET /api/client`
pub async fn list_clients(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, UserError> {
    list_of_type(&state, UserType::Client, "clients", &query).await
}

/// `GET /api/sub-vendor`
pub async fn list_sub_vendors(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, UserError> {
    list_of_type(&state, UserType::SubVendor, "subVendors", &query).await
}

/// `GET /api/admin`
pub async fn list_admins(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, UserError> {
    list_of_type(&state, UserType::Admin, "admins", &query).await
}

/// Handle user registration
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, UserError> {
    let user = state.users.signup(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserEnvelope {
        user: user.into(),
    }))
}

/// Update name/email of a user
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, UserError> {
    let user = state.users.update(&path, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        user: user.into(),
    }))
}

/// Replace a user's password
pub async fn update_password(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, UserError> {
    state.users.update_password(&path, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// Delete a user. The body carries the expected `type`.
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Option<web::Json<UserTypeRequest>>,
) -> Result<HttpResponse, UserError> {
    let request = payload.map(web::Json::into_inner).unwrap_or_default();
    state.users.delete(&path, request).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
