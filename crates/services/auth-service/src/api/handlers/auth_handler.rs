//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use common::AppResult;
use domain::AccountResponse;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentAccount;
use crate::api::AppState;
use crate::service::TokenResponse;

/// Account registration request
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh request carrying the current refresh token
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// Routes that require a valid access token
pub fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .auth_service
        .register(payload.username, payload.email, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Log in and receive a token pair
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(tokens))
}

/// Exchange a refresh token for a new pair
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}

/// Revoke the caller's refresh token
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<StatusCode> {
    state.auth_service.logout(current.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Identity behind the access token
pub async fn me(Extension(current): Extension<CurrentAccount>) -> Json<CurrentAccount> {
    Json(current)
}
