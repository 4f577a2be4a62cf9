//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use common::AppError;
use domain::BEARER_TOKEN_PREFIX;

use crate::api::AppState;

/// Account resolved from a valid access token.
#[derive(Clone, Debug, Serialize)]
pub struct CurrentAccount {
    pub id: i64,
    pub username: String,
}

/// Validate the access token in the Authorization header and inject the
/// [`CurrentAccount`] into the request extensions.
///
/// A missing or non-Bearer header is `Unauthorized`; token failures keep
/// their own kind (`InvalidToken` or `TokenExpired`).
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.validate_access_token(token)?;

    request.extensions_mut().insert(CurrentAccount {
        id: claims.user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}
