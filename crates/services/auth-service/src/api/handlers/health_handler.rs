//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use common::AppResult;

use crate::api::AppState;

/// Readiness response
#[derive(Serialize)]
struct ReadinessResponse {
    status: &'static str,
    services: StoreHealth,
}

#[derive(Serialize)]
struct StoreHealth {
    credential_store: StoreStatus,
    session_store: StoreStatus,
}

#[derive(Serialize)]
struct StoreStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StoreStatus {
    fn from_ping(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.code().to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(live))
        .route("/ready", get(ready))
}

async fn live() -> StatusCode {
    StatusCode::OK
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let (accounts, sessions) = tokio::join!(state.accounts.ping(), state.sessions.ping());

    let credential_store = StoreStatus::from_ping(accounts);
    let session_store = StoreStatus::from_ping(sessions);
    let ready = credential_store.is_healthy() && session_store.is_healthy();

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "degraded" },
            services: StoreHealth {
                credential_store,
                session_store,
            },
        }),
    )
}
