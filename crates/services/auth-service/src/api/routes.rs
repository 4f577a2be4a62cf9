//! Application route configuration.

use axum::{http::HeaderValue, middleware, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::handlers::{auth_routes, health_routes, protected_auth_routes};
use super::middleware::auth_middleware;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/api/v1/auth",
            auth_routes().merge(protected_auth_routes().route_layer(
                middleware::from_fn_with_state(state.clone(), auth_middleware),
            )),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Build the CORS layer. `*` (or an empty list) allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
