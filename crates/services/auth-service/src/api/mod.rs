//! HTTP layer - handlers, middleware, extractors and routes.

pub mod extractors;
pub mod handlers;
pub mod middleware;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
