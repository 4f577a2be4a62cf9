//! HTTP request handlers.

mod auth_handler;
mod health_handler;

pub use auth_handler::{
    auth_routes, protected_auth_routes, LoginRequest, RefreshRequest, RegisterRequest,
};
pub use health_handler::health_routes;
