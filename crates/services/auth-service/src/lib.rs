//! Auth Service Library
//!
//! Account registration, password login, and rotating refresh sessions
//! with a single live session per account. Exposed over HTTP with axum.

pub mod api;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod session;
pub mod token;

pub use api::{create_router, AppState};
pub use clock::{Clock, SystemClock};
pub use config::AuthServiceConfig;
pub use repository::{AccountStore, CredentialStore, InMemoryCredentialStore};
pub use service::{AuthService, Authenticator, TokenResponse};
pub use session::{MemorySessionStore, RedisSessionStore, SessionStore};
pub use token::{Claims, TokenCodec, TokenKind};
