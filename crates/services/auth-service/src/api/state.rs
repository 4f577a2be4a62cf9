//! Application state shared by all handlers.

use std::sync::Arc;

use common::JwtConfig;

use crate::repository::CredentialStore;
use crate::service::{AuthService, Authenticator};
use crate::session::SessionStore;

/// Application state containing the auth service and its stores.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Account store (readiness checks)
    pub accounts: Arc<dyn CredentialStore>,
    /// Session store (readiness checks)
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Build the state with an [`Authenticator`] over the given stores.
    pub fn new(
        accounts: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        jwt: &JwtConfig,
    ) -> Self {
        let auth_service = Arc::new(Authenticator::new(accounts.clone(), sessions.clone(), jwt));
        Self::with_service(auth_service, accounts, sessions)
    }

    /// Build the state around an already constructed service.
    pub fn with_service(
        auth_service: Arc<dyn AuthService>,
        accounts: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            auth_service,
            accounts,
            sessions,
        }
    }
}
