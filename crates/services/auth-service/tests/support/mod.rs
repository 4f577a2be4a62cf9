//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use auth_service_lib::{
    AppState, Authenticator, Clock, CredentialStore, InMemoryCredentialStore, MemorySessionStore,
    SessionStore,
};
use common::JwtConfig;

pub const SECRET: &str = "integration-test-secret-key-32-bytes!!";

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        access_expires_minutes: 15,
        refresh_expires_days: 7,
    }
}

pub struct Harness {
    pub accounts: Arc<InMemoryCredentialStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub clock: Arc<ManualClock>,
    pub auth: Arc<Authenticator>,
}

impl Harness {
    pub fn new() -> Self {
        let accounts = Arc::new(InMemoryCredentialStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let clock = ManualClock::new();
        let auth = Arc::new(Authenticator::with_clock(
            accounts.clone(),
            sessions.clone(),
            &jwt_config(),
            clock.clone(),
        ));

        Self {
            accounts,
            sessions,
            clock,
            auth,
        }
    }

    pub fn state(&self) -> AppState {
        let accounts: Arc<dyn CredentialStore> = self.accounts.clone();
        let sessions: Arc<dyn SessionStore> = self.sessions.clone();
        AppState::with_service(self.auth.clone(), accounts, sessions)
    }
}
