//! Authentication service - registration, login and the refresh token
//! rotation protocol.
//!
//! Each account has at most one live refresh token, held in the session
//! store under `refresh_token:<id>`. Login overwrites it, refresh swaps it
//! for a new one, logout deletes it. A refresh token is redeemable only
//! while it is byte-for-byte the stored value, so every issuance
//! supersedes the previous token even before that one expires.
//!
//! Access tokens are verified statelessly and stay valid until expiry.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use common::{AppError, AppResult, JwtConfig};
use domain::{refresh_token_key, Account, NewAccount, Password, TOKEN_TYPE_BEARER};

use crate::clock::{Clock, SystemClock};
use crate::repository::CredentialStore;
use crate::session::SessionStore;
use crate::token::{Claims, TokenCodec, TokenKind};

/// Token pair returned after login or refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Short-lived JWT access token
    pub access_token: String,
    /// Single-use JWT refresh token
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Token type (always "Bearer")
    pub token_type: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account
    async fn register(&self, username: String, email: String, password: String)
        -> AppResult<Account>;

    /// Login and start a new session, replacing any existing one
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Redeem a refresh token for a new token pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// End the account's session. Succeeds when there is none.
    async fn logout(&self, account_id: i64) -> AppResult<()>;

    /// Verify an access token and extract its claims
    fn validate_access_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    accounts: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        accounts: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        jwt: &JwtConfig,
    ) -> Self {
        Self::with_clock(accounts, sessions, jwt, Arc::new(SystemClock))
    }

    /// Create an instance reading time from `clock`.
    pub fn with_clock(
        accounts: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        jwt: &JwtConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            codec: TokenCodec::new(jwt.secret_bytes(), clock),
            access_ttl: jwt.access_ttl(),
            refresh_ttl: jwt.refresh_ttl(),
        }
    }

    /// Session record TTL, matching the refresh token lifetime.
    fn session_ttl_seconds(&self) -> u64 {
        self.refresh_ttl.num_seconds().max(1) as u64
    }

    /// Mint a fresh access/refresh pair for `account`.
    fn issue_pair(&self, account: &Account) -> AppResult<TokenResponse> {
        let access_token = self
            .codec
            .issue(account, TokenKind::Access, self.access_ttl)?;
        let refresh_token = self
            .codec
            .issue(account, TokenKind::Refresh, self.refresh_ttl)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<Account> {
        // Both checks run before anything is written
        let username_taken = self.accounts.exists_by_username(&username).await?;
        let email_taken = self.accounts.exists_by_email(&email).await?;
        if username_taken || email_taken {
            return Err(AppError::AccountExists);
        }

        let password_hash = Password::new(&password)?.into_string();

        let account = self
            .accounts
            .create(NewAccount {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(account_id = account.id, "Account registered");
        Ok(account)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let account = match self.accounts.find_by_username(&username).await? {
            Some(account)
                if Password::from_hash(account.password_hash.as_str()).verify(&password) =>
            {
                account
            }
            Some(account) => {
                debug!(account_id = account.id, "Login rejected: wrong password");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                // Same hashing cost as a wrong password
                Password::verify_dummy(&password);
                debug!("Login rejected: unknown username");
                return Err(AppError::InvalidCredentials);
            }
        };

        let tokens = self.issue_pair(&account)?;

        // Unconditional overwrite: any earlier refresh token is now dead
        self.sessions
            .set(
                &refresh_token_key(account.id),
                &tokens.refresh_token,
                self.session_ttl_seconds(),
            )
            .await?;

        info!(account_id = account.id, "Login succeeded");
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = self.codec.verify(refresh_token)?;
        if !claims.is_kind(TokenKind::Refresh) {
            debug!(
                account_id = claims.user_id,
                kind = %claims.token_type,
                "Refresh rejected: wrong token kind"
            );
            return Err(AppError::InvalidToken);
        }

        let key = refresh_token_key(claims.user_id);
        match self.sessions.get(&key).await? {
            Some(stored) if stored == refresh_token => {}
            Some(_) => {
                warn!(account_id = claims.user_id, "Refresh rejected: token superseded");
                return Err(AppError::InvalidToken);
            }
            None => {
                warn!(account_id = claims.user_id, "Refresh rejected: no live session");
                return Err(AppError::InvalidToken);
            }
        }

        let account = self
            .accounts
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let tokens = self.issue_pair(&account)?;

        // Commit the rotation only if nobody rotated or revoked in between
        let rotated = self
            .sessions
            .replace_if_equals(
                &key,
                refresh_token,
                &tokens.refresh_token,
                self.session_ttl_seconds(),
            )
            .await?;
        if !rotated {
            warn!(account_id = account.id, "Refresh rejected: lost rotation race");
            return Err(AppError::InvalidToken);
        }

        info!(account_id = account.id, "Session refreshed");
        Ok(tokens)
    }

    async fn logout(&self, account_id: i64) -> AppResult<()> {
        self.sessions.delete(&refresh_token_key(account_id)).await?;
        info!(account_id, "Session revoked");
        Ok(())
    }

    fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.codec.verify(token)?;
        if !claims.is_kind(TokenKind::Access) {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}
