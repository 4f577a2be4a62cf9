//! Token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Account;

/// Discriminates the two credentials minted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub token_type: TokenKind,
    /// Stringified account id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token, so two tokens minted in the same second differ
    pub jti: String,
}

impl Claims {
    /// Build claims for `account` valid for `ttl` from `issued_at`.
    ///
    /// An expiry past the representable date range is an internal error.
    pub fn new(
        account: &Account,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> AppResult<Self> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        Ok(Self {
            user_id: account.id,
            username: account.username.clone(),
            token_type: kind,
            sub: account.id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.token_type == kind
    }
}
