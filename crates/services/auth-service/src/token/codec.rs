//! HMAC-signed JWT encoding and verification.
//!
//! Expiry is checked against the injected [`Clock`] rather than inside
//! `jsonwebtoken`, so it can be reported as `TokenExpired` only after the
//! signature has been accepted.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use common::{AppError, AppResult};
use domain::Account;

use super::claims::{Claims, TokenKind};
use crate::clock::Clock;

/// Algorithm used when signing.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when verifying: the HMAC family only.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Signs and verifies credential tokens with a shared secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec for `secret`, reading time from `clock`.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Serialize and sign `claims`.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    /// Mint a signed token of `kind` for `account`, valid for `ttl` from now.
    pub fn issue(&self, account: &Account, kind: TokenKind, ttl: Duration) -> AppResult<String> {
        let claims = Claims::new(account, kind, self.clock.now(), ttl)?;
        self.sign(&claims)
    }

    /// Verify signature, algorithm and expiry, returning the embedded claims.
    ///
    /// # Errors
    /// `TokenExpired` when the signature is valid but `exp` has passed;
    /// `InvalidToken` for everything else.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(reason = ?e.kind(), "Token rejected");
            AppError::InvalidToken
        })?;

        if data.claims.exp < self.clock.now().timestamp() {
            return Err(AppError::TokenExpired);
        }

        Ok(data.claims)
    }
}
