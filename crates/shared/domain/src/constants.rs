//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length (matches the `users.username` column)
pub const MAX_USERNAME_LENGTH: usize = 50;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 15;

/// Default refresh token lifetime in days
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

/// Longest accepted access token lifetime in minutes (one day)
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime in days
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 365;

/// Recommended minimum JWT secret length
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Signing secret shipped for local development; rejected in production
pub const INSECURE_DEFAULT_JWT_SECRET: &str = "default-secret-change-in-production";

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type label returned to clients
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Session store key prefix for an account's live refresh token
pub const REFRESH_TOKEN_KEY_PREFIX: &str = "refresh_token:";

/// Build the session store key holding an account's refresh token.
pub fn refresh_token_key(account_id: i64) -> String {
    format!("{}{}", REFRESH_TOKEN_KEY_PREFIX, account_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_key() {
        assert_eq!(refresh_token_key(42), "refresh_token:42");
    }
}
