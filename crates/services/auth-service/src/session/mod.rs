//! Session store: one live refresh token per account, with expiry.
//!
//! The store is last-write-wins. `replace_if_equals` is the only
//! conditional write and must be atomic in every implementation; refresh
//! rotation relies on it to reject the loser of two concurrent refreshes.

mod memory_store;
mod redis_store;

use async_trait::async_trait;

use common::AppResult;

#[cfg(test)]
use mockall::automock;

pub use self::memory_store::MemorySessionStore;
pub use self::redis_store::RedisSessionStore;

/// Key-value store holding session records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<()>;

    /// Get the live value under `key`.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Atomically replace the value under `key` with `value` only if it
    /// currently equals `expected`. Returns whether the swap happened.
    async fn replace_if_equals(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> AppResult<bool>;

    /// Check connectivity.
    async fn ping(&self) -> AppResult<()>;
}
