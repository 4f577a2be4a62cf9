//! In-process session store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use common::AppResult;

use super::SessionStore;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Session store backed by a mutex-guarded map. Expired entries read as
/// absent and are dropped lazily.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(value: &str, ttl_seconds: u64) -> Entry {
        Entry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), Self::entry(value, ttl_seconds));
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn replace_if_equals(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> AppResult<bool> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let matches = entries
            .get(key)
            .is_some_and(|entry| entry.is_live(now) && entry.value == expected);
        if matches {
            entries.insert(key.to_string(), Self::entry(value, ttl_seconds));
        }

        Ok(matches)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let store = MemorySessionStore::new();
        store.set("refresh_token:1", "a", 60).await.unwrap();
        store.set("refresh_token:1", "b", 60).await.unwrap();

        assert_eq!(store.get("refresh_token:1").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemorySessionStore::new();
        store.set("k", "v", 60).await.unwrap();

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let store = MemorySessionStore::new();
        store.set("k", "v", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_if_equals() {
        let store = MemorySessionStore::new();
        assert!(!store.replace_if_equals("k", "old", "new", 60).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "old", 60).await.unwrap();
        assert!(!store.replace_if_equals("k", "other", "new", 60).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("old"));

        assert!(store.replace_if_equals("k", "old", "new", 60).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));

        // The superseded value can no longer win a swap.
        assert!(!store.replace_if_equals("k", "old", "newer", 60).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_if_equals_ignores_expired_entry() {
        let store = MemorySessionStore::new();
        store.set("k", "old", 1).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(!store.replace_if_equals("k", "old", "new", 60).await.unwrap());
    }
}
