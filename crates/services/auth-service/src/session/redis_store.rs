//! Redis session store.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::time::Duration;
use tracing::info;

use common::{AppResult, CacheConfig};

use super::SessionStore;
use crate::infra::bounded;

const STORE: &str = "session store";

/// Compare-and-swap: overwrite KEYS[1] with ARGV[2] (expiring in ARGV[3]
/// seconds) only while it still holds ARGV[1].
const REPLACE_IF_EQUALS_SCRIPT: &str = r#"
    if redis.call("GET", KEYS[1]) == ARGV[1] then
        redis.call("SET", KEYS[1], ARGV[2], "EX", ARGV[3])
        return 1
    else
        return 0
    end
"#;

/// Session store backed by Redis with a pooled connection manager.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: ConnectionManager,
    timeout: Duration,
}

impl RedisSessionStore {
    /// Connect to Redis. The configured timeout bounds the initial
    /// connection and every later call.
    pub async fn connect(config: &CacheConfig) -> AppResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let call_timeout = Duration::from_millis(config.timeout_ms);

        let connection =
            bounded(call_timeout, STORE, "connect", ConnectionManager::new(client)).await?;

        info!("Redis session store connected");

        Ok(Self {
            connection,
            timeout: call_timeout,
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let call = conn.set_ex::<_, _, ()>(key, value, ttl_seconds);
        bounded(self.timeout, STORE, "set", call).await
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        bounded(self.timeout, STORE, "get", conn.get::<_, Option<String>>(key)).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        bounded(self.timeout, STORE, "delete", conn.del::<_, ()>(key)).await
    }

    async fn replace_if_equals(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let mut cmd = redis::cmd("EVAL");
        cmd.arg(REPLACE_IF_EQUALS_SCRIPT)
            .arg(1)
            .arg(key)
            .arg(expected)
            .arg(value)
            .arg(ttl_seconds);

        let call = cmd.query_async(&mut conn);
        let replaced: i32 = bounded(self.timeout, STORE, "replace_if_equals", call).await?;

        Ok(replaced == 1)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let cmd = redis::cmd("PING");
        let _: String = bounded(self.timeout, STORE, "ping", cmd.query_async(&mut conn)).await?;
        Ok(())
    }
}
