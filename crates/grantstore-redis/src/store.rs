//! [`KeyValueStore`] over a pooled Redis connection.

use std::collections::HashMap;

use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use redis::AsyncCommands;
use time::OffsetDateTime;

use grantstore_core::kv::{Batch, Command, KeyValueStore};
use grantstore_core::{StoreError, StoreResult};

use crate::config::RedisConfig;
use crate::pool::create_pool;

/// Redis-backed key-value store.
///
/// Every call checks a connection out of the pool and returns it when the
/// call completes. Cloning is cheap and clones share the pool.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    pool: Pool,
}

impl RedisKeyValueStore {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a pool from `config` and verifies that Redis answers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the pool cannot be built and
    /// [`StoreError::Transport`] if Redis is unreachable.
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        tracing::info!(url = %config.url, "Connecting to Redis");
        let store = Self::new(create_pool(config)?);
        store.ping().await?;
        tracing::info!("Connected to Redis");
        Ok(store)
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Round-trips a `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if no connection can be obtained or
    /// the server does not answer.
    pub async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| transport("PING", &e))?;
        Ok(())
    }

    async fn connection(&self) -> StoreResult<Connection> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to get Redis connection");
            StoreError::transport(format!("redis pool: {e}"))
        })
    }
}

impl std::fmt::Debug for RedisKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisKeyValueStore")
            .field("max_size", &status.max_size)
            .field("size", &status.size)
            .finish()
    }
}

fn transport(command: &str, error: &redis::RedisError) -> StoreError {
    StoreError::transport(format!("redis {command}: {error}"))
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        // HSET with no field/value pairs is a protocol error.
        if fields.is_empty() {
            return Ok(());
        }
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for (field, value) in fields {
            cmd.arg(field).arg(value);
        }
        let mut conn = self.connection().await?;
        let _: i64 = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| transport("HSET", &e))?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.connection().await?;
        conn.hgetall(key)
            .await
            .map_err(|e| transport("HGETALL", &e))
    }

    async fn hash_multi_get(&self, key: &str, fields: &[&str]) -> StoreResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(key);
        for field in fields {
            cmd.arg(*field);
        }
        let mut conn = self.connection().await?;
        let values: Vec<Option<String>> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| transport("HMGET", &e))?;
        Ok(values)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: i64 = conn.del(key).await.map_err(|e| transport("DEL", &e))?;
        Ok(())
    }

    async fn expire_at(&self, key: &str, at: OffsetDateTime) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        let applied: bool = redis::cmd("EXPIREAT")
            .arg(key)
            .arg(at.unix_timestamp())
            .query_async(&mut conn)
            .await
            .map_err(|e| transport("EXPIREAT", &e))?;
        Ok(applied)
    }

    async fn execute(&self, batch: Batch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let atomic = batch.is_atomic();
        let mut pipe = redis::pipe();
        if atomic {
            pipe.atomic();
        }
        for command in batch {
            match command {
                Command::HashSet { key, fields } => {
                    if fields.is_empty() {
                        continue;
                    }
                    pipe.cmd("HSET").arg(key);
                    for (field, value) in fields {
                        pipe.arg(field).arg(value);
                    }
                    pipe.ignore();
                }
                Command::ExpireAt { key, at } => {
                    pipe.cmd("EXPIREAT")
                        .arg(key)
                        .arg(at.unix_timestamp())
                        .ignore();
                }
            }
        }

        let mut conn = self.connection().await?;
        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| transport(if atomic { "MULTI/EXEC" } else { "pipeline" }, &e))?;
        Ok(())
    }
}
