//! Connection pool construction.

use std::time::Duration;

use deadpool_redis::{Pool, Runtime};
use grantstore_core::{StoreError, StoreResult};

use crate::config::RedisConfig;

/// Builds a Redis connection pool from `config`.
///
/// The pool is lazy: no connection is opened until first use. Call
/// [`RedisKeyValueStore::ping`](crate::RedisKeyValueStore::ping) to check
/// that the server is reachable.
///
/// # Errors
///
/// Returns [`StoreError::Configuration`] if the pool cannot be built, for
/// example when `pool_size` is zero.
pub fn create_pool(config: &RedisConfig) -> StoreResult<Pool> {
    if config.pool_size == 0 {
        return Err(StoreError::configuration("redis pool_size must be at least 1"));
    }

    let timeout = Duration::from_millis(config.timeout_ms);
    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    let pool_config = redis_config
        .pool
        .get_or_insert_with(|| deadpool_redis::PoolConfig::new(config.pool_size));
    pool_config.max_size = config.pool_size;
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);

    redis_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| StoreError::configuration(format!("failed to create redis pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_pool() {
        let config = RedisConfig {
            pool_size: 0,
            ..RedisConfig::default()
        };
        let err = create_pool(&config).unwrap_err();
        assert!(matches!(err, StoreError::Configuration { .. }));
    }

    #[test]
    fn test_pool_uses_configured_size() {
        let config = RedisConfig {
            pool_size: 3,
            ..RedisConfig::default()
        };
        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.status().max_size, 3);
    }
}
