//! # grantstore-redis
//!
//! Redis implementation of [`KeyValueStore`] for grantstore.
//!
//! Records are stored as Redis hashes and expire through `EXPIREAT`, so
//! Redis itself enforces every record's lifetime. Connections come from a
//! `deadpool-redis` pool.
//!
//! ## Usage
//!
//! ```ignore
//! use grantstore_redis::{RedisConfig, RedisKeyValueStore};
//!
//! let store = RedisKeyValueStore::connect(&RedisConfig::default()).await?;
//! store.ping().await?;
//! ```
//!
//! [`KeyValueStore`]: grantstore_core::KeyValueStore

mod config;
mod pool;
mod store;

pub use config::RedisConfig;
pub use pool::create_pool;
pub use store::RedisKeyValueStore;

// Re-export for callers that build their own pools.
pub use deadpool_redis::Pool;
