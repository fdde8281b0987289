//! # grantstore-kv
//!
//! OAuth 2.0 entity storage over any [`KeyValueStore`].
//!
//! Provides the four storage traits from `grantstore-core`:
//!
//! - Clients (`c:<id>`, never expire)
//! - Authorization codes (`a:<code>`, expire `expires_in` seconds after creation)
//! - Access tokens (`t:<token>`, expire `token_lifetime` after creation)
//! - Refresh mappings (`r:<token>`, same lifetime as their access token)
//!
//! Loading an access token also loads the authorization code it came from
//! and walks its chain of previous tokens. Those references are
//! best-effort: whatever cannot be loaded is left `None` and counted in
//! [`ResolutionStats`]. The walk stops after
//! [`StorageConfig::max_chain_depth`] predecessors or at the first repeated
//! token.
//!
//! [`StorageConfig::max_chain_depth`]: grantstore_core::StorageConfig::max_chain_depth
//!
//! # Example
//!
//! ```ignore
//! use grantstore_core::{AccessStorage, StorageConfig};
//! use grantstore_kv::KvGrantStorage;
//! use grantstore_redis::{RedisConfig, RedisKeyValueStore};
//!
//! let store = RedisKeyValueStore::connect(&RedisConfig::default()).await?;
//! let storage = KvGrantStorage::new(store, StorageConfig::default())?;
//!
//! let token = storage.load_access("tok1").await?;
//! ```

mod access;
mod authorize;
mod chain;
mod client;
mod record;
mod refresh;
mod stats;

use std::sync::Arc;

use grantstore_core::{ExpirationPolicy, KeyValueStore, StorageConfig, StoreError, StoreResult};

pub use stats::{ResolutionStats, ResolutionStatsSnapshot};

// =============================================================================
// Grant Storage
// =============================================================================

/// Storage for clients, authorization codes, access and refresh tokens.
///
/// Cloning is cheap: clones share the underlying store and the resolution
/// counters. There is nothing to close; the store is released when the last
/// clone is dropped.
pub struct KvGrantStorage<S> {
    store: Arc<S>,
    config: StorageConfig,
    policy: ExpirationPolicy,
    stats: Arc<ResolutionStats>,
}

impl<S: KeyValueStore> KvGrantStorage<S> {
    /// Creates storage over `store`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if `config` fails validation.
    pub fn new(store: S, config: StorageConfig) -> StoreResult<Self> {
        Self::from_arc(Arc::new(store), config)
    }

    /// Creates storage over a store that is shared with other owners.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if `config` fails validation.
    pub fn from_arc(store: Arc<S>, config: StorageConfig) -> StoreResult<Self> {
        config
            .validate()
            .map_err(|e| StoreError::configuration(e.to_string()))?;
        let policy = config.expiration_policy();
        Ok(Self {
            store,
            config,
            policy,
            stats: Arc::new(ResolutionStats::default()),
        })
    }

    /// Creates storage with the default configuration.
    #[must_use]
    pub fn with_defaults(store: S) -> Self {
        let config = StorageConfig::default();
        Self {
            store: Arc::new(store),
            policy: config.expiration_policy(),
            config,
            stats: Arc::new(ResolutionStats::default()),
        }
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Counters for references dropped while loading access tokens.
    #[must_use]
    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }
}

impl<S> Clone for KvGrantStorage<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            policy: self.policy,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for KvGrantStorage<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvGrantStorage")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
