//! Key-value store collaborator.
//!
//! The entity stores only need a handful of hash and expiry primitives from
//! the underlying store. [`KeyValueStore`] names exactly those, so the same
//! record logic runs against Redis in production and an in-memory map in
//! tests.
//!
//! # Implementations
//!
//! - `grantstore-redis` - Redis via a `deadpool-redis` connection pool
//! - `grantstore-memory` - in-process map with TTL, for tests and tooling

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::StoreResult;

/// A single queued write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set several fields of a hash (`HSET key f1 v1 f2 v2 ...`).
    HashSet {
        /// Target key.
        key: String,
        /// Field/value pairs, in write order.
        fields: Vec<(String, String)>,
    },
    /// Set an absolute expiry on a key (`EXPIREAT key unix_seconds`).
    ExpireAt {
        /// Target key.
        key: String,
        /// Instant after which the key is gone.
        at: OffsetDateTime,
    },
}

impl Command {
    /// Key this command writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::HashSet { key, .. } | Self::ExpireAt { key, .. } => key,
        }
    }
}

/// Writes queued client-side and flushed in one round trip.
///
/// A non-atomic batch is a plain pipeline: commands are applied in order
/// and a failure part-way leaves earlier commands applied. An atomic batch
/// is applied all-or-nothing where the backend supports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    commands: Vec<Command>,
    atomic: bool,
}

impl Batch {
    /// Creates an empty pipelined batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty transactional batch.
    #[must_use]
    pub fn atomic() -> Self {
        Self {
            commands: Vec::new(),
            atomic: true,
        }
    }

    /// Queues a hash write.
    pub fn hash_set(&mut self, key: impl Into<String>, fields: Vec<(String, String)>) -> &mut Self {
        self.commands.push(Command::HashSet {
            key: key.into(),
            fields,
        });
        self
    }

    /// Queues an absolute expiry.
    pub fn expire_at(&mut self, key: impl Into<String>, at: OffsetDateTime) -> &mut Self {
        self.commands.push(Command::ExpireAt {
            key: key.into(),
            at,
        });
        self
    }

    /// Returns `true` if the batch should be applied all-or-nothing.
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Queued commands, in submission order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// Hash and expiry primitives required from the backing store.
///
/// Every method reports store communication failures as
/// `StoreError::Transport`. A missing key is never an error: reads return
/// empty results and deletes are no-ops.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Sets the given fields of the hash at `key`, creating it if needed.
    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()>;

    /// Reads every field of the hash at `key`.
    ///
    /// Returns an empty map if the key does not exist or has expired.
    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Reads selected fields of the hash at `key`, in the order asked.
    ///
    /// Missing fields (and every field of a missing key) come back `None`.
    async fn hash_multi_get(&self, key: &str, fields: &[&str]) -> StoreResult<Vec<Option<String>>>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Sets an absolute expiry on `key`.
    ///
    /// Returns `false` if the key does not exist.
    async fn expire_at(&self, key: &str, at: OffsetDateTime) -> StoreResult<bool>;

    /// Flushes a batch of queued writes in one round trip.
    async fn execute(&self, batch: Batch) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_batch_preserves_submission_order() {
        let at = datetime!(2024-03-08 12:00:00 UTC);
        let mut batch = Batch::new();
        batch
            .hash_set("r:ref1", vec![("access".into(), "tok1".into())])
            .expire_at("r:ref1", at);

        assert!(!batch.is_atomic());
        assert_eq!(batch.len(), 2);
        let keys: Vec<&str> = batch.commands().iter().map(Command::key).collect();
        assert_eq!(keys, vec!["r:ref1", "r:ref1"]);
        assert!(matches!(batch.commands()[1], Command::ExpireAt { .. }));
    }

    #[test]
    fn test_atomic_batch_flag() {
        assert!(Batch::atomic().is_atomic());
        assert!(Batch::atomic().is_empty());
    }
}
