//! In-memory key-value store with per-key absolute expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use grantstore_core::kv::{Batch, Command, KeyValueStore};
use grantstore_core::{StoreError, StoreResult};

use crate::clock::{Clock, SystemClock};

/// Sentinel for "no fault injected".
const NO_FAULT: i64 = -1;

/// A stored hash and its optional expiry.
#[derive(Debug, Clone, Default)]
struct Entry {
    fields: HashMap<String, String>,
    expires_at: Option<OffsetDateTime>,
}

impl Entry {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory [`KeyValueStore`] backed by `DashMap`.
///
/// This store provides:
/// - Redis-like hash semantics (`HSET` keeps an existing expiry)
/// - Absolute per-key expiry evaluated lazily against a [`Clock`]
/// - All-or-nothing atomic batches, in-order pipelined batches
/// - Write fault injection for exercising partial-write outcomes
pub struct MemoryKeyValueStore {
    data: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
    /// Successful writes left before injected failures start, or `NO_FAULT`.
    writes_until_failure: AtomicI64,
}

impl MemoryKeyValueStore {
    /// Creates an empty store using the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store using `clock` for expiry decisions.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: DashMap::new(),
            clock,
            writes_until_failure: AtomicI64::new(NO_FAULT),
        }
    }

    /// Lets `writes` more write commands succeed, then fails every write
    /// with a transport error until [`clear_faults`](Self::clear_faults).
    pub fn fail_after_writes(&self, writes: u32) {
        self.writes_until_failure
            .store(i64::from(writes), Ordering::SeqCst);
    }

    /// Stops injecting write failures.
    pub fn clear_faults(&self) {
        self.writes_until_failure.store(NO_FAULT, Ordering::SeqCst);
    }

    /// Returns `true` if `key` exists and has not expired.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.live_entry(key).is_some()
    }

    /// Expiry currently set on `key`, if the key exists and has one.
    #[must_use]
    pub fn expiry_of(&self, key: &str) -> Option<OffsetDateTime> {
        self.live_entry(key).and_then(|e| e.expires_at)
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.data.iter().filter(|e| !e.is_expired(now)).count()
    }

    /// Returns `true` if no live keys remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every key whose expiry has passed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.data.retain(|_, entry| {
            if entry.is_expired(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Returns a snapshot of the entry at `key`, evicting it if expired.
    fn live_entry(&self, key: &str) -> Option<Entry> {
        let now = self.clock.now();
        let entry = self.data.get(key)?;
        if entry.is_expired(now) {
            drop(entry);
            self.data.remove(key);
            return None;
        }
        Some(entry.value().clone())
    }

    /// Consumes `count` writes from the fault budget, failing if it is short.
    fn reserve_writes(&self, count: i64) -> StoreResult<()> {
        let result = self
            .writes_until_failure
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                if left == NO_FAULT {
                    Some(left)
                } else if left >= count {
                    Some(left - count)
                } else {
                    None
                }
            });
        result
            .map(|_| ())
            .map_err(|_| StoreError::transport("injected write failure"))
    }

    fn apply_hash_set(&self, key: &str, fields: &[(String, String)]) {
        let now = self.clock.now();
        let mut entry = self.data.entry(key.to_string()).or_default();
        if entry.is_expired(now) {
            *entry = Entry::default();
        }
        for (field, value) in fields {
            entry.fields.insert(field.clone(), value.clone());
        }
    }

    fn apply_expire_at(&self, key: &str, at: OffsetDateTime) -> bool {
        let now = self.clock.now();
        let Some(mut entry) = self.data.get_mut(key) else {
            return false;
        };
        if entry.is_expired(now) {
            drop(entry);
            self.data.remove(key);
            return false;
        }
        entry.expires_at = Some(at);
        true
    }

    fn apply(&self, command: &Command) {
        match command {
            Command::HashSet { key, fields } => self.apply_hash_set(key, fields),
            Command::ExpireAt { key, at } => {
                self.apply_expire_at(key, *at);
            }
        }
    }
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryKeyValueStore")
            .field("keys", &self.data.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        self.reserve_writes(1)?;
        self.apply_hash_set(key, fields);
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        Ok(self.live_entry(key).map(|e| e.fields).unwrap_or_default())
    }

    async fn hash_multi_get(&self, key: &str, fields: &[&str]) -> StoreResult<Vec<Option<String>>> {
        let entry = self.live_entry(key);
        Ok(fields
            .iter()
            .map(|field| entry.as_ref().and_then(|e| e.fields.get(*field).cloned()))
            .collect())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.reserve_writes(1)?;
        self.data.remove(key);
        Ok(())
    }

    async fn expire_at(&self, key: &str, at: OffsetDateTime) -> StoreResult<bool> {
        self.reserve_writes(1)?;
        Ok(self.apply_expire_at(key, at))
    }

    async fn execute(&self, batch: Batch) -> StoreResult<()> {
        if batch.is_atomic() {
            let count = i64::try_from(batch.len()).unwrap_or(i64::MAX);
            self.reserve_writes(count)?;
            for command in batch.commands() {
                self.apply(command);
            }
            return Ok(());
        }

        for command in batch.commands() {
            self.reserve_writes(1)?;
            self.apply(command);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use time::Duration;
    use time::macros::datetime;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store_at(at: OffsetDateTime) -> (MemoryKeyValueStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(at));
        (MemoryKeyValueStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_hash_set_merges_fields() {
        let store = MemoryKeyValueStore::new();
        store.hash_set("c:app", &fields(&[("secret", "a"), ("data", "x")])).await.unwrap();
        store.hash_set("c:app", &fields(&[("secret", "b")])).await.unwrap();

        let all = store.hash_get_all("c:app").await.unwrap();
        assert_eq!(all.get("secret").map(String::as_str), Some("b"));
        assert_eq!(all.get("data").map(String::as_str), Some("x"));
    }

    #[tokio::test]
    async fn test_missing_key_reads_empty() {
        let store = MemoryKeyValueStore::new();
        assert!(store.hash_get_all("t:none").await.unwrap().is_empty());
        assert_eq!(
            store.hash_multi_get("r:none", &["access"]).await.unwrap(),
            vec![None]
        );
        assert!(!store.expire_at("t:none", OffsetDateTime::now_utc()).await.unwrap());
        store.delete("t:none").await.unwrap();
    }

    #[tokio::test]
    async fn test_key_expires_at_exact_instant() {
        let (store, clock) = store_at(datetime!(2024-03-01 12:00:00 UTC));
        store.hash_set("a:abc", &fields(&[("client", "app")])).await.unwrap();
        assert!(store
            .expire_at("a:abc", datetime!(2024-03-01 12:01:00 UTC))
            .await
            .unwrap());

        clock.advance(Duration::seconds(59));
        assert!(store.contains_key("a:abc"));

        clock.advance(Duration::seconds(1));
        assert!(!store.contains_key("a:abc"));
        assert!(store.hash_get_all("a:abc").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hash_set_keeps_existing_expiry() {
        let (store, _clock) = store_at(datetime!(2024-03-01 12:00:00 UTC));
        let at = datetime!(2024-03-08 12:00:00 UTC);
        store.hash_set("t:tok", &fields(&[("scope", "read")])).await.unwrap();
        store.expire_at("t:tok", at).await.unwrap();
        store.hash_set("t:tok", &fields(&[("scope", "write")])).await.unwrap();

        assert_eq!(store.expiry_of("t:tok"), Some(at));
    }

    #[tokio::test]
    async fn test_pipelined_batch_applies_prefix_on_failure() {
        let store = MemoryKeyValueStore::new();
        let mut batch = Batch::new();
        batch
            .hash_set("r:ref1", fields(&[("access", "tok1")]))
            .hash_set("t:tok1", fields(&[("client", "app")]));

        store.fail_after_writes(1);
        let err = store.execute(batch).await.unwrap_err();
        assert!(err.is_transport());
        assert!(store.contains_key("r:ref1"));
        assert!(!store.contains_key("t:tok1"));
    }

    #[tokio::test]
    async fn test_atomic_batch_is_all_or_nothing() {
        let store = MemoryKeyValueStore::new();
        let mut batch = Batch::atomic();
        batch
            .hash_set("r:ref1", fields(&[("access", "tok1")]))
            .hash_set("t:tok1", fields(&[("client", "app")]));

        store.fail_after_writes(1);
        assert!(store.execute(batch.clone()).await.is_err());
        assert!(store.is_empty());

        store.clear_faults();
        store.execute(batch).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (store, clock) = store_at(datetime!(2024-03-01 12:00:00 UTC));
        store.hash_set("a:1", &fields(&[("x", "1")])).await.unwrap();
        store.hash_set("c:app", &fields(&[("x", "1")])).await.unwrap();
        store.expire_at("a:1", datetime!(2024-03-01 12:00:10 UTC)).await.unwrap();

        clock.advance(Duration::minutes(1));
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }
}
