//! Access token chain resolution.
//!
//! An access token may name the token it replaced (`previous`) and the
//! authorization code it was minted from (`authorize`). Both references
//! are optional and best-effort: a referenced record that is gone, expired
//! or unreadable leaves the field `None` instead of failing the load.
//!
//! The walk over `previous` is iterative and bounded. It stops after
//! `max_chain_depth` predecessors or when a token id repeats, leaving the
//! last resolved entry's `previous` unset.

use std::collections::HashSet;
use std::sync::atomic::AtomicU64;

use grantstore_core::{
    AccessData, AuthorizeData, AuthorizeStorage, EntityKind, KeyValueStore, StoreError,
    StoreResult,
};

use crate::KvGrantStorage;
use crate::access::StoredAccess;
use crate::stats::ResolutionStats;

impl<S: KeyValueStore> KvGrantStorage<S> {
    /// Loads `token` and as much of its history as can be resolved.
    pub(crate) async fn resolve_access(&self, token: &str) -> StoreResult<AccessData> {
        let StoredAccess {
            data: mut head,
            previous: mut next,
        } = self.read_access_record(token).await?;

        let max_depth = self.config.max_chain_depth;
        let mut visited = HashSet::from([token.to_string()]);
        let mut predecessors: Vec<AccessData> = Vec::new();

        while let Some(previous) = next.take() {
            if predecessors.len() >= max_depth {
                tracing::warn!(
                    token = %token,
                    previous = %previous,
                    max_depth,
                    "Access token chain truncated at depth limit"
                );
                ResolutionStats::record(&self.stats.chains_truncated);
                break;
            }
            if !visited.insert(previous.clone()) {
                tracing::warn!(
                    token = %token,
                    previous = %previous,
                    "Access token chain revisits a token, stopping"
                );
                ResolutionStats::record(&self.stats.cycles_detected);
                break;
            }

            match self.read_access_record(&previous).await {
                Ok(stored) => {
                    next = stored.previous;
                    predecessors.push(stored.data);
                }
                Err(e) => {
                    discard(&self.stats.previous_discarded, EntityKind::AccessToken, &previous, &e);
                    break;
                }
            }
        }

        // Link newest to oldest: each predecessor becomes the `previous` of
        // the entry before it.
        head.previous = predecessors
            .into_iter()
            .rev()
            .fold(None, |older, mut data| {
                data.previous = older;
                Some(Box::new(data))
            });
        Ok(head)
    }

    /// Loads the authorization code an access token references, or `None`.
    pub(crate) async fn resolve_authorize(&self, code: &str) -> Option<AuthorizeData> {
        match self.load_authorize(code).await {
            Ok(data) => Some(data),
            Err(e) => {
                discard(&self.stats.authorize_discarded, EntityKind::AuthorizeCode, code, &e);
                None
            }
        }
    }
}

/// Records a swallowed sub-lookup. Missing records log at debug, any other
/// failure at warn.
fn discard(counter: &AtomicU64, kind: EntityKind, id: &str, error: &StoreError) {
    ResolutionStats::record(counter);
    if error.is_not_found() {
        tracing::debug!(kind = %kind, id = %id, "Referenced record not found, leaving unset");
    } else {
        tracing::warn!(
            kind = %kind,
            id = %id,
            error = %error,
            category = %error.category(),
            "Failed to resolve referenced record, leaving unset"
        );
    }
}
