//! Refresh token lookups through the `r:<refresh>` mapping.

use async_trait::async_trait;

use grantstore_core::{
    AccessData, AccessStorage, EntityKind, KeyValueStore, RefreshStorage, StoreError, StoreResult,
};

use crate::KvGrantStorage;
use crate::record::field;

#[async_trait]
impl<S: KeyValueStore> RefreshStorage for KvGrantStorage<S> {
    async fn load_refresh(&self, token: &str) -> StoreResult<AccessData> {
        let key = EntityKind::RefreshToken.key(token);
        let access = self
            .store
            .hash_multi_get(&key, &[field::ACCESS])
            .await?
            .into_iter()
            .next()
            .flatten()
            .filter(|access| !access.is_empty())
            .ok_or_else(|| StoreError::not_found(EntityKind::RefreshToken, token))?;

        self.load_access(&access).await
    }

    async fn remove_refresh(&self, token: &str) -> StoreResult<()> {
        let key = EntityKind::RefreshToken.key(token);
        self.store.delete(&key).await?;
        tracing::debug!(key = %key, "Refresh token removed");
        Ok(())
    }
}
