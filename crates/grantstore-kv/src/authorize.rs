//! Authorization codes under `a:<code>`.

use async_trait::async_trait;

use grantstore_core::{
    AuthorizeData, AuthorizeStorage, ClientStorage, EntityKind, KeyValueStore, StoreError,
    StoreResult,
};

use crate::KvGrantStorage;
use crate::record::{Record, epoch, field, pair};

#[async_trait]
impl<S: KeyValueStore> AuthorizeStorage for KvGrantStorage<S> {
    async fn save_authorize(&self, data: &AuthorizeData) -> StoreResult<()> {
        let extra = data.user_data.encode()?;
        let key = EntityKind::AuthorizeCode.key(&data.code);
        let fields = [
            pair(field::CLIENT, &data.client.id),
            pair(field::EXPIRES_IN, data.expires_in),
            pair(field::SCOPE, &data.scope),
            pair(field::REDIRECT_URI, &data.redirect_uri),
            pair(field::STATE, &data.state),
            pair(field::CREATED_AT, epoch(data.created_at)),
            pair(field::EXTRA, extra),
        ];
        self.store.hash_set(&key, &fields).await?;

        let expire_at = self.policy.authorize_expire_at(data.created_at, data.expires_in);
        match self.store.expire_at(&key, expire_at).await {
            Ok(_) => {
                tracing::debug!(key = %key, expire_at = %expire_at, "Authorization code saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "Authorization code saved without expiry"
                );
                Err(StoreError::expiry_not_applied(
                    EntityKind::AuthorizeCode,
                    &data.code,
                    e.to_string(),
                ))
            }
        }
    }

    async fn load_authorize(&self, code: &str) -> StoreResult<AuthorizeData> {
        let key = EntityKind::AuthorizeCode.key(code);
        let hash = self.store.hash_get_all(&key).await?;
        let mut record = Record::from_hash(EntityKind::AuthorizeCode, code, hash)?;

        let expires_in = record.int(field::EXPIRES_IN)?;
        let created_at = record.timestamp(field::CREATED_AT)?;
        let client = self.get_client(&record.take(field::CLIENT)).await?;

        Ok(AuthorizeData {
            code: code.to_string(),
            client,
            expires_in,
            scope: record.take(field::SCOPE),
            redirect_uri: record.take(field::REDIRECT_URI),
            state: record.take(field::STATE),
            created_at,
            user_data: record.take_user_data(field::EXTRA),
        })
    }

    async fn remove_authorize(&self, code: &str) -> StoreResult<()> {
        let key = EntityKind::AuthorizeCode.key(code);
        self.store.delete(&key).await?;
        tracing::debug!(key = %key, "Authorization code removed");
        Ok(())
    }
}
