//! Access tokens under `t:<token>`, written together with their refresh
//! mapping under `r:<refresh>`.

use async_trait::async_trait;

use grantstore_core::{
    AccessData, AccessStorage, Batch, ClientStorage, EntityKind, KeyValueStore, StoreError,
    StoreResult,
};

use crate::KvGrantStorage;
use crate::record::{Record, epoch, field, pair};

/// One access token record with its client and authorization code resolved.
///
/// The previous-token reference is left as an id for the chain walk.
pub(crate) struct StoredAccess {
    pub(crate) data: AccessData,
    pub(crate) previous: Option<String>,
}

impl<S: KeyValueStore> KvGrantStorage<S> {
    /// Reads a single `t:` record.
    ///
    /// The client must resolve; the authorization code is best-effort.
    pub(crate) async fn read_access_record(&self, token: &str) -> StoreResult<StoredAccess> {
        let key = EntityKind::AccessToken.key(token);
        let hash = self.store.hash_get_all(&key).await?;
        let mut record = Record::from_hash(EntityKind::AccessToken, token, hash)?;

        let expires_in = record.int(field::EXPIRES_IN)?;
        let created_at = record.timestamp(field::CREATED_AT)?;
        let client = self.get_client(&record.take(field::CLIENT)).await?;

        let authorize_data = match record.take_ref(field::AUTHORIZE) {
            Some(code) => self.resolve_authorize(&code).await.map(Box::new),
            None => None,
        };

        let data = AccessData {
            client: Some(client),
            authorize_data,
            previous: None,
            access_token: token.to_string(),
            refresh_token: record.take_ref(field::REFRESH_TOKEN),
            expires_in,
            scope: record.take(field::SCOPE),
            redirect_uri: record.take(field::REDIRECT_URI),
            created_at,
            user_data: record.take_user_data(field::EXTRA),
        };

        Ok(StoredAccess {
            data,
            previous: record.take_ref(field::PREVIOUS),
        })
    }

    fn new_batch(&self) -> Batch {
        if self.config.atomic_token_writes {
            Batch::atomic()
        } else {
            Batch::new()
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> AccessStorage for KvGrantStorage<S> {
    async fn save_access(&self, data: &AccessData) -> StoreResult<()> {
        let Some(client) = data.client.as_ref() else {
            return Err(StoreError::client_is_nil(&data.access_token));
        };
        let extra = data.user_data.encode()?;

        let mut batch = self.new_batch();
        let refresh_token = data.refresh_token.as_deref().unwrap_or_default();

        if !refresh_token.is_empty() {
            let refresh_key = EntityKind::RefreshToken.key(refresh_token);
            batch
                .hash_set(refresh_key.clone(), vec![pair(field::ACCESS, &data.access_token)])
                .expire_at(refresh_key, self.policy.refresh_expire_at(data.created_at));
        }

        let key = EntityKind::AccessToken.key(&data.access_token);
        batch
            .hash_set(
                key.clone(),
                vec![
                    pair(field::CLIENT, &client.id),
                    pair(field::AUTHORIZE, data.authorize_code().unwrap_or_default()),
                    pair(field::PREVIOUS, data.previous_token().unwrap_or_default()),
                    pair(field::REFRESH_TOKEN, refresh_token),
                    pair(field::EXPIRES_IN, data.expires_in),
                    pair(field::SCOPE, &data.scope),
                    pair(field::REDIRECT_URI, &data.redirect_uri),
                    pair(field::CREATED_AT, epoch(data.created_at)),
                    pair(field::EXTRA, extra),
                ],
            )
            .expire_at(key.clone(), self.policy.access_expire_at(data.created_at));

        let atomic = batch.is_atomic();
        self.store.execute(batch).await?;
        tracing::debug!(key = %key, atomic, "Access token saved");
        Ok(())
    }

    async fn load_access(&self, token: &str) -> StoreResult<AccessData> {
        self.resolve_access(token).await
    }

    async fn remove_access(&self, token: &str) -> StoreResult<()> {
        let key = EntityKind::AccessToken.key(token);
        self.store.delete(&key).await?;
        tracing::debug!(key = %key, "Access token removed");
        Ok(())
    }
}
