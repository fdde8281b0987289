//! Client registrations under `c:<id>`.

use async_trait::async_trait;

use grantstore_core::{Client, ClientStorage, EntityKind, KeyValueStore, StoreResult};

use crate::KvGrantStorage;
use crate::record::{Record, field, pair};

impl<S: KeyValueStore> KvGrantStorage<S> {
    /// Create and update are the same field overwrite.
    async fn write_client(&self, client: &Client) -> StoreResult<()> {
        let data = client.user_data.encode()?;
        let key = EntityKind::Client.key(&client.id);
        let fields = [
            pair(field::SECRET, &client.secret),
            pair(field::REDIRECT_URI, &client.redirect_uri),
            pair(field::DATA, data),
        ];

        self.store.hash_set(&key, &fields).await?;
        tracing::debug!(key = %key, "Client written");
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> ClientStorage for KvGrantStorage<S> {
    async fn create_client(&self, client: &Client) -> StoreResult<()> {
        self.write_client(client).await
    }

    async fn get_client(&self, id: &str) -> StoreResult<Client> {
        let key = EntityKind::Client.key(id);
        let hash = self.store.hash_get_all(&key).await?;
        let mut record = Record::from_hash(EntityKind::Client, id, hash)?;

        Ok(Client {
            id: id.to_string(),
            secret: record.take(field::SECRET),
            redirect_uri: record.take(field::REDIRECT_URI),
            user_data: record.take_user_data(field::DATA),
        })
    }

    async fn update_client(&self, client: &Client) -> StoreResult<()> {
        self.write_client(client).await
    }

    async fn remove_client(&self, id: &str) -> StoreResult<()> {
        let key = EntityKind::Client.key(id);
        self.store.delete(&key).await?;
        tracing::debug!(key = %key, "Client removed");
        Ok(())
    }
}
