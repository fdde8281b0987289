//! Client storage trait.

use async_trait::async_trait;

use crate::StoreResult;
use crate::types::Client;

/// Storage operations for OAuth 2.0 clients.
///
/// Client records never expire. `create` and `update` are both plain
/// overwrites of the secret, redirect URI and user data fields.
///
/// # Example
///
/// ```ignore
/// use grantstore_core::storage::ClientStorage;
///
/// async fn example(storage: &impl ClientStorage) -> grantstore_core::StoreResult<()> {
///     let client = storage.get_client("my-app").await?;
///     println!("redirect to {}", client.redirect_uri);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Stores a new client.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encoding` if the user data cannot be encoded
    /// (nothing is written), or `StoreError::Transport` on store failure.
    async fn create_client(&self, client: &Client) -> StoreResult<()>;

    /// Loads a client by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no client has this id.
    async fn get_client(&self, id: &str) -> StoreResult<Client>;

    /// Rewrites an existing client's secret, redirect URI and user data.
    ///
    /// # Errors
    ///
    /// Same as [`create_client`](Self::create_client).
    async fn update_client(&self, client: &Client) -> StoreResult<()>;

    /// Removes a client. Removing an absent client succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` on store failure.
    async fn remove_client(&self, id: &str) -> StoreResult<()>;
}
