//! Access token storage trait.

use async_trait::async_trait;

use crate::StoreResult;
use crate::types::AccessData;

/// Storage operations for access tokens.
///
/// Saving a token with a refresh token also writes the refresh mapping.
/// The two writes are flushed together but are only atomic when the
/// storage is configured for it; otherwise a failure during the flush can
/// leave one applied without the other.
#[async_trait]
pub trait AccessStorage: Send + Sync {
    /// Stores an access token and, if present, its refresh mapping.
    ///
    /// # Errors
    ///
    /// - `StoreError::InvalidInput` if no client is attached (nothing is
    ///   written)
    /// - `StoreError::Encoding` if the user data cannot be encoded (nothing
    ///   is written)
    /// - `StoreError::Transport` if flushing the writes fails
    async fn save_access(&self, data: &AccessData) -> StoreResult<()>;

    /// Loads an access token and resolves what it references.
    ///
    /// The client must resolve. The authorization code and the previous
    /// token are best-effort: any failure leaves the field `None`.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the token is absent or expired
    /// - any error from resolving the client
    async fn load_access(&self, token: &str) -> StoreResult<AccessData>;

    /// Removes an access token. Removing an absent token succeeds.
    ///
    /// The refresh mapping, if any, is left in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` on store failure.
    async fn remove_access(&self, token: &str) -> StoreResult<()>;
}
