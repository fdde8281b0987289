//! Refresh token storage trait.

use async_trait::async_trait;

use crate::StoreResult;
use crate::types::AccessData;

/// Storage operations for refresh tokens.
///
/// Refresh records are written by [`AccessStorage::save_access`]; this
/// trait only reads and revokes them.
///
/// [`AccessStorage::save_access`]: crate::storage::AccessStorage::save_access
#[async_trait]
pub trait RefreshStorage: Send + Sync {
    /// Loads the access token a refresh token currently points at.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` for the refresh token if the mapping is
    ///   absent or expired
    /// - any error from loading the mapped access token, including its
    ///   `NotFound` when the mapping outlived the token
    async fn load_refresh(&self, token: &str) -> StoreResult<AccessData>;

    /// Removes a refresh mapping. Removing an absent mapping succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` on store failure.
    async fn remove_refresh(&self, token: &str) -> StoreResult<()>;
}
