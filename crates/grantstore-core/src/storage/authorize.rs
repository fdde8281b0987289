//! Authorization code storage trait.
//!
//! # Implementation Notes
//!
//! - Codes carry an absolute expiry of `created_at + expires_in`
//! - The store does not enforce single use; callers remove the code after
//!   exchanging it

use async_trait::async_trait;

use crate::StoreResult;
use crate::types::AuthorizeData;

/// Storage operations for authorization codes.
#[async_trait]
pub trait AuthorizeStorage: Send + Sync {
    /// Stores an authorization code and sets its absolute expiry.
    ///
    /// The write and the expiry are two separate steps.
    ///
    /// # Errors
    ///
    /// - `StoreError::Encoding` if the user data cannot be encoded (nothing
    ///   is written)
    /// - `StoreError::Transport` if the record write fails
    /// - `StoreError::ExpiryNotApplied` if the record was written but its
    ///   expiry could not be set; the code is usable but will not expire on
    ///   its own (`is_degraded()` returns `true`)
    async fn save_authorize(&self, data: &AuthorizeData) -> StoreResult<()>;

    /// Loads an authorization code together with its client.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the code is absent or expired
    /// - any error from resolving the client, including its `NotFound`
    async fn load_authorize(&self, code: &str) -> StoreResult<AuthorizeData>;

    /// Removes an authorization code. Removing an absent code succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` on store failure.
    async fn remove_authorize(&self, code: &str) -> StoreResult<()>;
}
