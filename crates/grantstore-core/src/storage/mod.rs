//! Storage traits consumed by the OAuth 2.0 protocol engine.
//!
//! This module defines storage interfaces for:
//!
//! - OAuth client registrations
//! - Authorization codes
//! - Access tokens
//! - Refresh tokens
//!
//! # Implementations
//!
//! - `grantstore-kv` - implements all four over any [`KeyValueStore`]
//!
//! [`KeyValueStore`]: crate::kv::KeyValueStore

pub mod access;
pub mod authorize;
pub mod client;
pub mod refresh;

pub use access::AccessStorage;
pub use authorize::AuthorizeStorage;
pub use client::ClientStorage;
pub use refresh::RefreshStorage;

/// Everything the protocol engine needs from a storage backend.
pub trait OAuthStorage: ClientStorage + AuthorizeStorage + AccessStorage + RefreshStorage {}

impl<T> OAuthStorage for T where T: ClientStorage + AuthorizeStorage + AccessStorage + RefreshStorage {}
