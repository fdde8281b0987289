//! # grantstore-core
//!
//! Domain types, storage traits and codecs for persisting OAuth 2.0
//! authorization server state in a key-value store with per-key expiry.
//!
//! This crate provides:
//! - Client, authorization code and access token types
//! - Storage traits the protocol engine calls into
//! - The [`KeyValueStore`] collaborator trait backends implement
//! - The opaque user data codec and the expiry policy
//!
//! ## Modules
//!
//! - [`types`] - Persisted entities
//! - [`storage`] - Entity storage traits
//! - [`kv`] - Key-value primitives and write batches
//! - [`user_data`] - Opaque caller payload encoding
//! - [`expiry`] - Absolute expiry per record class
//! - [`config`] - Storage tunables
//! - [`error`] - Error taxonomy

pub mod config;
pub mod error;
pub mod expiry;
pub mod kv;
pub mod storage;
pub mod types;
pub mod user_data;

pub use config::{ConfigError, StorageConfig};
pub use error::{EntityKind, ErrorCategory, StoreError};
pub use expiry::{DEFAULT_TOKEN_LIFETIME, ExpirationPolicy};
pub use kv::{Batch, Command, KeyValueStore};
pub use storage::{AccessStorage, AuthorizeStorage, ClientStorage, OAuthStorage, RefreshStorage};
pub use types::{AccessData, AuthorizeData, Client};
pub use user_data::{StructuredData, UserData};

/// Type alias for storage results.
pub type StoreResult<T> = Result<T, StoreError>;
