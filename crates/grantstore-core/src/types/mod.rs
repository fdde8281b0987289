//! Domain types persisted by the store.
//!
//! - [`Client`] - OAuth 2.0 client registration
//! - [`AuthorizeData`] - Authorization code issued mid-flow
//! - [`AccessData`] - Access token, its refresh token and its history chain

pub mod access;
pub mod authorize;
pub mod client;

pub use access::AccessData;
pub use authorize::AuthorizeData;
pub use client::Client;
