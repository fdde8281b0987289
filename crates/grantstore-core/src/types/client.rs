//! OAuth 2.0 client registration.

use serde::Serialize;

use crate::user_data::UserData;

/// A registered OAuth 2.0 client.
///
/// Clients never expire. The secret, redirect URI and user data may be
/// rewritten in place; tokens already issued to the client are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    pub id: String,

    /// Client secret as handed to the store (hashing is the caller's call).
    pub secret: String,

    /// Registered redirect URI.
    pub redirect_uri: String,

    /// Opaque caller payload.
    pub user_data: UserData,
}

impl Client {
    /// Creates a client with no user data.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            redirect_uri: redirect_uri.into(),
            user_data: UserData::Empty,
        }
    }

    /// Attaches a user data payload.
    #[must_use]
    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = user_data;
        self
    }
}
