//! Authorization code data.

use serde::Serialize;
use time::OffsetDateTime;

use crate::expiry;
use crate::types::Client;
use crate::user_data::UserData;

/// A short-lived, single-use authorization code issued mid-flow.
///
/// The record expires at `created_at + expires_in`. The store does not
/// enforce single use; the protocol engine removes the code after exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizeData {
    /// The authorization code itself.
    pub code: String,

    /// Client the code was issued to.
    pub client: Client,

    /// Lifetime in seconds, counted from `created_at`.
    pub expires_in: i32,

    /// Requested scope.
    pub scope: String,

    /// Redirect URI used in the authorization request.
    pub redirect_uri: String,

    /// Opaque `state` parameter of the authorization request.
    pub state: String,

    /// Issue time. Stored with second precision.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Opaque caller payload.
    pub user_data: UserData,
}

impl AuthorizeData {
    /// Creates authorize data issued now, with empty scope, state and
    /// redirect URI.
    #[must_use]
    pub fn new(code: impl Into<String>, client: Client, expires_in: i32) -> Self {
        Self {
            code: code.into(),
            client,
            expires_in,
            scope: String::new(),
            redirect_uri: String::new(),
            state: String::new(),
            created_at: OffsetDateTime::now_utc(),
            user_data: UserData::Empty,
        }
    }

    /// Sets the issue time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Sets the `state` parameter.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Attaches a user data payload.
    #[must_use]
    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = user_data;
        self
    }

    /// Absolute time after which the code is gone from the store.
    #[must_use]
    pub fn expire_at(&self) -> OffsetDateTime {
        expiry::authorize_expire_at(self.created_at, self.expires_in)
    }

    /// Returns `true` if the code is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expire_at()
    }
}
