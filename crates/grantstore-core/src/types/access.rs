//! Access token data and the token chain.

use serde::Serialize;
use time::OffsetDateTime;

use crate::types::{AuthorizeData, Client};
use crate::user_data::UserData;

/// An issued access token, optionally paired with a refresh token.
///
/// When a token is minted by a refresh, `previous` holds the token it
/// replaced, forming a history chain. On load, `authorize_data` and
/// `previous` are best-effort: they are `None` whenever the referenced
/// record has expired, been removed, or could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessData {
    /// Client the token was issued to. Required to save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,

    /// Authorization code this token was exchanged for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_data: Option<Box<AuthorizeData>>,

    /// Token this one replaced on refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Box<AccessData>>,

    /// The access token itself.
    pub access_token: String,

    /// Refresh token minted alongside, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Lifetime in seconds reported to the client.
    pub expires_in: i32,

    /// Granted scope.
    pub scope: String,

    /// Redirect URI of the originating request.
    pub redirect_uri: String,

    /// Issue time. Stored with second precision.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Opaque caller payload.
    pub user_data: UserData,
}

impl AccessData {
    /// Creates access data issued now for `client`.
    #[must_use]
    pub fn new(access_token: impl Into<String>, client: Client, expires_in: i32) -> Self {
        Self {
            client: Some(client),
            authorize_data: None,
            previous: None,
            access_token: access_token.into(),
            refresh_token: None,
            expires_in,
            scope: String::new(),
            redirect_uri: String::new(),
            created_at: OffsetDateTime::now_utc(),
            user_data: UserData::Empty,
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Links the authorization code this token was exchanged for.
    #[must_use]
    pub fn with_authorize_data(mut self, authorize_data: AuthorizeData) -> Self {
        self.authorize_data = Some(Box::new(authorize_data));
        self
    }

    /// Links the token this one replaces.
    #[must_use]
    pub fn with_previous(mut self, previous: AccessData) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Sets the issue time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the granted scope.
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

    /// Attaches a user data payload.
    #[must_use]
    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = user_data;
        self
    }

    /// Identifier of the previous token, as written to the `previous` field.
    #[must_use]
    pub fn previous_token(&self) -> Option<&str> {
        self.previous.as_deref().map(|p| p.access_token.as_str())
    }

    /// Authorization code, as written to the `authorize` field.
    #[must_use]
    pub fn authorize_code(&self) -> Option<&str> {
        self.authorize_data.as_deref().map(|a| a.code.as_str())
    }

    /// Number of predecessors reachable through `previous`.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        let mut len = 0;
        let mut cursor = self.previous.as_deref();
        while let Some(prev) = cursor {
            len += 1;
            cursor = prev.previous.as_deref();
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_len_walks_previous_links() {
        let client = Client::new("app", "s3cret", "https://app.example/cb");
        let tok1 = AccessData::new("tok1", client.clone(), 3600);
        let tok2 = AccessData::new("tok2", client.clone(), 3600).with_previous(tok1);
        let tok3 = AccessData::new("tok3", client, 3600).with_previous(tok2);

        assert_eq!(tok3.chain_len(), 2);
        assert_eq!(tok3.previous_token(), Some("tok2"));
        assert_eq!(tok3.authorize_code(), None);
    }
}
