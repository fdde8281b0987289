//! Storage error types.
//!
//! Every failure a storage operation can report is a [`StoreError`]. Variants
//! carry the entity class and key they relate to so callers can tell
//! "absent or expired" apart from "store unavailable" and "payload
//! unencodable", and branch accordingly (deny the grant, retry the
//! infrastructure, reject the input).

use std::fmt;

/// The class of record a storage operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// OAuth client registration (`c:` keys).
    Client,
    /// Authorization code (`a:` keys).
    AuthorizeCode,
    /// Access token (`t:` keys).
    AccessToken,
    /// Refresh token to access token mapping (`r:` keys).
    RefreshToken,
}

impl EntityKind {
    /// Returns the key prefix used for records of this class.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Client => "c",
            Self::AuthorizeCode => "a",
            Self::AccessToken => "t",
            Self::RefreshToken => "r",
        }
    }

    /// Builds the namespaced store key for `id`, e.g. `t:abc123`.
    #[must_use]
    pub fn key(&self, id: &str) -> String {
        format!("{}:{}", self.prefix(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::AuthorizeCode => write!(f, "authorize code"),
            Self::AccessToken => write!(f, "access token"),
            Self::RefreshToken => write!(f, "refresh token"),
        }
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record does not exist, or its TTL has elapsed.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Class of the missing record.
        kind: EntityKind,
        /// Identifier that was looked up (without prefix).
        key: String,
    },

    /// The caller passed data that cannot be stored.
    #[error("Invalid {kind} input for '{key}': {message}")]
    InvalidInput {
        /// Class of the record being written.
        kind: EntityKind,
        /// Identifier of the record being written.
        key: String,
        /// What was wrong with the input.
        message: String,
    },

    /// Opaque user data could not be rendered as a string.
    #[error("Cannot encode user data of type {type_name}: {message}")]
    Encoding {
        /// Rust type name of the offending value.
        type_name: String,
        /// Underlying serializer message.
        message: String,
    },

    /// Communication with the key-value store failed.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The record was written but its expiry could not be set, so it will
    /// not expire on its own.
    #[error("Expiry not applied to {kind} '{key}': {message}")]
    ExpiryNotApplied {
        /// Class of the record.
        kind: EntityKind,
        /// Identifier of the record.
        key: String,
        /// Underlying transport failure.
        message: String,
    },

    /// A stored field could not be parsed back into its typed form.
    #[error("Malformed {kind} record '{key}': field '{field}': {message}")]
    MalformedRecord {
        /// Class of the record.
        kind: EntityKind,
        /// Identifier of the record.
        key: String,
        /// Name of the offending hash field.
        field: String,
        /// Parse failure description.
        message: String,
    },

    /// The storage configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Creates a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(
        kind: EntityKind,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            kind,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates the `InvalidInput` error reported when an access token is
    /// saved without a client.
    #[must_use]
    pub fn client_is_nil(access_token: impl Into<String>) -> Self {
        Self::invalid_input(
            EntityKind::AccessToken,
            access_token,
            "client must not be nil",
        )
    }

    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `ExpiryNotApplied` error.
    #[must_use]
    pub fn expiry_not_applied(
        kind: EntityKind,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ExpiryNotApplied {
            kind,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new `MalformedRecord` error.
    #[must_use]
    pub fn malformed(
        kind: EntityKind,
        key: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            kind,
            key: key.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the record was absent or expired.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a not-found error for the given class.
    #[must_use]
    pub fn is_not_found_for(&self, expected: EntityKind) -> bool {
        matches!(self, Self::NotFound { kind, .. } if *kind == expected)
    }

    /// Returns `true` if the input was rejected before any write.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns `true` if user data could not be encoded.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Returns `true` if the store could not be reached or rejected a command.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if the write landed but in a weaker form than asked
    /// for. Callers may continue, but should reconcile out of band.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::ExpiryNotApplied { .. })
    }

    /// Returns the entity class this error relates to, if any.
    #[must_use]
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::NotFound { kind, .. }
            | Self::InvalidInput { kind, .. }
            | Self::ExpiryNotApplied { kind, .. }
            | Self::MalformedRecord { kind, .. } => Some(*kind),
            Self::Encoding { .. } | Self::Transport { .. } | Self::Configuration { .. } => None,
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidInput { .. } => ErrorCategory::Validation,
            Self::Encoding { .. } => ErrorCategory::Encoding,
            Self::Transport { .. } => ErrorCategory::Infrastructure,
            Self::ExpiryNotApplied { .. } => ErrorCategory::Degraded,
            Self::MalformedRecord { .. } => ErrorCategory::Corruption,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Record absent or expired.
    NotFound,
    /// Input rejected before any write.
    Validation,
    /// User data not representable as a string.
    Encoding,
    /// Store communication failure.
    Infrastructure,
    /// Write succeeded partially.
    Degraded,
    /// Stored data could not be parsed.
    Corruption,
    /// Invalid configuration.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Encoding => write!(f, "encoding"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Degraded => write!(f, "degraded"),
            Self::Corruption => write!(f, "corruption"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_layout() {
        assert_eq!(EntityKind::Client.key("app"), "c:app");
        assert_eq!(EntityKind::AuthorizeCode.key("abc"), "a:abc");
        assert_eq!(EntityKind::AccessToken.key("tok1"), "t:tok1");
        assert_eq!(EntityKind::RefreshToken.key("ref1"), "r:ref1");
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found(EntityKind::Client, "app");
        assert_eq!(err.to_string(), "client not found: app");

        let err = StoreError::client_is_nil("tok1");
        assert_eq!(
            err.to_string(),
            "Invalid access token input for 'tok1': client must not be nil"
        );

        let err = StoreError::encoding("alloc::vec::Vec<u8>", "unsupported");
        assert_eq!(
            err.to_string(),
            "Cannot encode user data of type alloc::vec::Vec<u8>: unsupported"
        );
    }

    #[test]
    fn test_error_predicates() {
        let err = StoreError::not_found(EntityKind::RefreshToken, "ref1");
        assert!(err.is_not_found());
        assert!(err.is_not_found_for(EntityKind::RefreshToken));
        assert!(!err.is_not_found_for(EntityKind::AccessToken));
        assert!(!err.is_transport());

        let err = StoreError::transport("connection refused");
        assert!(err.is_transport());
        assert!(!err.is_not_found());
        assert_eq!(err.entity_kind(), None);

        let err = StoreError::expiry_not_applied(EntityKind::AuthorizeCode, "abc", "timeout");
        assert!(err.is_degraded());
        assert_eq!(err.entity_kind(), Some(EntityKind::AuthorizeCode));
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StoreError::not_found(EntityKind::Client, "x").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StoreError::client_is_nil("t").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StoreError::transport("down").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            StoreError::malformed(EntityKind::AccessToken, "t", "expires_in", "nan").category(),
            ErrorCategory::Corruption
        );
        assert_eq!(ErrorCategory::Degraded.to_string(), "degraded");
    }
}
