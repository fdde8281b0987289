//! Absolute expiry computation for each record class.
//!
//! Expiry is always an absolute wall-clock instant handed to the store's
//! native per-key TTL (`EXPIREAT`); nothing in this crate sweeps records.
//!
//! | Record        | Expires at                         |
//! |---------------|------------------------------------|
//! | client        | never                              |
//! | authorize     | `created_at + expires_in` seconds  |
//! | access token  | `created_at + token_lifetime`      |
//! | refresh token | `created_at + token_lifetime`      |

use std::time::Duration as StdDuration;

use time::{Duration, OffsetDateTime};

/// Default lifetime of access token and refresh mapping records.
pub const DEFAULT_TOKEN_LIFETIME: StdDuration = StdDuration::from_secs(7 * 24 * 60 * 60);

/// Expiry of an authorization code issued at `created_at`.
#[must_use]
pub fn authorize_expire_at(created_at: OffsetDateTime, expires_in: i32) -> OffsetDateTime {
    created_at.saturating_add(Duration::seconds(i64::from(expires_in)))
}

/// Computes absolute expiry instants for every record class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    token_lifetime: StdDuration,
}

impl ExpirationPolicy {
    /// Creates a policy where token records live for `token_lifetime`.
    #[must_use]
    pub fn new(token_lifetime: StdDuration) -> Self {
        Self { token_lifetime }
    }

    /// Lifetime applied to access token and refresh mapping records.
    #[must_use]
    pub fn token_lifetime(&self) -> StdDuration {
        self.token_lifetime
    }

    /// Clients never expire.
    #[must_use]
    pub fn client_expire_at(&self) -> Option<OffsetDateTime> {
        None
    }

    /// Expiry of an authorization code record.
    #[must_use]
    pub fn authorize_expire_at(&self, created_at: OffsetDateTime, expires_in: i32) -> OffsetDateTime {
        authorize_expire_at(created_at, expires_in)
    }

    /// Expiry of an access token record.
    #[must_use]
    pub fn access_expire_at(&self, created_at: OffsetDateTime) -> OffsetDateTime {
        created_at.saturating_add(self.lifetime())
    }

    /// Expiry of a refresh mapping record. Matches its access token.
    #[must_use]
    pub fn refresh_expire_at(&self, created_at: OffsetDateTime) -> OffsetDateTime {
        self.access_expire_at(created_at)
    }

    fn lifetime(&self) -> Duration {
        Duration::seconds(i64::try_from(self.token_lifetime.as_secs()).unwrap_or(i64::MAX))
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIFETIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_authorize_expiry_is_created_plus_expires_in() {
        let created = datetime!(2024-03-01 12:00:00 UTC);
        assert_eq!(
            authorize_expire_at(created, 60),
            datetime!(2024-03-01 12:01:00 UTC)
        );
    }

    #[test]
    fn test_token_records_expire_after_seven_days() {
        let policy = ExpirationPolicy::default();
        let created = datetime!(2024-03-01 12:00:00 UTC);
        let expected = datetime!(2024-03-08 12:00:00 UTC);

        assert_eq!(policy.access_expire_at(created), expected);
        assert_eq!(policy.refresh_expire_at(created), expected);
        assert_eq!(policy.client_expire_at(), None);
    }

    #[test]
    fn test_custom_lifetime() {
        let policy = ExpirationPolicy::new(StdDuration::from_secs(3600));
        let created = datetime!(2024-03-01 12:00:00 UTC);
        assert_eq!(
            policy.access_expire_at(created),
            datetime!(2024-03-01 13:00:00 UTC)
        );
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        let created = datetime!(2024-03-01 12:00:00 UTC);
        assert!(authorize_expire_at(created, i32::MAX) > created);
    }
}
