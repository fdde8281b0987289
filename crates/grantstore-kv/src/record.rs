//! Field layout of stored records and typed field parsing.

use std::collections::HashMap;
use std::str::FromStr;

use grantstore_core::{EntityKind, StoreError, StoreResult, UserData};
use time::OffsetDateTime;

/// Hash field names.
pub(crate) mod field {
    pub const SECRET: &str = "secret";
    pub const REDIRECT_URI: &str = "redirect_uri";
    pub const DATA: &str = "data";

    pub const CLIENT: &str = "client";
    pub const EXPIRES_IN: &str = "expires_in";
    pub const SCOPE: &str = "scope";
    pub const STATE: &str = "state";
    pub const CREATED_AT: &str = "created_at";
    pub const EXTRA: &str = "extra";

    pub const AUTHORIZE: &str = "authorize";
    pub const PREVIOUS: &str = "previous";
    pub const REFRESH_TOKEN: &str = "refresh_token";

    pub const ACCESS: &str = "access";
}

/// Builds a field/value pair for a hash write.
pub(crate) fn pair(name: &str, value: impl ToString) -> (String, String) {
    (name.to_string(), value.to_string())
}

/// Encodes a timestamp the way records store it: whole Unix seconds.
pub(crate) fn epoch(at: OffsetDateTime) -> i64 {
    at.unix_timestamp()
}

/// A hash read back from the store, tied to the entity it belongs to.
///
/// Missing text fields read as empty strings. Missing numeric fields read
/// as zero; present ones that do not parse are reported as malformed.
pub(crate) struct Record {
    kind: EntityKind,
    id: String,
    fields: HashMap<String, String>,
}

impl Record {
    /// Wraps the result of a full hash read. An empty hash means the record
    /// does not exist (or has expired).
    pub(crate) fn from_hash(
        kind: EntityKind,
        id: &str,
        fields: HashMap<String, String>,
    ) -> StoreResult<Self> {
        if fields.is_empty() {
            return Err(StoreError::not_found(kind, id));
        }
        Ok(Self {
            kind,
            id: id.to_string(),
            fields,
        })
    }

    /// Removes and returns a text field.
    pub(crate) fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    /// Removes a reference field, treating empty as absent.
    pub(crate) fn take_ref(&mut self, name: &str) -> Option<String> {
        Some(self.take(name)).filter(|value| !value.is_empty())
    }

    pub(crate) fn take_user_data(&mut self, name: &str) -> UserData {
        UserData::from_stored(self.take(name))
    }

    /// Parses an integer field.
    pub(crate) fn int<T>(&self, name: &str) -> StoreResult<T>
    where
        T: FromStr + Default,
        T::Err: std::fmt::Display,
    {
        match self.fields.get(name) {
            None => Ok(T::default()),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| self.malformed(name, format!("'{raw}': {e}"))),
        }
    }

    /// Parses a Unix-seconds timestamp field.
    pub(crate) fn timestamp(&self, name: &str) -> StoreResult<OffsetDateTime> {
        let seconds: i64 = self.int(name)?;
        OffsetDateTime::from_unix_timestamp(seconds)
            .map_err(|e| self.malformed(name, e.to_string()))
    }

    fn malformed(&self, name: &str, message: String) -> StoreError {
        StoreError::malformed(self.kind, self.id.clone(), name, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Record::from_hash(EntityKind::AccessToken, "tok1", fields).unwrap()
    }

    #[test]
    fn test_empty_hash_is_not_found() {
        let err = Record::from_hash(EntityKind::AuthorizeCode, "abc", HashMap::new())
            .err()
            .unwrap();
        assert!(err.is_not_found_for(EntityKind::AuthorizeCode));
    }

    #[test]
    fn test_missing_fields_read_as_defaults() {
        let mut rec = record(&[("scope", "read")]);
        assert_eq!(rec.take(field::REDIRECT_URI), "");
        assert_eq!(rec.take_ref(field::PREVIOUS), None);
        assert_eq!(rec.int::<i32>(field::EXPIRES_IN).unwrap(), 0);
        assert!(rec.take_user_data(field::EXTRA).is_empty());
    }

    #[test]
    fn test_timestamp_parses_epoch_seconds() {
        let rec = record(&[("created_at", "1709294400")]);
        assert_eq!(
            rec.timestamp(field::CREATED_AT).unwrap(),
            datetime!(2024-03-01 12:00:00 UTC)
        );
    }

    #[test]
    fn test_non_integer_field_is_malformed() {
        let rec = record(&[("expires_in", "soon")]);
        let err = rec.int::<i32>(field::EXPIRES_IN).unwrap_err();
        match err {
            StoreError::MalformedRecord { kind, key, field, .. } => {
                assert_eq!(kind, EntityKind::AccessToken);
                assert_eq!(key, "tok1");
                assert_eq!(field, "expires_in");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_reference_is_absent() {
        let mut rec = record(&[("authorize", ""), ("previous", "tok0")]);
        assert_eq!(rec.take_ref(field::AUTHORIZE), None);
        assert_eq!(rec.take_ref(field::PREVIOUS).as_deref(), Some("tok0"));
    }
}
