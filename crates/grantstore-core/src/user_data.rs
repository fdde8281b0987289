//! Opaque user data attached to clients, authorization codes and tokens.
//!
//! The store never interprets this payload. Callers declare up front how
//! their value should become text by picking a [`UserData`] variant; the
//! store writes the encoded string and hands it back on read as
//! [`UserData::Raw`].
//!
//! | Variant        | Encoded as                         |
//! |----------------|------------------------------------|
//! | `Empty`        | `""`                               |
//! | `Raw`          | the string itself                  |
//! | `Renderable`   | the value's `Display` output       |
//! | `Structured`   | compact JSON via `serde_json`      |
//!
//! Scalar forms never get expanded into JSON: a newtype that renders as
//! `"42"` is stored as `42`, not `{"0":42}`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use crate::error::StoreError;
use crate::StoreResult;

/// A value that can be encoded as structured text.
///
/// Implemented for every `Serialize` type; exists so [`UserData`] can hold
/// heterogeneous structured payloads behind one pointer type.
pub trait StructuredData: Send + Sync {
    /// Rust type name of the underlying value, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Encodes the value as compact JSON.
    fn to_json(&self) -> serde_json::Result<String>;
}

impl<T> StructuredData for T
where
    T: Serialize + Send + Sync + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Caller-defined payload stored alongside a record.
#[derive(Clone, Default)]
pub enum UserData {
    /// No payload.
    #[default]
    Empty,
    /// A string stored verbatim.
    Raw(String),
    /// A value stored as its `Display` rendering.
    Renderable(Arc<dyn fmt::Display + Send + Sync>),
    /// A value stored as JSON.
    Structured(Arc<dyn StructuredData>),
}

impl UserData {
    /// Wraps a string that is stored verbatim.
    #[must_use]
    pub fn raw(value: impl Into<String>) -> Self {
        Self::Raw(value.into())
    }

    /// Wraps a value that is stored as its `Display` rendering.
    #[must_use]
    pub fn renderable<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::Renderable(Arc::new(value))
    }

    /// Wraps a value that is stored as JSON.
    #[must_use]
    pub fn structured<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::Structured(Arc::new(value))
    }

    /// Rebuilds the payload from the string found in the store.
    #[must_use]
    pub fn from_stored(value: String) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Raw(value)
        }
    }

    /// Returns `true` if there is no payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Raw(s) => s.is_empty(),
            Self::Renderable(_) | Self::Structured(_) => false,
        }
    }

    /// Returns the stored text for `Empty` and `Raw` payloads.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Empty => Some(""),
            Self::Raw(s) => Some(s),
            Self::Renderable(_) | Self::Structured(_) => None,
        }
    }

    /// Encodes the payload into the string written to the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encoding` naming the value's type if a
    /// structured payload cannot be serialized.
    pub fn encode(&self) -> StoreResult<String> {
        match self {
            Self::Empty => Ok(String::new()),
            Self::Raw(s) => Ok(s.clone()),
            Self::Renderable(value) => Ok(value.to_string()),
            Self::Structured(value) => value
                .to_json()
                .map_err(|e| StoreError::encoding(value.type_name(), e.to_string())),
        }
    }

    /// Decodes the payload as JSON into `T`.
    ///
    /// Useful on loaded records, whose payload comes back as `Raw` text.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encoding` if the payload is not valid JSON for
    /// `T` or cannot itself be encoded.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let text = self.encode()?;
        serde_json::from_str(&text)
            .map_err(|e| StoreError::encoding(std::any::type_name::<T>(), e.to_string()))
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Raw(s) => f.debug_tuple("Raw").field(s).finish(),
            Self::Renderable(value) => f.debug_tuple("Renderable").field(&value.to_string()).finish(),
            Self::Structured(value) => f.debug_tuple("Structured").field(&value.type_name()).finish(),
        }
    }
}

/// Two payloads are equal when they encode to the same stored text.
impl PartialEq for UserData {
    fn eq(&self, other: &Self) -> bool {
        match (self.encode(), other.encode()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for UserData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl From<String> for UserData {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for UserData {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}
