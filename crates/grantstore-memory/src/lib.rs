//! In-memory key-value backend for grantstore.
//!
//! This crate provides an in-memory implementation of the `KeyValueStore`
//! trait from `grantstore-core`, using `DashMap` for concurrent access and a
//! pluggable [`Clock`] so expiry can be tested without sleeping.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use grantstore_memory::{ManualClock, MemoryKeyValueStore};
//!
//! let clock = Arc::new(ManualClock::new(time::OffsetDateTime::now_utc()));
//! let store = MemoryKeyValueStore::with_clock(clock.clone());
//! clock.advance(time::Duration::days(8));
//! ```

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::MemoryKeyValueStore;
