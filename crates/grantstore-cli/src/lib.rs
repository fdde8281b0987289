//! Configuration loading and logging setup for the `grantstore` binary.

pub mod config;
pub mod observability;

pub use config::{AppConfig, LoggingConfig, load_config};
