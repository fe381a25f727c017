//! Infrastructure layer: relational storage and process configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{InMemoryStore, SqlStore, Store, StoreError, StoreResult};
