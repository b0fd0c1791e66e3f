//! Unified infrastructure error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::StoreError;

/// Errors that stop the process: binding the listener, reaching the
/// database at startup, or a bad configuration.
///
/// Per-request failures are never `Error`s. They are HTTP
/// [`Response`](crate::Response) values built from
/// [`CustomerError`](crate::customer::CustomerError) or
/// [`BodyError`](crate::BodyError).
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
