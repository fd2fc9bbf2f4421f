//! Common error types for the BOM service

use thiserror::Error;

/// Common result type for BOM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the BOM crates
#[derive(Error, Debug)]
pub enum Error {
    /// Hierarchy store query error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
