//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
///
/// The analytics engines never return this type; only the adapters that
/// touch the filesystem or parse user input do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference library validation error
    #[error("Library validation error: {0}")]
    LibraryValidation(String),

    /// Snapshot bundle written with a schema we cannot read
    #[error("Unsupported snapshot schema version {0}")]
    UnsupportedSchema(u32),

    /// Snapshot bundle could not be resolved against the library
    #[error("Import error: {0}")]
    Import(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
