//! Error types for cartable.
//!
//! This module defines all error types used throughout the cartable crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cartable operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The stored snapshot is not a valid serialized car list.
    #[error("snapshot '{key}' is corrupt: {source}")]
    CorruptSnapshot {
        /// Storage key of the snapshot.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Seed Errors ===
    /// The seed request failed in transport or returned an error status.
    #[error("seed request failed: {0}")]
    SeedRequest(#[from] reqwest::Error),

    /// The seed response did not contain a car list.
    #[error("unexpected seed response: {message}")]
    SeedFormat {
        /// Description of what was wrong with the response.
        message: String,
    },

    // === Table Errors ===
    /// No car with the given VIN exists in the collection.
    #[error("no car with VIN '{vin}'")]
    CarNotFound {
        /// The VIN that was looked up.
        vin: String,
    },

    /// A save or form edit was requested while no modal is open.
    #[error("no form is open")]
    NoActiveModal,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for cartable operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a car-not-found error for the given VIN.
    #[must_use]
    pub fn car_not_found(vin: impl Into<String>) -> Self {
        Self::CarNotFound { vin: vin.into() }
    }

    /// Create a seed format error.
    #[must_use]
    pub fn seed_format(message: impl Into<String>) -> Self {
        Self::SeedFormat {
            message: message.into(),
        }
    }

    /// Check if this error is a missing-record lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CarNotFound { .. })
    }

    /// Check if this error came from the seed source.
    #[must_use]
    pub fn is_seed_error(&self) -> bool {
        matches!(self, Self::SeedRequest(_) | Self::SeedFormat { .. })
    }
}
