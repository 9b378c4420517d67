//! Error types for sts-vend storage.

use chrono::NaiveDate;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// The client's last-vend-date moved between the policy check and the
    /// write (a concurrent same-day vend committed first).
    #[error("vend date conflict: last vend date is now {observed:?}")]
    VendDateConflict {
        /// The last-vend-date found at write time.
        observed: Option<NaiveDate>,
    },
}
