//! Error types for sts-vend.

/// Caller-attributable failures of the vend flow.
///
/// These are the failures a client can fix by changing its request (or by
/// waiting for the next day); infrastructure failures live with the layer
/// that produces them (`StoreError`, the gateway's `StsError`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VendError {
    /// A required request field is missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// The client already vended today.
    #[error("Daily vending limit reached.")]
    DailyLimitExceeded,

    /// The resolved vend quantity is not strictly positive.
    #[error("{0}")]
    InvalidAmount(String),
}
