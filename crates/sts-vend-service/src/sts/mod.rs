//! STS vending API gateway.
//!
//! The gateway owns the credential pool and the failover loop; callers only
//! ever see a token or the final exhaustion error.

pub mod client;
pub mod types;

pub use client::{StsClient, StsError};
