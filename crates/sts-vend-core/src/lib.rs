//! Core types and vend policy for sts-vend.
//!
//! This crate provides the foundational types used throughout the sts-vend
//! service:
//!
//! - **Identifiers**: `ClientId`, `VendId`
//! - **Clients**: `Client`, the per-caller record carrying the sticky
//!   utility account reference and the last successful vend date
//! - **Transactions**: `VendTransaction`, `VendChannel`
//! - **Policy**: `resolve_vend`, `VendKind` — the pure decision logic that
//!   maps a requested amount/units pair onto the STS vending-type contract
//!
//! # Daily vend limit
//!
//! Each client may vend at most once per UTC calendar day. The policy layer
//! checks the limit against a `Client` snapshot; the last-vend-date only
//! advances after a successful vend, so a failed attempt never blocks a
//! client for the rest of the day.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod ids;
pub mod transaction;
pub mod vend;

pub use client::{Client, UNKNOWN_ACCOUNT_REF};
pub use error::VendError;
pub use ids::{ClientId, IdError, VendId};
pub use transaction::{VendChannel, VendTransaction};
pub use vend::{resolve_vend, ResolvedVend, VendKind};
