//! Sts-Vend HTTP API Service.
//!
//! This crate provides the HTTP API for the sts-vend service, including:
//!
//! - Vend orchestration (`POST /api/vend`)
//! - Client status and latest-transaction lookups
//! - The STS token-issuing gateway with credential failover
//!
//! # Orchestration
//!
//! A vend request flows registry → policy → STS gateway → recorder. The
//! gateway rotates through the configured credential pool in order until one
//! account succeeds; the recorder then advances the client's last-vend-date
//! and appends the transaction in a single conditional write.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Read handlers must be async for axum routing

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod sts;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use sts::{StsClient, StsError};
