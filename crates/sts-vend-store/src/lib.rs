//! `RocksDB` storage layer for sts-vend.
//!
//! This crate provides persistent storage for clients and vend transactions
//! using `RocksDB` with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `clients`: Primary client records, keyed by `client_id`
//! - `vends`: Vend transactions, keyed by `vend_id` (ULID)
//! - `vends_by_client`: Index for listing a client's transactions in time
//!   order
//!
//! # Example
//!
//! ```no_run
//! use sts_vend_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/sts-vend-db").unwrap();
//!
//! let client_id = "client-1".parse().unwrap();
//! let client = store.find_or_create_client(&client_id).unwrap();
//! assert!(client.last_vend_date.is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use chrono::NaiveDate;
use sts_vend_core::{Client, ClientId, VendId, VendTransaction};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Client Operations
    // =========================================================================

    /// Insert or update a client record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_client(&self, client: &Client) -> Result<()>;

    /// Get a client by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>>;

    /// Look a client up by id, creating and persisting a fresh record on
    /// first sight.
    ///
    /// This is an idempotent upsert: concurrent first-contact requests for
    /// the same id both write an identical fresh record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_or_create_client(&self, client_id: &ClientId) -> Result<Client>;

    // =========================================================================
    // Vend Transaction Operations
    // =========================================================================

    /// Get a vend transaction by its storage id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_vend(&self, vend_id: &VendId) -> Result<Option<VendTransaction>>;

    /// The client's most recent transaction by creation time, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn latest_vend(&self, client_id: &ClientId) -> Result<Option<VendTransaction>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Record a successful vend: advance the client's last-vend-date, absorb
    /// the account reference, and append the transaction — all in one atomic
    /// write.
    ///
    /// The write is conditional on the client's `last_vend_date` still being
    /// `expected_last_vend`; a concurrent vend that committed in between
    /// makes this call fail instead of double-recording a same-day vend.
    ///
    /// Returns the updated client record.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the client record does not exist.
    /// - `StoreError::VendDateConflict` if the client's last-vend-date moved
    ///   since it was read.
    fn record_vend(
        &self,
        client_id: &ClientId,
        expected_last_vend: Option<NaiveDate>,
        vend_date: NaiveDate,
        account_ref: Option<&str>,
        transaction: &VendTransaction,
    ) -> Result<Client>;
}
