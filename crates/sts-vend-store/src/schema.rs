//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary client records, keyed by `client_id`.
    pub const CLIENTS: &str = "clients";

    /// Vend transactions, keyed by `vend_id` (ULID).
    pub const VENDS: &str = "vends";

    /// Index: vends by client, keyed by `len(client_id) || client_id || vend_id`.
    /// Value is empty (index only).
    pub const VENDS_BY_CLIENT: &str = "vends_by_client";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::CLIENTS, cf::VENDS, cf::VENDS_BY_CLIENT]
}
