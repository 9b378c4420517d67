//! Vend transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ClientId, VendId};

/// How a vend request reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendChannel {
    /// Receipt photo upload flow.
    Upload,
    /// Manually entered vend.
    Manual,
}

/// An immutable record of one successful vend.
///
/// Created exactly once per successful token issuance, never updated or
/// deleted. `created_at` is the authoritative ordering key; the ULID `id`
/// preserves that order in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendTransaction {
    /// Storage identifier, time-ordered.
    pub id: VendId,

    /// The owning client.
    pub client_id: ClientId,

    /// Target meter code the token was issued for.
    pub submeter_number: String,

    /// Utility account reference as supplied by the caller.
    pub tanesco_number: String,

    /// The token issued by the STS provider.
    pub token_number: String,

    /// Caller-supplied transaction identifier. Opaque, not guaranteed unique.
    pub transaction_id: String,

    /// Monetary amount requested.
    pub amount: f64,

    /// Unit quantity requested.
    pub units: f64,

    /// Channel the request came in through.
    pub vend_channel: VendChannel,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl VendTransaction {
    /// Build a new transaction record for a just-issued token.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        client_id: ClientId,
        submeter_number: String,
        tanesco_number: String,
        token_number: String,
        transaction_id: String,
        amount: f64,
        units: f64,
        vend_channel: VendChannel,
    ) -> Self {
        Self {
            id: VendId::generate(),
            client_id,
            submeter_number,
            tanesco_number,
            token_number,
            transaction_id,
            amount,
            units,
            vend_channel,
            created_at: Utc::now(),
        }
    }
}
