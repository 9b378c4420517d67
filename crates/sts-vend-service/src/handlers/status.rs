//! Read-only client lookups: vend status and latest transaction.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use sts_vend_core::{ClientId, VendError};
use sts_vend_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Client status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Last-known utility account reference.
    pub account_reference: Option<String>,
    /// Date of the last successful vend.
    pub last_vend_date: Option<NaiveDate>,
}

/// Get a client's vending status, creating the record on first sight.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let client_id: ClientId = client_id
        .parse()
        .map_err(|_| VendError::InvalidInput("Client ID is required.".into()))?;

    let client = state.store.find_or_create_client(&client_id)?;

    Ok(Json(StatusResponse {
        account_reference: client.tanesco_number,
        last_vend_date: client.last_vend_date,
    }))
}

/// Receipt shape of the latest transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    /// Utility account reference recorded on the transaction.
    pub account_reference: String,
    /// The issued token.
    pub token_number: String,
    /// Caller-supplied transaction identifier.
    pub transaction_id: String,
    /// Monetary amount.
    pub amount: f64,
    /// Unit quantity.
    pub units: f64,
    /// Creation date (UTC).
    pub date: NaiveDate,
}

/// Latest-transaction response; `data` is null when the client has no
/// transactions yet.
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    /// The most recent transaction, if any.
    pub data: Option<ReceiptData>,
}

/// Get a client's most recent transaction.
///
/// Unlike the status lookup this never creates clients; an unknown id is a
/// 404.
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<LatestResponse>, ApiError> {
    let client_id: ClientId = client_id
        .parse()
        .map_err(|_| VendError::InvalidInput("Client ID is required.".into()))?;

    if state.store.get_client(&client_id)?.is_none() {
        return Err(ApiError::NotFound("User not found.".into()));
    }

    let data = state.store.latest_vend(&client_id)?.map(|tx| ReceiptData {
        account_reference: tx.tanesco_number,
        token_number: tx.token_number,
        transaction_id: tx.transaction_id,
        amount: tx.amount,
        units: tx.units,
        date: tx.created_at.date_naive(),
    });

    Ok(Json(LatestResponse { data }))
}
