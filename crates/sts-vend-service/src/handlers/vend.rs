//! Vend orchestration handler.
//!
//! The single write path of the service: resolve the client, check the daily
//! limit, call STS with credential failover, then record the vend. Storage
//! failures after the external call are logged distinctly — at that point a
//! token exists that the caller may never see, and operations needs the
//! breadcrumbs to reconcile it.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use sts_vend_core::{resolve_vend, ClientId, VendChannel, VendError, VendKind, VendTransaction};
use sts_vend_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing required fields.";

/// Vend request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendRequest {
    /// Caller-generated client identifier.
    pub client_id: String,
    /// Target meter code.
    pub submeter_number: String,
    /// Vend payload; unknown fields are preserved and echoed back.
    pub vend_data: VendData,
    /// Channel the request came in through.
    pub vend_type: VendChannel,
}

/// The vend payload as supplied by the caller.
///
/// Extra fields (receipt metadata and the like) ride along in `extra` and
/// are returned unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendData {
    /// Monetary amount to vend.
    pub amount: f64,
    /// Unit quantity to vend.
    pub units: f64,
    /// Caller-supplied transaction identifier.
    pub transaction_id: String,
    /// Utility account reference, `"N/A"` when unknown.
    pub tanesco_number: String,
    /// Passthrough fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Successful vend response: the original payload plus the issued token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendResponse {
    /// The vend payload, with `units` normalized for amount-vends.
    #[serde(flatten)]
    pub vend_data: VendData,
    /// The token issued by STS.
    pub token_number: String,
}

/// Process a vend request.
pub async fn process_vend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VendRequest>, JsonRejection>,
) -> Result<Json<VendResponse>, ApiError> {
    let Json(body) = payload.map_err(|_| VendError::InvalidInput(MISSING_FIELDS.into()))?;

    if body.submeter_number.trim().is_empty()
        || body.vend_data.transaction_id.trim().is_empty()
        || body.vend_data.tanesco_number.trim().is_empty()
    {
        return Err(VendError::InvalidInput(MISSING_FIELDS.into()).into());
    }
    let client_id: ClientId = body
        .client_id
        .parse()
        .map_err(|_| VendError::InvalidInput(MISSING_FIELDS.into()))?;

    let client = state.store.find_or_create_client(&client_id)?;

    let today = chrono::Utc::now().date_naive();
    if client.has_vended_on(today) {
        return Err(VendError::DailyLimitExceeded.into());
    }

    let resolved = resolve_vend(body.vend_data.amount, body.vend_data.units)?;

    let token = state
        .sts
        .issue_token(&body.submeter_number, resolved.quantity, resolved.kind)
        .await?;

    let transaction = VendTransaction::new(
        client_id.clone(),
        body.submeter_number.clone(),
        body.vend_data.tanesco_number.clone(),
        token.clone(),
        body.vend_data.transaction_id.clone(),
        body.vend_data.amount,
        body.vend_data.units,
        body.vend_type,
    );

    if let Err(err) = state.store.record_vend(
        &client_id,
        client.last_vend_date,
        today,
        Some(&body.vend_data.tanesco_number),
        &transaction,
    ) {
        // Post-issuance failure: the token exists but was not recorded, and
        // retrying would risk a duplicate issuance. Keep enough context in
        // the log to reconcile manually.
        tracing::error!(
            client_id = %client_id,
            transaction_id = %body.vend_data.transaction_id,
            token_number = %token,
            error = %err,
            "vend token issued but not recorded"
        );
        return Err(err.into());
    }

    tracing::info!(
        client_id = %client_id,
        transaction_id = %body.vend_data.transaction_id,
        vend_kind = ?resolved.kind,
        "vend recorded"
    );

    // STS does not report units for amount-based vends.
    let mut vend_data = body.vend_data;
    if resolved.kind == VendKind::Amount {
        vend_data.units = 0.0;
    }

    Ok(Json(VendResponse {
        vend_data,
        token_number: token,
    }))
}
