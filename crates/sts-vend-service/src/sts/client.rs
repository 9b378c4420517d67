//! STS API client with sequential credential failover.

use reqwest::Client;
use std::time::Duration;

use sts_vend_core::VendKind;

use super::types::{VendingTokenResponse, METER_TYPE_ELECTRIC};

/// Fallback message when the provider answers without a usable `Message`.
const INVALID_RESPONSE_MSG: &str = "Vending failed: Invalid response from STS server.";

/// Fallback cause when the pool is exhausted without a recorded error.
const ALL_ACCOUNTS_FAILED_MSG: &str = "All STS accounts failed to process the vend request.";

/// Error type surfaced by the gateway.
///
/// Per-credential failures are handled inside the rotation loop and never
/// escape individually.
#[derive(Debug, thiserror::Error)]
pub enum StsError {
    /// Every credential in the pool failed; carries the last failure's
    /// message as the cause.
    #[error("{message}")]
    Exhausted {
        /// Message of the last recorded per-credential error.
        message: String,
    },
}

/// Outcome of a single credential attempt. Internal to the rotation loop.
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    /// Transport failure, including timeouts.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but did not issue a token.
    #[error("{message}")]
    Rejected {
        /// Provider message, or a fallback when none was given.
        message: String,
    },
}

/// STS vending API client.
#[derive(Debug, Clone)]
pub struct StsClient {
    client: Client,
    base_url: String,
    user_ids: Vec<String>,
    password: String,
}

impl StsClient {
    /// Create a new STS client.
    ///
    /// `user_ids` is the ordered credential pool; rotation follows this order
    /// so the first account absorbs load first. The pool must be validated
    /// non-empty by configuration before the client is built.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    pub fn new(
        base_url: impl Into<String>,
        user_ids: Vec<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_ids,
            password: password.into(),
        }
    }

    /// Obtain a vending token for the given meter.
    ///
    /// Tries each configured account in order and returns the first issued
    /// token. A failed attempt (transport error, timeout, non-success status,
    /// missing token) is logged and the next account is tried.
    ///
    /// # Errors
    ///
    /// Returns [`StsError::Exhausted`] when every account failed, carrying
    /// the last attempt's error message.
    pub async fn issue_token(
        &self,
        meter_code: &str,
        quantity: f64,
        kind: VendKind,
    ) -> Result<String, StsError> {
        let quantity = quantity.to_string();
        let mut last_error: Option<AttemptError> = None;

        for user_id in &self.user_ids {
            match self
                .try_credential(user_id, meter_code, &quantity, kind)
                .await
            {
                Ok(token) => {
                    tracing::debug!(user_id = %user_id, meter_code = %meter_code, "STS vend succeeded");
                    return Ok(token);
                }
                Err(err) => {
                    tracing::warn!(
                        user_id = %user_id,
                        meter_code = %meter_code,
                        error = %err,
                        "STS vending attempt failed"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(StsError::Exhausted {
            message: last_error
                .map_or_else(|| ALL_ACCOUNTS_FAILED_MSG.to_string(), |e| e.to_string()),
        })
    }

    /// Issue one vending request with a single credential.
    async fn try_credential(
        &self,
        user_id: &str,
        meter_code: &str,
        quantity: &str,
        kind: VendKind,
    ) -> Result<String, AttemptError> {
        let url = format!("{}/api/Power/GetVendingToken", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("UserId", user_id),
                ("Password", &self.password),
                ("MeterType", METER_TYPE_ELECTRIC),
                ("MeterCode", meter_code),
                ("AmountOrQuantity", quantity),
                ("VendingType", kind.wire_code()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<VendingTokenResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AttemptError::Rejected { message });
        }

        let body: VendingTokenResponse = response.json().await?;
        let message = body
            .message
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| INVALID_RESPONSE_MSG.to_string());

        body.token().ok_or(AttemptError::Rejected { message })
    }
}
