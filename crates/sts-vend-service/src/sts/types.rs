//! Wire types for the STS vending API.

use serde::Deserialize;

/// `MeterType` value for electric meters. The service only vends electricity.
pub const METER_TYPE_ELECTRIC: &str = "1";

/// Response body of `GET /api/Power/GetVendingToken`.
#[derive(Debug, Deserialize)]
pub struct VendingTokenResponse {
    /// Numeric status code; `0` means success.
    #[serde(rename = "Code")]
    pub code: i64,

    /// Human-readable message, present on failures.
    #[serde(rename = "Message", default)]
    pub message: Option<String>,

    /// Payload, present on success.
    #[serde(rename = "Data", default)]
    pub data: Option<VendingTokenData>,
}

/// Success payload of a vending call.
#[derive(Debug, Deserialize)]
pub struct VendingTokenData {
    /// The issued meter token.
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
}

impl VendingTokenResponse {
    /// The issued token, if this response actually carries one.
    ///
    /// A success status with an empty or absent token is still a failure;
    /// the provider occasionally reports `Code: 0` without a payload.
    #[must_use]
    pub fn token(self) -> Option<String> {
        if self.code != 0 {
            return None;
        }
        self.data
            .and_then(|data| data.token)
            .filter(|token| !token.is_empty())
    }
}
