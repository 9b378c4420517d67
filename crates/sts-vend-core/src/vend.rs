//! Vend policy: mapping a requested amount/units pair onto the STS
//! vending-type contract.

use serde::{Deserialize, Serialize};

use crate::error::VendError;

/// The two vending modes STS supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendKind {
    /// Vend by monetary amount.
    Amount,
    /// Vend by unit quantity (kWh).
    Unit,
}

impl VendKind {
    /// The `VendingType` value the STS API expects.
    #[must_use]
    pub const fn wire_code(self) -> &'static str {
        match self {
            Self::Amount => "0",
            Self::Unit => "1",
        }
    }
}

/// Outcome of vend-kind resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVend {
    /// Which vending mode to use.
    pub kind: VendKind,
    /// The quantity to send, in the unit of `kind`.
    pub quantity: f64,
}

/// Resolve the requested amount/units into a vending mode and quantity.
///
/// Unit-vend applies only when units are requested and the amount is exactly
/// zero; in every other case the amount wins, so a request carrying both
/// resolves to an amount-vend.
///
/// # Errors
///
/// Returns [`VendError::InvalidAmount`] when the resolved quantity is not
/// strictly positive.
#[allow(clippy::float_cmp)] // exact zero is the "not provided" sentinel
pub fn resolve_vend(amount: f64, units: f64) -> Result<ResolvedVend, VendError> {
    let resolved = if units > 0.0 && amount == 0.0 {
        ResolvedVend {
            kind: VendKind::Unit,
            quantity: units,
        }
    } else {
        ResolvedVend {
            kind: VendKind::Amount,
            quantity: amount,
        }
    };

    if resolved.quantity <= 0.0 {
        return Err(VendError::InvalidAmount(
            "Vend amount or units must be greater than zero.".to_string(),
        ));
    }

    Ok(resolved)
}
