//! Client records.
//!
//! A `Client` is created lazily the first time an identifier is seen and is
//! never deleted. It carries exactly two pieces of mutable state: the sticky
//! utility account reference and the date of the last successful vend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ClientId;

/// Sentinel sent by callers that do not know their utility account number.
/// Never stored on the client record.
pub const UNKNOWN_ACCOUNT_REF: &str = "N/A";

/// A vending client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// The caller-supplied identifier. Unique, immutable once set.
    pub client_id: ClientId,

    /// Last-known utility (TANESCO) account reference. Set once, then sticky.
    pub tanesco_number: Option<String>,

    /// Date of the last successful vend (UTC calendar date).
    pub last_vend_date: Option<NaiveDate>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a fresh client record with no account reference and no vend
    /// history.
    #[must_use]
    pub fn new(client_id: ClientId) -> Self {
        let now = Utc::now();
        Self {
            client_id,
            tanesco_number: None,
            last_vend_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this client already vended on the given date.
    #[must_use]
    pub fn has_vended_on(&self, date: NaiveDate) -> bool {
        self.last_vend_date == Some(date)
    }

    /// Adopt an account reference if none is known yet.
    ///
    /// The reference is sticky: once set it is never overwritten. The
    /// [`UNKNOWN_ACCOUNT_REF`] sentinel and empty strings are ignored.
    pub fn absorb_account_ref(&mut self, candidate: &str) {
        if self.tanesco_number.is_some() {
            return;
        }
        if candidate.is_empty() || candidate == UNKNOWN_ACCOUNT_REF {
            return;
        }
        self.tanesco_number = Some(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new("client-1".parse().unwrap())
    }

    #[test]
    fn new_client_has_no_history() {
        let client = client();
        assert!(client.tanesco_number.is_none());
        assert!(client.last_vend_date.is_none());
    }

    #[test]
    fn has_vended_on_matches_exact_date() {
        let mut client = client();
        let today = Utc::now().date_naive();
        assert!(!client.has_vended_on(today));

        client.last_vend_date = Some(today);
        assert!(client.has_vended_on(today));
        assert!(!client.has_vended_on(today.pred_opt().unwrap()));
    }

    #[test]
    fn account_ref_is_sticky() {
        let mut client = client();
        client.absorb_account_ref("04123456789");
        assert_eq!(client.tanesco_number.as_deref(), Some("04123456789"));

        client.absorb_account_ref("99999999999");
        assert_eq!(client.tanesco_number.as_deref(), Some("04123456789"));
    }

    #[test]
    fn account_ref_ignores_sentinel_and_empty() {
        let mut client = client();
        client.absorb_account_ref(UNKNOWN_ACCOUNT_REF);
        assert!(client.tanesco_number.is_none());

        client.absorb_account_ref("");
        assert!(client.tanesco_number.is_none());

        client.absorb_account_ref("04123456789");
        assert_eq!(client.tanesco_number.as_deref(), Some("04123456789"));
    }
}
