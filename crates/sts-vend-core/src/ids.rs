//! Identifier types for sts-vend.
//!
//! Client identifiers are opaque strings generated by the caller; the only
//! validation this crate applies is non-emptiness. Vend record identifiers
//! are ULIDs so that a client's transactions iterate in creation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// A caller-supplied client identifier.
///
/// Client ids are opaque to the service: they are compared byte-for-byte and
/// never parsed. An empty (or all-whitespace) id is rejected at construction,
/// which is what turns an absent `clientId` field into an input error at the
/// HTTP boundary.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(IdError::EmptyClientId);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A vend record identifier using ULID for time-ordering.
///
/// This is the storage identity of a transaction; the caller-supplied
/// `transactionId` is carried as plain data because it is not guaranteed to
/// be unique.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VendId(Ulid);

impl VendId {
    /// Generate a new `VendId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Create a `VendId` from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }
}

impl FromStr for VendId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for VendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VendId({})", self.0)
    }
}

impl fmt::Display for VendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VendId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VendId> for String {
    fn from(id: VendId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when constructing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The client identifier is empty or whitespace.
    #[error("client id must not be empty")]
    EmptyClientId,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_rejects_empty() {
        assert_eq!(ClientId::from_str(""), Err(IdError::EmptyClientId));
        assert_eq!(ClientId::from_str("   "), Err(IdError::EmptyClientId));
    }

    #[test]
    fn client_id_roundtrip() {
        let id: ClientId = "device-42".parse().unwrap();
        assert_eq!(id.as_str(), "device-42");
        assert_eq!(String::from(id.clone()), "device-42");
        assert_eq!(id.to_string(), "device-42");
    }

    #[test]
    fn client_id_serde_json() {
        let id: ClientId = "device-42".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"device-42\"");
        let parsed: ClientId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn client_id_serde_rejects_empty() {
        let result: Result<ClientId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn vend_id_roundtrip() {
        let id = VendId::generate();
        let parsed = VendId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn vend_id_bytes_roundtrip() {
        let id = VendId::generate();
        assert_eq!(VendId::from_bytes(id.to_bytes()), id);
    }

    #[test]
    fn vend_ids_are_time_ordered() {
        let first = VendId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = VendId::generate();
        assert!(first.to_bytes() < second.to_bytes());
    }
}
