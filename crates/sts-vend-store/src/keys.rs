//! Key encoding utilities for `RocksDB`.
//!
//! Client ids are caller-supplied variable-length strings, so the by-client
//! index prefixes them with their length; a plain concatenation would let
//! `client "ab"` shadow the prefix of `client "abc"`.

use sts_vend_core::{ClientId, VendId};

/// Create a client key from a client id.
#[must_use]
pub fn client_key(client_id: &ClientId) -> Vec<u8> {
    client_id.as_str().as_bytes().to_vec()
}

/// Create a vend transaction key from its storage id.
#[must_use]
pub fn vend_key(vend_id: &VendId) -> Vec<u8> {
    vend_id.to_bytes().to_vec()
}

/// Create a client-vend index key.
///
/// Format: `len(client_id) as u32 BE || client_id bytes || vend_id (16 bytes)`
///
/// Since ULIDs are time-ordered, a client's vends sort by creation time.
#[must_use]
pub fn client_vend_key(client_id: &ClientId, vend_id: &VendId) -> Vec<u8> {
    let mut key = client_vends_prefix(client_id);
    key.extend_from_slice(&vend_id.to_bytes());
    key
}

/// Create a prefix for iterating all vends of a client.
#[must_use]
pub fn client_vends_prefix(client_id: &ClientId) -> Vec<u8> {
    let id = client_id.as_str().as_bytes();
    let len = u32::try_from(id.len()).expect("client id length fits in u32");
    let mut key = Vec::with_capacity(4 + id.len() + 16);
    key.extend_from_slice(&len.to_be_bytes());
    key.extend_from_slice(id);
    key
}

/// Extract the vend id from a client-vend index key.
///
/// # Panics
///
/// Panics if the key is shorter than 16 bytes.
#[must_use]
pub fn extract_vend_id(key: &[u8]) -> VendId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    VendId::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vend_key_length() {
        let vend_id = VendId::generate();
        assert_eq!(vend_key(&vend_id).len(), 16);
    }

    #[test]
    fn client_vend_key_format() {
        let client_id: ClientId = "abc".parse().unwrap();
        let vend_id = VendId::generate();
        let key = client_vend_key(&client_id, &vend_id);

        assert_eq!(key.len(), 4 + 3 + 16);
        assert_eq!(&key[..4], 3u32.to_be_bytes());
        assert_eq!(&key[4..7], b"abc");
        assert_eq!(&key[7..], vend_id.to_bytes());
    }

    #[test]
    fn prefixes_of_different_clients_do_not_collide() {
        let short: ClientId = "ab".parse().unwrap();
        let long: ClientId = "abc".parse().unwrap();
        let vend_id = VendId::generate();

        let key = client_vend_key(&long, &vend_id);
        assert!(!key.starts_with(&client_vends_prefix(&short)));
        assert!(key.starts_with(&client_vends_prefix(&long)));
    }

    #[test]
    fn extract_vend_id_roundtrip() {
        let client_id: ClientId = "client-1".parse().unwrap();
        let vend_id = VendId::generate();
        let key = client_vend_key(&client_id, &vend_id);

        assert_eq!(extract_vend_id(&key), vend_id);
    }
}
