//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use sts_vend_core::{Client, ClientId, VendId, VendTransaction};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Client Operations
    // =========================================================================

    fn put_client(&self, client: &Client) -> Result<()> {
        let cf = self.cf(cf::CLIENTS)?;
        let key = keys::client_key(&client.client_id);
        let value = Self::serialize(client)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>> {
        let cf = self.cf(cf::CLIENTS)?;
        let key = keys::client_key(client_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_or_create_client(&self, client_id: &ClientId) -> Result<Client> {
        if let Some(client) = self.get_client(client_id)? {
            return Ok(client);
        }

        let client = Client::new(client_id.clone());
        self.put_client(&client)?;
        tracing::debug!(client_id = %client_id, "created client record");

        Ok(client)
    }

    // =========================================================================
    // Vend Transaction Operations
    // =========================================================================

    fn get_vend(&self, vend_id: &VendId) -> Result<Option<VendTransaction>> {
        let cf = self.cf(cf::VENDS)?;
        let key = keys::vend_key(vend_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn latest_vend(&self, client_id: &ClientId) -> Result<Option<VendTransaction>> {
        let cf_by_client = self.cf(cf::VENDS_BY_CLIENT)?;
        let prefix = keys::client_vends_prefix(client_id);

        // ULID keys sort by creation time, so the last key under the prefix
        // is the newest transaction.
        let iter = self.db.iterator_cf(
            &cf_by_client,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut newest: Option<Vec<u8>> = None;
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            newest = Some(key.to_vec());
        }

        match newest {
            Some(key) => self.get_vend(&keys::extract_vend_id(&key)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn record_vend(
        &self,
        client_id: &ClientId,
        expected_last_vend: Option<NaiveDate>,
        vend_date: NaiveDate,
        account_ref: Option<&str>,
        transaction: &VendTransaction,
    ) -> Result<Client> {
        let mut client = self.get_client(client_id)?.ok_or(StoreError::NotFound)?;

        // Conditional write: a concurrent vend that committed after the
        // caller read its snapshot must not be recorded twice.
        if client.last_vend_date != expected_last_vend {
            return Err(StoreError::VendDateConflict {
                observed: client.last_vend_date,
            });
        }

        if let Some(account_ref) = account_ref {
            client.absorb_account_ref(account_ref);
        }
        client.last_vend_date = Some(vend_date);
        client.updated_at = chrono::Utc::now();

        let cf_clients = self.cf(cf::CLIENTS)?;
        let cf_vends = self.cf(cf::VENDS)?;
        let cf_by_client = self.cf(cf::VENDS_BY_CLIENT)?;

        let client_key = keys::client_key(client_id);
        let vend_key = keys::vend_key(&transaction.id);
        let index_key = keys::client_vend_key(client_id, &transaction.id);

        let client_value = Self::serialize(&client)?;
        let vend_value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_clients, &client_key, &client_value);
        batch.put_cf(&cf_vends, &vend_key, &vend_value);
        batch.put_cf(&cf_by_client, &index_key, []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sts_vend_core::VendChannel;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn client_id(s: &str) -> ClientId {
        s.parse().unwrap()
    }

    fn transaction(client: &ClientId, token: &str) -> VendTransaction {
        VendTransaction::new(
            client.clone(),
            "58000123456".into(),
            "04123456789".into(),
            token.into(),
            "rcpt-001".into(),
            5000.0,
            0.0,
            VendChannel::Upload,
        )
    }

    fn today() -> NaiveDate {
        chrono::Utc::now().date_naive()
    }

    #[test]
    fn find_or_create_is_idempotent() {
        let (store, _dir) = create_test_store();
        let id = client_id("client-1");

        let first = store.find_or_create_client(&id).unwrap();
        let second = store.find_or_create_client(&id).unwrap();

        assert_eq!(first.client_id, second.client_id);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.tanesco_number.is_none());
        assert!(second.last_vend_date.is_none());
    }

    #[test]
    fn get_client_returns_none_for_unknown() {
        let (store, _dir) = create_test_store();
        assert!(store.get_client(&client_id("nobody")).unwrap().is_none());
    }

    #[test]
    fn record_vend_updates_client_and_appends_transaction() {
        let (store, _dir) = create_test_store();
        let id = client_id("client-1");
        store.find_or_create_client(&id).unwrap();

        let tx = transaction(&id, "1111-2222");
        let updated = store
            .record_vend(&id, None, today(), Some("04123456789"), &tx)
            .unwrap();

        assert_eq!(updated.last_vend_date, Some(today()));
        assert_eq!(updated.tanesco_number.as_deref(), Some("04123456789"));

        let stored = store.get_vend(&tx.id).unwrap().unwrap();
        assert_eq!(stored.token_number, "1111-2222");

        let latest = store.latest_vend(&id).unwrap().unwrap();
        assert_eq!(latest.id, tx.id);
    }

    #[test]
    fn record_vend_requires_existing_client() {
        let (store, _dir) = create_test_store();
        let id = client_id("ghost");
        let tx = transaction(&id, "1111-2222");

        let result = store.record_vend(&id, None, today(), None, &tx);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn record_vend_rejects_stale_snapshot() {
        let (store, _dir) = create_test_store();
        let id = client_id("client-1");
        store.find_or_create_client(&id).unwrap();

        let first = transaction(&id, "1111-2222");
        store
            .record_vend(&id, None, today(), None, &first)
            .unwrap();

        // A second writer still holding the pre-vend snapshot loses.
        let second = transaction(&id, "3333-4444");
        let result = store.record_vend(&id, None, today(), None, &second);
        assert!(matches!(
            result,
            Err(StoreError::VendDateConflict { observed: Some(d) }) if d == today()
        ));

        // The losing transaction was not written.
        assert!(store.get_vend(&second.id).unwrap().is_none());
    }

    #[test]
    fn account_ref_is_sticky_across_vends() {
        let (store, _dir) = create_test_store();
        let id = client_id("client-1");
        store.find_or_create_client(&id).unwrap();

        let yesterday = today().pred_opt().unwrap();
        let tx1 = transaction(&id, "1111-2222");
        store
            .record_vend(&id, None, yesterday, Some("04123456789"), &tx1)
            .unwrap();

        let tx2 = transaction(&id, "3333-4444");
        let updated = store
            .record_vend(&id, Some(yesterday), today(), Some("99999999999"), &tx2)
            .unwrap();

        assert_eq!(updated.tanesco_number.as_deref(), Some("04123456789"));
    }

    #[test]
    fn sentinel_account_ref_is_not_stored() {
        let (store, _dir) = create_test_store();
        let id = client_id("client-1");
        store.find_or_create_client(&id).unwrap();

        let tx = transaction(&id, "1111-2222");
        let updated = store
            .record_vend(&id, None, today(), Some("N/A"), &tx)
            .unwrap();

        assert!(updated.tanesco_number.is_none());
    }

    #[test]
    fn latest_vend_returns_newest() {
        let (store, _dir) = create_test_store();
        let id = client_id("client-1");
        store.find_or_create_client(&id).unwrap();

        let day_before = today().pred_opt().unwrap().pred_opt().unwrap();
        let tx1 = transaction(&id, "old-token");
        store.record_vend(&id, None, day_before, None, &tx1).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2)); // Ensure different ULIDs

        let tx2 = transaction(&id, "new-token");
        store
            .record_vend(&id, Some(day_before), today(), None, &tx2)
            .unwrap();

        let latest = store.latest_vend(&id).unwrap().unwrap();
        assert_eq!(latest.token_number, "new-token");
    }

    #[test]
    fn latest_vend_ignores_other_clients() {
        let (store, _dir) = create_test_store();
        let ab = client_id("ab");
        let abc = client_id("abc");
        store.find_or_create_client(&ab).unwrap();
        store.find_or_create_client(&abc).unwrap();

        let tx = transaction(&abc, "abc-token");
        store.record_vend(&abc, None, today(), None, &tx).unwrap();

        assert!(store.latest_vend(&ab).unwrap().is_none());
    }
}
