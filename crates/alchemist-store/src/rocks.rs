//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use alchemist_core::{AccessKey, AccessKeyId, KeyStatus, KeywordAttempt, PaymentRecord, UsageRecord};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
///
/// Key mutations (create, debit, status changes, checkout application) are
/// serialized through `write_lock`, which makes each of them a single atomic
/// read-modify-write: two concurrent debits can never read the same
/// `credits_used` and both write against it.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
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

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
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

    /// Fetch a key record in any status.
    fn get_key_any_status(&self, id: &AccessKeyId) -> Result<Option<AccessKey>> {
        let cf = self.cf(cf::ACCESS_KEYS)?;
        self.db
            .get_cf(&cf, keys::access_key_key(id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Write a key record unconditionally.
    fn put_key(&self, key: &AccessKey) -> Result<()> {
        let cf = self.cf(cf::ACCESS_KEYS)?;
        let value = Self::serialize(key)?;
        self.db
            .put_cf(&cf, keys::access_key_key(&key.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Collect every value in a column family, in key order.
    fn scan<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut out = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            out.push(Self::deserialize(&value)?);
        }
        Ok(out)
    }

    /// Delete every entry in a column family.
    fn truncate(&self, cf_name: &str) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let mut batch = WriteBatch::default();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            batch.delete_cf(&cf, key);
        }
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Access Key Operations
    // =========================================================================

    fn create_key(&self, key: &AccessKey) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if self.get_key_any_status(&key.id)?.is_some() {
            return Err(StoreError::DuplicateKey {
                key: key.id.to_string(),
            });
        }

        self.put_key(key)
    }

    fn get_key(&self, id: &AccessKeyId) -> Result<Option<AccessKey>> {
        Ok(self.get_key_any_status(id)?.filter(AccessKey::is_active))
    }

    fn key_exists(&self, id: &AccessKeyId) -> Result<bool> {
        Ok(self.get_key_any_status(id)?.is_some())
    }

    fn debit(&self, id: &AccessKeyId, amount: u32) -> Result<AccessKey> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut key = self
            .get_key_any_status(id)?
            .ok_or_else(|| StoreError::KeyNotFound {
                key: id.to_string(),
            })?;

        key.credits_used += amount;
        self.put_key(&key)?;

        Ok(key)
    }

    fn set_key_status(&self, id: &AccessKeyId, status: KeyStatus) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut key = self
            .get_key_any_status(id)?
            .ok_or_else(|| StoreError::KeyNotFound {
                key: id.to_string(),
            })?;

        key.status = status;
        self.put_key(&key)
    }

    fn list_keys(&self) -> Result<Vec<AccessKey>> {
        let mut keys: Vec<AccessKey> = self.scan(cf::ACCESS_KEYS)?;
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(keys)
    }

    // =========================================================================
    // Audit Log Operations
    // =========================================================================

    fn append_usage(&self, record: &UsageRecord) -> Result<()> {
        let cf = self.cf(cf::USAGE_LOGS)?;
        let value = Self::serialize(record)?;
        self.db
            .put_cf(&cf, keys::record_key(record.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn append_keyword_attempt(&self, attempt: &KeywordAttempt) -> Result<()> {
        let cf = self.cf(cf::KEYWORD_ATTEMPTS)?;
        let value = Self::serialize(attempt)?;
        self.db
            .put_cf(&cf, keys::record_key(attempt.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn usage_records(&self) -> Result<Vec<UsageRecord>> {
        // ULID keys scan oldest-first; reverse for newest-first.
        let mut records: Vec<UsageRecord> = self.scan(cf::USAGE_LOGS)?;
        records.reverse();
        Ok(records)
    }

    fn keyword_attempts(&self) -> Result<Vec<KeywordAttempt>> {
        let mut attempts: Vec<KeywordAttempt> = self.scan(cf::KEYWORD_ATTEMPTS)?;
        attempts.reverse();
        Ok(attempts)
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    fn record_payment(&self, record: &PaymentRecord) -> Result<()> {
        let cf = self.cf(cf::PAYMENTS)?;
        let value = Self::serialize(record)?;
        self.db
            .put_cf(&cf, keys::payment_key(&record.session_id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_payment(&self, session_id: &str) -> Result<Option<PaymentRecord>> {
        let cf = self.cf(cf::PAYMENTS)?;
        self.db
            .get_cf(&cf, keys::payment_key(session_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn record_checkout(&self, key: &AccessKey, payment: &PaymentRecord) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if self.get_payment(&payment.session_id)?.is_some() {
            return Err(StoreError::DuplicatePayment {
                session_id: payment.session_id.clone(),
            });
        }

        if self.get_key_any_status(&key.id)?.is_some() {
            return Err(StoreError::DuplicateKey {
                key: key.id.to_string(),
            });
        }

        let cf_keys = self.cf(cf::ACCESS_KEYS)?;
        let cf_payments = self.cf(cf::PAYMENTS)?;

        let key_value = Self::serialize(key)?;
        let payment_value = Self::serialize(payment)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_keys, keys::access_key_key(&key.id), &key_value);
        batch.put_cf(
            &cf_payments,
            keys::payment_key(&payment.session_id),
            &payment_value,
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    // =========================================================================
    // Administrative Resets
    // =========================================================================

    fn clear_analytics(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        self.truncate(cf::USAGE_LOGS)?;
        self.truncate(cf::KEYWORD_ATTEMPTS)?;
        self.truncate(cf::PAYMENTS)?;

        tracing::info!("analytics data cleared");
        Ok(())
    }

    fn delete_all_keys(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        self.truncate(cf::ACCESS_KEYS)?;

        tracing::info!("all access keys deleted");
        Ok(())
    }
}
