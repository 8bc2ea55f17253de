//! Storage and credit ledger for the keyword-alchemist backend.
//!
//! This crate provides persistent storage for access keys, append-only audit
//! logs, and payment records using `RocksDB` with column families, plus the
//! credit ledger that authorizes and settles keyword batches.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `access_keys`: key records, keyed by the access key string
//! - `usage_logs`: per-batch usage summaries, keyed by `RecordId` (ULID)
//! - `keyword_attempts`: per-keyword attempt records, keyed by `RecordId`
//! - `payments`: payment records, keyed by provider session id
//!
//! Credit debits are serialized inside the store, so a debit is a single
//! atomic increment from the caller's point of view; concurrent debits never
//! lose updates. The payment column family's key uniqueness is the
//! storage-level idempotency constraint for webhook deliveries.
//!
//! # Example
//!
//! ```no_run
//! use alchemist_core::{AccessKey, Plan};
//! use alchemist_store::{mint_unique_key, RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/alchemist-db").unwrap();
//!
//! let id = mint_unique_key(&store).unwrap();
//! let key = AccessKey::new(id.clone(), Plan::Basic, Plan::Basic.credits(), None);
//! store.create_key(&key).unwrap();
//!
//! let fetched = store.get_key(&id).unwrap();
//! assert_eq!(fetched.unwrap().credits_remaining(), 10);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod ledger;
pub mod mint;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use ledger::{Authorization, CreditLedger, LedgerError};
pub use mint::{mint_unique_key, mint_unique_key_with, MintError, MAX_MINT_ATTEMPTS};
pub use rocks::RocksStore;

use alchemist_core::{AccessKey, AccessKeyId, KeyStatus, KeywordAttempt, PaymentRecord, UsageRecord};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Access Key Operations
    // =========================================================================

    /// Insert a new access key record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if the key already exists.
    fn create_key(&self, key: &AccessKey) -> Result<()>;

    /// Get an access key, **only if it is active**.
    ///
    /// Suspended and expired keys behave as not-found; callers that need to
    /// see every key use [`Store::list_keys`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_key(&self, id: &AccessKeyId) -> Result<Option<AccessKey>>;

    /// Check whether a key exists in any status.
    ///
    /// Used by the minting loop: a suspended key still occupies its
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn key_exists(&self, id: &AccessKeyId) -> Result<bool>;

    /// Atomically increment `credits_used` by `amount` and return the
    /// updated record.
    ///
    /// This is a raw counter update: it does **not** check sufficiency or
    /// key status. Sufficiency is the credit ledger's job, decided before
    /// calling debit.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::KeyNotFound` if the key does not exist.
    fn debit(&self, id: &AccessKeyId, amount: u32) -> Result<AccessKey>;

    /// Change a key's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::KeyNotFound` if the key does not exist.
    fn set_key_status(&self, id: &AccessKeyId, status: KeyStatus) -> Result<()>;

    /// List all keys in any status, newest first (admin use).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_keys(&self) -> Result<Vec<AccessKey>>;

    // =========================================================================
    // Audit Log Operations
    // =========================================================================

    /// Append a batch usage summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn append_usage(&self, record: &UsageRecord) -> Result<()>;

    /// Append a per-keyword attempt record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn append_keyword_attempt(&self, attempt: &KeywordAttempt) -> Result<()>;

    /// List usage summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn usage_records(&self) -> Result<Vec<UsageRecord>>;

    /// List keyword attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn keyword_attempts(&self) -> Result<Vec<KeywordAttempt>>;

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Insert or overwrite a payment record by session id.
    ///
    /// Used for failure records; the success path goes through
    /// [`Store::record_checkout`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn record_payment(&self, record: &PaymentRecord) -> Result<()>;

    /// Get a payment record by provider session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_payment(&self, session_id: &str) -> Result<Option<PaymentRecord>>;

    /// Persist a completed checkout: the new access key and its payment
    /// record, in one atomic write.
    ///
    /// Session-id uniqueness is re-checked under the store's write lock, so
    /// two concurrent deliveries of the same checkout event cannot both
    /// mint a key.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicatePayment` if the session id is already
    ///   recorded.
    /// - `StoreError::DuplicateKey` if the key id is already taken.
    fn record_checkout(&self, key: &AccessKey, payment: &PaymentRecord) -> Result<()>;

    // =========================================================================
    // Administrative Resets
    // =========================================================================

    /// Delete all usage, attempt, and payment records. Structure preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn clear_analytics(&self) -> Result<()>;

    /// Delete every access key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete_all_keys(&self) -> Result<()>;
}
