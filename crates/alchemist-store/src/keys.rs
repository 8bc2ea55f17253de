//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding keys used in column families.

use alchemist_core::{AccessKeyId, RecordId};

/// Create an access-key column key.
#[must_use]
pub fn access_key_key(id: &AccessKeyId) -> Vec<u8> {
    id.as_str().as_bytes().to_vec()
}

/// Create an audit-record column key.
///
/// ULID bytes sort chronologically, so iteration over a record column family
/// yields insertion order.
#[must_use]
pub fn record_key(id: RecordId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

/// Create a payment column key from a provider session id.
#[must_use]
pub fn payment_key(session_id: &str) -> Vec<u8> {
    session_id.as_bytes().to_vec()
}
