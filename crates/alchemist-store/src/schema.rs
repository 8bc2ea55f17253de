//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Access key records, keyed by the key string.
    pub const ACCESS_KEYS: &str = "access_keys";

    /// Batch usage summaries, keyed by `RecordId` (ULID, time-ordered).
    pub const USAGE_LOGS: &str = "usage_logs";

    /// Per-keyword attempt records, keyed by `RecordId` (ULID).
    pub const KEYWORD_ATTEMPTS: &str = "keyword_attempts";

    /// Payment records, keyed by provider session id. Key uniqueness is the
    /// webhook idempotency constraint.
    pub const PAYMENTS: &str = "payments";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCESS_KEYS,
        cf::USAGE_LOGS,
        cf::KEYWORD_ATTEMPTS,
        cf::PAYMENTS,
    ]
}
