//! Append-only audit records for keyword processing.
//!
//! A [`UsageRecord`] summarizes one processed batch; a [`KeywordAttempt`]
//! records the fate of a single keyword within a batch. Both are written
//! once and never mutated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::access_key::AccessKeyId;

/// Output format recorded when the caller does not specify one.
pub const DEFAULT_OUTPUT_FORMAT: &str = "wordpress";

/// Identifier for append-only records, using ULID for time-ordering.
///
/// ULIDs sort chronologically, so scans over a record column family come
/// back in insertion order for free.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(Ulid);

impl RecordId {
    /// Generate a new `RecordId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0.to_bytes()
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| RecordIdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing a record identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdError {
    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}

/// Summary of one processed keyword batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Record identifier (time-ordered).
    pub id: RecordId,

    /// The key the batch was billed against.
    pub access_key: AccessKeyId,

    /// How many keywords the caller submitted.
    pub keywords_requested: u32,

    /// How many keywords were actually attempted.
    pub keywords_processed: u32,

    /// Credits debited for the batch.
    pub credits_deducted: u32,

    /// Output format the articles were produced for.
    pub output_format: String,

    /// Estimated provider cost in USD for the batch.
    pub estimated_cost_usd: f64,

    /// When the batch completed.
    pub timestamp: DateTime<Utc>,
}

impl UsageRecord {
    /// Create a batch summary with the default output format and no cost
    /// estimate.
    #[must_use]
    pub fn new(
        access_key: AccessKeyId,
        keywords_requested: u32,
        keywords_processed: u32,
        credits_deducted: u32,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            access_key,
            keywords_requested,
            keywords_processed,
            credits_deducted,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            estimated_cost_usd: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Set the estimated provider cost.
    #[must_use]
    pub fn with_estimated_cost(mut self, estimated_cost_usd: f64) -> Self {
        self.estimated_cost_usd = estimated_cost_usd;
        self
    }
}

/// Outcome of a single keyword generation attempt.
///
/// Modeled as a tagged variant rather than nullable columns: a succeeded
/// attempt always has sizing data, a failed one always has an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The article was produced.
    Succeeded {
        /// Word count of the article body.
        word_count: u32,
        /// Wall-clock generation time in milliseconds.
        processing_time_ms: u64,
    },

    /// The provider failed for this keyword. The credit is still consumed.
    Failed {
        /// Error attributed to this keyword.
        error: String,
    },
}

/// One keyword's generation attempt inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAttempt {
    /// Record identifier (time-ordered).
    pub id: RecordId,

    /// The key the attempt was billed against.
    pub access_key: AccessKeyId,

    /// The keyword as submitted.
    pub keyword: String,

    /// Generation approach (provider model name).
    pub approach: String,

    /// What happened.
    pub outcome: AttemptOutcome,

    /// Output format the article was produced for.
    pub output_format: String,

    /// When the attempt finished.
    pub timestamp: DateTime<Utc>,
}

impl KeywordAttempt {
    /// Record a successful generation.
    #[must_use]
    pub fn succeeded(
        access_key: AccessKeyId,
        keyword: String,
        approach: String,
        word_count: u32,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            access_key,
            keyword,
            approach,
            outcome: AttemptOutcome::Succeeded {
                word_count,
                processing_time_ms,
            },
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Record a failed generation.
    #[must_use]
    pub fn failed(
        access_key: AccessKeyId,
        keyword: String,
        approach: String,
        error: String,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            access_key,
            keyword,
            approach,
            outcome: AttemptOutcome::Failed { error },
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> AccessKeyId {
        "KWA-234-567-89".parse().unwrap()
    }

    #[test]
    fn record_id_roundtrip() {
        let id = RecordId::generate();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn record_ids_are_time_ordered() {
        let first = RecordId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = RecordId::generate();
        assert!(first.to_bytes() < second.to_bytes());
    }

    #[test]
    fn usage_record_defaults() {
        let record = UsageRecord::new(key(), 5, 3, 3);
        assert_eq!(record.keywords_requested, 5);
        assert_eq!(record.keywords_processed, 3);
        assert_eq!(record.credits_deducted, 3);
        assert_eq!(record.output_format, DEFAULT_OUTPUT_FORMAT);
        assert!(record.estimated_cost_usd.abs() < f64::EPSILON);
    }

    #[test]
    fn attempt_outcomes_tag_cleanly() {
        let ok = KeywordAttempt::succeeded(key(), "rust async".into(), "gemini-1.5-flash".into(), 420, 1800);
        let json = serde_json::to_value(&ok.outcome).unwrap();
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["word_count"], 420);

        let failed = KeywordAttempt::failed(key(), "rust async".into(), "gemini-1.5-flash".into(), "timeout".into());
        let json = serde_json::to_value(&failed.outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "timeout");
    }
}
