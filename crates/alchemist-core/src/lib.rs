//! Core types and utilities for the keyword-alchemist backend.
//!
//! This crate provides the foundational types used throughout the platform:
//!
//! - **Access keys**: `AccessKeyId`, `AccessKey`, `Plan`, `KeyStatus`
//! - **Key generation**: candidate generation from a confusion-free alphabet
//! - **Audit records**: `UsageRecord`, `KeywordAttempt`, `PaymentRecord`
//! - **Keyword lists**: batch parsing for uploaded keyword files
//!
//! # Credit unit
//!
//! **1 credit = 1 keyword-to-article generation attempt.**
//!
//! Credits are prepaid per access key (`credits_total`) and consumed
//! monotonically (`credits_used`). The invariant
//! `credits_used <= credits_total` is maintained by the credit ledger in the
//! store crate; the types here only expose the arithmetic.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod access_key;
pub mod keygen;
pub mod keywords;
pub mod payment;
pub mod usage;

pub use access_key::{AccessKey, AccessKeyId, KeyError, KeyStatus, Plan, PlanError};
pub use keygen::{generate_candidate, KEY_ALPHABET, KEY_GROUPS, KEY_PREFIX};
pub use keywords::{parse_keyword_list, MAX_KEYWORDS_PER_BATCH, MAX_KEYWORD_LEN};
pub use payment::{PaymentOutcome, PaymentRecord};
pub use usage::{AttemptOutcome, KeywordAttempt, RecordId, UsageRecord, DEFAULT_OUTPUT_FORMAT};
