//! The credit ledger: the single authority over credit spend.
//!
//! A keyword batch goes through two ledger calls:
//!
//! 1. [`CreditLedger::authorize`] — a pure read that decides how many of the
//!    requested units fit the key's remaining credits. Nothing is charged
//!    yet; generation work happens outside the ledger, holding no lock.
//! 2. [`CreditLedger::settle`] — debits exactly the units that were
//!    concretely attempted. A provider-side failure still counts as
//!    consumed, since it spent a provider call.
//!
//! The authorize read is advisory: two racing batches against the same key
//! can both see the same `remaining`. The debit underneath `settle` is the
//! source of truth and never loses updates; for a low-value-per-unit credit
//! system that relaxed discipline is deliberate. Used correctly (settle at
//! most what was authorized) a key can never be driven past its allowance by
//! a single request.

use std::sync::Arc;

use alchemist_core::AccessKeyId;

use crate::error::StoreError;
use crate::Store;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The key is absent, suspended, or expired.
    #[error("invalid access key")]
    InvalidKey,

    /// A caller tried to settle more units than it was authorized for.
    #[error("settlement of {consumed} exceeds authorization of {authorized}")]
    SettleExceedsAuthorization {
        /// Units granted by the authorization.
        authorized: u32,
        /// Units the caller tried to settle.
        consumed: u32,
    },

    /// Storage failure underneath the ledger.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A granted spend budget for one logical request.
///
/// Construction is private to the ledger: holding an `Authorization` proves
/// the split was computed against the store, and `settle` refuses to charge
/// past it.
#[derive(Debug, Clone)]
pub struct Authorization {
    key: AccessKeyId,
    allowed: u32,
    remaining: u32,
}

impl Authorization {
    /// The key the budget was granted against.
    #[must_use]
    pub fn key(&self) -> &AccessKeyId {
        &self.key
    }

    /// How many of the requested units may proceed.
    #[must_use]
    pub const fn allowed(&self) -> u32 {
        self.allowed
    }

    /// Credits remaining at authorization time (before any settlement).
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Authorizes and settles credit spend against a [`Store`].
pub struct CreditLedger<S: Store + ?Sized> {
    store: Arc<S>,
}

impl<S: Store + ?Sized> Clone for CreditLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store + ?Sized> CreditLedger<S> {
    /// Create a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Decide how many of `requested` units the key can afford.
    ///
    /// Pure read: no state is mutated. `allowed` is the prefix length of the
    /// caller's ordered batch that may proceed; the remainder must be
    /// reported as rejected, never partially processed.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidKey` if the key is absent or not active.
    /// - `LedgerError::Store` on storage failure.
    pub fn authorize(
        &self,
        key_id: &AccessKeyId,
        requested: u32,
    ) -> Result<Authorization, LedgerError> {
        let key = self
            .store
            .get_key(key_id)?
            .ok_or(LedgerError::InvalidKey)?;

        let remaining = key.credits_remaining();
        let allowed = requested.min(remaining);

        Ok(Authorization {
            key: key_id.clone(),
            allowed,
            remaining,
        })
    }

    /// Debit the units that were concretely attempted and return the new
    /// remaining balance.
    ///
    /// `consumed == 0` settles nothing and touches no state.
    ///
    /// # Errors
    ///
    /// - `LedgerError::SettleExceedsAuthorization` if `consumed` exceeds the
    ///   authorized budget.
    /// - `LedgerError::Store` on storage failure; the caller owns the
    ///   reconciliation of work already performed.
    pub fn settle(&self, auth: &Authorization, consumed: u32) -> Result<u32, LedgerError> {
        if consumed > auth.allowed {
            return Err(LedgerError::SettleExceedsAuthorization {
                authorized: auth.allowed,
                consumed,
            });
        }

        if consumed == 0 {
            return Ok(auth.remaining);
        }

        let key = self.store.debit(&auth.key, consumed)?;

        tracing::debug!(
            access_key = %auth.key,
            consumed,
            remaining = key.credits_remaining(),
            "credits settled"
        );

        Ok(key.credits_remaining())
    }
}
