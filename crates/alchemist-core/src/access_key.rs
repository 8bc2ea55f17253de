//! Access key types.
//!
//! An access key is a prepaid credential: it carries a plan, a credit
//! allowance, and a running count of consumed credits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keygen::{KEY_ALPHABET, KEY_GROUPS, KEY_PREFIX};

/// A human-typable access key identifier.
///
/// Canonical shape is `KWA-XXX-XXX-XX`: the fixed `KWA` prefix followed by
/// eight random characters in 3-3-2 groups. The random alphabet excludes
/// visually confusable characters (`0/O`, `1/I`), so parsing rejects them.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKeyId(String);

impl AccessKeyId {
    /// Build an identifier from already-validated parts.
    ///
    /// Only the key generator constructs identifiers this way; everything
    /// arriving over the wire goes through [`FromStr`].
    pub(crate) fn from_generated(value: String) -> Self {
        Self(value)
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccessKeyId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');

        if parts.next() != Some(KEY_PREFIX) {
            return Err(KeyError::Malformed);
        }

        for expected_len in KEY_GROUPS {
            let group = parts.next().ok_or(KeyError::Malformed)?;
            if group.len() != expected_len
                || !group.bytes().all(|b| KEY_ALPHABET.contains(&b))
            {
                return Err(KeyError::Malformed);
            }
        }

        if parts.next().is_some() {
            return Err(KeyError::Malformed);
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for AccessKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessKeyId({})", self.0)
    }
}

impl fmt::Display for AccessKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccessKeyId {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccessKeyId> for String {
    fn from(id: AccessKeyId) -> Self {
        id.0
    }
}

impl AsRef<str> for AccessKeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing an access key identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The input does not match the `KWA-XXX-XXX-XX` shape.
    #[error("malformed access key")]
    Malformed,
}

/// Prepaid plans available for purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Basic plan: $5.99, 10 credits.
    Basic,

    /// Blogger plan: $50.00, 50 credits.
    Blogger,

    /// Pro / Agency plan: $100.00, 240 credits.
    Pro,
}

impl Plan {
    /// Credit allowance granted by this plan.
    #[must_use]
    pub const fn credits(self) -> u32 {
        match self {
            Self::Basic => 10,
            Self::Blogger => 50,
            Self::Pro => 240,
        }
    }

    /// One-time purchase price in cents.
    #[must_use]
    pub const fn price_cents(self) -> i64 {
        match self {
            Self::Basic => 599,
            Self::Blogger => 5000,
            Self::Pro => 10_000,
        }
    }

    /// Display name used on checkout line items.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "Basic Plan",
            Self::Blogger => "Blogger Plan",
            Self::Pro => "Pro / Agency Plan",
        }
    }

    /// Marketing description used on checkout line items.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Basic => "Perfect for getting started and testing the waters",
            Self::Blogger => "Ideal for serious bloggers building an authority site",
            Self::Pro => "For professionals managing multiple sites or high-volume content",
        }
    }

    /// The plan name as it appears in payment metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Blogger => "blogger",
            Self::Pro => "pro",
        }
    }

    /// All purchasable plans, cheapest first.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Basic, Self::Blogger, Self::Pro]
    }
}

impl FromStr for Plan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "blogger" => Ok(Self::Blogger),
            "pro" => Ok(Self::Pro),
            other => Err(PlanError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur when resolving a plan name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The plan name is not one of `basic`, `blogger`, `pro`.
    #[error("unknown plan: {0}")]
    Unknown(String),
}

/// Lifecycle status of an access key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    /// The key validates and can spend credits.
    Active,

    /// Administratively disabled. Behaves as not-found to callers.
    Suspended,

    /// Past its lifetime. Behaves as not-found to callers.
    Expired,
}

/// A prepaid access key with its credit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKey {
    /// The key identifier presented by clients.
    pub id: AccessKeyId,

    /// The plan this key was purchased under. Immutable.
    pub plan: Plan,

    /// Total credits granted. Only increases (top-ups).
    pub credits_total: u32,

    /// Credits consumed so far. Monotonically non-decreasing; mutated only
    /// through the credit ledger's settle path.
    pub credits_used: u32,

    /// Lifecycle status. Only `Active` keys validate.
    pub status: KeyStatus,

    /// Contact email captured at purchase, if any.
    pub email: Option<String>,

    /// When the key was created.
    pub created_at: DateTime<Utc>,
}

impl AccessKey {
    /// Create a new active key with an untouched allowance.
    #[must_use]
    pub fn new(id: AccessKeyId, plan: Plan, credits_total: u32, email: Option<String>) -> Self {
        Self {
            id,
            plan,
            credits_total,
            credits_used: 0,
            status: KeyStatus::Active,
            email,
            created_at: Utc::now(),
        }
    }

    /// Credits still available to spend.
    #[must_use]
    pub const fn credits_remaining(&self) -> u32 {
        self.credits_total.saturating_sub(self.credits_used)
    }

    /// Whether the key currently validates.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_id_parses_canonical_shape() {
        let id: AccessKeyId = "KWA-7G2-XYZ-9A".parse().unwrap();
        assert_eq!(id.as_str(), "KWA-7G2-XYZ-9A");
    }

    #[test]
    fn key_id_rejects_bad_shapes() {
        for bad in [
            "",
            "KWA",
            "KWA-7G2-XYZ",        // missing group
            "KWA-7G2-XYZ-9AB",    // last group too long
            "kwa-7g2-xyz-9a",     // lowercase
            "KWB-7G2-XYZ-9A",     // wrong prefix
            "KWA-7G2-XYZ-9A-FF",  // trailing group
            "KWA-0G2-XYZ-9A",     // '0' excluded from alphabet
            "KWA-7G2-XYI-9A",     // 'I' excluded from alphabet
        ] {
            assert!(bad.parse::<AccessKeyId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn key_id_serde_roundtrip() {
        let id: AccessKeyId = "KWA-234-567-89".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: AccessKeyId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn plan_credit_table() {
        assert_eq!(Plan::Basic.credits(), 10);
        assert_eq!(Plan::Blogger.credits(), 50);
        assert_eq!(Plan::Pro.credits(), 240);
    }

    #[test]
    fn plan_price_table() {
        assert_eq!(Plan::Basic.price_cents(), 599);
        assert_eq!(Plan::Blogger.price_cents(), 5000);
        assert_eq!(Plan::Pro.price_cents(), 10_000);
    }

    #[test]
    fn plan_parse_roundtrip() {
        for plan in Plan::all() {
            assert_eq!(plan.as_str().parse::<Plan>().unwrap(), plan);
        }
    }

    #[test]
    fn unknown_plan_fails_loudly() {
        let err = "enterprise".parse::<Plan>().unwrap_err();
        assert_eq!(err, PlanError::Unknown("enterprise".to_string()));
    }

    #[test]
    fn new_key_has_full_allowance() {
        let id: AccessKeyId = "KWA-234-567-89".parse().unwrap();
        let key = AccessKey::new(id, Plan::Blogger, Plan::Blogger.credits(), None);
        assert_eq!(key.credits_total, 50);
        assert_eq!(key.credits_used, 0);
        assert_eq!(key.credits_remaining(), 50);
        assert!(key.is_active());
    }

    #[test]
    fn credits_remaining_saturates() {
        let id: AccessKeyId = "KWA-234-567-89".parse().unwrap();
        let mut key = AccessKey::new(id, Plan::Basic, 10, None);
        key.credits_used = 12; // raw debits do not clamp
        assert_eq!(key.credits_remaining(), 0);
    }
}
