//! Unique key minting.
//!
//! Draws key candidates until one is not present in the store. The loop is
//! bounded: with a 32^8 candidate space, hitting the ceiling means the store
//! is misbehaving, not that the alphabet is exhausted.

use alchemist_core::{generate_candidate, AccessKeyId};

use crate::error::StoreError;
use crate::Store;

/// Upper bound on candidate draws before minting gives up.
pub const MAX_MINT_ATTEMPTS: usize = 20;

/// Errors that can occur while minting a key.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    /// Every candidate collided within the retry ceiling.
    #[error("key generation exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of candidates drawn.
        attempts: usize,
    },

    /// Storage failure during the existence check.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Mint an identifier guaranteed not to exist in the store.
///
/// # Errors
///
/// - `MintError::Exhausted` after [`MAX_MINT_ATTEMPTS`] collisions.
/// - `MintError::Store` on storage failure.
pub fn mint_unique_key<S: Store + ?Sized>(store: &S) -> Result<AccessKeyId, MintError> {
    mint_unique_key_with(store, generate_candidate)
}

/// Mint with a caller-supplied candidate source.
///
/// Split out so tests can script the draw sequence.
///
/// # Errors
///
/// Same as [`mint_unique_key`].
pub fn mint_unique_key_with<S: Store + ?Sized>(
    store: &S,
    mut candidates: impl FnMut() -> AccessKeyId,
) -> Result<AccessKeyId, MintError> {
    for attempt in 1..=MAX_MINT_ATTEMPTS {
        let candidate = candidates();

        if !store.key_exists(&candidate)? {
            return Ok(candidate);
        }

        tracing::debug!(
            candidate = %candidate,
            attempt,
            "key candidate collided, redrawing"
        );
    }

    Err(MintError::Exhausted {
        attempts: MAX_MINT_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RocksStore;
    use alchemist_core::{AccessKey, Plan};
    use tempfile::TempDir;

    fn store_with_keys(ids: &[&str]) -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        for id in ids {
            let key = AccessKey::new(id.parse().unwrap(), Plan::Basic, 10, None);
            store.create_key(&key).unwrap();
        }
        (store, dir)
    }

    #[test]
    fn mint_returns_fresh_candidate() {
        let (store, _dir) = store_with_keys(&[]);
        let id = mint_unique_key(&store).unwrap();
        assert!(!store.key_exists(&id).unwrap());
    }

    #[test]
    fn mint_skips_colliding_candidates() {
        // Five taken identifiers, then an open slot: the sixth draw wins.
        let taken = [
            "KWA-AAA-AAA-AA",
            "KWA-BBB-BBB-BB",
            "KWA-CCC-CCC-CC",
            "KWA-DDD-DDD-DD",
            "KWA-EEE-EEE-EE",
        ];
        let (store, _dir) = store_with_keys(&taken);

        let script = [
            "KWA-AAA-AAA-AA",
            "KWA-BBB-BBB-BB",
            "KWA-CCC-CCC-CC",
            "KWA-DDD-DDD-DD",
            "KWA-EEE-EEE-EE",
            "KWA-FFF-FFF-FF",
        ];
        let mut draws = script.iter();
        let mut drawn = 0;

        let minted = mint_unique_key_with(&store, || {
            drawn += 1;
            draws.next().unwrap().parse().unwrap()
        })
        .unwrap();

        assert_eq!(minted.as_str(), "KWA-FFF-FFF-FF");
        assert_eq!(drawn, 6);
        assert!(!taken.contains(&minted.as_str()));
    }

    #[test]
    fn mint_gives_up_after_ceiling() {
        let (store, _dir) = store_with_keys(&["KWA-AAA-AAA-AA"]);

        let mut drawn = 0;
        let err = mint_unique_key_with(&store, || {
            drawn += 1;
            "KWA-AAA-AAA-AA".parse().unwrap()
        })
        .unwrap_err();

        assert!(matches!(
            err,
            MintError::Exhausted {
                attempts: MAX_MINT_ATTEMPTS
            }
        ));
        assert_eq!(drawn, MAX_MINT_ATTEMPTS);
    }
}
