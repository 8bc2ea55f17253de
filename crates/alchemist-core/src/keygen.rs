//! Access key candidate generation.
//!
//! Candidates are short, human-typable, and visually unambiguous: a fixed
//! prefix plus eight random characters drawn from a 32-character alphabet
//! with `0/O` and `1/I` removed, grouped 3-3-2 for readability.
//!
//! Generation here is a pure random draw; uniqueness against the store is
//! enforced by the minting loop in the store crate.

use rand::Rng;

use crate::access_key::AccessKeyId;

/// Fixed prefix for every access key.
pub const KEY_PREFIX: &str = "KWA";

/// Random-segment alphabet. 32 characters; excludes `0`, `O`, `1`, `I`.
pub const KEY_ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Random-segment grouping: `KWA-XXX-XXX-XX`.
pub const KEY_GROUPS: [usize; 3] = [3, 3, 2];

/// Draw a fresh key candidate.
///
/// With 32^8 possible random segments, the collision probability against any
/// realistic key population is negligible; callers still check the store
/// before accepting a candidate.
#[must_use]
pub fn generate_candidate() -> AccessKeyId {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(KEY_PREFIX.len() + KEY_GROUPS.len() * 4);

    out.push_str(KEY_PREFIX);
    for group_len in KEY_GROUPS {
        out.push('-');
        for _ in 0..group_len {
            let idx = rng.gen_range(0..KEY_ALPHABET.len());
            out.push(char::from(KEY_ALPHABET[idx]));
        }
    }

    AccessKeyId::from_generated(out)
}
