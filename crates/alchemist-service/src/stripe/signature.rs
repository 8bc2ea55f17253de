//! Stripe webhook signature verification.
//!
//! Stripe signs the raw webhook body with HMAC-SHA256 over
//! `"{timestamp}.{payload}"` and sends the result in the `Stripe-Signature`
//! header as `t=<timestamp>,v1=<hex>[,v1=<hex>...]`.

use super::client::StripeError;

/// HMAC block size for SHA256 is 64 bytes.
const HMAC_BLOCK_SIZE: usize = 64;

/// Verify a webhook signature header against the raw payload.
///
/// # Arguments
///
/// * `secret` - The endpoint signing secret (`whsec_...`)
/// * `payload` - Raw request body, exactly as received
/// * `signature` - Value of the `Stripe-Signature` header
///
/// # Errors
///
/// - `StripeError::Configuration` if the header has no timestamp.
/// - `StripeError::InvalidSignature` if no `v1` signature matches.
pub fn verify_signature(secret: &str, payload: &str, signature: &str) -> Result<(), StripeError> {
    // Parse the signature header
    // Format: t=timestamp,v1=signature,v1=signature2,...
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in signature.split(',') {
        let mut kv = part.splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(ts)) => timestamp = Some(ts),
            (Some("v1"), Some(sig)) => signatures.push(sig),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| StripeError::Configuration("Missing timestamp".into()))?;

    if signatures.is_empty() {
        return Err(StripeError::InvalidSignature);
    }

    // Compute expected signature
    let signed_payload = format!("{timestamp}.{payload}");
    let expected = compute_hmac_sha256(secret, &signed_payload);

    // Check if any signature matches (constant-time comparison)
    let valid = signatures.iter().any(|sig| constant_time_eq(&expected, sig));

    if valid {
        Ok(())
    } else {
        Err(StripeError::InvalidSignature)
    }
}

/// Compute HMAC-SHA256 and return hex-encoded result.
fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use sha2::{Digest, Sha256};

    let key = secret.as_bytes();
    let message = message.as_bytes();

    // If key is longer than block size, hash it first
    let key = if key.len() > HMAC_BLOCK_SIZE {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.finalize().to_vec()
    } else {
        key.to_vec()
    };

    // Pad key to block size
    let mut key_padded = [0u8; HMAC_BLOCK_SIZE];
    key_padded[..key.len()].copy_from_slice(&key);

    // Create inner and outer padded keys
    let mut i_key_pad = [0x36u8; HMAC_BLOCK_SIZE];
    let mut o_key_pad = [0x5cu8; HMAC_BLOCK_SIZE];

    for i in 0..HMAC_BLOCK_SIZE {
        i_key_pad[i] ^= key_padded[i];
        o_key_pad[i] ^= key_padded[i];
    }

    // Inner hash: H(i_key_pad || message)
    let mut inner_hasher = Sha256::new();
    inner_hasher.update(i_key_pad);
    inner_hasher.update(message);
    let inner_hash = inner_hasher.finalize();

    // Outer hash: H(o_key_pad || inner_hash)
    let mut outer_hasher = Sha256::new();
    outer_hasher.update(o_key_pad);
    outer_hasher.update(inner_hash);
    let hmac = outer_hasher.finalize();

    // Convert to hex
    hex::encode(hmac)
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
