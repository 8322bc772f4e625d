use ed25519_dalek::{Signature, VerifyingKey};
use sol_wire::Pubkey;

/// Check a detached Ed25519 signature over `message` against the public
/// key encoded by `wallet_address`.
///
/// Returns `false` for any malformed input (bad Base58, wrong key or
/// signature length, bytes that are not a valid curve point) instead of
/// erroring. Uses strict verification, so malleable and small-order
/// signatures are refused.
pub fn verify_signature(wallet_address: &str, message: &[u8], signature: &[u8]) -> bool {
    let Ok(pubkey) = Pubkey::from_base58(wallet_address.trim()) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(pubkey.as_bytes()) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify_strict(message, &signature).is_ok()
}
