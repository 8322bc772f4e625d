//! Wallet-side signing.
//!
//! The transfer builder only leaves zero-filled holes; these helpers are
//! what the on-device wallet runs to fill them, and to answer sign-in
//! challenges with a detached signature.

use ed25519_dalek::{Signer, SigningKey};
use zeroize::Zeroize;

use crate::address::Pubkey;
use crate::error::SolError;
use crate::transaction::{UnsignedTransaction, SIGNATURE_LEN};

/// Sign an unsigned wire-format transaction with the given Ed25519 seed.
///
/// The signature lands in the slot whose signer key matches the seed's
/// public key; every other byte is left untouched. Errors if the key is
/// not among the transaction's required signers.
pub fn sign_unsigned_transaction(
    private_key: &[u8; 32],
    raw_tx: &[u8],
) -> Result<Vec<u8>, SolError> {
    let tx = UnsignedTransaction::parse(raw_tx)?;
    let signing_key = signing_key(private_key);
    let our_pubkey = Pubkey::new(signing_key.verifying_key().to_bytes());

    let signer_index = tx
        .message
        .account_keys
        .iter()
        .take(tx.signatures.len())
        .position(|key| *key == our_pubkey)
        .ok_or_else(|| SolError::Signing("wallet pubkey not found in transaction signers".into()))?;

    let message_start = tx.message_offset()?;
    let message = raw_tx
        .get(message_start..)
        .ok_or_else(|| SolError::Serialization("transaction message missing".into()))?;
    let signature = signing_key.sign(message);

    let mut signed = raw_tx.to_vec();
    let slot = message_start - (tx.signatures.len() - signer_index) * SIGNATURE_LEN;
    signed[slot..slot + SIGNATURE_LEN].copy_from_slice(&signature.to_bytes());

    Ok(signed)
}

/// Produce a detached 64-byte Ed25519 signature over `message`.
pub fn sign_message(private_key: &[u8; 32], message: &[u8]) -> [u8; SIGNATURE_LEN] {
    signing_key(private_key).sign(message).to_bytes()
}

/// Build the signing key, wiping the local seed copy.
fn signing_key(private_key: &[u8; 32]) -> SigningKey {
    let mut seed = *private_key;
    let key = SigningKey::from_bytes(&seed);
    seed.zeroize();
    key
}
