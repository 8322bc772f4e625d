//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || ... || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")` for the first bump (searching 255 down to 0)
//! whose digest does NOT decompress to an Ed25519 point. Being off-curve
//! means no private key exists for the address, so only the owning
//! program can ever authorize for it.

use log::{debug, warn};
use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

/// Domain separator appended after the program id.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// An off-curve address together with the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Find the canonical PDA for `seeds` under `program_id`.
///
/// Fails with `MalformedInput` if the seeds break the length limits, and
/// with `AddressResolutionFailed` if all 256 bumps land on the curve.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<DerivedAddress, SolError> {
    validate_seeds(seeds, 1)?;

    for bump in (0u8..=255).rev() {
        let hash = hash_seeds(seeds, &[bump], program_id);
        if !is_on_curve(&hash) {
            let derived = DerivedAddress {
                address: Pubkey::new(hash),
                bump,
            };
            debug!(
                "derived {} (bump {bump}) under program {program_id}",
                derived.address
            );
            return Ok(derived);
        }
    }

    warn!("bump search exhausted for {} seeds under program {program_id}", seeds.len());
    Err(SolError::AddressResolutionFailed(
        "could not find valid PDA bump seed".into(),
    ))
}

/// Create a PDA from seeds that already include the bump as their last
/// element.
///
/// Returns `AddressResolutionFailed` when the digest lies on the curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<Pubkey, SolError> {
    validate_seeds(seeds, 0)?;

    let hash = hash_seeds(seeds, &[], program_id);
    if is_on_curve(&hash) {
        return Err(SolError::AddressResolutionFailed(
            "derived address lies on the ed25519 curve".into(),
        ));
    }
    Ok(Pubkey::new(hash))
}

/// Check if 32 bytes represent a valid Ed25519 curve point.
///
/// Uses `curve25519-dalek` to attempt decompression. If it succeeds, the
/// point is on the curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

/// Enforce the seed count and per-seed length limits. `reserved` is the
/// number of seed slots the caller will append (1 for the bump).
pub(crate) fn validate_seeds(seeds: &[&[u8]], reserved: usize) -> Result<(), SolError> {
    if seeds.len() + reserved > MAX_SEEDS {
        return Err(SolError::MalformedInput(format!(
            "at most {} seeds allowed, got {}",
            MAX_SEEDS - reserved,
            seeds.len()
        )));
    }
    if let Some((i, seed)) = seeds.iter().enumerate().find(|(_, s)| s.len() > MAX_SEED_LEN) {
        return Err(SolError::MalformedInput(format!(
            "seed {i} is {} bytes, max is {MAX_SEED_LEN}",
            seed.len()
        )));
    }
    Ok(())
}

fn hash_seeds(seeds: &[&[u8]], bump: &[u8], program_id: &Pubkey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}
