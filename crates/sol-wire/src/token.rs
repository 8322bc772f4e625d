//! SPL Token transfer data and associated token account derivation,
//! without the `spl-token` or `spl-associated-token-account` crates.

use crate::address::Pubkey;
use crate::error::SolError;
use crate::pda::DerivedAddress;
use crate::pda_cache::DerivationCache;

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
]);

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
]);

/// SPL Token `Transfer` instruction tag.
pub const TRANSFER_DISCRIMINATOR: u8 = 3;

/// Tag byte plus u64 amount.
pub const TRANSFER_DATA_LEN: usize = 9;

/// Instruction data for an SPL `Transfer` of `amount` base units:
/// `[3] ++ amount.to_le_bytes()`.
pub fn transfer_data(amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(TRANSFER_DATA_LEN);
    data.push(TRANSFER_DISCRIMINATOR);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Derive the associated token account for a wallet + mint pair.
///
/// The ATA is the PDA of the Associated Token Account program with seeds
/// `[wallet, token_program, mint]`. Resolved through `cache`.
pub fn derive_token_account(
    cache: &DerivationCache,
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<DerivedAddress, SolError> {
    cache.get(
        &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
}
