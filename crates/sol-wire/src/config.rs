use crate::address::Pubkey;
use crate::base58;
use crate::error::SolError;
use crate::token::TOKEN_PROGRAM_ID;

/// Default number of derivations a [`DerivationCache`](crate::DerivationCache) keeps.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// The token every transfer built by this crate moves, and the program
/// that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    pub mint: Pubkey,
    pub token_program: Pubkey,
}

impl TransferConfig {
    /// Config for `mint` under the standard SPL Token program.
    pub fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            token_program: TOKEN_PROGRAM_ID,
        }
    }

    /// Parse both ids from Base58. Each must decode to exactly 32 bytes.
    pub fn from_base58(mint: &str, token_program: &str) -> Result<Self, SolError> {
        Ok(Self {
            mint: Pubkey::new(base58::decode_32(mint, "token mint")?),
            token_program: Pubkey::new(base58::decode_32(token_program, "token program id")?),
        })
    }
}
