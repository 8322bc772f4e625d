//! Solana wire-format support for the reward wallet.
//!
//! This crate assembles unsigned SPL token transfer transactions in the
//! legacy message format, derives program addresses (with a bounded
//! memoizing cache), and converts keys to and from Base58 text. Like the
//! rest of the wallet it avoids `solana-sdk`: the compact binary layout is
//! written by hand, `curve25519-dalek` answers the on-curve question and
//! `bs58` provides the alphabet.

pub mod address;
pub mod base58;
pub mod compact_u16;
pub mod config;
pub mod error;
pub mod pda;
pub mod pda_cache;
pub mod signer;
pub mod token;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{address_to_bytes, bytes_to_address, validate_address, Pubkey};
pub use compact_u16::{decode_compact_u16, encode_compact_u16, encode_len};
pub use config::{TransferConfig, DEFAULT_CACHE_CAPACITY};
pub use error::SolError;
pub use pda::{create_program_address, find_program_address, is_on_curve, DerivedAddress};
pub use pda_cache::DerivationCache;
pub use signer::{sign_message, sign_unsigned_transaction};
pub use token::{
    derive_token_account, transfer_data, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID,
    TRANSFER_DISCRIMINATOR,
};
pub use transaction::{
    CompiledInstruction, MessageHeader, TransferBuilder, UnsignedMessage, UnsignedTransaction,
    MAX_TRANSACTION_SIZE, SIGNATURE_LEN,
};
