//! Addresses, program ids and public keys.
//!
//! On Solana all three are the same thing: 32 raw bytes, shown to humans as
//! Base58. Internal computation always uses the raw array; text only
//! appears at API boundaries and in logs.

use std::fmt;
use std::str::FromStr;

use crate::base58;
use crate::error::SolError;
use crate::pda;

/// A 32-byte account address, program id, or Ed25519 public key.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse Base58 text that must decode to exactly 32 bytes.
    pub fn from_base58(text: &str) -> Result<Self, SolError> {
        let bytes = base58::decode(text)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_base58(&self) -> String {
        base58::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Whether these bytes decompress to a point on the Ed25519 curve,
    /// i.e. whether a private key could exist for this address.
    pub fn is_on_curve(&self) -> bool {
        pda::is_on_curve(&self.0)
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Pubkey {
    type Error = SolError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            SolError::MalformedInput(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self.to_base58())
    }
}

/// Validate a Solana address string.
///
/// Returns `Ok(true)` if the text is Base58 and decodes to exactly 32
/// bytes, otherwise the decoding or length error.
pub fn validate_address(address: &str) -> Result<bool, SolError> {
    Pubkey::from_base58(address).map(|_| true)
}

/// Decode a Solana address string to its 32-byte representation.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    Pubkey::from_base58(address).map(Pubkey::to_bytes)
}

/// Encode 32 bytes as a Solana address (Base58 string).
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    base58::encode(bytes)
}
