//! Base58 text codec.
//!
//! Addresses, blockhashes and signatures cross every API boundary as
//! Base58 text in the Bitcoin alphabet (no `0`, `O`, `I` or `l`). Each
//! leading zero byte maps to exactly one leading `1`, so the byte length
//! survives a round trip even though the body is a big-integer conversion.

use crate::error::SolError;

/// Encode arbitrary bytes as Base58. Empty input yields an empty string.
pub fn encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode Base58 text back into the exact original bytes.
///
/// Any glyph outside the alphabet fails with [`SolError::InvalidCharacter`]
/// and no partial output is returned.
pub fn decode(text: &str) -> Result<Vec<u8>, SolError> {
    bs58::decode(text).into_vec().map_err(|e| match e {
        bs58::decode::Error::InvalidCharacter { character, index } => {
            SolError::InvalidCharacter { character, index }
        }
        bs58::decode::Error::NonAsciiCharacter { index } => SolError::InvalidCharacter {
            character: text
                .get(index..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            index,
        },
        other => SolError::Serialization(format!("base58 decode failed: {other}")),
    })
}

/// Decode Base58 text that must hold exactly 32 bytes (a key or a hash).
pub fn decode_32(text: &str, what: &str) -> Result<[u8; 32], SolError> {
    let bytes = decode(text)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::MalformedInput(format!("{what} must be 32 bytes, got {}", v.len()))
    })
}
