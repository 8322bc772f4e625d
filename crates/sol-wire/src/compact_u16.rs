//! Solana's compact-u16 length encoding.
//!
//! Every count and length in the wire format (account keys, instructions,
//! per-instruction account indices, instruction data) is written this way:
//! seven bits per byte, low bits first, bit 7 set iff another byte follows.
//!
//! ```text
//!   0x0000..=0x007f   1 byte
//!   0x0080..=0x3fff   2 bytes
//!   0x4000..=0xffff   3 bytes
//! ```

use crate::error::SolError;

/// Longest encoding of a `u16`.
pub const MAX_ENCODED_LEN: usize = 3;

/// Encode a `u16` value in compact-u16 form.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = u32::from(value);
    let mut out = Vec::with_capacity(MAX_ENCODED_LEN);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Encode a collection length, rejecting anything above `u16::MAX`.
pub fn encode_len(len: usize) -> Result<Vec<u8>, SolError> {
    let value = u16::try_from(len).map_err(|_| {
        SolError::Serialization(format!("length {len} does not fit in compact-u16"))
    })?;
    Ok(encode_compact_u16(value))
}

/// Append a compact-u16 length prefix to `buf`.
pub fn write_len(buf: &mut Vec<u8>, len: usize) -> Result<(), SolError> {
    buf.extend_from_slice(&encode_len(len)?);
    Ok(())
}

/// Decode a compact-u16 value from the front of `data`.
///
/// Returns `(value, bytes_consumed)`. Truncated input, a fourth byte,
/// values above `u16::MAX` and non-canonical encodings (a trailing zero
/// continuation byte) are all rejected, so decoding is the exact inverse
/// of [`encode_compact_u16`].
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().take(MAX_ENCODED_LEN).enumerate() {
        if i > 0 && byte == 0 {
            return Err(SolError::Serialization(
                "non-canonical compact-u16 encoding".into(),
            ));
        }

        value |= u32::from(byte & 0x7f) << (7 * i);

        if byte & 0x80 == 0 {
            let value = u16::try_from(value).map_err(|_| {
                SolError::Serialization("compact-u16 value overflow".into())
            })?;
            return Ok((value, i + 1));
        }
    }

    if data.len() < MAX_ENCODED_LEN {
        Err(SolError::Serialization(
            "unexpected end of data while decoding compact-u16".into(),
        ))
    } else {
        Err(SolError::Serialization(
            "compact-u16 longer than 3 bytes".into(),
        ))
    }
}
