use thiserror::Error;

/// Errors raised while encoding keys, deriving program addresses, or
/// assembling transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    /// Wrong-length keys or hashes, empty amount lists, bad seeds.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The bump search found no off-curve address for the given seeds.
    #[error("address resolution failed: {0}")]
    AddressResolutionFailed(String),

    #[error("invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("signing error: {0}")]
    Signing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_malformed_input() {
        let err = SolError::MalformedInput("fee payer must be 32 bytes".into());
        assert_eq!(err.to_string(), "malformed input: fee payer must be 32 bytes");
    }

    #[test]
    fn display_address_resolution_failed() {
        let err = SolError::AddressResolutionFailed("no bump".into());
        assert_eq!(err.to_string(), "address resolution failed: no bump");
    }

    #[test]
    fn display_invalid_character_names_glyph_and_position() {
        let err = SolError::InvalidCharacter {
            character: '0',
            index: 4,
        };
        assert_eq!(err.to_string(), "invalid base58 character '0' at index 4");
    }

    #[test]
    fn display_serialization() {
        let err = SolError::Serialization("compact-u16 overflow".into());
        assert_eq!(err.to_string(), "serialization error: compact-u16 overflow");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(SolError::Signing("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
