use sol_wire::SolError;
use thiserror::Error;

/// Errors surfaced to the mobile app. Flattened to their message on the
/// foreign side.
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum BridgeError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Address derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

impl From<SolError> for BridgeError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::MalformedInput(msg) => BridgeError::MalformedInput(msg),
            SolError::AddressResolutionFailed(msg) => BridgeError::DerivationFailed(msg),
            err @ SolError::InvalidCharacter { .. } => BridgeError::InvalidAddress(err.to_string()),
            SolError::InvalidAddress(msg) => BridgeError::InvalidAddress(msg),
            SolError::Serialization(msg) => BridgeError::TransactionFailed(msg),
            SolError::Signing(msg) => BridgeError::SigningFailed(msg),
        }
    }
}
