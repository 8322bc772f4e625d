use thiserror::Error;

/// Sign-in and session errors.
///
/// Challenge outcomes are distinct and final: the client must request a
/// fresh challenge after any of them. Signature failures are reported
/// without detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("challenge not found")]
    ChallengeNotFound,

    #[error("challenge expired")]
    ChallengeExpired,

    #[error("challenge already used")]
    ChallengeAlreadyUsed,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid auth config: {0}")]
    Config(String),

    #[error("auth store error: {0}")]
    Store(String),
}

impl From<sol_wire::SolError> for AuthError {
    fn from(e: sol_wire::SolError) -> Self {
        AuthError::InvalidAddress(e.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Config(e.to_string())
    }
}
