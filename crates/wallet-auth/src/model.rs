use serde::{Deserialize, Serialize};

/// A sign-in challenge bound to one wallet.
///
/// `used_at` is set exactly once, when the challenge is consumed. A used
/// or expired challenge is permanently invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChallenge {
    pub nonce: String,
    /// Base58 wallet address, canonicalized.
    pub wallet_address: String,
    /// Exact text the wallet must sign.
    pub message: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub used_at: Option<u64>,
}

impl AuthChallenge {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

/// A bearer token issued after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub wallet_address: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub revoked_at: Option<u64>,
}

impl AuthToken {
    /// Not revoked and not yet expired.
    pub fn is_valid(&self, now: u64) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

/// First eight characters of a nonce or token, for logs.
pub(crate) fn redact(secret: &str) -> &str {
    secret.get(..8).unwrap_or(secret)
}
