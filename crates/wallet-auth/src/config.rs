use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Sign-in settings.
///
/// Missing fields in a JSON document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// First line of every challenge message, telling the user what they
    /// are signing.
    pub purpose: String,
    /// How long an issued challenge can be answered.
    pub challenge_ttl_secs: u64,
    /// How long a bearer token stays valid. Must outlive the challenge.
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            purpose: "Sign in to Reward Tracker".into(),
            challenge_ttl_secs: 5 * 60,
            token_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl AuthConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.purpose.trim().is_empty() {
            return Err(AuthError::Config("purpose must not be empty".into()));
        }
        if self.challenge_ttl_secs == 0 {
            return Err(AuthError::Config("challenge_ttl_secs must be > 0".into()));
        }
        if self.token_ttl_secs <= self.challenge_ttl_secs {
            return Err(AuthError::Config(format!(
                "token_ttl_secs ({}) must be longer than challenge_ttl_secs ({})",
                self.token_ttl_secs, self.challenge_ttl_secs
            )));
        }
        Ok(())
    }
}
