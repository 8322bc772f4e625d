use std::sync::Arc;

use log::{debug, info};
use sol_wire::Pubkey;

use crate::clock::Clock;
use crate::error::AuthError;
use crate::message::challenge_message;
use crate::model::{redact, AuthChallenge};
use crate::store::AuthStore;
use crate::ID_BYTES;

/// Issues and consumes single-use sign-in challenges.
pub struct ChallengeService<S, C> {
    store: Arc<S>,
    clock: C,
    purpose: String,
    ttl_secs: u64,
}

impl<S: AuthStore, C: Clock> ChallengeService<S, C> {
    pub fn new(store: Arc<S>, clock: C, purpose: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            store,
            clock,
            purpose: purpose.into(),
            ttl_secs,
        }
    }

    /// Issue a fresh challenge for `wallet_address`.
    ///
    /// The address must be valid Base58 for 32 bytes and is stored in
    /// canonical form. Any unused challenge previously issued to the same
    /// wallet stops being answerable.
    pub fn issue(&self, wallet_address: &str) -> Result<AuthChallenge, AuthError> {
        let wallet = Pubkey::from_base58(wallet_address.trim())?.to_base58();
        let nonce = crypto_utils::random_id(ID_BYTES);
        let now = self.clock.now();

        let challenge = AuthChallenge {
            message: challenge_message(&self.purpose, &wallet, &nonce),
            nonce,
            wallet_address: wallet,
            issued_at: now,
            expires_at: now.saturating_add(self.ttl_secs),
            used_at: None,
        };

        let replaced = self.store.replace_challenge(challenge.clone())?;
        debug!(
            "issued challenge {} for {} (replaced {replaced})",
            redact(&challenge.nonce),
            challenge.wallet_address
        );
        Ok(challenge)
    }

    /// Look up a challenge without changing it.
    pub fn find(&self, nonce: &str) -> Result<Option<AuthChallenge>, AuthError> {
        self.store.find_challenge(nonce)
    }

    /// Mark the challenge used. Succeeds at most once per nonce, and only
    /// for the wallet it was issued to.
    pub fn consume(&self, wallet_address: &str, nonce: &str) -> Result<AuthChallenge, AuthError> {
        let wallet = Pubkey::from_base58(wallet_address.trim())?.to_base58();
        let result = self
            .store
            .consume_challenge(&wallet, nonce, self.clock.now());
        match &result {
            Ok(_) => info!("challenge {} consumed by {wallet}", redact(nonce)),
            Err(e) => debug!("challenge {} rejected: {e}", redact(nonce)),
        }
        result
    }
}
