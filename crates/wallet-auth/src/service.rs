use std::sync::Arc;

use log::{info, warn};
use sol_wire::Pubkey;

use crate::challenge::ChallengeService;
use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::model::{AuthChallenge, AuthToken};
use crate::store::AuthStore;
use crate::token::TokenIssuer;
use crate::verifier::verify_signature;

/// The full sign-in flow over one store and one clock.
pub struct AuthService<S, C> {
    store: Arc<S>,
    clock: C,
    challenges: ChallengeService<S, C>,
    tokens: TokenIssuer<S, C>,
}

impl<S: AuthStore, C: Clock + Clone> AuthService<S, C> {
    pub fn new(store: Arc<S>, clock: C, config: AuthConfig) -> Result<Self, AuthError> {
        config.validate()?;
        Ok(Self {
            challenges: ChallengeService::new(
                Arc::clone(&store),
                clock.clone(),
                config.purpose,
                config.challenge_ttl_secs,
            ),
            tokens: TokenIssuer::new(Arc::clone(&store), clock.clone(), config.token_ttl_secs),
            store,
            clock,
        })
    }

    pub fn request_challenge(&self, wallet_address: &str) -> Result<AuthChallenge, AuthError> {
        self.challenges.issue(wallet_address)
    }

    /// Exchange a signed challenge for a bearer token.
    ///
    /// The signature is checked against the stored challenge text before
    /// the nonce is burned, so a bad signature leaves the challenge
    /// answerable until it expires. The consume step is the single point
    /// that decides between concurrent logins on the same nonce.
    pub fn login(
        &self,
        wallet_address: &str,
        nonce: &str,
        signature: &[u8],
    ) -> Result<AuthToken, AuthError> {
        let wallet = Pubkey::from_base58(wallet_address.trim())?.to_base58();

        let challenge = self
            .challenges
            .find(nonce)?
            .filter(|c| c.wallet_address == wallet)
            .ok_or(AuthError::ChallengeNotFound)?;

        if !verify_signature(&wallet, challenge.message.as_bytes(), signature) {
            warn!("bad signature from {wallet}");
            return Err(AuthError::InvalidSignature);
        }

        self.challenges.consume(&wallet, nonce)?;
        self.tokens.issue(&wallet)
    }

    /// Resolve a bearer token to its wallet address.
    pub fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.validate(token)
    }

    pub fn logout(&self, token: &str) -> Result<bool, AuthError> {
        self.tokens.revoke(token)
    }

    /// Drop expired challenges and tokens from the store.
    pub fn purge_expired(&self) -> Result<usize, AuthError> {
        let removed = self.store.purge_expired(self.clock.now())?;
        if removed > 0 {
            info!("purged {removed} expired auth records");
        }
        Ok(removed)
    }
}
