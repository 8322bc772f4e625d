//! Persistence for challenges and tokens.
//!
//! The protocol logic only needs keyed lookups, a per-wallet index, and
//! one atomic check-and-set (consume). A database-backed store would do
//! the consume as a single conditional `UPDATE ... WHERE used_at IS NULL`
//! inside a transaction; [`MemoryStore`] does it under one mutex.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::AuthError;
use crate::model::{AuthChallenge, AuthToken};

pub trait AuthStore: Send + Sync {
    /// Store `challenge`, removing every unused challenge previously
    /// issued to the same wallet. Returns how many were removed.
    fn replace_challenge(&self, challenge: AuthChallenge) -> Result<usize, AuthError>;

    fn find_challenge(&self, nonce: &str) -> Result<Option<AuthChallenge>, AuthError>;

    /// Atomically check that the challenge exists for `wallet_address`,
    /// is unexpired at `now` and unused, and mark it used.
    ///
    /// Of any number of concurrent calls for the same nonce, at most one
    /// returns `Ok`.
    fn consume_challenge(
        &self,
        wallet_address: &str,
        nonce: &str,
        now: u64,
    ) -> Result<AuthChallenge, AuthError>;

    fn insert_token(&self, token: AuthToken) -> Result<(), AuthError>;

    fn find_token(&self, token: &str) -> Result<Option<AuthToken>, AuthError>;

    /// Set `revoked_at` if unset. Returns the token as stored afterwards,
    /// or `None` if it does not exist.
    fn revoke_token(&self, token: &str, now: u64) -> Result<Option<AuthToken>, AuthError>;

    /// Drop challenges and tokens that can no longer be used at `now`.
    /// Returns how many records were removed.
    fn purge_expired(&self, now: u64) -> Result<usize, AuthError>;
}

/// In-process [`AuthStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    challenges: HashMap<String, AuthChallenge>,
    /// wallet address -> nonces issued to it
    by_wallet: HashMap<String, Vec<String>>,
    tokens: HashMap<String, AuthToken>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryState {
    fn remove_challenge(&mut self, nonce: &str) {
        if let Some(challenge) = self.challenges.remove(nonce) {
            if let Some(nonces) = self.by_wallet.get_mut(&challenge.wallet_address) {
                nonces.retain(|n| n != nonce);
                if nonces.is_empty() {
                    self.by_wallet.remove(&challenge.wallet_address);
                }
            }
        }
    }
}

impl AuthStore for MemoryStore {
    fn replace_challenge(&self, challenge: AuthChallenge) -> Result<usize, AuthError> {
        let mut state = self.state();

        let stale: Vec<String> = state
            .by_wallet
            .get(&challenge.wallet_address)
            .into_iter()
            .flatten()
            .filter(|nonce| state.challenges.get(*nonce).is_some_and(|c| !c.is_used()))
            .cloned()
            .collect();
        for nonce in &stale {
            state.remove_challenge(nonce);
        }

        state
            .by_wallet
            .entry(challenge.wallet_address.clone())
            .or_default()
            .push(challenge.nonce.clone());
        state.challenges.insert(challenge.nonce.clone(), challenge);

        Ok(stale.len())
    }

    fn find_challenge(&self, nonce: &str) -> Result<Option<AuthChallenge>, AuthError> {
        Ok(self.state().challenges.get(nonce).cloned())
    }

    fn consume_challenge(
        &self,
        wallet_address: &str,
        nonce: &str,
        now: u64,
    ) -> Result<AuthChallenge, AuthError> {
        let mut state = self.state();

        let challenge = state
            .challenges
            .get_mut(nonce)
            .filter(|c| c.wallet_address == wallet_address)
            .ok_or(AuthError::ChallengeNotFound)?;

        if challenge.is_used() {
            return Err(AuthError::ChallengeAlreadyUsed);
        }
        if challenge.is_expired(now) {
            return Err(AuthError::ChallengeExpired);
        }

        challenge.used_at = Some(now);
        Ok(challenge.clone())
    }

    fn insert_token(&self, token: AuthToken) -> Result<(), AuthError> {
        let mut state = self.state();
        if state.tokens.contains_key(&token.token) {
            return Err(AuthError::Store("duplicate token id".into()));
        }
        state.tokens.insert(token.token.clone(), token);
        Ok(())
    }

    fn find_token(&self, token: &str) -> Result<Option<AuthToken>, AuthError> {
        Ok(self.state().tokens.get(token).cloned())
    }

    fn revoke_token(&self, token: &str, now: u64) -> Result<Option<AuthToken>, AuthError> {
        let mut state = self.state();
        Ok(state.tokens.get_mut(token).map(|t| {
            t.revoked_at.get_or_insert(now);
            t.clone()
        }))
    }

    fn purge_expired(&self, now: u64) -> Result<usize, AuthError> {
        let mut state = self.state();

        let dead: Vec<String> = state
            .challenges
            .values()
            .filter(|c| c.is_expired(now))
            .map(|c| c.nonce.clone())
            .collect();
        for nonce in &dead {
            state.remove_challenge(nonce);
        }

        let before = state.tokens.len();
        state.tokens.retain(|_, t| now < t.expires_at);

        Ok(dead.len() + before - state.tokens.len())
    }
}
