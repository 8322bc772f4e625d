use std::sync::Arc;

use log::{debug, info};
use sol_wire::Pubkey;

use crate::clock::Clock;
use crate::error::AuthError;
use crate::model::{redact, AuthToken};
use crate::store::AuthStore;
use crate::ID_BYTES;

/// Mints, validates and revokes opaque bearer tokens.
pub struct TokenIssuer<S, C> {
    store: Arc<S>,
    clock: C,
    ttl_secs: u64,
}

impl<S: AuthStore, C: Clock> TokenIssuer<S, C> {
    pub fn new(store: Arc<S>, clock: C, ttl_secs: u64) -> Self {
        Self {
            store,
            clock,
            ttl_secs,
        }
    }

    /// Mint a token for a wallet that has already proven control. The
    /// address is stored in canonical form.
    pub fn issue(&self, wallet_address: &str) -> Result<AuthToken, AuthError> {
        let wallet = Pubkey::from_base58(wallet_address.trim())?.to_base58();
        let now = self.clock.now();
        let token = AuthToken {
            token: crypto_utils::random_id(ID_BYTES),
            wallet_address: wallet,
            issued_at: now,
            expires_at: now.saturating_add(self.ttl_secs),
            revoked_at: None,
        };
        self.store.insert_token(token.clone())?;
        info!(
            "issued token {} for {}",
            redact(&token.token),
            token.wallet_address
        );
        Ok(token)
    }

    /// Returns the wallet address the token belongs to, or
    /// [`AuthError::InvalidToken`] if it is unknown, revoked or expired.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        match self.store.find_token(token)? {
            Some(t) if t.is_valid(self.clock.now()) => Ok(t.wallet_address),
            _ => {
                debug!("rejected token {}", redact(token));
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Revoke a token. Returns whether the token exists; revoking twice is
    /// not an error and keeps the first revocation time.
    pub fn revoke(&self, token: &str) -> Result<bool, AuthError> {
        let revoked = self.store.revoke_token(token, self.clock.now())?;
        if revoked.is_some() {
            info!("revoked token {}", redact(token));
        }
        Ok(revoked.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn issuer() -> (TokenIssuer<MemoryStore, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let issuer = TokenIssuer::new(Arc::new(MemoryStore::new()), Arc::clone(&clock), 100);
        (issuer, clock)
    }

    #[test]
    fn issued_token_validates_to_wallet() {
        let (issuer, _) = issuer();
        let token = issuer.issue(WALLET).unwrap();

        assert_eq!(token.token.len(), 2 * ID_BYTES);
        assert_eq!(token.expires_at, 100);
        assert_eq!(issuer.validate(&token.token).unwrap(), WALLET);
    }

    #[test]
    fn issue_stores_canonical_address() {
        let (issuer, _) = issuer();
        let token = issuer.issue(&format!("  {WALLET}\n")).unwrap();
        assert_eq!(token.wallet_address, WALLET);
        assert_eq!(issuer.validate(&token.token).unwrap(), WALLET);
    }

    #[test]
    fn issue_rejects_bad_address() {
        let (issuer, _) = issuer();
        assert!(matches!(
            issuer.issue("wallet"),
            Err(AuthError::InvalidAddress(_))
        ));
        assert!(matches!(issuer.issue("5Q"), Err(AuthError::InvalidAddress(_))));
    }

    #[test]
    fn tokens_are_unique() {
        let (issuer, _) = issuer();
        assert_ne!(
            issuer.issue(WALLET).unwrap().token,
            issuer.issue(WALLET).unwrap().token
        );
    }

    #[test]
    fn expired_token_is_invalid() {
        let (issuer, clock) = issuer();
        let token = issuer.issue(WALLET).unwrap();

        clock.set(99);
        assert!(issuer.validate(&token.token).is_ok());
        clock.set(100);
        assert_eq!(
            issuer.validate(&token.token).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn revoked_token_is_invalid() {
        let (issuer, _) = issuer();
        let token = issuer.issue(WALLET).unwrap();

        assert!(issuer.revoke(&token.token).unwrap());
        assert!(issuer.revoke(&token.token).unwrap());
        assert_eq!(
            issuer.validate(&token.token).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn unknown_token() {
        let (issuer, _) = issuer();
        assert_eq!(issuer.validate("nope").unwrap_err(), AuthError::InvalidToken);
        assert!(!issuer.revoke("nope").unwrap());
    }
}
