//! Sign-in as a client sees it: request a challenge, sign it with the
//! wallet, exchange it for a token, use the token, log out.

use std::sync::Arc;
use std::thread;

use ed25519_dalek::SigningKey;
use sol_wire::Pubkey;
use wallet_auth::*;

struct Wallet {
    seed: [u8; 32],
    address: String,
}

impl Wallet {
    fn new(seed: u8) -> Self {
        let seed = [seed; 32];
        let address = Pubkey::new(SigningKey::from_bytes(&seed).verifying_key().to_bytes()).to_base58();
        Self { seed, address }
    }

    fn sign(&self, challenge: &AuthChallenge) -> [u8; 64] {
        sol_wire::sign_message(&self.seed, challenge.message.as_bytes())
    }
}

fn service() -> (AuthService<MemoryStore, Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let service = AuthService::new(
        Arc::new(MemoryStore::new()),
        Arc::clone(&clock),
        AuthConfig::default(),
    )
    .unwrap();
    (service, clock)
}

#[test_log::test]
fn sign_in_and_out() {
    let (service, _) = service();
    let wallet = Wallet::new(1);

    let challenge = service.request_challenge(&wallet.address).unwrap();
    assert!(challenge.message.starts_with("Sign in to Reward Tracker\n\n"));
    assert!(challenge.message.ends_with(&format!("Nonce: {}", challenge.nonce)));

    let token = service
        .login(&wallet.address, &challenge.nonce, &wallet.sign(&challenge))
        .unwrap();
    assert_eq!(token.wallet_address, wallet.address);
    assert_eq!(token.expires_at - token.issued_at, 604_800);
    assert_eq!(service.authenticate(&token.token).unwrap(), wallet.address);

    assert!(service.logout(&token.token).unwrap());
    assert_eq!(
        service.authenticate(&token.token).unwrap_err(),
        AuthError::InvalidToken
    );
}

#[test_log::test]
fn replayed_signature_is_refused() {
    let (service, _) = service();
    let wallet = Wallet::new(2);
    let challenge = service.request_challenge(&wallet.address).unwrap();
    let signature = wallet.sign(&challenge);

    service.login(&wallet.address, &challenge.nonce, &signature).unwrap();
    assert_eq!(
        service
            .login(&wallet.address, &challenge.nonce, &signature)
            .unwrap_err(),
        AuthError::ChallengeAlreadyUsed
    );
}

#[test_log::test]
fn bad_signature_does_not_burn_challenge() {
    let (service, _) = service();
    let wallet = Wallet::new(3);
    let impostor = Wallet::new(4);
    let challenge = service.request_challenge(&wallet.address).unwrap();

    assert_eq!(
        service
            .login(&wallet.address, &challenge.nonce, &impostor.sign(&challenge))
            .unwrap_err(),
        AuthError::InvalidSignature
    );
    assert_eq!(
        service
            .login(&wallet.address, &challenge.nonce, &[0u8; 12])
            .unwrap_err(),
        AuthError::InvalidSignature
    );
    assert!(service
        .login(&wallet.address, &challenge.nonce, &wallet.sign(&challenge))
        .is_ok());
}

#[test_log::test]
fn signature_over_other_text_is_refused() {
    let (service, _) = service();
    let wallet = Wallet::new(5);
    let challenge = service.request_challenge(&wallet.address).unwrap();
    let signature = sol_wire::sign_message(&wallet.seed, challenge.nonce.as_bytes());

    assert_eq!(
        service
            .login(&wallet.address, &challenge.nonce, &signature)
            .unwrap_err(),
        AuthError::InvalidSignature
    );
}

#[test_log::test]
fn challenge_for_one_wallet_cannot_log_in_another() {
    let (service, _) = service();
    let alice = Wallet::new(6);
    let mallory = Wallet::new(7);
    let challenge = service.request_challenge(&alice.address).unwrap();

    assert_eq!(
        service
            .login(&mallory.address, &challenge.nonce, &mallory.sign(&challenge))
            .unwrap_err(),
        AuthError::ChallengeNotFound
    );
}

#[test_log::test]
fn slow_signer_gets_expired() {
    let (service, clock) = service();
    let wallet = Wallet::new(8);
    let challenge = service.request_challenge(&wallet.address).unwrap();

    clock.advance(300);
    assert_eq!(
        service
            .login(&wallet.address, &challenge.nonce, &wallet.sign(&challenge))
            .unwrap_err(),
        AuthError::ChallengeExpired
    );
}

#[test_log::test]
fn token_expires_after_a_week() {
    let (service, clock) = service();
    let wallet = Wallet::new(9);
    let challenge = service.request_challenge(&wallet.address).unwrap();
    let token = service
        .login(&wallet.address, &challenge.nonce, &wallet.sign(&challenge))
        .unwrap();

    clock.advance(604_799);
    assert!(service.authenticate(&token.token).is_ok());
    clock.advance(1);
    assert_eq!(
        service.authenticate(&token.token).unwrap_err(),
        AuthError::InvalidToken
    );

    assert_eq!(service.purge_expired().unwrap(), 2);
}

#[test_log::test]
fn newer_challenge_supersedes_older() {
    let (service, _) = service();
    let wallet = Wallet::new(10);
    let old = service.request_challenge(&wallet.address).unwrap();
    let new = service.request_challenge(&wallet.address).unwrap();

    assert_eq!(
        service
            .login(&wallet.address, &old.nonce, &wallet.sign(&old))
            .unwrap_err(),
        AuthError::ChallengeNotFound
    );
    assert!(service
        .login(&wallet.address, &new.nonce, &wallet.sign(&new))
        .is_ok());
}

#[test_log::test]
fn concurrent_logins_issue_one_token() {
    let (service, _) = service();
    let service = Arc::new(service);
    let wallet = Wallet::new(11);
    let challenge = service.request_challenge(&wallet.address).unwrap();
    let signature = wallet.sign(&challenge);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let address = wallet.address.clone();
            let nonce = challenge.nonce.clone();
            thread::spawn(move || service.login(&address, &nonce, &signature))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == AuthError::ChallengeAlreadyUsed));
}
