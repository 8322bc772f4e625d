pub mod error;
pub mod types;

use std::sync::Arc;

use error::BridgeError;
use log::debug;
use sol_wire::{DerivationCache, Pubkey, TransferBuilder, TransferConfig, DEFAULT_CACHE_CAPACITY};
use types::DerivedAccount;
use zeroize::{Zeroize, Zeroizing};

uniffi::setup_scaffolding!();

// ─── UniFFI-exported object ──────────────────────────────────────────
// UniFFI passes owned String/Vec<u8> across FFI, so exported methods take
// owned values.

/// Builds reward token transfers for one mint, reusing derived token
/// accounts across calls.
#[derive(uniffi::Object)]
pub struct RewardWallet {
    cache: Arc<DerivationCache>,
    config: TransferConfig,
}

#[uniffi::export]
impl RewardWallet {
    /// Wallet for `mint_address` under the standard SPL Token program.
    #[uniffi::constructor]
    pub fn new(mint_address: String) -> Result<Arc<Self>, BridgeError> {
        let mint = Pubkey::from_base58(&mint_address)?;
        Ok(Arc::new(Self::with_cache(
            Arc::new(DerivationCache::new(DEFAULT_CACHE_CAPACITY)),
            TransferConfig::new(mint),
        )))
    }

    /// Wallet for a mint owned by another token program (e.g. Token-2022).
    #[uniffi::constructor]
    pub fn with_token_program(
        mint_address: String,
        token_program_id: String,
        cache_capacity: u32,
    ) -> Result<Arc<Self>, BridgeError> {
        let config = TransferConfig::from_base58(&mint_address, &token_program_id)?;
        Ok(Arc::new(Self::with_cache(
            Arc::new(DerivationCache::new(cache_capacity as usize)),
            config,
        )))
    }

    /// Build an unsigned transfer of each of `amounts` from the fee
    /// payer's token account to the counterparty's. Keys and blockhash
    /// are Base58.
    pub fn build_transfer(
        &self,
        fee_payer: String,
        counterparty: String,
        amounts: Vec<u64>,
        recent_blockhash: String,
    ) -> Result<Vec<u8>, BridgeError> {
        let builder = TransferBuilder::new(&self.cache, self.config);
        Ok(builder.build_from_base58(&fee_payer, &counterparty, &amounts, &recent_blockhash)?)
    }

    /// Associated token account of `wallet_address` for this wallet's mint.
    pub fn derive_token_account(&self, wallet_address: String) -> Result<String, BridgeError> {
        let wallet = Pubkey::from_base58(&wallet_address)?;
        let derived = sol_wire::derive_token_account(
            &self.cache,
            &wallet,
            &self.config.mint,
            &self.config.token_program,
        )?;
        Ok(derived.address.to_base58())
    }

    /// Canonical program-derived address for raw `seeds` under
    /// `program_id`.
    pub fn derive_program_address(
        &self,
        seeds: Vec<Vec<u8>>,
        program_id: String,
    ) -> Result<DerivedAccount, BridgeError> {
        let program_id = Pubkey::from_base58(&program_id)?;
        let seeds: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
        Ok(self.cache.get(&seeds, &program_id)?.into())
    }

    pub fn mint_address(&self) -> String {
        self.config.mint.to_base58()
    }

    pub fn cached_derivations(&self) -> u64 {
        self.cache.len() as u64
    }

    pub fn clear_cache(&self) {
        debug!("clearing {} cached derivations", self.cache.len());
        self.cache.clear();
    }
}

impl RewardWallet {
    /// Share one derivation cache between several wallets.
    pub fn with_cache(cache: Arc<DerivationCache>, config: TransferConfig) -> Self {
        Self { cache, config }
    }
}

// ─── UniFFI-exported functions ───────────────────────────────────────

/// Sign an unsigned transfer produced by [`RewardWallet::build_transfer`]
/// with the wallet's 32-byte Ed25519 seed. Returns the wire bytes with
/// the fee payer's signature slot filled.
#[uniffi::export]
pub fn sign_transaction(private_key: Vec<u8>, raw_tx: Vec<u8>) -> Result<Vec<u8>, BridgeError> {
    let key = take_private_key(private_key)?;
    Ok(sol_wire::sign_unsigned_transaction(&key, &raw_tx)?)
}

/// Detached Ed25519 signature (64 bytes) over `message`, e.g. a sign-in
/// challenge.
#[uniffi::export]
pub fn sign_message(private_key: Vec<u8>, message: Vec<u8>) -> Result<Vec<u8>, BridgeError> {
    let key = take_private_key(private_key)?;
    Ok(sol_wire::sign_message(&key, &message).to_vec())
}

/// Validate a Solana address string.
#[uniffi::export]
pub fn validate_address(address: String) -> Result<bool, BridgeError> {
    Ok(sol_wire::validate_address(&address)?)
}

/// Copy the seed out of the FFI buffer and wipe the buffer.
fn take_private_key(mut bytes: Vec<u8>) -> Result<Zeroizing<[u8; 32]>, BridgeError> {
    let key = <[u8; 32]>::try_from(bytes.as_slice()).map(Zeroizing::new);
    let len = bytes.len();
    bytes.zeroize();
    key.map_err(|_| BridgeError::InvalidPrivateKey(format!("expected 32 bytes, got {len}")))
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signature, SigningKey, Verifier};
    use sol_wire::{UnsignedTransaction, TOKEN_PROGRAM_ID};

    use super::*;

    const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const SEED: [u8; 32] = [0x11; 32];

    fn wallet() -> Arc<RewardWallet> {
        RewardWallet::new(USDC_MINT.into()).unwrap()
    }

    fn address_of(seed: &[u8; 32]) -> String {
        Pubkey::new(SigningKey::from_bytes(seed).verifying_key().to_bytes()).to_base58()
    }

    // ─── RewardWallet ───────────────────────────────────────────────

    #[test]
    fn new_rejects_invalid_mint() {
        assert!(matches!(
            RewardWallet::new("not a mint".into()),
            Err(BridgeError::InvalidAddress(_))
        ));
        assert!(matches!(
            RewardWallet::new("5Q".into()),
            Err(BridgeError::InvalidAddress(_))
        ));
    }

    #[test]
    fn with_token_program_uses_given_program() {
        let wallet = RewardWallet::with_token_program(
            USDC_MINT.into(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb".into(),
            8,
        )
        .unwrap();
        let tx = wallet
            .build_transfer(
                address_of(&SEED),
                address_of(&[0x22; 32]),
                vec![1],
                Pubkey::new([0xAB; 32]).to_base58(),
            )
            .unwrap();
        let parsed = UnsignedTransaction::parse(&tx).unwrap();
        assert_ne!(parsed.message.account_keys[3], TOKEN_PROGRAM_ID);
        assert_eq!(
            parsed.message.account_keys[3].to_base58(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"
        );
    }

    #[test]
    fn build_transfer_has_one_empty_signature_slot() {
        let wallet = wallet();
        let tx = wallet
            .build_transfer(
                address_of(&SEED),
                address_of(&[0x22; 32]),
                vec![1_000_000, 2_000_000],
                Pubkey::new([0xAB; 32]).to_base58(),
            )
            .unwrap();

        assert_eq!(tx[0], 0x01);
        assert!(tx[1..65].iter().all(|b| *b == 0));
        let parsed = UnsignedTransaction::parse(&tx).unwrap();
        assert_eq!(parsed.message.instructions.len(), 2);
    }

    #[test]
    fn build_transfer_zero_amount_fails() {
        let result = wallet().build_transfer(
            address_of(&SEED),
            address_of(&[0x22; 32]),
            vec![5, 0],
            Pubkey::new([0xAB; 32]).to_base58(),
        );
        assert!(matches!(result, Err(BridgeError::MalformedInput(_))));
    }

    #[test]
    fn build_transfer_empty_amounts_fails() {
        let result = wallet().build_transfer(
            address_of(&SEED),
            address_of(&[0x22; 32]),
            vec![],
            Pubkey::new([0xAB; 32]).to_base58(),
        );
        assert!(matches!(result, Err(BridgeError::MalformedInput(_))));
    }

    #[test]
    fn build_transfer_short_blockhash_fails() {
        let result = wallet().build_transfer(
            address_of(&SEED),
            address_of(&[0x22; 32]),
            vec![1],
            "5Q".into(),
        );
        assert!(matches!(result, Err(BridgeError::MalformedInput(_))));
    }

    #[test]
    fn derive_token_account_is_cached_and_deterministic() {
        let wallet = wallet();
        let owner = address_of(&SEED);

        let a = wallet.derive_token_account(owner.clone()).unwrap();
        let b = wallet.derive_token_account(owner).unwrap();
        assert_eq!(a, b);
        assert_eq!(wallet.cached_derivations(), 1);
        assert!(validate_address(a).unwrap());

        wallet.clear_cache();
        assert_eq!(wallet.cached_derivations(), 0);
    }

    #[test]
    fn derive_token_account_different_wallets_differ() {
        let wallet = wallet();
        assert_ne!(
            wallet.derive_token_account(address_of(&[1; 32])).unwrap(),
            wallet.derive_token_account(address_of(&[2; 32])).unwrap()
        );
    }

    #[test]
    fn derive_program_address_matches_sol_wire() {
        let program = Pubkey::new([0x42; 32]);
        let account = wallet()
            .derive_program_address(vec![b"vault".to_vec(), vec![7u8; 32]], program.to_base58())
            .unwrap();
        let expected = sol_wire::find_program_address(&[b"vault".as_slice(), &[7u8; 32]], &program).unwrap();
        assert_eq!(account, DerivedAccount::from(expected));
    }

    #[test]
    fn derive_program_address_seed_too_long() {
        let result = wallet()
            .derive_program_address(vec![vec![0u8; 33]], Pubkey::new([0x42; 32]).to_base58());
        assert!(matches!(result, Err(BridgeError::MalformedInput(_))));
    }

    #[test]
    fn shared_cache_between_wallets() {
        let cache = Arc::new(DerivationCache::default());
        let mint = Pubkey::from_base58(USDC_MINT).unwrap();
        let a = RewardWallet::with_cache(Arc::clone(&cache), TransferConfig::new(mint));
        let b = RewardWallet::with_cache(Arc::clone(&cache), TransferConfig::new(mint));

        a.derive_token_account(address_of(&SEED)).unwrap();
        b.derive_token_account(address_of(&SEED)).unwrap();
        assert_eq!(cache.len(), 1);
    }

    // ─── sign_message ───────────────────────────────────────────────

    #[test]
    fn sign_message_verifies() {
        let sig = sign_message(SEED.to_vec(), b"Nonce: abc".to_vec()).unwrap();
        assert_eq!(sig.len(), 64);

        let verifying_key = SigningKey::from_bytes(&SEED).verifying_key();
        let sig = Signature::from_slice(&sig).unwrap();
        assert!(verifying_key.verify(b"Nonce: abc", &sig).is_ok());
    }

    #[test]
    fn sign_message_wrong_key_length() {
        assert!(matches!(
            sign_message(vec![1; 31], b"x".to_vec()),
            Err(BridgeError::InvalidPrivateKey(_))
        ));
    }

    // ─── sign_transaction ───────────────────────────────────────────

    #[test]
    fn sign_transaction_fills_slot() {
        let tx = wallet()
            .build_transfer(
                address_of(&SEED),
                address_of(&[0x22; 32]),
                vec![10],
                Pubkey::new([0xAB; 32]).to_base58(),
            )
            .unwrap();
        let signed = sign_transaction(SEED.to_vec(), tx.clone()).unwrap();

        assert_eq!(signed.len(), tx.len());
        assert_eq!(signed[65..], tx[65..]);
        assert!(signed[1..65].iter().any(|b| *b != 0));
    }

    #[test]
    fn sign_transaction_by_non_signer_fails() {
        let tx = wallet()
            .build_transfer(
                address_of(&SEED),
                address_of(&[0x22; 32]),
                vec![10],
                Pubkey::new([0xAB; 32]).to_base58(),
            )
            .unwrap();
        assert!(matches!(
            sign_transaction(vec![0x22; 32], tx),
            Err(BridgeError::SigningFailed(_))
        ));
    }

    #[test]
    fn sign_transaction_garbage_fails() {
        assert!(sign_transaction(SEED.to_vec(), vec![]).is_err());
        assert!(sign_transaction(SEED.to_vec(), vec![0x01, 0x00]).is_err());
    }

    // ─── validate_address ───────────────────────────────────────────

    #[test]
    fn validate_address_cases() {
        assert!(validate_address(USDC_MINT.into()).unwrap());
        assert!(validate_address("0OIl".into()).is_err());
        assert!(validate_address("5Q".into()).is_err());
    }
}
