//! Wallet sign-in for the reward API.
//!
//! Instead of a password, a client proves control of a Solana wallet:
//!
//! 1. [`ChallengeService::issue`] hands out a single-use nonce and the
//!    exact text to sign, valid for a few minutes.
//! 2. The wallet signs that text; [`verifier::verify_signature`] checks the
//!    detached Ed25519 signature against the wallet address itself.
//! 3. [`ChallengeService::consume`] burns the nonce atomically, and
//!    [`TokenIssuer::issue`] mints a bearer token for later calls.
//!
//! [`AuthService`] strings the steps together. Persistence sits behind
//! [`AuthStore`]; [`MemoryStore`] is the in-process implementation.

pub mod challenge;
pub mod clock;
pub mod config;
pub mod error;
pub mod message;
pub mod model;
pub mod service;
pub mod store;
pub mod token;
pub mod verifier;

pub use challenge::ChallengeService;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AuthConfig;
pub use error::AuthError;
pub use model::{AuthChallenge, AuthToken};
pub use service::AuthService;
pub use store::{AuthStore, MemoryStore};
pub use token::TokenIssuer;
pub use verifier::verify_signature;

/// Random bytes behind each nonce and bearer token (hex-encoded to 64 chars).
pub const ID_BYTES: usize = 32;
