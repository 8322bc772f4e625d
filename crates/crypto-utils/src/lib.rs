//! # crypto-utils
//!
//! Secure random generation for the reward wallet: raw bytes for keys and
//! salts, and hex identifiers for sign-in nonces and bearer tokens.

pub mod random;

pub use random::{random_bytes, random_bytes_fixed, random_id};
