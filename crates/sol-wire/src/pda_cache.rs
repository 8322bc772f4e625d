//! Bounded, thread-safe memo of PDA derivations.
//!
//! Deriving a PDA costs up to 256 SHA-256 + point-decompression attempts,
//! and the wallet derives the same handful of token accounts over and over.
//!
//! The key is the full `(program_id, seed count, len-prefixed seeds)` byte
//! string, which is injective over the inputs: two distinct seed lists can
//! never share an entry.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use log::debug;

use crate::address::Pubkey;
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::error::SolError;
use crate::pda::{self, DerivedAddress};

/// Memoizes [`pda::find_program_address`] results.
///
/// Once `capacity` entries are stored, further derivations still succeed
/// but are not cached. Concurrent misses on the same key may both derive
/// the same value.
#[derive(Debug)]
pub struct DerivationCache {
    entries: RwLock<HashMap<Vec<u8>, DerivedAddress>>,
    capacity: usize,
}

impl DerivationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Return the derived address for `seeds` under `program_id`,
    /// deriving it on a miss.
    pub fn get(&self, seeds: &[&[u8]], program_id: &Pubkey) -> Result<DerivedAddress, SolError> {
        pda::validate_seeds(seeds, 1)?;
        let key = cache_key(seeds, program_id);

        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*hit);
        }

        let derived = pda::find_program_address(seeds, program_id)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() < self.capacity || entries.contains_key(&key) {
            entries.insert(key, derived);
        } else {
            debug!("derivation cache full ({} entries), not caching", self.capacity);
        }

        Ok(derived)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every cached derivation.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for DerivationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// `program_id || seed_count || (len || seed)*`. Seeds are already
/// validated to at most 16 entries of at most 32 bytes, so single-byte
/// prefixes are enough.
fn cache_key(seeds: &[&[u8]], program_id: &Pubkey) -> Vec<u8> {
    let body: usize = seeds.iter().map(|s| s.len() + 1).sum();
    let mut key = Vec::with_capacity(Pubkey::LEN + 1 + body);
    key.extend_from_slice(program_id.as_bytes());
    key.push(seeds.len() as u8);
    for seed in seeds {
        key.push(seed.len() as u8);
        key.extend_from_slice(seed);
    }
    key
}
