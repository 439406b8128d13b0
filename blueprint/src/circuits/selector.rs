//! This module implements the seeds identifying selectors, and the registry
//! de-duplicating them.
//!
//! A seed is the SHA-256 digest of a domain separation prefix, a component
//! label and the parameters defining the shape of its gates. Two component
//! instances producing the same gates must produce the same seed, so that
//! they share one selector.

use crate::error::CircuitError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{collections::HashMap, fmt};

/// Domain separation string of selector seeds.
pub const SEED_PREFIX: &[u8; 15] = b"plonk-selector0";

/// The identifier of a gate shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectorSeed([u8; 32]);

impl SelectorSeed {
    /// Computes the seed of a component label and its shape parameters
    /// (column mapping, number of bits, ...).
    pub fn new(label: &str, shape: &[u64]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SEED_PREFIX);
        hasher.update((label.len() as u64).to_le_bytes());
        hasher.update(label.as_bytes());
        for param in shape {
            hasher.update(param.to_le_bytes());
        }
        SelectorSeed(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SelectorSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SelectorSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectorSeed({})", hex::encode(&self.0[..8]))
    }
}

/// A block of consecutive selectors allocated for a seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectorBlock {
    pub first: usize,
    pub count: usize,
}

/// Keeps track of the selectors allocated so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorRegistry {
    blocks: HashMap<SelectorSeed, SelectorBlock>,
    allocated: usize,
}

impl SelectorRegistry {
    /// Number of selectors allocated so far.
    pub fn len(&self) -> usize {
        self.allocated
    }

    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    pub fn find(&self, seed: &SelectorSeed) -> Option<usize> {
        self.blocks.get(seed).map(|block| block.first)
    }

    pub fn block(&self, seed: &SelectorSeed) -> Option<SelectorBlock> {
        self.blocks.get(seed).copied()
    }

    /// Reserves `count` consecutive selectors for `seed` and returns the
    /// first one.
    pub fn allocate(&mut self, seed: SelectorSeed, count: usize) -> Result<usize, CircuitError> {
        if count == 0 {
            return Err(CircuitError::EmptySelectorBlock);
        }
        if self.blocks.contains_key(&seed) {
            return Err(CircuitError::DuplicateSelectorSeed(seed));
        }
        let first = self.allocated;
        self.blocks.insert(seed, SelectorBlock { first, count });
        self.allocated += count;
        Ok(first)
    }

    /// Forgets the blocks allocated after the first `len` selectors.
    pub fn truncate(&mut self, len: usize) {
        if len < self.allocated {
            self.blocks.retain(|_, block| block.first < len);
            self.allocated = len;
        }
    }
}
