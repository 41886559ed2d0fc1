//! Deterministic seed derivation.
//!
//! A master seed is expanded into named sub-seeds via BLAKE3 so the
//! historical sample, the live price stream, and each sweep iteration draw
//! from independent deterministic streams. Derivation is hash-based, so the
//! same master seed yields the same sub-seed regardless of the order the
//! streams are created in.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Expands one master seed into labeled, order-independent sub-seeds.
#[derive(Debug, Clone)]
pub struct SeedTree {
    master_seed: u64,
}

impl SeedTree {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for a named stream and iteration.
    pub fn sub_seed(&self, label: &str, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&iteration.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Create a seeded `StdRng` for a named stream.
    pub fn rng_for(&self, label: &str, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(label, iteration))
    }
}
