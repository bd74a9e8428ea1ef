//! Deterministic random-number plumbing for world generation.

use sha2::{Digest, Sha256};

/// Derives the seed that drives all randomness of a single stage.
///
/// Mixing the session seed with the stage counter through SHA-256 keeps the
/// per-stage streams statistically independent while remaining reproducible
/// from the session seed alone.
pub(crate) fn stage_seed(session_seed: u64, stage: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(stage.to_le_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
pub(crate) struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub(crate) fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform index below the provided bound; the bound must be non-zero.
    pub(crate) fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "next_index requires a non-zero bound");
        (self.next_u64() % bound as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{stage_seed, SplitMix64};

    #[test]
    fn stage_seeds_differ_per_stage() {
        let first = stage_seed(0xdead_beef, 1);
        let second = stage_seed(0xdead_beef, 2);
        assert_ne!(first, second);
        assert_eq!(first, stage_seed(0xdead_beef, 1));
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut a = SplitMix64::new(0);
        let mut b = SplitMix64::new(0x9e37_79b9_7f4a_7c15);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_index_stays_below_bound() {
        let mut rng = SplitMix64::new(42);
        for _ in 0..256 {
            assert!(rng.next_index(7) < 7);
        }
    }
}
