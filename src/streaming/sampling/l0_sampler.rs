//! `L0` sampling: drawing (approximately) a uniform non-zero coordinate
//! of a dynamic signed vector in one pass.
//!
//! Grounded on `graph/streaming/sampling/l0_sampling.rs` in the teacher
//! crate (which samples via a `FieldHasher`-gated cascade of
//! `OneSparseRecovery`s) and on
//! `original_source/.../l0Samplers/l0Sampler.cpp`, which this crate's
//! level-threshold and `j* = floor(log2(r)) - 1` query selection follow
//! directly (spec.md §4.3). The teacher's `l_zero_sampling` trait tries
//! every level from the bottom and returns the first hit; here the
//! specific level implied by the running sparsity estimate is queried,
//! and the tiebreak hash resolves ties when the recovered level-support
//! has more than one element.

use crate::hash::TiebreakHash;
use crate::streaming::sparse_recovery::s_sparse::SSparseRecoverer;
use crate::HashFamily;

/// Outcome of querying an [`L0Sampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L0Outcome {
    /// The vector fed so far is exactly zero.
    Zero,
    /// A single coordinate was recovered and selected via the tiebreak hash.
    Sampled { index: u64, value: i64 },
    /// Recovery failed: the level's true support exceeded its budget,
    /// or no level could be queried.
    Failure,
}

/// One L0 sampler over a universe of size `universe`. Maintains
/// `floor(log2(universe))` independent levels, one `s`-sparse
/// recoverer each, and forwards each incoming token to every level
/// whose threshold it survives (per spec.md §4.3's `h <= T_j` gate).
pub struct L0Sampler {
    universe: u64,
    levels: Vec<SSparseRecoverer>,
    level_hash: crate::hash::HashParams,
    thresholds: Vec<u64>,
    sparsity_estimate: i64,
    tiebreak: TiebreakHash,
}

impl L0Sampler {
    /// `delta` is the acceptable total-variation / failure rate for
    /// this sampler (spec.md §4.3 sets `(s, gamma) = (1/delta, delta)`
    /// for every level's recoverer).
    pub fn new(family: &mut HashFamily, universe: u64, delta: f64, seed: u64) -> Self {
        let universe = universe.max(2);
        let levels_count = (universe as f64).log2().floor().max(1.0) as u64;
        let s = (1.0 / delta).ceil().max(1.0) as u64;
        let level_hash = family.draw(universe);
        let thresholds: Vec<u64> = (1..=levels_count)
            .map(|j| universe / 2u64.pow(j as u32).max(1))
            .collect();
        let levels = (0..levels_count)
            .map(|_| SSparseRecoverer::new(family, s, delta))
            .collect();
        Self {
            universe,
            levels,
            level_hash,
            thresholds,
            sparsity_estimate: 0,
            tiebreak: TiebreakHash::new(u128::from(universe).saturating_pow(3), seed),
        }
    }

    /// Feed a token `(index, delta)`; `delta` must be `+1` or `-1`.
    pub fn feed(&mut self, index: u64, delta: i64) {
        debug_assert!(index < self.universe, "index out of universe range");
        let h = crate::hash::apply(&self.level_hash, index);
        self.sparsity_estimate += delta;
        for (level, threshold) in self.levels.iter_mut().zip(self.thresholds.iter()) {
            if h <= *threshold {
                level.feed(index, delta);
            }
        }
    }

    /// Bytes held by every level's fixed accumulator grid, for telemetry.
    pub fn cell_bytes(&self) -> u64 {
        self.levels.iter().map(SSparseRecoverer::cell_bytes).sum()
    }

    /// Bytes held by the level/row hash parameters and the tiebreak
    /// hash's assignment tables, for telemetry.
    pub fn hash_bytes(&self) -> u64 {
        let levels: u64 = self.levels.iter().map(SSparseRecoverer::hash_bytes).sum();
        levels
            + std::mem::size_of::<crate::hash::HashParams>() as u64
            + self.tiebreak.memory_bytes()
    }

    /// Query the sampler. Selects the level implied by the running
    /// sparsity estimate, recovers its support, and if more than one
    /// coordinate survives, picks the one with minimal tiebreak value.
    pub fn query(&mut self) -> L0Outcome {
        if self.sparsity_estimate == 0 {
            return L0Outcome::Zero;
        }
        let r = self.sparsity_estimate.unsigned_abs() as f64;
        let j_star = (r.log2().floor() - 1.0) as i64;
        let idx = j_star.clamp(0, self.levels.len() as i64 - 1) as usize;
        match self.levels[idx].recover() {
            None => L0Outcome::Failure,
            Some(candidates) if candidates.is_empty() => L0Outcome::Failure,
            Some(candidates) => {
                let (index, value) = candidates
                    .into_iter()
                    .min_by_key(|(index, _)| self.tiebreak.value(*index))
                    .expect("non-empty candidate set");
                L0Outcome::Sampled { index, value }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_once(edges: &[(u64, i64)], universe: u64, seed: u64) -> L0Outcome {
        let mut family = HashFamily::from_seed(seed);
        let mut sampler = L0Sampler::new(&mut family, universe, 0.1, seed);
        for (index, delta) in edges {
            sampler.feed(*index, *delta);
        }
        sampler.query()
    }

    #[test]
    fn zero_vector_reports_zero() {
        let outcome = sample_once(&[(5, 1), (5, -1)], 100, 1);
        assert_eq!(outcome, L0Outcome::Zero);
    }

    #[test]
    fn single_surviving_coordinate_is_sampled() {
        let mut hits = 0;
        for seed in 0..20u64 {
            let outcome = sample_once(&[(7, 1), (9, 1), (9, -1)], 100, seed);
            if let L0Outcome::Sampled { index, value } = outcome {
                assert_eq!(index, 7);
                assert_eq!(value, 1);
                hits += 1;
            }
        }
        assert!(hits > 0, "expected at least one successful sample across seeds");
    }

    #[test]
    fn samples_land_within_support() {
        let support = [3u64, 17, 40, 81];
        let edges: Vec<(u64, i64)> = support.iter().map(|i| (*i, 1)).collect();
        let mut successes = 0;
        for seed in 0..40u64 {
            if let L0Outcome::Sampled { index, .. } = sample_once(&edges, 200, seed) {
                assert!(support.contains(&index));
                successes += 1;
            }
        }
        assert!(successes > 0);
    }
}
