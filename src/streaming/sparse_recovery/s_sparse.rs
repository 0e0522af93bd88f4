//! Generalized `s`-sparse recovery.
//!
//! Grounded on `graph/streaming/sparse_recovery/s_sparse.rs` in the
//! teacher crate: a grid of [`OneSparseAccumulator`] cells, one
//! independent hash per row mapping the universe into `cols` buckets,
//! queried by scanning every cell for a one-sparse hit. spec.md §4.2
//! fixes the grid shape as `cols = 2s`, `rows = ceil(log(s/gamma))`
//! (the teacher computes the same `t` but via `log2` rather than the
//! natural log spec.md calls for).

use std::collections::HashMap;

use super::one_sparse::{OneSparseAccumulator, OneSparseOutcome};
use crate::hash::{self, HashFamily, HashParams};

/// `2s x rows` grid of one-sparse accumulators recovering up to `s`
/// non-zero coordinates of a dynamic signed vector, with failure
/// probability at most `gamma`.
pub struct SSparseRecoverer {
    s: u64,
    cols: u64,
    row_hashes: Vec<HashParams>,
    cells: Vec<Vec<OneSparseAccumulator>>,
}

impl SSparseRecoverer {
    /// `universe` bounds the domain of indices fed in; `s` is the
    /// sparsity to detect; `gamma` the acceptable recovery failure rate.
    pub fn new(family: &mut HashFamily, s: u64, gamma: f64) -> Self {
        let cols = (2 * s).max(1);
        let rows = ((s.max(1) as f64 / gamma).log2().ceil() as u64).max(1);
        let row_hashes: Vec<HashParams> = (0..rows).map(|_| family.draw(cols)).collect();
        let cells = vec![vec![OneSparseAccumulator::new(); cols as usize]; rows as usize];
        Self {
            s,
            cols,
            row_hashes,
            cells,
        }
    }

    /// Feed a token `(index, delta)` into every row's bucketed cell.
    pub fn feed(&mut self, index: u64, delta: i64) {
        for (row, params) in self.row_hashes.iter().enumerate() {
            let col = hash::apply(params, index) as usize;
            self.cells[row][col].feed(index, delta);
        }
    }

    /// Attempt recovery. Returns `None` if the true support exceeds `s`
    /// (or a cell produced an inconsistent reading), else the recovered
    /// `index -> value` map (size <= `s`).
    pub fn recover(&self) -> Option<HashMap<u64, i64>> {
        let mut recovered: HashMap<u64, i64> = HashMap::new();
        let mut saw_any = false;
        for row in &self.cells {
            for cell in row {
                if let OneSparseOutcome::Recovered { index, value } = cell.query() {
                    if let Some(existing) = recovered.get(&index) {
                        if *existing != value {
                            return None;
                        }
                    } else {
                        recovered.insert(index, value);
                        if recovered.len() as u64 > self.s {
                            return None;
                        }
                    }
                    saw_any = true;
                }
            }
        }
        if saw_any { Some(recovered) } else { None }
    }

    pub fn sparsity_budget(&self) -> u64 {
        self.s
    }

    pub fn cols(&self) -> u64 {
        self.cols
    }

    /// Bytes held by the fixed `rows x cols` accumulator grid.
    pub fn cell_bytes(&self) -> u64 {
        let rows = self.cells.len() as u64;
        std::mem::size_of::<OneSparseAccumulator>() as u64 * rows * self.cols
    }

    /// Bytes held by the per-row hash parameters.
    pub fn hash_bytes(&self) -> u64 {
        (self.row_hashes.len() * std::mem::size_of::<HashParams>()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_small_support() {
        let mut family = HashFamily::from_seed(1);
        let mut recoverer = SSparseRecoverer::new(&mut family, 4, 0.1);
        for i in [10u64, 20, 30] {
            recoverer.feed(i, 1);
        }
        let recovered = recoverer.recover().expect("should recover");
        assert_eq!(recovered.len(), 3);
        for i in [10u64, 20, 30] {
            assert_eq!(recovered.get(&i), Some(&1));
        }
    }

    #[test]
    fn overly_dense_support_is_rejected() {
        let mut family = HashFamily::from_seed(2);
        let mut recoverer = SSparseRecoverer::new(&mut family, 2, 0.1);
        for i in 0..40u64 {
            recoverer.feed(i, 1);
        }
        assert!(recoverer.recover().is_none());
    }

    #[test]
    fn cancelled_coordinate_is_absent() {
        let mut family = HashFamily::from_seed(3);
        let mut recoverer = SSparseRecoverer::new(&mut family, 4, 0.1);
        recoverer.feed(5, 1);
        recoverer.feed(5, -1);
        recoverer.feed(6, 1);
        let recovered = recoverer.recover().expect("should recover");
        assert_eq!(recovered.len(), 1);
        assert_eq!(recovered.get(&6), Some(&1));
    }
}
