//! The insertion-deletion engine: a battery of [`L0Sampler`]s, run in
//! one of two configurations per spec.md §4.6.
//!
//! `VertexSample` draws a handful of candidate vertices up front and
//! gives each its own samplers over the `[0, n)` neighbor-id universe.
//! `EdgeId` instead runs samplers over the `n(n-1)/2`-sized edge-id
//! universe and decodes whichever edges survive. Both are grounded on
//! `original_source/`'s two IDEngine variants (no direct teacher
//! counterpart exists for either: `g-raph`'s streaming module only
//! implements L0 sampling itself, not an engine built on top of it), and
//! share this crate's `L0Sampler` rather than duplicating the
//! level-threshold machinery.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::graph::edge::{decode_edge_id, encode_edge_id, EdgeUpdate};
use crate::streaming::sampling::l0_sampler::{L0Outcome, L0Sampler};
use crate::telemetry::TelemetryScope;
use crate::vertex::VertexId;
use crate::{DetectionResult, HashFamily};

/// Which of the two spec.md §4.6 variants an [`IdEngine`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdVariant {
    VertexSample,
    EdgeId,
}

/// Target per-sampler success probability used to size the
/// vertex-sample variant's sampler count (spec.md §4.6, `rho ~ 0.85`).
const RHO: f64 = 0.85;

struct VertexSampleEngine {
    n: u64,
    target: u64,
    samplers: HashMap<VertexId, Vec<L0Sampler>>,
}

struct EdgeIdEngine {
    n: u64,
    target: u64,
    samplers: Vec<L0Sampler>,
}

enum Inner {
    VertexSample(VertexSampleEngine),
    EdgeId(EdgeIdEngine),
}

/// Insertion-deletion neighborhood detector. Construct with
/// [`IdEngine::new_vertex_sample`] or [`IdEngine::new_edge_id`]; both
/// expose the same `process_edge`/`finish` contract.
pub struct IdEngine {
    inner: Inner,
    telemetry: TelemetryScope,
}

impl IdEngine {
    pub fn variant(&self) -> IdVariant {
        match self.inner {
            Inner::VertexSample(_) => IdVariant::VertexSample,
            Inner::EdgeId(_) => IdVariant::EdgeId,
        }
    }

    /// Vertex-sample variant: draw `V` candidates from `vertices`
    /// without replacement, and allocate `S` L0 samplers to each over
    /// the `[0, n)` neighbor-id universe.
    pub fn new_vertex_sample(
        n: u64,
        d: u64,
        c: u64,
        delta: f64,
        vertices: &[VertexId],
        seed: u64,
    ) -> Self {
        let v_count = ((n as f64).ln().max(1.0))
            .max((n as f64).ln() * d as f64 / (c as f64).powi(4))
            .ceil() as usize;
        let v_count = v_count.clamp(1, vertices.len().max(1));
        let s_per_vertex = sampler_count_per_vertex(d, c, delta);

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut pool = vertices.to_vec();
        pool.shuffle(&mut rng);
        let sampled: Vec<VertexId> = pool.into_iter().take(v_count).collect();

        let mut family = HashFamily::from_seed(seed);
        let mut next_seed = seed;
        let mut samplers: HashMap<VertexId, Vec<L0Sampler>> = HashMap::new();
        for &vertex in &sampled {
            let batch = (0..s_per_vertex)
                .map(|_| {
                    next_seed = next_seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                    L0Sampler::new(&mut family, n, delta, next_seed)
                })
                .collect();
            samplers.insert(vertex, batch);
        }

        let target = ((d as f64) / (c as f64)).ceil() as u64;
        let mut telemetry = TelemetryScope::new();
        let (cell_bytes, hash_bytes) = sum_sampler_bytes(samplers.values().flatten());
        telemetry.adjust_bytes(cell_bytes as i64);
        telemetry.add_hash_table_bytes(hash_bytes);

        Self {
            inner: Inner::VertexSample(VertexSampleEngine { n, target, samplers }),
            telemetry,
        }
    }

    /// Edge-id variant: allocate `T` L0 samplers over the edge-id
    /// universe `[0, n(n-1)/2)`.
    pub fn new_edge_id(n: u64, d: u64, c: u64, delta: f64, seed: u64) -> Self {
        let universe = (n * (n - 1) / 2).max(1);
        let t_count = sampler_count_edge_id(n, d, c);

        let mut family = HashFamily::from_seed(seed);
        let mut next_seed = seed;
        let samplers = (0..t_count)
            .map(|_| {
                next_seed = next_seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                L0Sampler::new(&mut family, universe, delta, next_seed)
            })
            .collect();

        let target = ((d as f64) / (c as f64)).ceil() as u64;
        let mut telemetry = TelemetryScope::new();
        let (cell_bytes, hash_bytes) = sum_sampler_bytes(samplers.iter());
        telemetry.adjust_bytes(cell_bytes as i64);
        telemetry.add_hash_table_bytes(hash_bytes);

        Self {
            inner: Inner::EdgeId(EdgeIdEngine { n, target, samplers }),
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &TelemetryScope {
        &self.telemetry
    }

    /// Feed one signed edge update (`sign` is `+1` for insertion, `-1`
    /// for deletion) into every sampler it is relevant to.
    pub fn process_edge(&mut self, edge: EdgeUpdate) {
        self.telemetry.record_edge_scanned();
        match &mut self.inner {
            Inner::VertexSample(engine) => {
                if let Some(batch) = engine.samplers.get_mut(&edge.u) {
                    for sampler in batch {
                        sampler.feed(edge.v, i64::from(edge.sign));
                    }
                }
                if let Some(batch) = engine.samplers.get_mut(&edge.v) {
                    for sampler in batch {
                        sampler.feed(edge.u, i64::from(edge.sign));
                    }
                }
            }
            Inner::EdgeId(engine) => {
                let (u, v) = edge.ordered();
                let id = encode_edge_id(engine.n, u, v);
                for sampler in &mut engine.samplers {
                    sampler.feed(id, i64::from(edge.sign));
                }
            }
        }
    }

    /// Query every sampler once and assemble a certified neighborhood,
    /// per spec.md §4.6's finalize procedures.
    pub fn finish(self) -> DetectionResult {
        match self.inner {
            Inner::VertexSample(engine) => Self::finish_vertex_sample(engine),
            Inner::EdgeId(engine) => Self::finish_edge_id(engine),
        }
    }

    fn finish_vertex_sample(mut engine: VertexSampleEngine) -> DetectionResult {
        for (root, batch) in engine.samplers.iter_mut() {
            let mut found: HashSet<VertexId> = HashSet::new();
            for sampler in batch.iter_mut() {
                if let L0Outcome::Sampled { index, .. } = sampler.query() {
                    found.insert(index);
                    if found.len() as u64 >= engine.target {
                        break;
                    }
                }
            }
            if found.len() as u64 >= engine.target {
                return DetectionResult::Success {
                    root: *root,
                    neighbors: found.into_iter().collect(),
                };
            }
        }
        DetectionResult::Failure
    }

    fn finish_edge_id(mut engine: EdgeIdEngine) -> DetectionResult {
        let mut adjacency: HashMap<VertexId, HashSet<VertexId>> = HashMap::new();
        for sampler in engine.samplers.iter_mut() {
            let L0Outcome::Sampled { index, .. } = sampler.query() else {
                continue;
            };
            if index >= engine.n * (engine.n - 1) / 2 {
                continue;
            }
            let (u, v) = decode_edge_id(engine.n, index);
            adjacency.entry(u).or_default().insert(v);
            adjacency.entry(v).or_default().insert(u);
            for (&vertex, neighbors) in adjacency.iter() {
                if neighbors.len() as u64 >= engine.target {
                    return DetectionResult::Success {
                        root: vertex,
                        neighbors: neighbors.iter().copied().collect(),
                    };
                }
            }
        }
        DetectionResult::Failure
    }
}

/// Total `(cell_bytes, hash_bytes)` across a batch of fixed-at-construction
/// samplers, for telemetry accounting at `IdEngine` construction time.
fn sum_sampler_bytes<'a>(samplers: impl Iterator<Item = &'a L0Sampler>) -> (u64, u64) {
    samplers.fold((0u64, 0u64), |(cells, hashes), sampler| {
        (cells + sampler.cell_bytes(), hashes + sampler.hash_bytes())
    })
}

/// `S = ceil((1/rho) * log(0.1) / log(1 - (c-1)/d))` (spec.md §4.6).
fn sampler_count_per_vertex(d: u64, c: u64, _delta: f64) -> usize {
    let ratio = ((c as f64 - 1.0) / d as f64).clamp(0.0, 0.999);
    let denom = (1.0 - ratio).ln();
    let raw = (1.0 / RHO) * (0.1_f64).ln() / denom;
    raw.ceil().max(1.0) as usize
}

/// `T = ceil((n*d/c) * (1/max(n/c, sqrt(n)) + 1/c) * 2 * log n)` (spec.md §4.6).
fn sampler_count_edge_id(n: u64, d: u64, c: u64) -> usize {
    let n_f = n as f64;
    let denom = (n_f / c as f64).max(n_f.sqrt()).max(1.0);
    let raw = (n_f * d as f64 / c as f64) * (1.0 / denom + 1.0 / c as f64) * 2.0 * n_f.ln().max(1.0);
    raw.ceil().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_edge_id(n: u64, d: u64, c: u64, edges: Vec<(u64, u64, i8)>, seed: u64) -> DetectionResult {
        let mut engine = IdEngine::new_edge_id(n, d, c, 0.2, seed);
        for (u, v, sign) in edges {
            let edge = if sign > 0 {
                EdgeUpdate::insertion(u, v)
            } else {
                EdgeUpdate::deletion(u, v)
            };
            engine.process_edge(edge);
        }
        engine.finish()
    }

    #[test]
    fn scenario_4_insertion_deletion_cancellation() {
        // n=6, stream I 0 1, I 0 2, I 0 3, D 0 2, I 0 4, I 0 5; d=4, c=2.
        // Net degree of 0 is 4 (neighbors {1,3,4,5}); a correct IDEngine
        // run should certify at least ceil(d/c)=2 of them, more often
        // than not across independent seeds.
        let edges = vec![
            (0, 1, 1),
            (0, 2, 1),
            (0, 3, 1),
            (0, 2, -1),
            (0, 4, 1),
            (0, 5, 1),
        ];
        let mut successes = 0;
        for seed in 0..30u64 {
            if let DetectionResult::Success { root, neighbors } =
                run_edge_id(6, 4, 2, edges.clone(), seed)
            {
                assert_eq!(root, 0);
                assert!(neighbors.len() >= 2);
                for neighbor in &neighbors {
                    assert!([1u64, 3, 4, 5].contains(neighbor));
                }
                successes += 1;
            }
        }
        assert!(successes > 0, "expected at least one successful run across seeds");
    }

    #[test]
    fn vertex_sample_variant_samples_star_neighbors() {
        let n = 50u64;
        // Restrict the candidate pool to the star's center so the test
        // doesn't depend on it surviving a random draw.
        let vertices: Vec<VertexId> = vec![0];
        let mut successes = 0;
        for seed in 0..20u64 {
            let mut engine = IdEngine::new_vertex_sample(n, 20, 2, 0.2, &vertices, seed);
            assert_eq!(engine.variant(), IdVariant::VertexSample);
            for v in 1..n {
                engine.process_edge(EdgeUpdate::insertion(0, v));
            }
            if let DetectionResult::Success { root, neighbors } = engine.finish() {
                assert_eq!(root, 0);
                assert!(neighbors.len() >= 10);
                successes += 1;
            }
        }
        assert!(successes > 0, "expected at least one successful run across seeds");
    }

    #[test]
    fn sampler_count_helpers_are_positive() {
        assert!(sampler_count_per_vertex(10, 2, 0.2) >= 1);
        assert!(sampler_count_edge_id(20, 10, 2) >= 1);
    }
}
