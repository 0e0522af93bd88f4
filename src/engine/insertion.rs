//! The insertion-only engine: `c` parallel degree-banded reservoirs
//! racing to certify a high-degree neighborhood.
//!
//! Grounded on `original_source/degreeBasedResevoirSampling.cpp`
//! generalized from one fixed band to `c` parallel bands per spec.md
//! §4.5, with the teacher crate's `graph::streaming` module supplying
//! the surrounding shape (a small stateful struct fed one token/edge at
//! a time, queried once at the end).

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::graph::edge::EdgeUpdate;
use crate::streaming::sampling::reservoir::{DegreeBand, ReservoirSampler, ReservoirState};
use crate::telemetry::TelemetryScope;
use crate::vertex::VertexId;
use crate::DetectionResult;

/// Optional knobs from spec.md §4.5 ("spec-level knobs, not
/// required"). Both default to off.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionOptions {
    /// Restrict to samplers indexed in `[0, max(2, ceil(log n / 5)))`.
    pub prune_samplers: bool,
    /// Pool edge collection across samplers with a per-edge interest
    /// bitmap, instead of each sampler keeping its own copy.
    pub shared_edge_collection: bool,
}

/// `c` parallel [`ReservoirSampler`]s, one per degree band
/// `(max(1, j*d/c), d/c)` for `j = 0..c`, sharing one degree map.
pub struct InsertionEngine {
    d: u64,
    c: u64,
    degrees: HashMap<VertexId, u64>,
    reservoirs: Vec<ReservoirSampler>,
    rng: SmallRng,
    telemetry: TelemetryScope,
    options: InsertionOptions,
    shared_edges: Vec<(EdgeUpdate, u64)>,
    early_success: Option<DetectionResult>,
}

impl InsertionEngine {
    pub fn new(n: u64, d: u64, c: u64) -> Self {
        Self::with_options(n, d, c, InsertionOptions::default())
    }

    pub fn with_options(n: u64, d: u64, c: u64, options: InsertionOptions) -> Self {
        let capacity = ((n as f64).log10().max(1.0) * (n as f64).powf(1.0 / c as f64)).ceil()
            as usize;
        let active = if options.prune_samplers {
            (2usize).max(((n as f64).log2() / 5.0).ceil() as usize).min(c as usize)
        } else {
            c as usize
        };
        let reservoirs: Vec<ReservoirSampler> = (0..active)
            .map(|j| {
                let d1 = (j as u64 * d / c).max(1);
                let d2 = (d / c).max(1);
                ReservoirSampler::new(DegreeBand { d1, d2 }, capacity.max(1))
            })
            .collect();

        let mut telemetry = TelemetryScope::new();
        let reservoir_bytes: u64 = reservoirs.iter().map(ReservoirSampler::memory_bytes).sum();
        telemetry.adjust_bytes(reservoir_bytes as i64);

        Self {
            d,
            c,
            degrees: HashMap::new(),
            reservoirs,
            rng: SmallRng::from_entropy(),
            telemetry,
            options,
            shared_edges: Vec::new(),
            early_success: None,
        }
    }

    pub fn telemetry(&self) -> &TelemetryScope {
        &self.telemetry
    }

    /// Process one edge. Returns `true` if early termination (a
    /// sampler's resident just became sufficient) has been reached;
    /// the caller should stop feeding further edges once this happens.
    pub fn process_edge(&mut self, edge: EdgeUpdate) -> bool {
        if self.early_success.is_some() {
            return true;
        }
        self.telemetry.record_edge_scanned();

        let deg_u = self.bump_degree(edge.u);
        let deg_v = self.bump_degree(edge.v);

        for (idx, reservoir) in self.reservoirs.iter_mut().enumerate() {
            for (endpoint, degree) in [(edge.u, deg_u), (edge.v, deg_v)] {
                if degree == reservoir.band().d1 {
                    reservoir.consider_admission(endpoint, &mut self.rng);
                }
            }
            if self.options.shared_edge_collection {
                Self::offer_shared(
                    &mut self.shared_edges,
                    idx,
                    edge,
                    reservoir,
                    &self.degrees,
                );
            } else {
                let degrees = &self.degrees;
                reservoir.offer_edge(edge, |v| *degrees.get(&v).unwrap_or(&0));
            }

            for (endpoint, degree) in [(edge.u, deg_u), (edge.v, deg_v)] {
                if reservoir.check_sufficient(endpoint, degree) {
                    let neighbors = if self.options.shared_edge_collection {
                        Self::neighborhood_from_shared(&self.shared_edges, idx, endpoint)
                    } else {
                        reservoir.neighborhood_of(endpoint)
                    };
                    self.early_success = Some(DetectionResult::Success {
                        root: endpoint,
                        neighbors,
                    });
                }
            }
        }
        self.early_success.is_some()
    }

    /// Increment `vertex`'s degree, accounting a new `degrees` entry's
    /// bytes the first time it is seen.
    fn bump_degree(&mut self, vertex: VertexId) -> u64 {
        use std::collections::hash_map::Entry;
        match self.degrees.entry(vertex) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += 1;
                *entry.get()
            }
            Entry::Vacant(entry) => {
                self.telemetry
                    .add_hash_table_bytes(std::mem::size_of::<(VertexId, u64)>() as u64);
                *entry.insert(1)
            }
        }
    }

    fn offer_shared(
        shared_edges: &mut Vec<(EdgeUpdate, u64)>,
        idx: usize,
        edge: EdgeUpdate,
        reservoir: &ReservoirSampler,
        degrees: &HashMap<VertexId, u64>,
    ) {
        let relevant = [edge.u, edge.v].into_iter().any(|endpoint| {
            reservoir.is_resident(endpoint)
                && degrees.get(&endpoint).is_some_and(|deg| {
                    *deg > reservoir.band().d1 && *deg <= reservoir.band().upper()
                })
        });
        if !relevant {
            return;
        }
        let bit = 1u64 << idx;
        if let Some(entry) = shared_edges.iter_mut().find(|(e, _)| *e == edge) {
            entry.1 |= bit;
        } else {
            shared_edges.push((edge, bit));
        }
    }

    fn neighborhood_from_shared(
        shared_edges: &[(EdgeUpdate, u64)],
        idx: usize,
        resident: VertexId,
    ) -> Vec<VertexId> {
        let bit = 1u64 << idx;
        shared_edges
            .iter()
            .filter(|(_, mask)| mask & bit != 0)
            .filter_map(|(edge, _)| edge.other(resident))
            .collect()
    }

    /// Drain early-termination success recorded during [`process_edge`].
    pub fn take_early_success(&mut self) -> Option<DetectionResult> {
        self.early_success.take()
    }

    /// End-of-stream fallback (spec.md §4.5): if any sampler has a
    /// resident whose degree is at least `d1+d2`, emit a uniformly
    /// random such pair.
    pub fn finish(mut self) -> DetectionResult {
        if let Some(result) = self.early_success.take() {
            return result;
        }
        let mut candidates: Vec<(usize, VertexId)> = Vec::new();
        for (idx, reservoir) in self.reservoirs.iter().enumerate() {
            for &resident in reservoir.residents() {
                let degree = *self.degrees.get(&resident).unwrap_or(&0);
                if degree >= reservoir.band().upper() {
                    candidates.push((idx, resident));
                }
            }
        }
        if candidates.is_empty() {
            return DetectionResult::Failure;
        }
        use rand::seq::SliceRandom;
        let (idx, root) = *candidates.choose(&mut self.rng).expect("non-empty candidates");
        let neighbors = if self.options.shared_edge_collection {
            Self::neighborhood_from_shared(&self.shared_edges, idx, root)
        } else {
            self.reservoirs[idx].neighborhood_of(root)
        };
        DetectionResult::Success { root, neighbors }
    }

    pub fn degree_target(&self) -> u64 {
        self.d
    }

    pub fn approximation_factor(&self) -> u64 {
        self.c
    }

    pub fn state(&self, sampler: usize) -> Option<ReservoirState> {
        self.reservoirs.get(sampler).map(|r| r.state())
    }
}
