//! Degree-banded reservoir sampling.
//!
//! Grounded directly on `degreeBasedResevoirSampling.cpp` in
//! `original_source/` (the original's `deg_res_sampling`/
//! `update_resevoir` pair), generalized from one fixed band to the
//! `(d1, d2)` parameter spec.md §4.4 names, and from the original's
//! linear `find` over a `vector<int>` to a companion `HashSet` for O(1)
//! residency checks (Design Notes item 4).

use std::collections::HashSet;

use rand::Rng;

use crate::graph::edge::EdgeUpdate;
use crate::vertex::VertexId;

/// The degree window `(d1, d2)`: a vertex becomes admission-eligible the
/// moment its degree reaches `d1`, and the reservoir declares success
/// once a resident's degree reaches `d1 + d2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeBand {
    pub d1: u64,
    pub d2: u64,
}

impl DegreeBand {
    pub fn upper(&self) -> u64 {
        self.d1 + self.d2
    }
}

/// Lifecycle of one reservoir, per spec.md §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservoirState {
    Empty,
    Filling,
    Full,
    /// Terminal: some resident's degree has reached `d1 + d2`.
    Sufficient { resident: VertexId },
}

/// A fixed-capacity reservoir over "first reaches degree `d1`" admission
/// events, plus the edge collection needed to reconstruct a sufficient
/// resident's neighborhood.
pub struct ReservoirSampler {
    band: DegreeBand,
    capacity: usize,
    residents: Vec<VertexId>,
    resident_set: HashSet<VertexId>,
    edges: Vec<EdgeUpdate>,
    admissions_seen: u64,
    state: ReservoirState,
}

impl ReservoirSampler {
    pub fn new(band: DegreeBand, capacity: usize) -> Self {
        Self {
            band,
            capacity: capacity.max(1),
            residents: Vec::new(),
            resident_set: HashSet::new(),
            edges: Vec::new(),
            admissions_seen: 0,
            state: ReservoirState::Empty,
        }
    }

    pub fn band(&self) -> DegreeBand {
        self.band
    }

    pub fn state(&self) -> ReservoirState {
        self.state
    }

    pub fn is_resident(&self, v: VertexId) -> bool {
        self.resident_set.contains(&v)
    }

    /// Consider admitting `vertex`, whose degree has just reached `d1`.
    /// Classical reservoir admission: append while under capacity,
    /// otherwise evict a uniform resident with probability
    /// `capacity / admissions_seen`.
    pub fn consider_admission<R: Rng + ?Sized>(&mut self, vertex: VertexId, rng: &mut R) {
        self.admissions_seen += 1;
        if self.residents.len() < self.capacity {
            self.residents.push(vertex);
            self.resident_set.insert(vertex);
            self.state = if self.residents.len() == self.capacity {
                ReservoirState::Full
            } else {
                ReservoirState::Filling
            };
            return;
        }
        if rng.gen_bool((self.capacity as f64 / self.admissions_seen as f64).min(1.0)) {
            let slot = rng.gen_range(0..self.residents.len());
            let evicted = self.residents[slot];
            self.residents[slot] = vertex;
            self.resident_set.remove(&evicted);
            self.resident_set.insert(vertex);
            self.prune_edges_for(evicted);
        }
    }

    /// Drop every collected edge whose only reservoir-relevant endpoint
    /// was the just-evicted vertex.
    fn prune_edges_for(&mut self, evicted: VertexId) {
        self.edges.retain(|edge| {
            let touches_evicted = edge.u == evicted || edge.v == evicted;
            if !touches_evicted {
                return true;
            }
            // Keep the edge if its other endpoint is itself a resident
            // (it is still relevant to that resident's collection).
            edge.other(evicted)
                .is_some_and(|other| self.resident_set.contains(&other))
        });
    }

    /// Route one stream edge into the collection per spec.md §4.4: if
    /// either endpoint is resident and currently within `(d1, d1+d2]`,
    /// record the edge. `degree_after` is that endpoint's degree
    /// immediately after processing this edge.
    pub fn offer_edge(&mut self, edge: EdgeUpdate, degree_of: impl Fn(VertexId) -> u64) {
        let relevant = [edge.u, edge.v].into_iter().any(|endpoint| {
            self.is_resident(endpoint) && {
                let deg = degree_of(endpoint);
                deg > self.band.d1 && deg <= self.band.upper()
            }
        });
        if relevant {
            self.edges.push(edge);
        }
    }

    /// Check whether `vertex` (a resident) has just reached the
    /// success threshold, and if so transition to the terminal state.
    pub fn check_sufficient(&mut self, vertex: VertexId, degree: u64) -> bool {
        if self.is_resident(vertex) && degree >= self.band.upper() {
            self.state = ReservoirState::Sufficient { resident: vertex };
            true
        } else {
            false
        }
    }

    /// The neighborhood collected for `resident`, from the recorded edges.
    pub fn neighborhood_of(&self, resident: VertexId) -> Vec<VertexId> {
        self.edges
            .iter()
            .filter_map(|edge| edge.other(resident))
            .collect()
    }

    pub fn residents(&self) -> &[VertexId] {
        &self.residents
    }

    pub fn admissions_seen(&self) -> u64 {
        self.admissions_seen
    }

    /// Bytes held by the fixed-capacity residents vector and its
    /// companion lookup set, for telemetry. Capacity is fixed at
    /// construction, so this is a one-time accounting, not a per-edge one.
    pub fn memory_bytes(&self) -> u64 {
        let slot_bytes = std::mem::size_of::<VertexId>() as u64;
        self.capacity as u64 * slot_bytes * 2
    }
}
