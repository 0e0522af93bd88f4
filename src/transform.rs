//! Insertion-only to insertion-deletion stream transformation (spec.md
//! §1's "stream-to-stream insertion-deletion transformer").
//!
//! Grounded on `original_source/src/graphs/starGraph.cpp`'s
//! `generate_star_insertion_deletion`: every inserted edge is, with
//! probability `deletion_probability`, immediately followed by a
//! deletion and a re-insertion of the same edge. This leaves the net
//! graph unchanged while exercising an IDEngine's cancellation handling.

use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::graph::edge::EdgeUpdate;
use crate::vertex::VertexId;

/// Replay an insertion-only stream, re-emitting a `D`/`I` pair after a
/// `deletion_probability` fraction of edges.
pub fn to_insertion_deletion<I>(edges: I, deletion_probability: f64, seed: u64) -> Vec<EdgeUpdate>
where
    I: IntoIterator<Item = (VertexId, VertexId)>,
{
    let mut rng = SmallRng::seed_from_u64(seed);
    let bernoulli = Bernoulli::new(deletion_probability.clamp(0.0, 1.0))
        .expect("deletion_probability clamped into [0, 1]");
    let mut out = Vec::new();
    for (u, v) in edges {
        out.push(EdgeUpdate::insertion(u, v));
        if bernoulli.sample(&mut rng) {
            out.push(EdgeUpdate::deletion(u, v));
            out.push(EdgeUpdate::insertion(u, v));
        }
    }
    out
}
