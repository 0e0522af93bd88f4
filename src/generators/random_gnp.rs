//! G(n,p) random graph generator: every pair of vertices independently
//! connected with probability `p`.
//!
//! Grounded on `original_source/src/graphs/randomGraph.cpp`'s
//! `insertion_only` path (a single fixed `p` shared across all pairs,
//! rather than the original's optional per-vertex-sampled probability)
//! and the teacher's `random_graph::BernoulliGraphDistribution`, whose
//! `num_integer`/`primes`-backed combinatorics this generator has no
//! need for (plain nested loops over `0..n` suffice at these sizes).

use std::collections::HashMap;
use std::path::Path;

use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::transform::to_insertion_deletion;
use crate::vertex::VertexId;

pub fn generate(num_vertices: u64, p: f64, seed: u64) -> (Vec<(VertexId, VertexId)>, Vec<(VertexId, u64)>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let bernoulli = Bernoulli::new(p.clamp(0.0, 1.0)).expect("p clamped into [0, 1]");
    let mut edges = Vec::new();
    let mut degree_counts: HashMap<VertexId, u64> = HashMap::new();
    for u in 0..num_vertices {
        for v in (u + 1)..num_vertices {
            if bernoulli.sample(&mut rng) {
                edges.push((u, v));
                *degree_counts.entry(u).or_insert(0) += 1;
                *degree_counts.entry(v).or_insert(0) += 1;
            }
        }
    }
    let degrees = (0..num_vertices)
        .map(|v| (v, *degree_counts.get(&v).unwrap_or(&0)))
        .collect();
    (edges, degrees)
}

pub fn write_to_files(
    prefix: &Path,
    num_vertices: u64,
    p: f64,
    deletion_probability: Option<f64>,
    seed: u64,
) -> std::io::Result<()> {
    use crate::graph::edge::EdgeUpdate;
    let (edges, degrees) = generate(num_vertices, p, seed);
    let (stream, insertion_only) = match deletion_probability {
        Some(dp) => (to_insertion_deletion(edges, dp, seed), false),
        None => (
            edges
                .into_iter()
                .map(|(u, v)| EdgeUpdate::insertion(u, v))
                .collect(),
            true,
        ),
    };
    super::write_edge_file(prefix, &stream, insertion_only)?;
    super::write_vertex_file(prefix, &degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_zero_produces_no_edges() {
        let (edges, degrees) = generate(30, 0.0, 1);
        assert!(edges.is_empty());
        assert!(degrees.iter().all(|(_, d)| *d == 0));
    }

    #[test]
    fn p_one_produces_complete_graph() {
        let (edges, degrees) = generate(8, 1.0, 1);
        assert_eq!(edges.len(), 28);
        assert!(degrees.iter().all(|(_, d)| *d == 7));
    }
}
