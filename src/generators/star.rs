//! Star graph generator: one centre connected to every other vertex.
//!
//! Grounded on `original_source/src/graphs/starGraph.cpp`'s
//! `generate_star_insertion_only`/`generate_star_insertion_deletion`.

use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::graph::edge::EdgeUpdate;
use crate::transform::to_insertion_deletion;
use crate::vertex::VertexId;

/// Build the edge set and per-vertex degree list for a star graph over
/// `num_vertices` vertices with a uniformly chosen centre.
pub fn generate(num_vertices: u64, seed: u64) -> (Vec<(VertexId, VertexId)>, Vec<(VertexId, u64)>) {
    assert!(num_vertices >= 2, "a star graph needs at least 2 vertices");
    let mut rng = SmallRng::seed_from_u64(seed);
    let centre = rng.gen_range(0..num_vertices);
    let mut edges = Vec::with_capacity(num_vertices as usize - 1);
    let mut degrees = Vec::with_capacity(num_vertices as usize);
    for v in 0..num_vertices {
        if v == centre {
            degrees.push((v, num_vertices - 1));
        } else {
            edges.push((centre, v));
            degrees.push((v, 1));
        }
    }
    (edges, degrees)
}

/// Generate a star graph and write its `.edges`/`.vertices` files.
/// `deletion_probability` is `Some(p)` to interleave cancellation pairs
/// per [`to_insertion_deletion`], or `None` for a plain insertion-only
/// stream.
pub fn write_to_files(
    prefix: &Path,
    num_vertices: u64,
    deletion_probability: Option<f64>,
    seed: u64,
) -> std::io::Result<()> {
    let (edges, degrees) = generate(num_vertices, seed);
    let (stream, insertion_only) = match deletion_probability {
        Some(p) => (to_insertion_deletion(edges, p, seed), false),
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
    fn centre_has_degree_n_minus_one() {
        let (edges, degrees) = generate(20, 3);
        assert_eq!(edges.len(), 19);
        let centre_degree = degrees.iter().find(|(_, d)| *d == 19).expect("a centre exists");
        assert_eq!(centre_degree.1, 19);
        assert_eq!(degrees.iter().filter(|(_, d)| *d == 1).count(), 19);
    }
}
