//! Complete graph generator: an edge between every pair of vertices.
//!
//! Grounded on `original_source/src/graphs/completeGraph.cpp`, which
//! has no insertion-deletion variant — this generator is insertion-only
//! only, matching the original.

use std::path::Path;

use crate::vertex::VertexId;

/// Build the edge set and degree list for `K_num_vertices`.
pub fn generate(num_vertices: u64) -> (Vec<(VertexId, VertexId)>, Vec<(VertexId, u64)>) {
    let mut edges = Vec::new();
    for u in 0..num_vertices {
        for v in (u + 1)..num_vertices {
            edges.push((u, v));
        }
    }
    let degrees = (0..num_vertices)
        .map(|v| (v, num_vertices.saturating_sub(1)))
        .collect();
    (edges, degrees)
}

pub fn write_to_files(prefix: &Path, num_vertices: u64) -> std::io::Result<()> {
    use crate::graph::edge::EdgeUpdate;
    let (edges, degrees) = generate(num_vertices);
    let stream: Vec<EdgeUpdate> = edges.into_iter().map(|(u, v)| EdgeUpdate::insertion(u, v)).collect();
    super::write_edge_file(prefix, &stream, true)?;
    super::write_vertex_file(prefix, &degrees)
}
