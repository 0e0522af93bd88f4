//! Synthetic graph generators (spec.md §1, §6: "star, complete, and
//! random (G(n,p)) graph generators emit `.edges` and `.vertices`").
//!
//! Grounded on `original_source/src/graphs/{starGraph,completeGraph,
//! randomGraph}.cpp`, generalized from 1-indexed vertices and a
//! hand-seeded `default_random_engine` to 0-indexed `VertexId`s and the
//! crate-wide `rand::rngs::SmallRng` convention, and from the teacher's
//! `random_graph::BernoulliGraphDistribution`'s in-memory edge iterator
//! to writing the `.edges`/`.vertices` file pair directly.

pub mod complete;
pub mod random_gnp;
pub mod star;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::graph::edge::EdgeUpdate;
use crate::vertex::VertexId;

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}.{suffix}", prefix.display()))
}

/// Write an edge stream, one record per line. `insertion_only` selects
/// between the plain `"u v"` format and the signed `"I u v"`/`"D u v"`
/// format.
pub fn write_edge_file(
    prefix: &Path,
    edges: &[EdgeUpdate],
    insertion_only: bool,
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(with_suffix(prefix, "edges"))?;
    for edge in edges {
        if insertion_only {
            writeln!(file, "{} {}", edge.u, edge.v)?;
        } else {
            let sign = if edge.sign > 0 { "I" } else { "D" };
            writeln!(file, "{sign} {} {}", edge.u, edge.v)?;
        }
    }
    Ok(())
}

/// Write a vertex-list / degree CSV, `"vertex,degree"` per line.
pub fn write_vertex_file(prefix: &Path, degrees: &[(VertexId, u64)]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(with_suffix(prefix, "vertices"))?;
    for (vertex, degree) in degrees {
        writeln!(file, "{vertex},{degree}")?;
    }
    Ok(())
}
