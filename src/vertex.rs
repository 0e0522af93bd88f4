//! Vertex identifiers.
//!
//! spec.md §3 allows vertex ids to be "an integer in [0,n), or an
//! opaque string mapped by the indexer"; this crate implements the
//! integer form only. String-labeled vertex input was never wired into
//! `parser.rs` and is out of scope here (see DESIGN.md).

/// A dense vertex identifier in `[0, n)`. All samplers and the parser
/// operate purely on this type.
pub type VertexId = u64;
