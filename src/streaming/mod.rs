//! Streaming algorithms: sparse recovery and the sampling primitives
//! built on top of it.
//!
//! Carried over from the teacher crate's `graph::streaming` module
//! (same name, same two-layer shape); the teacher's `coloring`,
//! `counting` (Morris counter) and `distinct` (tidemark) submodules have
//! no counterpart in this spec and were dropped (see DESIGN.md).

pub mod sampling;
pub mod sparse_recovery;
