//! Error types for the streaming neighborhood-detection pipeline.
//!
//! Parse errors are recoverable (the offending line is skipped and
//! counted); bounds and resource-budget errors are fatal and abort the
//! current run. Algorithmic failure to certify a neighborhood is not an
//! error at all — see [`crate::DetectionResult`].

use thiserror::Error;

/// A malformed record in an edge-stream or vertex-list file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line did not have the expected number of space-separated fields.
    #[error("line {line}: expected 2 or 3 space-separated fields, found {found}")]
    WrongFieldCount { line: usize, found: usize },
    /// A field that should have been an integer vertex id was not.
    #[error("line {line}: `{value}` is not a valid vertex id")]
    NotAnInteger { line: usize, value: String },
    /// An insertion-deletion record's prefix was neither `I` nor `D`.
    #[error("line {line}: unknown edge-sign prefix `{prefix}`")]
    UnknownSignPrefix { line: usize, prefix: String },
}

/// Invalid parameters or an out-of-range vertex id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("vertex id {id} is out of range [0, {n})")]
    VertexOutOfRange { id: u64, n: u64 },
    #[error("degree target d must be >= 1, got {d}")]
    InvalidDegreeTarget { d: u64 },
    #[error("approximation factor c must be >= 2, got {c}")]
    InvalidApproximationFactor { c: u64 },
    #[error("vertex count n must exceed degree target d ({n} <= {d})")]
    VertexCountTooSmall { n: u64, d: u64 },
    #[error("self-loop encountered: vertex {v} connected to itself")]
    SelfLoop { v: u64 },
}

/// A counter or table would overflow its fixed-width integer type for
/// this universe size; raised at sampler-construction time rather than
/// silently wrapping mid-stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceBudgetError {
    #[error("universe size {universe} would overflow the sparse-recovery counter width")]
    CounterOverflowRisk { universe: u128 },
    #[error("requested sampler capacity {requested} exceeds the configured budget {budget}")]
    CapacityExceeded { requested: usize, budget: usize },
}

/// Top-level error for anything that halts a run before a
/// [`crate::DetectionResult`] can be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    ResourceBudget(#[from] ResourceBudgetError),
    #[error("input/output error: {0}")]
    Io(String),
}
