//! Telemetry scope handed explicitly to every sampler.
//!
//! Replaces the teacher algorithm's global `BYTES`/`MAX_BYTES` counters
//! (see `original_source/.../l0Sampler.cpp`) with a small struct each
//! component updates directly; the driver reads it back at the end of a
//! run instead of relying on process-global mutable state.

use std::time::{Duration, Instant};

/// Monotonic counters sampled once at the end of a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryScope {
    bytes_in_use: u64,
    peak_bytes: u64,
    edges_scanned: u64,
    hash_table_bytes: u64,
}

impl TelemetryScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a net change in bytes held by some data structure (may be
    /// negative, e.g. on reservoir eviction) and update the running peak.
    pub fn adjust_bytes(&mut self, delta: i64) {
        self.bytes_in_use = self.bytes_in_use.saturating_add_signed(delta);
        self.peak_bytes = self.peak_bytes.max(self.bytes_in_use);
    }

    pub fn add_hash_table_bytes(&mut self, bytes: u64) {
        self.hash_table_bytes = self.hash_table_bytes.saturating_add(bytes);
    }

    pub fn record_edge_scanned(&mut self) {
        self.edges_scanned += 1;
    }

    pub fn peak_bytes(&self) -> u64 {
        self.peak_bytes
    }

    pub fn hash_table_bytes(&self) -> u64 {
        self.hash_table_bytes
    }

    pub fn edges_scanned(&self) -> u64 {
        self.edges_scanned
    }
}

/// Wall-clock stopwatch, sampled around a single pass over the stream.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_micros(&self) -> u128 {
        self.elapsed().as_micros()
    }
}
