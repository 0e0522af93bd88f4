//! The driver: parses parameters, drives one of the two engines over a
//! stream file, and reports a result plus telemetry (spec.md §4.7).
//!
//! No direct teacher counterpart exists (`g-raph` has no CLI driver at
//! all); the single-run / batch-sweep split and the telemetry fields
//! reported follow spec.md §4.7 and §6 directly, with the CSV columns
//! copied verbatim from §6's "Result output" table.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::engine::id::{IdEngine, IdVariant};
use crate::engine::insertion::InsertionEngine;
use crate::error::{BoundsError, StreamError};
use crate::graph::edge::EdgeUpdate;
use crate::parser::{EdgeStreamParser, VertexListParser};
use crate::telemetry::Stopwatch;
use crate::vertex::VertexId;
use crate::DetectionResult;

/// Which stream model and engine a run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Insertion,
    InsertionDeletion(IdVariant),
}

/// Parameters common to every run (spec.md §6).
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    pub n: u64,
    pub d: u64,
    pub c: u64,
    pub delta: f64,
    pub seed: u64,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            n: 0,
            d: 0,
            c: 2,
            delta: 0.2,
            seed: 0,
        }
    }
}

fn validate_bounds(params: &RunParams) -> Result<(), BoundsError> {
    if params.d < 1 {
        return Err(BoundsError::InvalidDegreeTarget { d: params.d });
    }
    if params.c < 2 {
        return Err(BoundsError::InvalidApproximationFactor { c: params.c });
    }
    if params.n <= params.d {
        return Err(BoundsError::VertexCountTooSmall {
            n: params.n,
            d: params.d,
        });
    }
    Ok(())
}

/// One run's outcome plus the telemetry spec.md §4.7 asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub result: DetectionResult,
    pub wall_time_us: u128,
    pub peak_bytes: u64,
    pub edges_scanned: u64,
    pub hash_table_bytes: u64,
}

fn open_edge_stream(path: &Path) -> Result<EdgeStreamParser<BufReader<File>>, StreamError> {
    let file = File::open(path).map_err(|err| StreamError::Io(err.to_string()))?;
    Ok(EdgeStreamParser::new(BufReader::new(file)))
}

/// Validate one parsed edge against the Data Model's `EdgeUpdate`
/// invariant (`u != v`) and the declared vertex count, per spec.md §7's
/// fatal `BoundsError`. Called per edge, ahead of any engine.
fn validate_edge(edge: &EdgeUpdate, n: u64) -> Result<(), BoundsError> {
    if edge.u == edge.v {
        return Err(BoundsError::SelfLoop { v: edge.u });
    }
    if edge.u >= n {
        return Err(BoundsError::VertexOutOfRange { id: edge.u, n });
    }
    if edge.v >= n {
        return Err(BoundsError::VertexOutOfRange { id: edge.v, n });
    }
    Ok(())
}

/// Run the `InsertionEngine` to completion over an edge-stream file.
#[instrument(skip(params, edge_path), fields(n = params.n, d = params.d, c = params.c))]
pub fn run_insertion(params: RunParams, edge_path: &Path) -> Result<RunReport, StreamError> {
    validate_bounds(&params)?;
    let parser = open_edge_stream(edge_path)?;
    let stopwatch = Stopwatch::start();
    let mut engine = InsertionEngine::new(params.n, params.d, params.c);
    for edge in parser {
        validate_edge(&edge, params.n)?;
        if engine.process_edge(edge) {
            break;
        }
    }
    let wall_time_us = stopwatch.elapsed_micros();
    let telemetry = *engine.telemetry();
    let result = engine.finish();
    report_result(&result);
    Ok(RunReport {
        result,
        wall_time_us,
        peak_bytes: telemetry.peak_bytes(),
        edges_scanned: telemetry.edges_scanned(),
        hash_table_bytes: telemetry.hash_table_bytes(),
    })
}

/// Run an `IdEngine` (either variant) to completion over an
/// insertion-deletion edge-stream file.
#[instrument(skip(params, edge_path, vertex_path), fields(n = params.n, d = params.d, c = params.c))]
pub fn run_insertion_deletion(
    params: RunParams,
    variant: IdVariant,
    edge_path: &Path,
    vertex_path: Option<&Path>,
) -> Result<RunReport, StreamError> {
    validate_bounds(&params)?;
    let parser = open_edge_stream(edge_path)?;

    let vertices: Vec<VertexId> = match vertex_path {
        Some(path) => {
            let file = File::open(path).map_err(|err| StreamError::Io(err.to_string()))?;
            VertexListParser::new(BufReader::new(file)).collect()
        }
        None => (0..params.n).collect(),
    };

    let stopwatch = Stopwatch::start();
    let mut engine = match variant {
        IdVariant::VertexSample => {
            IdEngine::new_vertex_sample(params.n, params.d, params.c, params.delta, &vertices, params.seed)
        }
        IdVariant::EdgeId => IdEngine::new_edge_id(params.n, params.d, params.c, params.delta, params.seed),
    };
    for edge in parser {
        validate_edge(&edge, params.n)?;
        engine.process_edge(edge);
    }
    let wall_time_us = stopwatch.elapsed_micros();
    let telemetry = *engine.telemetry();
    let result = engine.finish();
    report_result(&result);
    Ok(RunReport {
        result,
        wall_time_us,
        peak_bytes: telemetry.peak_bytes(),
        edges_scanned: telemetry.edges_scanned(),
        hash_table_bytes: telemetry.hash_table_bytes(),
    })
}

fn report_result(result: &DetectionResult) {
    match result {
        DetectionResult::Success { root, neighbors } => {
            info!(root, neighbors = neighbors.len(), "run succeeded");
        }
        DetectionResult::Failure => warn!("run failed to certify a neighborhood"),
    }
}

/// One row of the batch-sweep CSV output (spec.md §6's exact columns).
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub c: u64,
    pub mean_time_us: f64,
    pub mean_peak_bytes: f64,
    pub mean_edges_scanned: f64,
    pub var_time: f64,
    pub var_peak_bytes: f64,
    pub successes: u64,
}

fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

/// Sweep `c` over `c_range`, running `repetitions` insertion-only runs
/// per value and averaging (spec.md §4.7's batch mode).
pub fn sweep_insertion(
    n: u64,
    d: u64,
    c_range: std::ops::RangeInclusive<u64>,
    repetitions: usize,
    edge_path: &Path,
) -> Result<Vec<SweepRow>, StreamError> {
    let mut rows = Vec::new();
    for c in c_range {
        let mut times = Vec::with_capacity(repetitions);
        let mut peaks = Vec::with_capacity(repetitions);
        let mut scanned = Vec::with_capacity(repetitions);
        let mut successes = 0u64;
        for _ in 0..repetitions {
            let params = RunParams { n, d, c, ..RunParams::default() };
            let report = run_insertion(params, edge_path)?;
            times.push(report.wall_time_us as f64);
            peaks.push(report.peak_bytes as f64);
            scanned.push(report.edges_scanned as f64);
            if report.result.is_success() {
                successes += 1;
            }
        }
        let (mean_time_us, var_time) = mean_and_variance(&times);
        let (mean_peak_bytes, var_peak_bytes) = mean_and_variance(&peaks);
        let (mean_edges_scanned, _) = mean_and_variance(&scanned);
        rows.push(SweepRow {
            c,
            mean_time_us,
            mean_peak_bytes,
            mean_edges_scanned,
            var_time,
            var_peak_bytes,
            successes,
        });
    }
    Ok(rows)
}

/// Write sweep rows to a CSV file with the columns named in spec.md §6.
pub fn write_sweep_csv(rows: &[SweepRow], path: &Path) -> Result<(), StreamError> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| StreamError::Io(err.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| StreamError::Io(err.to_string()))?;
    }
    writer.flush().map_err(|err| StreamError::Io(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_edges(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
        file
    }

    #[test]
    fn rejects_n_not_exceeding_d() {
        let params = RunParams { n: 4, d: 4, c: 2, ..RunParams::default() };
        let err = validate_bounds(&params).unwrap_err();
        assert_eq!(err, BoundsError::VertexCountTooSmall { n: 4, d: 4 });
    }

    #[test]
    fn rejects_approximation_factor_below_two() {
        let params = RunParams { n: 10, d: 2, c: 1, ..RunParams::default() };
        let err = validate_bounds(&params).unwrap_err();
        assert_eq!(err, BoundsError::InvalidApproximationFactor { c: 1 });
    }

    #[test]
    fn validate_edge_rejects_self_loop() {
        let edge = EdgeUpdate::insertion(3, 3);
        assert_eq!(validate_edge(&edge, 10).unwrap_err(), BoundsError::SelfLoop { v: 3 });
    }

    #[test]
    fn validate_edge_rejects_out_of_range_endpoint() {
        let edge = EdgeUpdate::insertion(2, 10);
        assert_eq!(
            validate_edge(&edge, 10).unwrap_err(),
            BoundsError::VertexOutOfRange { id: 10, n: 10 }
        );
    }

    #[test]
    fn run_insertion_rejects_out_of_range_edge_as_fatal() {
        let file = write_edges(&["0 1", "0 99"]);
        let params = RunParams { n: 10, d: 2, c: 2, ..RunParams::default() };
        let err = run_insertion(params, file.path()).expect_err("out-of-range vertex must be fatal");
        assert_eq!(err, StreamError::Bounds(BoundsError::VertexOutOfRange { id: 99, n: 10 }));
    }

    #[test]
    fn run_insertion_rejects_self_loop_as_fatal() {
        let file = write_edges(&["0 1", "2 2"]);
        let params = RunParams { n: 10, d: 2, c: 2, ..RunParams::default() };
        let err = run_insertion(params, file.path()).expect_err("self-loop must be fatal");
        assert_eq!(err, StreamError::Bounds(BoundsError::SelfLoop { v: 2 }));
    }

    #[test]
    fn run_insertion_succeeds_on_star_graph() {
        let file = write_edges(&["0 1", "0 2", "0 3", "0 4", "0 5", "0 6", "0 7", "0 8", "0 9"]);
        let params = RunParams { n: 10, d: 9, c: 3, ..RunParams::default() };
        let report = run_insertion(params, file.path()).expect("run must succeed");
        assert!(report.result.is_success());
    }

    #[test]
    fn sweep_writes_a_row_per_c_value() {
        let file = write_edges(&["0 1", "0 2", "0 3", "0 4"]);
        let rows = sweep_insertion(6, 4, 2..=3, 2, file.path()).expect("sweep must run");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].c, 2);
        assert_eq!(rows[1].c, 3);

        let out = tempfile::NamedTempFile::new().expect("create csv file");
        write_sweep_csv(&rows, out.path()).expect("csv must write");
        let contents = std::fs::read_to_string(out.path()).expect("read csv back");
        assert!(contents.contains("mean_time_us"));
    }
}
