//! CLI entry point: parses arguments with `clap`, drives an engine (or a
//! generator) via [`neighborhood_streams::driver`], and maps errors to
//! exit codes.
//!
//! Grounded on `chutoro-cli/src/main.rs`'s `try_main` / `ExitCode`
//! split, simplified to this crate's error set (no `anyhow` context
//! chain, since `StreamError` already carries everything the CLI needs
//! to report).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;

use neighborhood_streams::driver::{
    run_insertion, run_insertion_deletion, sweep_insertion, write_sweep_csv, RunParams,
};
use neighborhood_streams::engine::id::IdVariant;
use neighborhood_streams::error::StreamError;
use neighborhood_streams::generators::{complete, random_gnp, star};
use neighborhood_streams::logging;
use neighborhood_streams::DetectionResult;

#[derive(Debug, Parser)]
#[command(name = "graphstream", about = "Approximate neighborhood detection on graph streams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a single pass of one engine over an edge-stream file.
    Run(RunArgs),
    /// Sweep the approximation factor `c` over a range, averaging repetitions.
    Sweep(SweepArgs),
    /// Generate a synthetic graph's `.edges`/`.vertices` files.
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Insertion,
    IdVertexSample,
    IdEdgeId,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long, value_enum)]
    mode: ModeArg,
    #[arg(long)]
    edges: PathBuf,
    #[arg(long)]
    vertices: Option<PathBuf>,
    #[arg(long)]
    n: u64,
    #[arg(long)]
    d: u64,
    #[arg(long)]
    c: u64,
    #[arg(long, default_value_t = 0.2)]
    delta: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Args)]
struct SweepArgs {
    #[arg(long)]
    edges: PathBuf,
    #[arg(long)]
    n: u64,
    #[arg(long)]
    d: u64,
    #[arg(long)]
    c_min: u64,
    #[arg(long)]
    c_max: u64,
    #[arg(long, default_value_t = 5)]
    repetitions: usize,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(subcommand)]
    kind: GenerateKind,
    /// Output file prefix; writes `<prefix>.edges` and `<prefix>.vertices`.
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Subcommand)]
enum GenerateKind {
    Star {
        #[arg(long)]
        n: u64,
        #[arg(long)]
        deletion_probability: Option<f64>,
    },
    Complete {
        #[arg(long)]
        n: u64,
    },
    RandomGnp {
        #[arg(long)]
        n: u64,
        #[arg(long)]
        p: f64,
        #[arg(long)]
        deletion_probability: Option<f64>,
    },
}

fn try_main(cli: Cli) -> Result<(), StreamError> {
    match cli.command {
        Command::Run(args) => {
            let params = RunParams {
                n: args.n,
                d: args.d,
                c: args.c,
                delta: args.delta,
                seed: args.seed,
            };
            let report = match args.mode {
                ModeArg::Insertion => run_insertion(params, &args.edges)?,
                ModeArg::IdVertexSample => run_insertion_deletion(
                    params,
                    IdVariant::VertexSample,
                    &args.edges,
                    args.vertices.as_deref(),
                )?,
                ModeArg::IdEdgeId => run_insertion_deletion(
                    params,
                    IdVariant::EdgeId,
                    &args.edges,
                    args.vertices.as_deref(),
                )?,
            };
            print_report(&report.result, report.wall_time_us, report.peak_bytes);
            Ok(())
        }
        Command::Sweep(args) => {
            let rows = sweep_insertion(args.n, args.d, args.c_min..=args.c_max, args.repetitions, &args.edges)?;
            write_sweep_csv(&rows, &args.out)?;
            println!("wrote {} rows to {}", rows.len(), args.out.display());
            Ok(())
        }
        Command::Generate(args) => {
            match args.kind {
                GenerateKind::Star { n, deletion_probability } => {
                    star::write_to_files(&args.out, n, deletion_probability, args.seed)
                }
                GenerateKind::Complete { n } => complete::write_to_files(&args.out, n),
                GenerateKind::RandomGnp { n, p, deletion_probability } => {
                    random_gnp::write_to_files(&args.out, n, p, deletion_probability, args.seed)
                }
            }
            .map_err(|err| StreamError::Io(err.to_string()))?;
            println!("wrote {}.edges and {}.vertices", args.out.display(), args.out.display());
            Ok(())
        }
    }
}

fn print_report(result: &DetectionResult, wall_time_us: u128, peak_bytes: u64) {
    match result {
        DetectionResult::Success { root, neighbors } => {
            println!(
                "Success: root={root} neighborhood_size={} wall_time_us={wall_time_us} peak_bytes={peak_bytes}",
                neighbors.len()
            );
            println!("neighbors={neighbors:?}");
        }
        DetectionResult::Failure => {
            println!("Failure: no neighborhood certified; wall_time_us={wall_time_us} peak_bytes={peak_bytes}");
        }
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    if let Err(err) = try_main(cli) {
        error!(error = %err, "run failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
