#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that grades maze submissions from files or stdin.

mod config;
mod ingest;
mod render;

use std::{
    fs,
    io::{self, Read},
    panic,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_grader_core::{BenchmarkKind, Event, GradeReport, GraderConfig};
use maze_grader_system_grading::grade;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Grades LLM-authored ASCII mazes.
#[derive(Debug, Parser)]
#[command(name = "maze-grader", version)]
struct Cli {
    /// File containing the submission; reads stdin when omitted.
    #[arg(long, conflicts_with = "ingest")]
    input: Option<PathBuf>,

    /// Benchmark to grade against.
    #[arg(long, default_value = "maze")]
    benchmark: BenchmarkKind,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// TOML file overriding limits, budgets, weights and policies.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File with several `model: <name>` blocks to grade one by one.
    #[arg(long)]
    ingest: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct IngestedReport<'a> {
    model: &'a str,
    elapsed_seconds: f64,
    report: GradeReport,
}

/// Entry point for the maze grader command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match &cli.ingest {
        Some(path) => run_ingest(&cli, path, &config),
        None => run_single(&cli, &config),
    }
}

fn run_single(cli: &Cli, config: &GraderConfig) -> Result<()> {
    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read submission at {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            let _ = io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read submission from stdin")?;
            buffer
        }
    };

    let report = grade_logged(&text, cli.benchmark, config);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialise report")?
        );
    } else {
        println!("{}", render::render_report(&report));
    }
    Ok(())
}

fn run_ingest(cli: &Cli, path: &Path, config: &GraderConfig) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read ingest file at {}", path.display()))?;
    let entries = ingest::split_entries(&contents)
        .with_context(|| format!("failed to ingest {}", path.display()))?;
    debug!(entries = entries.len(), "ingesting submissions");

    let mut results = Vec::with_capacity(entries.len());
    for entry in &entries {
        let report = grade_logged(entry.body, cli.benchmark, config);
        results.push(IngestedReport {
            model: entry.model,
            elapsed_seconds: entry.elapsed_seconds,
            report,
        });
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).context("failed to serialise reports")?
        );
    } else {
        for result in &results {
            println!(
                "{}",
                render::render_ingested(result.model, result.elapsed_seconds, &result.report)
            );
        }
    }
    Ok(())
}

fn grade_logged(text: &str, benchmark: BenchmarkKind, config: &GraderConfig) -> GradeReport {
    let mut events: Vec<Event> = Vec::new();
    let report = with_quiet_panics(|| grade(text, benchmark, config, &mut events));
    for event in &events {
        debug!(?event, "pipeline event");
    }
    report
}

/// Runs `grade` with a panic hook that logs instead of printing backtraces.
///
/// The grader already turns panics into `evaluation` reports; the previous
/// hook is restored once `run` returns.
fn with_quiet_panics<T>(run: impl FnOnce() -> T) -> T {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!(%info, "panic caught while grading")));
    let result = run();
    panic::set_hook(previous);
    result
}

#[cfg(test)]
mod tests {
    use super::with_quiet_panics;
    use std::{
        panic,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    #[test]
    fn caught_panics_bypass_the_installed_hook_while_grading() {
        let reported = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reported);
        let original = panic::take_hook();
        panic::set_hook(Box::new(move |_| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
        }));

        let quiet = with_quiet_panics(|| panic::catch_unwind(|| panic!("while grading")));
        let loud = panic::catch_unwind(|| panic!("after grading"));
        panic::set_hook(original);

        assert!(quiet.is_err());
        assert!(loud.is_err());
        assert_eq!(
            reported.load(Ordering::SeqCst),
            1,
            "only the panic outside grading reaches the outer hook"
        );
    }
}
