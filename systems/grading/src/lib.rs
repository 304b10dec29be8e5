#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grading pipeline that turns untrusted text into a complete report.
//!
//! Parser, maze model, pathfinder and scorer run strictly in sequence. Every
//! failure, including a panic inside a stage, becomes a sentinel report
//! tagged with the stage that failed, so callers never need to guard the
//! call itself.
//!
//! Caught panics still pass through the process panic hook, which prints to
//! stderr by default. Batch callers swap in a quieter hook around [`grade`].

use std::panic::{self, AssertUnwindSafe};

use maze_grader_core::{
    BenchmarkKind, Event, FailureKind, GradeReport, GraderConfig, ScoreReport,
};
use maze_grader_system_parser::parse;
use maze_grader_system_pathfinder::solve;
use maze_grader_system_scoring::{score, validate_structure};
use maze_grader_world::{query, MazeModel};
use tracing::{debug, warn};

/// Message reported when the search budget runs out.
pub const TIMEOUT_MESSAGE: &str = "Maze solving timeout - maze may be too complex";

#[derive(Debug)]
struct StageFailure {
    kind: FailureKind,
    message: String,
}

impl StageFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Grades `text` against `benchmark`, pushing progress events into `out`.
///
/// Always returns a report. Failed grades carry the sentinel score and the
/// kind of the stage that stopped them.
pub fn grade(
    text: &str,
    benchmark: BenchmarkKind,
    config: &GraderConfig,
    out: &mut Vec<Event>,
) -> GradeReport {
    debug!(%benchmark, bytes = text.len(), "grading input");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match benchmark {
        BenchmarkKind::Maze => grade_maze(text, config, out),
    }))
    .unwrap_or_else(|payload| {
        Err(StageFailure::new(
            FailureKind::Evaluation,
            format!(
                "Unexpected error during evaluation: {}",
                panic_message(payload.as_ref())
            ),
        ))
    });

    match outcome {
        Ok(report) => {
            debug!(score = report.score, "grade completed");
            out.push(Event::GradeCompleted {
                score: report.score,
            });
            GradeReport::scored(benchmark, report)
        }
        Err(failure) => {
            warn!(kind = %failure.kind, message = %failure.message, "grade failed");
            out.push(Event::GradeFailed {
                kind: failure.kind,
                message: failure.message.clone(),
            });
            GradeReport::failed(benchmark, failure.kind, failure.message)
        }
    }
}

fn grade_maze(
    text: &str,
    config: &GraderConfig,
    out: &mut Vec<Event>,
) -> Result<ScoreReport, StageFailure> {
    let grid = parse(text, &config.limits, config.policies.invalid_characters).map_err(
        |error| StageFailure::new(FailureKind::Parsing, format!("Maze parsing failed: {error}")),
    )?;
    out.push(Event::GridParsed {
        columns: grid.columns(),
        rows: grid.rows(),
    });

    let model = MazeModel::build(grid, config.policies.teleporter_pairing);
    let counts = query::strategic_counts(&model);
    out.push(Event::ModelBuilt {
        keys: query::keys(&model).len(),
        doors: query::doors(&model).len(),
        teleporters: counts.teleporters,
        switches: counts.switches,
        blocks: counts.movable_blocks,
    });

    let (start, end) = validate_structure(&model)
        .map_err(|error| StageFailure::new(FailureKind::Validation, error.to_string()))?;

    out.push(Event::SearchStarted {
        start,
        end,
        iteration_limit: config.search.iteration_limit(query::grid(&model).area()),
        time_limit: config.search.time_limit(),
    });
    let solution = solve(&model, start, end, &config.search, config.policies.blocks);
    out.push(Event::SearchFinished {
        outcome: solution.outcome(),
        expanded_states: solution.expanded_states,
        path_length: solution.path_length,
    });

    if solution.timeout {
        return Err(StageFailure::new(FailureKind::Timeout, TIMEOUT_MESSAGE));
    }

    Ok(score(&model, &solution, config))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
