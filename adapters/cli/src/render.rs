//! Human-readable rendering of grade reports.

use std::fmt::Write as _;

use maze_grader_core::{report::MazeInfo, GradeOutcome, GradeReport, ScoreReport};

/// Renders a report as the multi-line text summary printed by default.
pub(crate) fn render_report(report: &GradeReport) -> String {
    match &report.outcome {
        GradeOutcome::Scored(scored) => render_scored(scored),
        GradeOutcome::Failed(failure) => format!(
            "[ERROR] {} failed: {}\nScore: {}",
            failure.kind, failure.message, failure.score
        ),
    }
}

/// Renders one ingested submission with its model name and recorded time.
pub(crate) fn render_ingested(model: &str, elapsed_seconds: f64, report: &GradeReport) -> String {
    format!(
        "== {model} (time: {elapsed_seconds}s)\n{}\n",
        render_report(report)
    )
}

fn render_scored(report: &ScoreReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[RESULTS] STRATEGIC MAZE BENCHMARK");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Total Score: {} points", report.score);
    let _ = writeln!(out, "Base Score: {} points", report.base_score);
    if report.structure_penalty != 0.0 {
        let _ = writeln!(
            out,
            "Structure Penalty: {:.0}% (Traps > Walls)",
            report.structure_penalty * 100.0
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "SCORE BREAKDOWN:");
    let _ = writeln!(out, "{}", "-".repeat(20));
    for (name, score, description) in report.components.summary() {
        let _ = writeln!(out, "{:20}: {score:6.1} pts - {description}", title_case(name));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "MAZE ANALYSIS:");
    let _ = writeln!(out, "{}", "-".repeat(16));
    render_maze_info(&mut out, &report.maze_info);

    if report.structure_penalty != 0.0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "[WARNING] This maze violates the structure constraint!");
        let _ = writeln!(out, "          Traps must not significantly outnumber walls.");
    }

    out.trim_end().to_owned()
}

fn render_maze_info(out: &mut String, info: &MazeInfo) {
    let count = |symbol: char| info.elements.get(&symbol).copied().unwrap_or(0);

    let _ = writeln!(out, "Dimensions: {}", info.dimensions);
    let _ = writeln!(
        out,
        "Elements: S={}, E={}, K={}, D={}, T={}, #={}",
        count('S'),
        count('E'),
        count('K'),
        count('D'),
        count('T'),
        count('#')
    );
    let _ = writeln!(out, "Solvable: {}", if info.solvable { "Yes" } else { "No" });
    let _ = writeln!(out, "Complexity Ratio: {:.2}", info.complexity_ratio);

    let strategic = &info.strategic_elements;
    if strategic.total() > 0 {
        let _ = writeln!(
            out,
            "Strategic Elements: teleporters={}, switches={}, movable_blocks={}, bonus_exits={}, conditional_doors={}",
            strategic.teleporters,
            strategic.switches,
            strategic.movable_blocks,
            strategic.bonus_exits,
            strategic.conditional_doors
        );
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
