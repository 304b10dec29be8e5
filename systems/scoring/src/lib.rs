#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scorer that folds a maze model and its solution into a weighted report.
//!
//! Structural validation runs before the pathfinder: a maze without exactly
//! one start and one end is never scored.

pub mod components;

use std::collections::BTreeMap;

use maze_grader_core::{
    report::{Component, MazeInfo, ScoreComponents},
    CellCoord, GraderConfig, ScoreReport, SolutionDescriptor,
};
use maze_grader_world::{query, MazeModel};
use thiserror::Error;

use crate::components::round_to;

/// Symbols whose counts are reported in [`MazeInfo::elements`].
pub const COUNTED_SYMBOLS: [char; 16] = [
    'S', 'E', 'K', 'D', 'T', '#', 'O', 'Q', 's', 'B', 'F', 'G', 'H', 'X', 'Y', 'Z',
];

/// Violations of the single-start, single-end invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The grid has no `S`.
    #[error("No start position 'S' found")]
    MissingStart,
    /// The grid has no `E`.
    #[error("No end position 'E' found")]
    MissingEnd,
    /// The grid has more than one `S`.
    #[error("Must have exactly one start 'S' position (found: {0})")]
    DuplicateStart(usize),
    /// The grid has more than one `E`.
    #[error("Must have exactly one end 'E' position (found: {0})")]
    DuplicateEnd(usize),
}

/// Returns the unique start and end cells, or the first violated invariant.
pub fn validate_structure(model: &MazeModel) -> Result<(CellCoord, CellCoord), StructureError> {
    let start = match query::start_positions(model) {
        [] => return Err(StructureError::MissingStart),
        [start] => *start,
        many => return Err(StructureError::DuplicateStart(many.len())),
    };
    let end = match query::end_positions(model) {
        [] => return Err(StructureError::MissingEnd),
        [end] => *end,
        many => return Err(StructureError::DuplicateEnd(many.len())),
    };
    Ok((start, end))
}

/// Computes every component, the structure penalty and the final score.
#[must_use]
pub fn score(
    model: &MazeModel,
    solution: &SolutionDescriptor,
    config: &GraderConfig,
) -> ScoreReport {
    let weights = &config.scoring;

    let mut breakdown = ScoreComponents {
        ambition: components::ambition(model, &weights.ambition),
        strategic_innovation: components::strategic_innovation(
            model,
            solution,
            &weights.innovation,
        ),
        route_complexity: components::route_complexity(model, solution, &weights.route),
        complexity: components::chain(solution, weights.chain_weight),
        path_efficiency: components::path_efficiency(model, solution, weights.efficiency_scale),
        completion: components::completion(solution, weights.completion_bonus),
        danger: components::danger(model, solution, &weights.danger),
        bonus_objectives: components::bonus_objectives(
            model,
            solution,
            weights.bonus_exit_reward,
        ),
    };

    let base_score: f64 = breakdown.summary().map(|(_, score, _)| score).sum();
    round_scores(&mut breakdown);

    let grid = query::grid(model);
    let traps = query::trap_count(model);
    let walls = query::wall_count(model);
    let structure_penalty = config.penalty.penalty(traps, walls);
    let total = base_score * (1.0 + structure_penalty);

    let area = grid.area();
    let complexity_ratio = if area > 0 {
        round_to((traps + walls) as f64 / area as f64, 3)
    } else {
        0.0
    };

    let elements: BTreeMap<char, usize> = COUNTED_SYMBOLS
        .iter()
        .map(|&symbol| (symbol, grid.count(symbol)))
        .collect();

    ScoreReport {
        score: round_to(total, 2),
        base_score: round_to(base_score, 2),
        structure_penalty,
        components: breakdown,
        maze_info: MazeInfo {
            dimensions: format!("{}x{}", grid.rows(), grid.columns()),
            solvable: solution.solvable,
            timeout: solution.timeout,
            keys_collected: solution.keys_collected.iter().copied().collect(),
            chain_length: solution.chain_length,
            path_length: solution.path_length,
            strategic_elements: query::strategic_counts(model),
            elements,
            complexity_ratio,
        },
    }
}

fn round_scores(breakdown: &mut ScoreComponents) {
    fn round<D>(component: &mut Component<D>) {
        component.score = round_to(component.score, 2);
    }

    round(&mut breakdown.ambition);
    round(&mut breakdown.strategic_innovation);
    round(&mut breakdown.route_complexity);
    round(&mut breakdown.complexity);
    round(&mut breakdown.path_efficiency);
    round(&mut breakdown.completion);
    round(&mut breakdown.danger);
    round(&mut breakdown.bonus_objectives);
}

#[cfg(test)]
mod tests {
    use super::{validate_structure, StructureError};
    use maze_grader_core::{CellCoord, Grid, TeleporterPairing};
    use maze_grader_world::MazeModel;

    fn model(lines: &[&str]) -> MazeModel {
        MazeModel::build(Grid::from_lines(lines), TeleporterPairing::DiscoveryOrder)
    }

    #[test]
    fn structure_requires_single_start_and_end() {
        assert_eq!(
            validate_structure(&model(&["S E"])),
            Ok((CellCoord::new(0, 0), CellCoord::new(2, 0)))
        );
        assert_eq!(
            validate_structure(&model(&["  E"])),
            Err(StructureError::MissingStart)
        );
        assert_eq!(
            validate_structure(&model(&["S  "])),
            Err(StructureError::MissingEnd)
        );
        assert_eq!(
            validate_structure(&model(&["SSE"])),
            Err(StructureError::DuplicateStart(2))
        );
        assert_eq!(
            validate_structure(&model(&["SEE"])),
            Err(StructureError::DuplicateEnd(2))
        );
    }

    #[test]
    fn structure_errors_render_readable_messages() {
        assert_eq!(
            StructureError::DuplicateEnd(3).to_string(),
            "Must have exactly one end 'E' position (found: 3)"
        );
    }
}
