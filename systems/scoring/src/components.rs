//! Independent scoring components.
//!
//! Each function reads only the inputs it needs and returns an unrounded
//! score alongside its typed details, so every component can be exercised in
//! isolation.

use std::collections::BTreeSet;

use maze_grader_core::{
    report::{
        AmbitionDetails, BonusDetails, ChainDetails, CompletionDetails, Component, DangerDetails,
        EfficiencyDetails, InnovationDetails, RouteComplexityDetails,
    },
    AmbitionWeights, Cell, DangerScaling, InnovationWeights, RouteWeights, SolutionDescriptor,
};
use maze_grader_world::{query, MazeModel};

/// Rewards grid size and the strategic elements the layout attempts.
#[must_use]
pub fn ambition(model: &MazeModel, weights: &AmbitionWeights) -> Component<AmbitionDetails> {
    let grid = query::grid(model);
    let grid_size = grid.area();
    let size_score = if grid_size > 0 {
        weights.log_scale * (grid_size as f64).log2()
    } else {
        0.0
    };

    let counts = query::strategic_counts(model);
    let strategic_bonus = counts.teleporters as f64 * weights.teleporter
        + counts.switches as f64 * weights.switch
        + counts.bonus_exits as f64 * weights.bonus_exit
        + counts.conditional_doors as f64 * weights.conditional_door;

    Component {
        score: size_score + strategic_bonus,
        description: format!("Grid {}x{} + strategic elements", grid.rows(), grid.columns()),
        details: AmbitionDetails {
            rows: grid.rows(),
            cols: grid.columns(),
            grid_size,
            strategic_bonus,
        },
    }
}

/// Credits the strategic behaviours the solution actually exercised.
#[must_use]
pub fn strategic_innovation(
    model: &MazeModel,
    solution: &SolutionDescriptor,
    weights: &InnovationWeights,
) -> Component<InnovationDetails> {
    let mut details = InnovationDetails::default();
    let mut score = 0.0;

    let teleports = solution.teleporters_used.len();
    if teleports > 0 {
        score += weights.teleports.apply(teleports);
        details.teleporters_used = teleports;
        details
            .unique_strategies
            .push(format!("Used {teleports} teleporters"));
    }

    let switches = solution.switches_activated.len();
    if switches > 0 {
        score += weights.switches.apply(switches);
        details.switches_activated = switches;
        details
            .unique_strategies
            .push(format!("Activated {switches} switches"));
    }

    if solution.solvable {
        let bonus_exits = bonus_exits_on_path(model, solution);
        score += weights.bonus_exits.apply(bonus_exits.len());
        details.bonus_exits_reached = bonus_exits.len();
        for letter in bonus_exits {
            details
                .unique_strategies
                .push(format!("Reached bonus exit {letter}"));
        }

        let gates = conditional_doors_on_path(model, solution);
        score += weights.conditional_doors.apply(gates.len());
        details.conditional_doors_used = gates.len();
        for letter in gates {
            details
                .unique_strategies
                .push(format!("Used conditional door {letter}"));
        }
    }

    Component {
        score,
        description: "Creative use of strategic maze elements".to_owned(),
        details,
    }
}

/// Credits structural density of strategic elements and key/door cells.
///
/// Unsolved mazes earn nothing here.
#[must_use]
pub fn route_complexity(
    model: &MazeModel,
    solution: &SolutionDescriptor,
    weights: &RouteWeights,
) -> Component<RouteComplexityDetails> {
    let description = "Strategic elements and key/door pairs in the layout".to_owned();
    if !solution.solvable {
        return Component {
            score: 0.0,
            description,
            details: RouteComplexityDetails::default(),
        };
    }

    let strategic_elements = query::strategic_counts(model).total();
    let keys_and_doors = query::grid(model)
        .iter()
        .filter(|(_, symbol)| matches!(Cell::from_char(*symbol), Some(Cell::Key(_) | Cell::Door(_))))
        .count();

    let score = (weights.strategic_elements.apply(strategic_elements)
        + weights.keys_and_doors.apply(keys_and_doors))
    .min(weights.aggregate_cap);

    Component {
        score,
        description,
        details: RouteComplexityDetails {
            strategic_elements,
            keys_and_doors,
            strategic_decisions: strategic_elements + keys_and_doors,
        },
    }
}

/// Key/door pairs traversed along the solution.
#[must_use]
pub fn chain(solution: &SolutionDescriptor, weight: f64) -> Component<ChainDetails> {
    Component {
        score: solution.chain_length as f64 * weight,
        description: format!("{} Key/Door pairs solved x {weight}", solution.chain_length),
        details: ChainDetails {
            chain_length: solution.chain_length,
            keys_collected: solution.keys_collected.iter().copied().collect(),
            path_length: solution.path_length,
        },
    }
}

/// Share of the grid covered by the solution path.
#[must_use]
pub fn path_efficiency(
    model: &MazeModel,
    solution: &SolutionDescriptor,
    scale: f64,
) -> Component<EfficiencyDetails> {
    let grid_size = query::grid(model).area();
    let ratio = if grid_size > 0 {
        solution.path_length as f64 / grid_size as f64
    } else {
        0.0
    };
    let score = if solution.solvable { ratio * scale } else { 0.0 };

    Component {
        score,
        description: format!(
            "Optimal path uses {}/{grid_size} cells ({:.1}%)",
            solution.path_length,
            ratio * 100.0
        ),
        details: EfficiencyDetails {
            path_length: solution.path_length,
            grid_size,
            efficiency_ratio: round_to(ratio, 4),
        },
    }
}

/// Fixed reward for reaching the end.
#[must_use]
pub fn completion(solution: &SolutionDescriptor, bonus: f64) -> Component<CompletionDetails> {
    let (score, description) = if solution.solvable {
        (bonus, "Successfully reached End 'E'")
    } else {
        (0.0, "Failed to reach End 'E'")
    };

    Component {
        score,
        description: description.to_owned(),
        details: CompletionDetails {
            solvable: solution.solvable,
        },
    }
}

/// Saturating reward for traps placed beside the solution path.
#[must_use]
pub fn danger(
    model: &MazeModel,
    solution: &SolutionDescriptor,
    scaling: &DangerScaling,
) -> Component<DangerDetails> {
    let adjacent_traps = count_adjacent_traps(model, solution);

    Component {
        score: scaling.apply(adjacent_traps),
        description: format!("Traps beside the solution path ({})", scaling.label()),
        details: DangerDetails { adjacent_traps },
    }
}

/// Fixed reward per distinct bonus exit crossed by the solution.
#[must_use]
pub fn bonus_objectives(
    model: &MazeModel,
    solution: &SolutionDescriptor,
    reward: f64,
) -> Component<BonusDetails> {
    let reached = if solution.solvable {
        bonus_exits_on_path(model, solution).len()
    } else {
        0
    };

    Component {
        score: reached as f64 * reward,
        description: "Completed optional strategic challenges".to_owned(),
        details: BonusDetails {
            bonus_exits_reached: reached,
        },
    }
}

/// Counts `(path cell, trap)` adjacencies over the distinct cells of the path.
#[must_use]
pub fn count_adjacent_traps(model: &MazeModel, solution: &SolutionDescriptor) -> usize {
    let cells: BTreeSet<_> = solution.path.iter().copied().collect();

    cells
        .into_iter()
        .map(|cell| {
            query::neighbors(model, cell)
                .filter(|neighbor| query::cell_at(model, *neighbor) == Some(Cell::Trap))
                .count()
        })
        .sum()
}

fn bonus_exits_on_path(model: &MazeModel, solution: &SolutionDescriptor) -> BTreeSet<char> {
    solution
        .path
        .iter()
        .filter_map(|cell| match query::cell_at(model, *cell) {
            Some(Cell::BonusExit(letter)) => Some(letter),
            _ => None,
        })
        .collect()
}

fn conditional_doors_on_path(model: &MazeModel, solution: &SolutionDescriptor) -> BTreeSet<char> {
    solution
        .path
        .iter()
        .filter_map(|cell| match query::cell_at(model, *cell) {
            Some(Cell::ConditionalDoor(gate)) => Some(gate.symbol()),
            _ => None,
        })
        .collect()
}

/// Rounds `value` to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
