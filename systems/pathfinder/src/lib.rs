#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first solver over position, keys, switches and consumed teleporters.
//!
//! The search is iterative with an explicit frontier and visited set. Every
//! iteration checks the iteration cap and the wall-clock allowance, and an
//! exhausted budget is reported separately from a proven-unsolvable maze.

mod state;

use std::{
    collections::{BTreeSet, HashSet, VecDeque},
    time::Instant,
};

use maze_grader_core::{BlockPolicy, Cell, CellCoord, SearchBudget, SolutionDescriptor};
use maze_grader_world::{query, MazeModel};

use crate::state::SearchState;

#[derive(Debug)]
struct Node {
    state: SearchState,
    parent: Option<usize>,
    via: Option<CellCoord>,
}

/// Searches for a path from `start` to `end` within the provided budget.
///
/// Never fails: budget exhaustion yields a descriptor with `timeout` set and
/// an empty frontier yields one with `timeout` cleared.
#[must_use]
pub fn solve(
    model: &MazeModel,
    start: CellCoord,
    end: CellCoord,
    budget: &SearchBudget,
    blocks: BlockPolicy,
) -> SolutionDescriptor {
    let started = Instant::now();
    let time_limit = budget.time_limit();
    let iteration_limit = budget.iteration_limit(query::grid(model).area());

    let initial = SearchState::at(start);
    let mut visited = HashSet::new();
    let _ = visited.insert(initial.clone());
    let mut nodes = vec![Node {
        state: initial,
        parent: None,
        via: None,
    }];
    let mut frontier = VecDeque::from([0_usize]);
    let mut expanded = 0_usize;

    while let Some(index) = frontier.pop_front() {
        if expanded >= iteration_limit || started.elapsed() >= time_limit {
            return SolutionDescriptor::unsolved(true, expanded);
        }
        expanded += 1;

        if nodes[index].state.position == end {
            return reconstruct(model, &nodes, index, expanded);
        }

        let current = nodes[index].state.clone();
        for neighbor in query::neighbors(model, current.position) {
            let Some((next, via)) = step(model, &current, neighbor, blocks) else {
                continue;
            };
            if !visited.insert(next.clone()) {
                continue;
            }
            nodes.push(Node {
                state: next,
                parent: Some(index),
                via,
            });
            frontier.push_back(nodes.len() - 1);
        }
    }

    SolutionDescriptor::unsolved(false, expanded)
}

/// Applies the transition rules for moving from `current` onto `target`.
///
/// Returns the successor state and, when a teleporter fired, the origin cell
/// the move passed through.
fn step(
    model: &MazeModel,
    current: &SearchState,
    target: CellCoord,
    blocks: BlockPolicy,
) -> Option<(SearchState, Option<CellCoord>)> {
    let cell = query::cell_at(model, target)?;
    if !is_passable(cell, current, blocks) {
        return None;
    }

    let mut next = SearchState {
        position: target,
        ..current.clone()
    };
    let mut via = None;

    match cell {
        Cell::Key(letter) => next.keys = next.keys.with(letter),
        Cell::Switch => {
            if let Some(index) = query::switch_index(model, target) {
                let _ = next.switches.insert(index);
            }
        }
        Cell::TeleportOrigin => {
            if let Some(index) = query::teleporter_index(model, target) {
                if !next.teleporters.contains(index) {
                    if let Some(destination) =
                        query::teleport_targets(model, target).into_iter().next()
                    {
                        let _ = next.teleporters.insert(index);
                        next.position = destination;
                        via = Some(target);
                    }
                }
            }
        }
        _ => {}
    }

    Some((next, via))
}

fn is_passable(cell: Cell, current: &SearchState, blocks: BlockPolicy) -> bool {
    match cell {
        Cell::Wall => false,
        Cell::Block => blocks == BlockPolicy::Passable,
        Cell::Door(_) => cell
            .required_key()
            .is_some_and(|key| current.keys.holds(key)),
        Cell::ConditionalDoor(gate) => {
            gate.opens_with(current.keys.count(), current.switches.len())
        }
        _ => true,
    }
}

fn reconstruct(
    model: &MazeModel,
    nodes: &[Node],
    goal: usize,
    expanded: usize,
) -> SolutionDescriptor {
    let mut chain = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        chain.push(index);
        cursor = nodes[index].parent;
    }
    chain.reverse();

    let mut path = Vec::with_capacity(chain.len());
    let mut doors_seen = BTreeSet::new();
    let mut chain_length = 0;

    for &index in &chain {
        let node = &nodes[index];
        if let Some(origin) = node.via {
            path.push(origin);
        }
        path.push(node.state.position);

        if let Some(Cell::Door(letter)) = query::cell_at(model, node.state.position) {
            if doors_seen.insert(letter) && node.state.keys.holds(letter.to_ascii_lowercase()) {
                chain_length += 1;
            }
        }
    }

    let goal_state = &nodes[goal].state;
    let switches = query::switches(model);
    let origins = query::teleporter_origins(model);

    SolutionDescriptor {
        solvable: true,
        path_length: path.len(),
        path,
        keys_collected: goal_state.keys.letters().collect(),
        switches_activated: goal_state
            .switches
            .iter()
            .filter_map(|index| switches.get(index).copied())
            .collect(),
        teleporters_used: goal_state
            .teleporters
            .iter()
            .filter_map(|index| origins.get(index).copied())
            .collect(),
        chain_length,
        timeout: false,
        expanded_states: expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::solve;
    use maze_grader_core::{BlockPolicy, CellCoord, Grid, SearchBudget, TeleporterPairing};
    use maze_grader_world::MazeModel;

    fn model(lines: &[&str]) -> MazeModel {
        MazeModel::build(Grid::from_lines(lines), TeleporterPairing::DiscoveryOrder)
    }

    #[test]
    fn teleporter_path_lists_origin_and_destination() {
        let maze = model(&["S O#Q E"]);
        let solution = solve(
            &maze,
            CellCoord::new(0, 0),
            CellCoord::new(6, 0),
            &SearchBudget::default(),
            BlockPolicy::Passable,
        );

        assert!(solution.solvable);
        assert_eq!(
            solution.path,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(4, 0),
                CellCoord::new(5, 0),
                CellCoord::new(6, 0),
            ]
        );
        assert_eq!(solution.path_length, 6);
        assert!(solution.teleporters_used.contains(&CellCoord::new(2, 0)));
    }

    #[test]
    fn solid_blocks_behave_as_walls() {
        let maze = model(&["SBE"]);
        let start = CellCoord::new(0, 0);
        let end = CellCoord::new(2, 0);

        let passable = solve(&maze, start, end, &SearchBudget::default(), BlockPolicy::Passable);
        assert!(passable.solvable);

        let solid = solve(&maze, start, end, &SearchBudget::default(), BlockPolicy::Solid);
        assert!(!solid.solvable);
        assert!(!solid.timeout);
    }

    #[test]
    fn zero_iteration_budget_reports_timeout() {
        let maze = model(&["S E"]);
        let budget = SearchBudget {
            timeout_ms: 5_000,
            iteration_multiplier: 0,
        };
        let solution = solve(
            &maze,
            CellCoord::new(0, 0),
            CellCoord::new(2, 0),
            &budget,
            BlockPolicy::Passable,
        );

        assert!(solution.timeout);
        assert!(!solution.solvable);
        assert!(solution.path.is_empty());
    }
}
