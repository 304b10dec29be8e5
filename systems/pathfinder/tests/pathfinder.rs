use maze_grader_core::{
    BlockPolicy, Cell, CellCoord, Grid, GridLimits, InvalidCharacterPolicy, SearchBudget,
    SolutionDescriptor, TeleporterPairing,
};
use maze_grader_system_parser::parse;
use maze_grader_system_pathfinder::solve;
use maze_grader_world::{query, MazeModel};

fn build(lines: &[&str]) -> MazeModel {
    MazeModel::build(Grid::from_lines(lines), TeleporterPairing::DiscoveryOrder)
}

fn solve_default(model: &MazeModel) -> SolutionDescriptor {
    solve_with(model, &SearchBudget::default())
}

fn solve_with(model: &MazeModel, budget: &SearchBudget) -> SolutionDescriptor {
    let start = query::start_positions(model)[0];
    let end = query::end_positions(model)[0];
    solve(model, start, end, budget, BlockPolicy::Passable)
}

fn assert_path_is_contiguous(model: &MazeModel, solution: &SolutionDescriptor) {
    for pair in solution.path.windows(2) {
        let teleported = query::cell_at(model, pair[0]) == Some(Cell::TeleportOrigin);
        assert!(
            teleported || pair[0].manhattan_distance(pair[1]) == 1,
            "path jumps from {} to {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn key_then_door_corridor_is_solved_with_one_chain() {
    let grid = parse(
        "```\nS a A\n#####E\n```",
        &GridLimits::default(),
        InvalidCharacterPolicy::Reject,
    )
    .expect("corridor parses");
    let model = MazeModel::build(grid, TeleporterPairing::DiscoveryOrder);

    let solution = solve_default(&model);

    assert!(solution.solvable);
    assert!(!solution.timeout);
    assert_eq!(solution.chain_length, 1);
    assert_eq!(solution.path_length, 7);
    assert_eq!(solution.path.first(), Some(&CellCoord::new(0, 0)));
    assert_eq!(solution.path.last(), Some(&CellCoord::new(5, 1)));
    assert!(solution.keys_collected.contains(&'a'));
    assert_path_is_contiguous(&model, &solution);
}

#[test]
fn door_before_key_is_proven_unsolvable() {
    let model = build(&["S A a", "#####E"]);

    let solution = solve_default(&model);

    assert!(!solution.solvable);
    assert!(!solution.timeout, "exhausted frontier is not a timeout");
    assert!(solution.path.is_empty());
    assert_eq!(solution.path_length, 0);
}

#[test]
fn switch_opens_y_door_only_when_reached_first() {
    let blocked = build(&["S Y s E"]);
    let solution = solve_default(&blocked);
    assert!(!solution.solvable);
    assert!(!solution.timeout);

    let open = build(&["s S Y E"]);
    let solution = solve_default(&open);
    assert!(solution.solvable);
    assert!(solution.switches_activated.contains(&CellCoord::new(0, 0)));
    assert_eq!(solution.path_length, 9);
    assert_path_is_contiguous(&open, &solution);
}

#[test]
fn x_door_requires_two_keys() {
    assert!(!solve_default(&build(&["Sa X E"])).solvable);

    let solution = solve_default(&build(&["SabX E"]));
    assert!(solution.solvable);
    assert_eq!(solution.keys_collected.len(), 2);
}

#[test]
fn z_door_requires_key_and_switch() {
    assert!(!solve_default(&build(&["S sZ E"])).solvable);
    assert!(!solve_default(&build(&["S aZ E"])).solvable);
    assert!(solve_default(&build(&["SasZ E"])).solvable);
}

#[test]
fn open_grid_path_follows_manhattan_distance() {
    let model = build(&["S    ", "     ", "     ", "    E"]);
    let start = query::start_positions(&model)[0];
    let end = query::end_positions(&model)[0];

    let solution = solve_default(&model);

    assert!(solution.solvable);
    assert_eq!(solution.chain_length, 0);
    assert_eq!(
        solution.path_length,
        start.manhattan_distance(end) as usize + 1,
        "shortest path visits distance + 1 cells"
    );
    assert_path_is_contiguous(&model, &solution);
}

#[test]
fn doors_on_the_path_follow_their_keys() {
    let model = build(&["  A C E", "S######", "ac#####"]);

    let solution = solve_default(&model);

    assert!(solution.solvable);
    assert_eq!(solution.chain_length, 2);
    for (position, cell) in solution.path.iter().enumerate() {
        let Some(Cell::Door(letter)) = query::cell_at(&model, *cell) else {
            continue;
        };
        let key = query::keys(&model)[&letter.to_ascii_lowercase()];
        assert!(
            solution.path[..position].contains(&key),
            "door {letter} reached before its key"
        );
    }
}

#[test]
fn consumed_teleporter_becomes_plain_floor() {
    let model = build(&["S O E", "  Q  "]);

    let solution = solve_default(&model);

    assert!(solution.solvable);
    assert_path_is_contiguous(&model, &solution);
    assert_eq!(solution.path.last(), Some(&CellCoord::new(4, 0)));
}

#[test]
fn exhausted_clock_is_reported_as_timeout() {
    let model = build(&["S   E"]);
    let budget = SearchBudget {
        timeout_ms: 0,
        iteration_multiplier: 20,
    };

    let solution = solve_with(&model, &budget);

    assert!(solution.timeout);
    assert!(!solution.solvable);
}

#[test]
fn search_is_deterministic() {
    let model = build(&["S a #", "  # A", "b  BE"]);

    assert_eq!(solve_default(&model), solve_default(&model));
}

#[test]
fn classic_k_and_d_markers_are_walkable() {
    let model = build(&["S K D E"]);

    let solution = solve_default(&model);

    assert!(solution.solvable, "K and D never need keys");
    assert_eq!(solution.chain_length, 0);
    assert_eq!(solution.path_length, 7);
    assert!(solution.keys_collected.is_empty());
}

#[test]
fn all_destinations_pairing_jumps_to_first_destination() {
    let lines = ["O#Q E", "#####", "SO#Q#"];

    let paired = build(&lines);
    assert!(
        !solve_default(&paired).solvable,
        "second origin pairs with the walled-in second destination"
    );

    let model = MazeModel::build(Grid::from_lines(lines), TeleporterPairing::AllDestinations);
    let solution = solve_default(&model);

    assert!(solution.solvable);
    assert_eq!(
        solution.path,
        vec![
            CellCoord::new(0, 2),
            CellCoord::new(1, 2),
            CellCoord::new(2, 0),
            CellCoord::new(3, 0),
            CellCoord::new(4, 0),
        ]
    );
    assert!(solution.teleporters_used.contains(&CellCoord::new(1, 2)));
    assert_path_is_contiguous(&model, &solution);
}

#[test]
fn teleporter_loop_without_exit_is_proven_unsolvable() {
    let model = build(&["SO#E", "Q###"]);

    let solution = solve_default(&model);

    assert!(!solution.solvable);
    assert!(!solution.timeout, "a closed loop exhausts the frontier");
    assert!(solution.path.is_empty());
}
