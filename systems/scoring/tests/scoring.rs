use maze_grader_core::{BlockPolicy, GraderConfig, Grid, ScoreReport, TeleporterPairing};
use maze_grader_system_pathfinder::solve;
use maze_grader_system_scoring::{score, validate_structure};
use maze_grader_world::MazeModel;

fn grade_lines(lines: &[&str], config: &GraderConfig) -> ScoreReport {
    let model = MazeModel::build(Grid::from_lines(lines), TeleporterPairing::DiscoveryOrder);
    let (start, end) = validate_structure(&model).expect("maze has one start and one end");
    let solution = solve(&model, start, end, &config.search, BlockPolicy::Passable);
    score(&model, &solution, config)
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 0.011,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn corridor_report_adds_up_its_components() {
    let report = grade_lines(&["S a A", "#####E"], &GraderConfig::default());
    let components = &report.components;

    assert_close(components.ambition.score, 358.5, "ambition");
    assert_close(components.route_complexity.score, 16.0, "route complexity");
    assert_close(components.complexity.score, 50.0, "chain");
    assert_close(components.path_efficiency.score, 58.33, "path efficiency");
    assert_close(components.completion.score, 50.0, "completion");
    assert_close(components.danger.score, 0.0, "danger");
    assert_close(report.base_score, 532.83, "base score");
    assert_close(report.score, report.base_score, "unpenalised total");
    assert!(report.structure_penalty.abs() < f64::EPSILON);

    assert_eq!(report.maze_info.dimensions, "2x6");
    assert_eq!(report.maze_info.chain_length, 1);
    assert_eq!(report.maze_info.path_length, 7);
    assert_eq!(report.maze_info.keys_collected, vec!['a']);
    assert_eq!(report.maze_info.elements[&'#'], 5);
    assert_close(report.maze_info.complexity_ratio, 0.417, "complexity ratio");
}

#[test]
fn trap_heavy_maze_is_scaled_down() {
    let report = grade_lines(&["STTTE"], &GraderConfig::default());

    assert!((report.structure_penalty + 0.25).abs() < f64::EPSILON);
    assert_close(report.score, report.base_score * 0.75, "penalised total");
    assert_eq!(report.components.danger.details.adjacent_traps, 6);
    assert_close(report.components.danger.score, 30.0, "danger is capped");
}

#[test]
fn unsolvable_maze_still_earns_ambition() {
    let report = grade_lines(&["S#E"], &GraderConfig::default());

    assert!(!report.maze_info.solvable);
    assert!(!report.maze_info.timeout);
    assert!(report.components.ambition.score > 0.0);
    assert_close(report.components.completion.score, 0.0, "completion");
    assert_close(report.components.path_efficiency.score, 0.0, "path efficiency");
    assert_close(report.components.route_complexity.score, 0.0, "route complexity");
}

#[test]
fn scoring_is_idempotent() {
    let config = GraderConfig::default();
    let lines = ["S a A O", "##### Q", "F T s E"];

    assert_eq!(grade_lines(&lines, &config), grade_lines(&lines, &config));
}

#[test]
fn classic_markers_are_counted_but_not_scored_as_doors() {
    let report = grade_lines(&["S K D E"], &GraderConfig::default());

    assert!(report.maze_info.solvable);
    assert_eq!(report.components.route_complexity.details.keys_and_doors, 0);
    assert_eq!(report.maze_info.elements[&'K'], 1);
    assert_eq!(report.maze_info.elements[&'D'], 1);
}
