use maze_grader_core::{CellCoord, GridLimits, InvalidCharacterPolicy};
use maze_grader_system_parser::{parse, ParseError};

fn small_limits() -> GridLimits {
    GridLimits {
        max_rows: 4,
        max_cols: 6,
        max_cells: 24,
    }
}

#[test]
fn ragged_rows_are_padded_to_the_widest_row() {
    let text = "```\n#S\n#  a A#\n#E\n```";
    let grid = parse(text, &GridLimits::default(), InvalidCharacterPolicy::Reject)
        .expect("ragged input parses");

    assert_eq!(grid.columns(), 7);
    assert_eq!(grid.rows(), 3);
    for line in grid.lines() {
        assert_eq!(line.chars().count(), 7, "row `{line}` was not padded");
    }
    assert_eq!(grid.symbol(CellCoord::new(6, 0)), Some(' '));
}

#[test]
fn too_many_rows_short_circuits() {
    let rows = vec!["#S E#"; 5].join("\n");
    let text = format!("```\n{rows}\n```");

    assert_eq!(
        parse(&text, &small_limits(), InvalidCharacterPolicy::Reject),
        Err(ParseError::TooManyRows { rows: 5, max: 4 })
    );
}

#[test]
fn limits_are_checked_before_character_validation() {
    let text = "```\nS......E\n```";

    assert_eq!(
        parse(text, &small_limits(), InvalidCharacterPolicy::Reject),
        Err(ParseError::TooManyColumns { columns: 8, max: 6 })
    );
}

#[test]
fn maze_rows_are_recovered_from_surrounding_prose() {
    let text = "TIME: 3.2s\n## My maze\n#S aE#\n# ## #\nThat is all.";
    let grid = parse(text, &GridLimits::default(), InvalidCharacterPolicy::ReplaceWithWall)
        .expect("heuristic extraction succeeds");

    let lines: Vec<String> = grid.lines().collect();
    assert_eq!(
        lines,
        vec!["#S aE#      ", "# ## #      ", "That is all#"],
        "headings and metadata lines must be dropped"
    );
}

#[test]
fn parsing_is_idempotent() {
    let text = "```\n#S a A E#\n```";
    let first = parse(text, &GridLimits::default(), InvalidCharacterPolicy::Reject);
    let second = parse(text, &GridLimits::default(), InvalidCharacterPolicy::Reject);

    assert_eq!(first, second);
}
