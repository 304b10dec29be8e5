#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Parser that extracts a normalised maze grid from free-form text.
//!
//! Candidate text is taken from the first fenced code block when one is
//! present; otherwise lines that look like maze rows are kept. Size limits
//! are enforced on the trimmed rows before any padding takes place.

use std::sync::OnceLock;

use maze_grader_core::{Cell, Grid, GridLimits, InvalidCharacterPolicy};
use regex::Regex;
use thiserror::Error;

static FENCED_BLOCK: OnceLock<Regex> = OnceLock::new();

fn fenced_block() -> &'static Regex {
    FENCED_BLOCK.get_or_init(|| {
        Regex::new(r"(?s)```(?:markdown)?\n(.*?)\n```").expect("valid regex")
    })
}

/// Reasons the parser refuses an input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty or contained only whitespace.
    #[error("Empty or whitespace-only input provided")]
    Empty,
    /// Neither a fenced block nor maze-like lines were found.
    #[error("No maze-like content found in input text")]
    NoMazeContent,
    /// More rows than the configured maximum.
    #[error("Maze too tall: {rows} rows (maximum: {max})")]
    TooManyRows {
        /// Rows found after trimming.
        rows: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Widest row exceeds the configured maximum.
    #[error("Maze too wide: {columns} columns (maximum: {max})")]
    TooManyColumns {
        /// Width of the widest row.
        columns: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Padded grid would exceed the configured cell budget.
    #[error("Maze too large: {rows}x{columns} = {cells} cells (maximum: {max})")]
    TooManyCells {
        /// Rows found after trimming.
        rows: usize,
        /// Width of the widest row.
        columns: usize,
        /// `rows × columns`.
        cells: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Characters outside the maze alphabet were present.
    #[error("Invalid characters found in maze: {}", .0.join(", "))]
    InvalidCharacters(Vec<String>),
}

/// Extracts, normalises and validates a maze grid from `text`.
pub fn parse(
    text: &str,
    limits: &GridLimits,
    policy: InvalidCharacterPolicy,
) -> Result<Grid, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let rows = candidate_rows(text)?;
    check_limits(&rows, limits)?;

    let grid = Grid::from_lines(&rows);
    apply_character_policy(grid, policy)
}

fn candidate_rows(text: &str) -> Result<Vec<&str>, ParseError> {
    let rows: Vec<&str> = match fenced_block().captures(text).and_then(|captures| captures.get(1)) {
        Some(block) => block
            .as_str()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect(),
        None => text
            .lines()
            .map(str::trim)
            .filter(|line| looks_like_maze_row(line))
            .collect(),
    };

    if rows.is_empty() {
        return Err(ParseError::NoMazeContent);
    }
    Ok(rows)
}

fn looks_like_maze_row(line: &str) -> bool {
    if line.chars().count() < 3 || line.starts_with("##") {
        return false;
    }
    if line.to_uppercase().starts_with("TIME:") {
        return false;
    }
    line.chars().any(Cell::is_valid_symbol)
}

fn check_limits(rows: &[&str], limits: &GridLimits) -> Result<(), ParseError> {
    if rows.len() > limits.max_rows {
        return Err(ParseError::TooManyRows {
            rows: rows.len(),
            max: limits.max_rows,
        });
    }

    let columns = rows
        .iter()
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0);
    if columns > limits.max_cols {
        return Err(ParseError::TooManyColumns {
            columns,
            max: limits.max_cols,
        });
    }

    let cells = rows.len().saturating_mul(columns);
    if cells > limits.max_cells {
        return Err(ParseError::TooManyCells {
            rows: rows.len(),
            columns,
            cells,
            max: limits.max_cells,
        });
    }

    Ok(())
}

fn apply_character_policy(grid: Grid, policy: InvalidCharacterPolicy) -> Result<Grid, ParseError> {
    let invalid: Vec<_> = grid
        .iter()
        .filter(|(_, symbol)| !Cell::is_valid_symbol(*symbol))
        .collect();

    if invalid.is_empty() {
        return Ok(grid);
    }

    match policy {
        InvalidCharacterPolicy::Reject => {
            let mut found: Vec<String> = invalid
                .into_iter()
                .map(|(cell, symbol)| format!("'{symbol}' at {cell}"))
                .collect();
            found.sort();
            found.dedup();
            Err(ParseError::InvalidCharacters(found))
        }
        InvalidCharacterPolicy::ReplaceWithWall => {
            let lines: Vec<String> = grid
                .lines()
                .map(|line| {
                    line.chars()
                        .map(|symbol| {
                            if Cell::is_valid_symbol(symbol) {
                                symbol
                            } else {
                                '#'
                            }
                        })
                        .collect()
                })
                .collect();
            Ok(Grid::from_lines(lines))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{looks_like_maze_row, parse, ParseError};
    use maze_grader_core::{GridLimits, InvalidCharacterPolicy};

    fn parse_default(text: &str) -> Result<Vec<String>, ParseError> {
        parse(text, &GridLimits::default(), InvalidCharacterPolicy::Reject)
            .map(|grid| grid.lines().collect())
    }

    #[test]
    fn heuristic_skips_headings_and_metadata() {
        assert!(!looks_like_maze_row("## Solution"));
        assert!(!looks_like_maze_row("time: 12.5"));
        assert!(!looks_like_maze_row("S"));
        assert!(looks_like_maze_row("#S E#"));
    }

    #[test]
    fn fenced_block_is_preferred_over_prose() {
        let text = "Here is my maze:\n```\n#####\n#S E#\n#####\n```\nEnjoy solving it!";
        assert_eq!(
            parse_default(text),
            Ok(vec![
                "#####".to_owned(),
                "#S E#".to_owned(),
                "#####".to_owned()
            ])
        );
    }

    #[test]
    fn markdown_fence_tag_is_accepted() {
        let text = "```markdown\nS E\n```";
        assert_eq!(parse_default(text), Ok(vec!["S E".to_owned()]));
    }

    #[test]
    fn whitespace_input_is_empty() {
        assert_eq!(parse_default("  \n\t \n"), Err(ParseError::Empty));
    }

    #[test]
    fn prose_without_maze_rows_is_rejected() {
        assert_eq!(parse_default("ok\n## Heading\nTIME: 4"), Err(ParseError::NoMazeContent));
    }

    #[test]
    fn invalid_characters_are_listed_in_order() {
        let error = parse_default("```\n#S.E#\n#!###\n```").expect_err("dots are invalid");
        assert_eq!(
            error,
            ParseError::InvalidCharacters(vec![
                "'!' at (1, 1)".to_owned(),
                "'.' at (0, 2)".to_owned(),
            ])
        );
        assert!(error.to_string().starts_with("Invalid characters found in maze"));
    }

    #[test]
    fn invalid_characters_can_become_walls() {
        let grid = parse(
            "```\nS.E\n```",
            &GridLimits::default(),
            InvalidCharacterPolicy::ReplaceWithWall,
        )
        .expect("replacement policy never rejects");
        assert_eq!(grid.lines().collect::<Vec<_>>(), vec!["S#E"]);
    }

    #[test]
    fn cell_budget_is_checked_on_trimmed_rows() {
        let limits = GridLimits {
            max_rows: 10,
            max_cols: 10,
            max_cells: 20,
        };
        let text = "```\n#####\n#S  #\n#   #\n#  E#\n#####\n```";
        assert_eq!(
            parse(text, &limits, InvalidCharacterPolicy::Reject),
            Err(ParseError::TooManyCells {
                rows: 5,
                columns: 5,
                cells: 25,
                max: 20,
            })
        );
    }
}
