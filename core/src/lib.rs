#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze grader.
//!
//! This crate defines the data surface that connects the grading stages.
//! The parser produces a [`Grid`], the world crate classifies it into an
//! immutable maze model, the pathfinder answers with a
//! [`SolutionDescriptor`], and the scorer folds everything into a
//! [`report::GradeReport`]. Stages never touch the filesystem; they push
//! [`Event`] values into a caller-supplied sink instead.

use std::{collections::BTreeSet, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub mod config;
pub mod report;

pub use config::{
    AmbitionWeights, BlockPolicy, Capped, DangerScaling, GraderConfig, GridLimits,
    InnovationWeights, InvalidCharacterPolicy, Policies, RouteWeights, ScoringWeights,
    SearchBudget, StructurePenaltyPolicy, TeleporterPairing,
};
pub use report::{FailureKind, GradeFailure, GradeOutcome, GradeReport, ScoreReport};

/// Score assigned to every grade that could not be computed.
pub const SENTINEL_SCORE: f64 = -100.0;

/// Version stamped into every serialised [`report::GradeReport`].
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Benchmarks the grader knows how to evaluate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkKind {
    /// Strategic ASCII maze with keys, doors, switches and teleporters.
    #[default]
    Maze,
}

impl BenchmarkKind {
    /// Canonical lowercase identifier of the benchmark.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maze => "maze",
        }
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a benchmark identifier is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownBenchmark(pub String);

impl fmt::Display for UnknownBenchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "benchmark '{}' is not supported", self.0)
    }
}

impl std::error::Error for UnknownBenchmark {}

impl FromStr for BenchmarkKind {
    type Err = UnknownBenchmark;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "maze" => Ok(Self::Maze),
            other => Err(UnknownBenchmark(other.to_owned())),
        }
    }
}

/// Structured events pushed into the caller's sink while a grade runs.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The parser produced a normalised grid.
    GridParsed {
        /// Number of columns after right-padding.
        columns: u32,
        /// Number of rows kept from the input.
        rows: u32,
    },
    /// The maze model finished classifying every cell.
    ModelBuilt {
        /// Number of distinct key letters registered.
        keys: usize,
        /// Number of distinct plain door letters registered.
        doors: usize,
        /// Number of teleporter origins discovered.
        teleporters: usize,
        /// Number of switches discovered.
        switches: usize,
        /// Number of movable blocks discovered.
        blocks: usize,
    },
    /// The pathfinder began exploring the state space.
    SearchStarted {
        /// Cell the search starts from.
        start: CellCoord,
        /// Cell the search tries to reach.
        end: CellCoord,
        /// Maximum number of states the search may expand.
        iteration_limit: usize,
        /// Wall-clock allowance for the search.
        time_limit: Duration,
    },
    /// The pathfinder stopped.
    SearchFinished {
        /// Terminal condition reached by the search.
        outcome: SearchOutcome,
        /// Number of states popped from the frontier.
        expanded_states: usize,
        /// Length of the recovered path, zero when unsolved.
        path_length: usize,
    },
    /// A complete score report was produced.
    GradeCompleted {
        /// Final penalised score.
        score: f64,
    },
    /// The grade failed and a sentinel report was produced.
    GradeFailed {
        /// Stage that caused the failure.
        kind: FailureKind,
        /// Human-readable reason.
        message: String,
    },
}

/// Terminal conditions the pathfinder can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A path from start to end was found.
    Solved,
    /// Every reachable state was expanded without reaching the end.
    Unsolvable,
    /// The iteration cap or the wall-clock timeout stopped the search.
    BudgetExhausted,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Requirement attached to a conditional door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    /// `X`: at least two distinct keys must be held.
    TwoKeys,
    /// `Y`: at least one switch must be active.
    Switch,
    /// `Z`: at least one key must be held and one switch active.
    KeyAndSwitch,
}

impl Gate {
    /// Letter used to draw the gate in a maze.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::TwoKeys => 'X',
            Self::Switch => 'Y',
            Self::KeyAndSwitch => 'Z',
        }
    }

    /// Reports whether the gate opens for the provided inventory.
    #[must_use]
    pub const fn opens_with(self, keys_held: u32, switches_active: usize) -> bool {
        match self {
            Self::TwoKeys => keys_held >= 2,
            Self::Switch => switches_active >= 1,
            Self::KeyAndSwitch => keys_held >= 1 && switches_active >= 1,
        }
    }
}

/// Static role of a single maze character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Space: open floor.
    Open,
    /// `#`: impassable wall.
    Wall,
    /// `S`: the single start position.
    Start,
    /// `E`: the single end position.
    End,
    /// `T`: trap, traversable but scored as danger.
    Trap,
    /// Lowercase letter other than `s`: a key.
    Key(char),
    /// Uppercase letter without another role: a door opened by its lowercase key.
    Door(char),
    /// `K` or `D`: marker kept from the classic maze format, walkable like floor.
    Legacy(char),
    /// `O`: teleporter origin.
    TeleportOrigin,
    /// `Q`: teleporter destination.
    TeleportDestination,
    /// `s`: switch that stays active once stepped on.
    Switch,
    /// `B`: movable block.
    Block,
    /// `F`, `G` or `H`: optional bonus exit.
    BonusExit(char),
    /// `X`, `Y` or `Z`: conditional door.
    ConditionalDoor(Gate),
}

impl Cell {
    /// Classifies a character, returning `None` when it lies outside the maze alphabet.
    #[must_use]
    pub const fn from_char(symbol: char) -> Option<Self> {
        let cell = match symbol {
            ' ' => Self::Open,
            '#' => Self::Wall,
            'S' => Self::Start,
            'E' => Self::End,
            'T' => Self::Trap,
            'O' => Self::TeleportOrigin,
            'Q' => Self::TeleportDestination,
            's' => Self::Switch,
            'B' => Self::Block,
            'F' | 'G' | 'H' => Self::BonusExit(symbol),
            'K' | 'D' => Self::Legacy(symbol),
            'X' => Self::ConditionalDoor(Gate::TwoKeys),
            'Y' => Self::ConditionalDoor(Gate::Switch),
            'Z' => Self::ConditionalDoor(Gate::KeyAndSwitch),
            'a'..='z' => Self::Key(symbol),
            'A'..='Z' => Self::Door(symbol),
            _ => return None,
        };
        Some(cell)
    }

    /// Reports whether the character belongs to the maze alphabet.
    #[must_use]
    pub const fn is_valid_symbol(symbol: char) -> bool {
        Self::from_char(symbol).is_some()
    }

    /// Returns the key letter that opens this cell when it is a plain door.
    #[must_use]
    pub const fn required_key(self) -> Option<char> {
        match self {
            Self::Door(letter) => Some(letter.to_ascii_lowercase()),
            _ => None,
        }
    }
}

/// Rectangular character grid with rows padded to a common width.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<char>,
}

impl Grid {
    /// Builds a grid from text rows, right-padding shorter rows with spaces.
    ///
    /// Dimensions that do not fit in `u32` are clamped to an empty grid;
    /// the parser enforces far smaller limits before calling this.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = lines
            .into_iter()
            .map(|line| line.as_ref().chars().collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let (Ok(columns), Ok(row_count)) = (u32::try_from(width), u32::try_from(rows.len()))
        else {
            return Self::default();
        };

        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let padding = width - row.len();
            cells.extend(row);
            cells.extend(std::iter::repeat(' ').take(padding));
        }

        Self {
            columns,
            rows: row_count,
            cells,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells, `rows × columns`.
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Character stored at the provided cell, if it lies within the grid.
    #[must_use]
    pub fn symbol(&self, cell: CellCoord) -> Option<char> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Iterator over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, char)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, &symbol)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), symbol)
        })
    }

    /// Iterator over the rows rendered back into strings.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.cells.chunks(width).map(|row| row.iter().collect())
    }

    /// Counts how many cells hold the provided character.
    #[must_use]
    pub fn count(&self, symbol: char) -> usize {
        self.cells.iter().filter(|&&cell| cell == symbol).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Everything the pathfinder learned about reaching the end cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionDescriptor {
    /// Whether a path from start to end was found.
    pub solvable: bool,
    /// Ordered cells from start to end, empty when unsolved.
    pub path: Vec<CellCoord>,
    /// Number of cells in [`SolutionDescriptor::path`].
    pub path_length: usize,
    /// Keys held when the end was reached.
    pub keys_collected: BTreeSet<char>,
    /// Switches active when the end was reached.
    pub switches_activated: BTreeSet<CellCoord>,
    /// Teleporter origins consumed along the path.
    pub teleporters_used: BTreeSet<CellCoord>,
    /// Distinct plain doors on the path whose key was held when reached.
    pub chain_length: usize,
    /// Whether the search budget ran out before a verdict was reached.
    pub timeout: bool,
    /// Number of states popped from the frontier.
    pub expanded_states: usize,
}

impl SolutionDescriptor {
    /// Descriptor for a search that ended without reaching the end cell.
    #[must_use]
    pub fn unsolved(timeout: bool, expanded_states: usize) -> Self {
        Self {
            timeout,
            expanded_states,
            ..Self::default()
        }
    }

    /// Terminal condition encoded by the descriptor.
    #[must_use]
    pub const fn outcome(&self) -> SearchOutcome {
        if self.solvable {
            SearchOutcome::Solved
        } else if self.timeout {
            SearchOutcome::BudgetExhausted
        } else {
            SearchOutcome::Unsolvable
        }
    }
}
