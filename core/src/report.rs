//! Closed, versioned report schema produced by every grading call.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{BenchmarkKind, REPORT_SCHEMA_VERSION, SENTINEL_SCORE};

/// Result of a single grading call, successful or not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Schema version of the serialised report.
    pub schema_version: u32,
    /// Benchmark the input was graded against.
    pub benchmark: BenchmarkKind,
    /// Scored report or failure description.
    #[serde(flatten)]
    pub outcome: GradeOutcome,
}

impl GradeReport {
    /// Wraps a completed score report.
    #[must_use]
    pub fn scored(benchmark: BenchmarkKind, report: ScoreReport) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            benchmark,
            outcome: GradeOutcome::Scored(report),
        }
    }

    /// Builds a sentinel report for a grade that could not be computed.
    #[must_use]
    pub fn failed(benchmark: BenchmarkKind, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            benchmark,
            outcome: GradeOutcome::Failed(GradeFailure {
                score: SENTINEL_SCORE,
                kind,
                message: message.into(),
            }),
        }
    }

    /// Final score, the sentinel for failed grades.
    #[must_use]
    pub fn score(&self) -> f64 {
        match &self.outcome {
            GradeOutcome::Scored(report) => report.score,
            GradeOutcome::Failed(failure) => failure.score,
        }
    }

    /// Score report when the grade succeeded.
    #[must_use]
    pub fn as_scored(&self) -> Option<&ScoreReport> {
        match &self.outcome {
            GradeOutcome::Scored(report) => Some(report),
            GradeOutcome::Failed(_) => None,
        }
    }

    /// Failure description when the grade did not succeed.
    #[must_use]
    pub fn as_failure(&self) -> Option<&GradeFailure> {
        match &self.outcome {
            GradeOutcome::Scored(_) => None,
            GradeOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Terminal state of a grading call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradeOutcome {
    /// The maze was parsed, solved or proven unsolvable, and scored.
    Scored(ScoreReport),
    /// The grade stopped early and carries the sentinel score.
    Failed(GradeFailure),
}

/// Stage that prevented a grade from being computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input was empty, oversized or contained invalid characters.
    Parsing,
    /// The grid did not contain exactly one start and one end.
    Validation,
    /// The search budget ran out before reachability was decided.
    Timeout,
    /// Any other unexpected failure.
    Evaluation,
}

impl FailureKind {
    /// Lowercase tag used in serialised reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parsing => "parsing",
            Self::Validation => "validation",
            Self::Timeout => "timeout",
            Self::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentinel result of a failed grade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeFailure {
    /// Always [`SENTINEL_SCORE`].
    pub score: f64,
    /// Stage that failed.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub message: String,
}

/// Weighted, penalised score with its full breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Base score scaled by `1 + structure_penalty`.
    pub score: f64,
    /// Sum of every component before the penalty.
    pub base_score: f64,
    /// Penalty fraction, zero or negative.
    pub structure_penalty: f64,
    /// Per-component scores.
    pub components: ScoreComponents,
    /// Structural metadata about the maze and its solution.
    pub maze_info: MazeInfo,
}

/// One scoring component together with its explanation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component<D> {
    /// Points contributed to the base score.
    pub score: f64,
    /// Human-readable explanation of the score.
    pub description: String,
    /// Component-specific detail payload.
    pub details: D,
}

/// Every scoring component, one typed field each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// Grid size and strategic elements attempted.
    pub ambition: Component<AmbitionDetails>,
    /// Strategic behaviours exercised by the solution.
    pub strategic_innovation: Component<InnovationDetails>,
    /// Structural density of strategic elements and key/door pairs.
    pub route_complexity: Component<RouteComplexityDetails>,
    /// Key/door pairs traversed along the solution.
    pub complexity: Component<ChainDetails>,
    /// Share of the grid covered by the solution path.
    pub path_efficiency: Component<EfficiencyDetails>,
    /// Reward for reaching the end.
    pub completion: Component<CompletionDetails>,
    /// Traps adjacent to the solution path.
    pub danger: Component<DangerDetails>,
    /// Optional bonus exits reached.
    pub bonus_objectives: Component<BonusDetails>,
}

impl ScoreComponents {
    /// Iterator over `(name, score, description)` in report order.
    pub fn summary(&self) -> impl Iterator<Item = (&'static str, f64, &str)> {
        [
            ("ambition", self.ambition.score, self.ambition.description.as_str()),
            (
                "strategic_innovation",
                self.strategic_innovation.score,
                self.strategic_innovation.description.as_str(),
            ),
            (
                "route_complexity",
                self.route_complexity.score,
                self.route_complexity.description.as_str(),
            ),
            ("complexity", self.complexity.score, self.complexity.description.as_str()),
            (
                "path_efficiency",
                self.path_efficiency.score,
                self.path_efficiency.description.as_str(),
            ),
            ("completion", self.completion.score, self.completion.description.as_str()),
            ("danger", self.danger.score, self.danger.description.as_str()),
            (
                "bonus_objectives",
                self.bonus_objectives.score,
                self.bonus_objectives.description.as_str(),
            ),
        ]
        .into_iter()
    }
}

/// Details of the ambition component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbitionDetails {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
    /// `rows × cols`.
    pub grid_size: usize,
    /// Points earned by strategic elements present in the grid.
    pub strategic_bonus: f64,
}

/// Details of the strategic innovation component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InnovationDetails {
    /// Teleporter origins consumed by the solution.
    pub teleporters_used: usize,
    /// Switches activated by the solution.
    pub switches_activated: usize,
    /// Distinct bonus exits crossed by the solution.
    pub bonus_exits_reached: usize,
    /// Distinct conditional doors crossed by the solution.
    pub conditional_doors_used: usize,
    /// One line per strategy observed.
    pub unique_strategies: Vec<String>,
}

/// Details of the route complexity component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteComplexityDetails {
    /// Strategic elements present in the grid.
    pub strategic_elements: usize,
    /// Key and plain door cells present in the grid.
    pub keys_and_doors: usize,
    /// Sum of the two counts above.
    pub strategic_decisions: usize,
}

/// Details of the traditional key/door chain component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainDetails {
    /// Key/door pairs traversed.
    pub chain_length: usize,
    /// Keys held at the end of the path.
    pub keys_collected: Vec<char>,
    /// Number of cells on the path.
    pub path_length: usize,
}

/// Details of the path efficiency component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyDetails {
    /// Number of cells on the path.
    pub path_length: usize,
    /// `rows × cols`.
    pub grid_size: usize,
    /// `path_length / grid_size`, four decimals.
    pub efficiency_ratio: f64,
}

/// Details of the completion component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionDetails {
    /// Whether the end was reached.
    pub solvable: bool,
}

/// Details of the danger component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DangerDetails {
    /// Trap adjacencies counted around the path.
    pub adjacent_traps: usize,
}

/// Details of the bonus objectives component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusDetails {
    /// Distinct bonus exits reached.
    pub bonus_exits_reached: usize,
}

/// Structural metadata attached to a score report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeInfo {
    /// `"{rows}x{cols}"`.
    pub dimensions: String,
    /// Whether the end was reached.
    pub solvable: bool,
    /// Whether the search budget ran out.
    pub timeout: bool,
    /// Keys held at the end of the path.
    pub keys_collected: Vec<char>,
    /// Key/door pairs traversed.
    pub chain_length: usize,
    /// Number of cells on the path.
    pub path_length: usize,
    /// Counts of strategic elements present in the grid.
    pub strategic_elements: StrategicCounts,
    /// Per-character counts for the maze alphabet's named symbols.
    pub elements: BTreeMap<char, usize>,
    /// `(traps + walls) / area`, three decimals.
    pub complexity_ratio: f64,
}

/// Counts of strategic elements registered by the maze model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicCounts {
    /// Teleporter origins.
    pub teleporters: usize,
    /// Switches.
    pub switches: usize,
    /// Movable blocks.
    pub movable_blocks: usize,
    /// Distinct bonus exits.
    pub bonus_exits: usize,
    /// Distinct conditional doors.
    pub conditional_doors: usize,
}

impl StrategicCounts {
    /// Total number of strategic elements.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.teleporters
            + self.switches
            + self.movable_blocks
            + self.bonus_exits
            + self.conditional_doors
    }
}
