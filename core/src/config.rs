//! Tunable limits, budgets, weights and policies for a grading run.
//!
//! Every section deserialises with `#[serde(default)]`, so a configuration
//! file only needs to name the values it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete configuration consumed by the grading pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraderConfig {
    /// Size limits enforced by the parser.
    pub limits: GridLimits,
    /// Iteration and wall-clock budget of the pathfinder.
    pub search: SearchBudget,
    /// Per-component weights and caps used by the scorer.
    pub scoring: ScoringWeights,
    /// Trap density penalty applied to the base score.
    pub penalty: StructurePenaltyPolicy,
    /// Resolutions for behaviours with more than one reasonable reading.
    pub policies: Policies,
}

/// Maximum grid dimensions accepted by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridLimits {
    /// Maximum number of rows.
    pub max_rows: usize,
    /// Maximum number of columns in the widest row.
    pub max_cols: usize,
    /// Maximum number of cells after padding.
    pub max_cells: usize,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            max_rows: 64,
            max_cols: 64,
            max_cells: 64 * 64,
        }
    }
}

/// Bounds on how long the pathfinder may explore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchBudget {
    /// Wall-clock allowance in milliseconds.
    pub timeout_ms: u64,
    /// Iteration cap expressed as a multiple of the grid area.
    pub iteration_multiplier: usize,
}

impl SearchBudget {
    /// Wall-clock allowance as a [`Duration`].
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Maximum number of states the search may expand on a grid of `area` cells.
    #[must_use]
    pub const fn iteration_limit(&self, area: usize) -> usize {
        area.saturating_mul(self.iteration_multiplier)
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            iteration_multiplier: 20,
        }
    }
}

/// Linear reward that stops growing at a cap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capped {
    /// Points awarded per counted item.
    pub per_item: f64,
    /// Upper bound on the reward.
    pub cap: f64,
}

impl Capped {
    /// Creates a capped reward.
    #[must_use]
    pub const fn new(per_item: f64, cap: f64) -> Self {
        Self { per_item, cap }
    }

    /// Reward for `count` items.
    #[must_use]
    pub fn apply(&self, count: usize) -> f64 {
        (count as f64 * self.per_item).min(self.cap)
    }
}

/// Weights of the ambition component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbitionWeights {
    /// Multiplier applied to `log2(rows × columns)`.
    pub log_scale: f64,
    /// Bonus per teleporter origin.
    pub teleporter: f64,
    /// Bonus per switch.
    pub switch: f64,
    /// Bonus per distinct bonus exit.
    pub bonus_exit: f64,
    /// Bonus per distinct conditional door.
    pub conditional_door: f64,
}

impl Default for AmbitionWeights {
    fn default() -> Self {
        Self {
            log_scale: 100.0,
            teleporter: 10.0,
            switch: 15.0,
            bonus_exit: 20.0,
            conditional_door: 25.0,
        }
    }
}

/// Weights of the strategic innovation component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InnovationWeights {
    /// Reward for teleporters consumed along the path.
    pub teleports: Capped,
    /// Reward for switches activated along the path.
    pub switches: Capped,
    /// Reward for distinct bonus exits crossed by the path.
    pub bonus_exits: Capped,
    /// Reward for distinct conditional doors crossed by the path.
    pub conditional_doors: Capped,
}

impl Default for InnovationWeights {
    fn default() -> Self {
        Self {
            teleports: Capped::new(15.0, 60.0),
            switches: Capped::new(20.0, 80.0),
            bonus_exits: Capped::new(25.0, 75.0),
            conditional_doors: Capped::new(30.0, 90.0),
        }
    }
}

/// Weights of the route complexity component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteWeights {
    /// Reward for strategic elements present in the grid.
    pub strategic_elements: Capped,
    /// Reward for keys and plain doors present in the grid.
    pub keys_and_doors: Capped,
    /// Upper bound on the combined route complexity score.
    pub aggregate_cap: f64,
}

impl Default for RouteWeights {
    fn default() -> Self {
        Self {
            strategic_elements: Capped::new(12.0, 150.0),
            keys_and_doors: Capped::new(8.0, 100.0),
            aggregate_cap: 250.0,
        }
    }
}

/// Saturating function that turns adjacent trap counts into danger points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DangerScaling {
    /// `min(count × per_trap, cap)`.
    Linear {
        /// Points per adjacent trap.
        per_trap: f64,
        /// Upper bound on the danger score.
        cap: f64,
    },
    /// `min(factor × sqrt(count), cap)`.
    SquareRoot {
        /// Multiplier applied to the square root of the count.
        factor: f64,
        /// Upper bound on the danger score.
        cap: f64,
    },
}

impl DangerScaling {
    /// Danger points for `adjacent_traps` trap adjacencies.
    #[must_use]
    pub fn apply(&self, adjacent_traps: usize) -> f64 {
        let count = adjacent_traps as f64;
        match *self {
            Self::Linear { per_trap, cap } => (count * per_trap).min(cap),
            Self::SquareRoot { factor, cap } => (factor * count.sqrt()).min(cap),
        }
    }

    /// Short label used in report descriptions.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear, capped",
            Self::SquareRoot { .. } => "sqrt scaled, capped",
        }
    }
}

impl Default for DangerScaling {
    fn default() -> Self {
        Self::Linear {
            per_trap: 5.0,
            cap: 30.0,
        }
    }
}

/// Weights and caps of every scoring component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Ambition component weights.
    pub ambition: AmbitionWeights,
    /// Strategic innovation component weights.
    pub innovation: InnovationWeights,
    /// Route complexity component weights.
    pub route: RouteWeights,
    /// Points per key/door pair traversed.
    pub chain_weight: f64,
    /// Multiplier applied to `path_length / area`.
    pub efficiency_scale: f64,
    /// Points for reaching the end.
    pub completion_bonus: f64,
    /// Points per distinct bonus exit reached.
    pub bonus_exit_reward: f64,
    /// Danger scaling function.
    pub danger: DangerScaling,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            ambition: AmbitionWeights::default(),
            innovation: InnovationWeights::default(),
            route: RouteWeights::default(),
            chain_weight: 50.0,
            efficiency_scale: 100.0,
            completion_bonus: 50.0,
            bonus_exit_reward: 75.0,
            danger: DangerScaling::default(),
        }
    }
}

/// Penalty applied when traps crowd out walls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructurePenaltyPolicy {
    /// Penalty triggers when `traps > walls × trap_wall_ratio`.
    pub trap_wall_ratio: f64,
    /// Fraction added to one before scaling the base score, e.g. `-0.25`.
    pub factor: f64,
}

impl StructurePenaltyPolicy {
    /// Penalty fraction for the provided trap and wall counts, zero when not triggered.
    #[must_use]
    pub fn penalty(&self, traps: usize, walls: usize) -> f64 {
        if traps as f64 > walls as f64 * self.trap_wall_ratio {
            self.factor
        } else {
            0.0
        }
    }
}

impl Default for StructurePenaltyPolicy {
    fn default() -> Self {
        Self {
            trap_wall_ratio: 2.0,
            factor: -0.25,
        }
    }
}

/// How the parser treats characters outside the maze alphabet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidCharacterPolicy {
    /// Fail the parse and list every offending character.
    #[default]
    Reject,
    /// Replace offending characters with walls.
    ReplaceWithWall,
}

/// How teleporter origins are matched with destinations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeleporterPairing {
    /// The i-th origin in row-major order pairs with the i-th destination.
    #[default]
    DiscoveryOrder,
    /// Every origin targets every destination.
    AllDestinations,
}

/// How movable blocks behave during the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPolicy {
    /// Blocks are traversed in place without moving.
    #[default]
    Passable,
    /// Blocks never move and cannot be entered.
    Solid,
}

/// Policy knobs for behaviours that admit several readings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policies {
    /// Treatment of characters outside the maze alphabet.
    pub invalid_characters: InvalidCharacterPolicy,
    /// Teleporter origin/destination pairing.
    pub teleporter_pairing: TeleporterPairing,
    /// Movable block traversal.
    pub blocks: BlockPolicy,
}
