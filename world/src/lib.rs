#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative, immutable maze model built from a parsed grid.
//!
//! [`MazeModel::build`] performs a single row-major scan that classifies
//! every cell and registers the interactive elements. The model never
//! re-validates the start/end invariant; callers check it through
//! [`query::start_positions`] and [`query::end_positions`] before searching.

use std::collections::{BTreeMap, HashMap};

use maze_grader_core::{Cell, CellCoord, Grid, TeleporterPairing};

/// Classified maze with registered keys, doors, teleporters and switches.
#[derive(Clone, Debug)]
pub struct MazeModel {
    grid: Grid,
    cells: Vec<Cell>,
    starts: Vec<CellCoord>,
    ends: Vec<CellCoord>,
    keys: BTreeMap<char, CellCoord>,
    doors: BTreeMap<char, CellCoord>,
    teleporter_origins: Vec<CellCoord>,
    teleporter_destinations: Vec<CellCoord>,
    teleporter_lookup: HashMap<CellCoord, usize>,
    pairing: TeleporterPairing,
    switches: Vec<CellCoord>,
    switch_lookup: HashMap<CellCoord, usize>,
    blocks: Vec<CellCoord>,
    bonus_exits: BTreeMap<char, CellCoord>,
    conditional_doors: BTreeMap<char, CellCoord>,
    traps: usize,
    walls: usize,
}

impl MazeModel {
    /// Classifies every cell of the grid and registers its interactive elements.
    ///
    /// Characters outside the maze alphabet are treated as walls; the parser
    /// rejects or replaces them before a model is normally built. When a
    /// letter repeats, the first occurrence in row-major order is registered.
    #[must_use]
    pub fn build(grid: Grid, pairing: TeleporterPairing) -> Self {
        let mut model = Self {
            cells: Vec::with_capacity(grid.area()),
            starts: Vec::new(),
            ends: Vec::new(),
            keys: BTreeMap::new(),
            doors: BTreeMap::new(),
            teleporter_origins: Vec::new(),
            teleporter_destinations: Vec::new(),
            teleporter_lookup: HashMap::new(),
            pairing,
            switches: Vec::new(),
            switch_lookup: HashMap::new(),
            blocks: Vec::new(),
            bonus_exits: BTreeMap::new(),
            conditional_doors: BTreeMap::new(),
            traps: 0,
            walls: 0,
            grid,
        };

        let scanned: Vec<(CellCoord, Cell)> = model
            .grid
            .iter()
            .map(|(coord, symbol)| (coord, Cell::from_char(symbol).unwrap_or(Cell::Wall)))
            .collect();

        for (coord, cell) in scanned {
            model.register(coord, cell);
            model.cells.push(cell);
        }

        model
    }

    fn register(&mut self, coord: CellCoord, cell: Cell) {
        match cell {
            Cell::Open | Cell::Legacy(_) => {}
            Cell::Wall => self.walls += 1,
            Cell::Trap => self.traps += 1,
            Cell::Start => self.starts.push(coord),
            Cell::End => self.ends.push(coord),
            Cell::Key(letter) => {
                let _ = self.keys.entry(letter).or_insert(coord);
            }
            Cell::Door(letter) => {
                let _ = self.doors.entry(letter).or_insert(coord);
            }
            Cell::TeleportOrigin => {
                let _ = self
                    .teleporter_lookup
                    .insert(coord, self.teleporter_origins.len());
                self.teleporter_origins.push(coord);
            }
            Cell::TeleportDestination => self.teleporter_destinations.push(coord),
            Cell::Switch => {
                let _ = self.switch_lookup.insert(coord, self.switches.len());
                self.switches.push(coord);
            }
            Cell::Block => self.blocks.push(coord),
            Cell::BonusExit(letter) => {
                let _ = self.bonus_exits.entry(letter).or_insert(coord);
            }
            Cell::ConditionalDoor(gate) => {
                let _ = self.conditional_doors.entry(gate.symbol()).or_insert(coord);
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.grid.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.grid.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Query functions that provide read-only access to the maze model.
pub mod query {
    use std::collections::BTreeMap;

    use super::MazeModel;
    use maze_grader_core::{
        report::StrategicCounts, Cell, CellCoord, Grid, TeleporterPairing,
    };

    /// Provides read-only access to the grid the model was built from.
    #[must_use]
    pub fn grid(model: &MazeModel) -> &Grid {
        &model.grid
    }

    /// Role of the cell at the provided position, if it lies within the grid.
    #[must_use]
    pub fn cell_at(model: &MazeModel, cell: CellCoord) -> Option<Cell> {
        model
            .index(cell)
            .and_then(|index| model.cells.get(index).copied())
    }

    /// Reports whether the position lies within the grid.
    #[must_use]
    pub fn is_in_bounds(model: &MazeModel, cell: CellCoord) -> bool {
        model.grid.contains(cell)
    }

    /// Reports whether the position is a wall. Out-of-bounds cells count as walls.
    #[must_use]
    pub fn is_wall(model: &MazeModel, cell: CellCoord) -> bool {
        matches!(cell_at(model, cell), None | Some(Cell::Wall))
    }

    /// Destinations reachable from a teleporter origin, in row-major order.
    ///
    /// Empty when `origin` is not a registered origin or when no destination
    /// is paired with it.
    #[must_use]
    pub fn teleport_targets(model: &MazeModel, origin: CellCoord) -> Vec<CellCoord> {
        let Some(&index) = model.teleporter_lookup.get(&origin) else {
            return Vec::new();
        };

        match model.pairing {
            TeleporterPairing::DiscoveryOrder => model
                .teleporter_destinations
                .get(index)
                .copied()
                .into_iter()
                .collect(),
            TeleporterPairing::AllDestinations => model.teleporter_destinations.clone(),
        }
    }

    /// Every `S` cell in row-major order.
    #[must_use]
    pub fn start_positions(model: &MazeModel) -> &[CellCoord] {
        &model.starts
    }

    /// Every `E` cell in row-major order.
    #[must_use]
    pub fn end_positions(model: &MazeModel) -> &[CellCoord] {
        &model.ends
    }

    /// Registered position of each key letter.
    #[must_use]
    pub fn keys(model: &MazeModel) -> &BTreeMap<char, CellCoord> {
        &model.keys
    }

    /// Registered position of each plain door letter.
    #[must_use]
    pub fn doors(model: &MazeModel) -> &BTreeMap<char, CellCoord> {
        &model.doors
    }

    /// Teleporter origins in discovery order.
    #[must_use]
    pub fn teleporter_origins(model: &MazeModel) -> &[CellCoord] {
        &model.teleporter_origins
    }

    /// Teleporter destinations in discovery order.
    #[must_use]
    pub fn teleporter_destinations(model: &MazeModel) -> &[CellCoord] {
        &model.teleporter_destinations
    }

    /// Discovery index of a teleporter origin.
    #[must_use]
    pub fn teleporter_index(model: &MazeModel, origin: CellCoord) -> Option<usize> {
        model.teleporter_lookup.get(&origin).copied()
    }

    /// Switch positions in discovery order.
    #[must_use]
    pub fn switches(model: &MazeModel) -> &[CellCoord] {
        &model.switches
    }

    /// Discovery index of a switch.
    #[must_use]
    pub fn switch_index(model: &MazeModel, switch: CellCoord) -> Option<usize> {
        model.switch_lookup.get(&switch).copied()
    }

    /// Movable block positions in discovery order.
    #[must_use]
    pub fn blocks(model: &MazeModel) -> &[CellCoord] {
        &model.blocks
    }

    /// Registered position of each bonus exit letter.
    #[must_use]
    pub fn bonus_exits(model: &MazeModel) -> &BTreeMap<char, CellCoord> {
        &model.bonus_exits
    }

    /// Registered position of each conditional door letter.
    #[must_use]
    pub fn conditional_doors(model: &MazeModel) -> &BTreeMap<char, CellCoord> {
        &model.conditional_doors
    }

    /// Number of trap cells.
    #[must_use]
    pub fn trap_count(model: &MazeModel) -> usize {
        model.traps
    }

    /// Number of wall cells.
    #[must_use]
    pub fn wall_count(model: &MazeModel) -> usize {
        model.walls
    }

    /// Summary of the strategic elements registered by the model.
    #[must_use]
    pub fn strategic_counts(model: &MazeModel) -> StrategicCounts {
        StrategicCounts {
            teleporters: model.teleporter_origins.len(),
            switches: model.switches.len(),
            movable_blocks: model.blocks.len(),
            bonus_exits: model.bonus_exits.len(),
            conditional_doors: model.conditional_doors.len(),
        }
    }

    /// In-bounds orthogonal neighbours of a cell in north, east, south, west order.
    pub fn neighbors(model: &MazeModel, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let width = model.grid.columns();
        let height = model.grid.rows();
        let mut candidates = [None; 4];
        let mut count = 0;

        if let Some(row) = cell.row().checked_sub(1) {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }

        if let Some(column) = cell.column().checked_add(1) {
            if column < width {
                candidates[count] = Some(CellCoord::new(column, cell.row()));
                count += 1;
            }
        }

        if let Some(row) = cell.row().checked_add(1) {
            if row < height {
                candidates[count] = Some(CellCoord::new(cell.column(), row));
                count += 1;
            }
        }

        if let Some(column) = cell.column().checked_sub(1) {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }

        candidates.into_iter().take(count).flatten()
    }
}
