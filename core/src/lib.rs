#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Pilot engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the decision systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Systems read immutable views such as
//! [`BodyView`] and respond exclusively with new command batches.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid edge length used when no configuration overrides it.
pub const DEFAULT_TILE_COUNT: TileCount = TileCount::new(20);

/// Cell occupied by a fresh body when the episode starts or restarts.
pub const DEFAULT_START_CELL: Cell = Cell::new(10, 10);

/// Maximum number of frontier expansions a single path search may perform.
pub const DEFAULT_SEARCH_ITERATION_CAP: usize = 1_000;

/// Number of random draws attempted before target placement enumerates free cells.
pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 64;

/// Seed applied to the world random stream when no configuration overrides it.
pub const DEFAULT_SEED: u64 = 0x5eed_a11c_e5e7_0b0d;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: u32,
    row: u32,
}

impl Cell {
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

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Applies the heading's delta, re-entering from the opposite edge when
    /// the step leaves the grid. A stationary heading yields the same cell.
    ///
    /// Only the live simulation step uses this toroidal advance. The planner's
    /// neighbor model never crosses an edge.
    #[must_use]
    pub fn wrapped_step(self, heading: impl Into<Heading>, tile_count: TileCount) -> Cell {
        let edge = i64::from(tile_count.get().max(1));
        let (dx, dy) = heading.into().delta();
        let column = (i64::from(self.column) + i64::from(dx)).rem_euclid(edge);
        let row = (i64::from(self.row) + i64::from(dy)).rem_euclid(edge);
        Cell::new(column as u32, row as u32)
    }
}

/// Edge length of the square simulation grid measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCount(u32);

impl TileCount {
    /// Creates a new tile count wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying edge length.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.column() < self.0 && cell.row() < self.0
    }

    /// Total number of cells on the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let edge = usize::try_from(self.0).unwrap_or(0);
        edge.saturating_mul(edge)
    }

    /// Dense row-major key for the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn key(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let edge = usize::try_from(self.0).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(edge)?.checked_add(column)
    }

    /// Iterates every cell on the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let edge = self.0;
        (0..edge).flat_map(move |row| (0..edge).map(move |column| Cell::new(column, row)))
    }
}

/// Axis a direction travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Column axis.
    Horizontal,
    /// Row axis.
    Vertical,
}

/// Cardinal movement directions available to the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in the order the planner expands them.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row delta applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Vertical,
            Self::East | Self::West => Axis::Horizontal,
        }
    }

    /// Direction that joins two 4-adjacent cells without wrapping.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Movement vector applied to the head on every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Zero vector; the next head equals the current head.
    #[default]
    Stationary,
    /// Unit vector along the provided direction.
    Moving(Direction),
}

impl Heading {
    /// Column and row delta applied to the head.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Stationary => (0, 0),
            Self::Moving(direction) => direction.delta(),
        }
    }

    /// Applies the axis-lock rule to a manual steering request.
    ///
    /// A request is admitted only when the current heading has no component
    /// along the requested axis, so the body can never reverse onto its second
    /// segment in a single tick.
    #[must_use]
    pub fn admits(self, requested: Direction) -> bool {
        match self {
            Self::Stationary => true,
            Self::Moving(current) => current.axis() != requested.axis(),
        }
    }
}

impl From<Direction> for Heading {
    fn from(direction: Direction) -> Self {
        Self::Moving(direction)
    }
}

/// Describes who decides the heading on each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlMode {
    /// The autopilot plans a route to the target before every tick.
    #[default]
    Autonomous,
    /// Steering requests delivered by an input source decide the heading.
    Manual,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one discrete step.
    Tick,
    /// Replaces the heading unconditionally. Emitted by the autopilot.
    SetHeading {
        /// Heading the world should adopt.
        heading: Heading,
    },
    /// Requests a manual turn, subject to the axis-lock rule.
    Steer {
        /// Direction requested by the input source.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the heading changed.
    HeadingChanged {
        /// Heading that became active.
        heading: Heading,
    },
    /// Reports that a manual turn was refused by the axis-lock rule.
    SteerRejected {
        /// Direction that was requested.
        direction: Direction,
    },
    /// Confirms that the head moved between two cells.
    Advanced {
        /// Cell the head occupied before moving.
        from: Cell,
        /// Cell the head occupies after moving.
        to: Cell,
    },
    /// Announces that the head entered the target cell and the body grew.
    TargetReached {
        /// Cell that held the consumed target.
        cell: Cell,
        /// Score after the increment.
        score: u32,
    },
    /// Announces that a new target was placed.
    TargetPlaced {
        /// Cell holding the new target.
        cell: Cell,
    },
    /// Reports that the head ran into the body and the episode restarted.
    Collided {
        /// Cell the head attempted to enter.
        cell: Cell,
        /// Score held immediately before the reset.
        final_score: u32,
    },
    /// Reports that no free cell remained for a target.
    BoardFilled,
}

/// Read-only view over the body, head first.
#[derive(Clone, Copy, Debug)]
pub struct BodyView<'a> {
    cells: &'a VecDeque<Cell>,
}

impl<'a> BodyView<'a> {
    /// Captures a view backed by the provided ordered segments.
    #[must_use]
    pub fn new(cells: &'a VecDeque<Cell>) -> Self {
        Self { cells }
    }

    /// Cell holding the head, if the body is non-empty.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.cells.front().copied()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the body has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether any segment occupies the cell.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterates the segments from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + 'a {
        self.cells.iter().copied()
    }

    /// Iterates every segment behind the head.
    pub fn iter_without_head(&self) -> impl Iterator<Item = Cell> + 'a {
        self.cells.iter().skip(1).copied()
    }
}

/// Tunables that shape a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Edge length of the square grid.
    pub tile_count: TileCount,
    /// Body cell after construction and after every collision reset.
    pub start: Cell,
    /// Fixed first target. A random free cell is chosen when absent.
    pub initial_target: Option<Cell>,
    /// Seed for the world random stream.
    pub seed: u64,
    /// Maximum frontier expansions per path search.
    pub search_iteration_cap: usize,
    /// Random draws attempted before target placement enumerates free cells.
    pub placement_attempts: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            start: DEFAULT_START_CELL,
            initial_target: None,
            seed: DEFAULT_SEED,
            search_iteration_cap: DEFAULT_SEARCH_ITERATION_CAP,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }
}

impl SimulationConfig {
    /// Checks that the configuration describes a playable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_count.get() == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if !self.tile_count.contains(self.start) {
            return Err(ConfigError::StartOutOfBounds {
                start: self.start,
                tile_count: self.tile_count.get(),
            });
        }
        if let Some(target) = self.initial_target {
            if !self.tile_count.contains(target) {
                return Err(ConfigError::TargetOutOfBounds {
                    target,
                    tile_count: self.tile_count.get(),
                });
            }
            if target == self.start {
                return Err(ConfigError::TargetOnStart { target });
            }
        }
        if self.search_iteration_cap == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::ZeroPlacementAttempts);
        }
        Ok(())
    }
}

/// Reasons a [`SimulationConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid must contain at least one cell.
    #[error("tile count must be at least 1")]
    EmptyGrid,
    /// The start cell lies outside the grid.
    #[error("start cell {start:?} lies outside a {tile_count}x{tile_count} grid")]
    StartOutOfBounds {
        /// Offending start cell.
        start: Cell,
        /// Configured edge length.
        tile_count: u32,
    },
    /// The initial target lies outside the grid.
    #[error("initial target {target:?} lies outside a {tile_count}x{tile_count} grid")]
    TargetOutOfBounds {
        /// Offending target cell.
        target: Cell,
        /// Configured edge length.
        tile_count: u32,
    },
    /// The initial target overlaps the start cell.
    #[error("initial target {target:?} overlaps the start cell")]
    TargetOnStart {
        /// Offending target cell.
        target: Cell,
    },
    /// The path search needs room for at least one expansion.
    #[error("search iteration cap must be at least 1")]
    ZeroIterationCap,
    /// Target placement needs at least one random draw.
    #[error("placement attempts must be at least 1")]
    ZeroPlacementAttempts,
}
