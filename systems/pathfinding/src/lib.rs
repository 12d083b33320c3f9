#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded A* search over the bounded 4-adjacency grid.
//!
//! The search is a pure function of the start cell, the goal cell and an
//! [`ObstacleMap`]. It owns no state between calls. Edges never wrap around the
//! grid even though the simulation step does, so a route that would be shorter
//! through an edge is never proposed.
//!
//! Frontier cells are ranked by `f = g + h` where `g` counts unit steps taken
//! and `h` is the Manhattan distance to the goal. Ties on `f` prefer the lower
//! `h`, then the cell that entered the frontier first. Neighbors are generated
//! North, East, South, West.

mod obstacles;

use std::{cmp::Ordering, collections::BinaryHeap};

use snake_pilot_core::{Cell, Direction, TileCount, DEFAULT_SEARCH_ITERATION_CAP};

pub use obstacles::ObstacleMap;

/// Shortest-path planner with a hard cap on frontier expansions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathFinder {
    iteration_cap: usize,
}

impl PathFinder {
    /// Creates a planner that gives up after `iteration_cap` expansions.
    #[must_use]
    pub const fn new(iteration_cap: usize) -> Self {
        Self { iteration_cap }
    }

    /// Finds a shortest route from `start` to `goal` avoiding every blocked cell.
    ///
    /// The returned path begins with `start`, ends with `goal` and every
    /// consecutive pair is 4-adjacent. `None` means either the goal is
    /// unreachable or the expansion cap was hit; the two are not
    /// distinguished. The start cell itself is never tested against the
    /// obstacle map, while a blocked goal is unreachable.
    #[must_use]
    pub fn find_path(
        &self,
        start: Cell,
        goal: Cell,
        obstacles: &ObstacleMap,
    ) -> Option<Vec<Cell>> {
        let tile_count = obstacles.tile_count();
        if !tile_count.contains(start) || !tile_count.contains(goal) {
            return None;
        }

        let mut search = SearchState::new(tile_count, goal);
        search.relax(start, 0, None);
        let mut expansions = 0_usize;

        while let Some(entry) = search.frontier.pop() {
            let key = tile_count.key(entry.cell)?;
            if search.closed[key] || entry.cost > search.cost[key] {
                continue;
            }

            expansions += 1;
            if expansions > self.iteration_cap {
                tracing::debug!(
                    ?start,
                    ?goal,
                    cap = self.iteration_cap,
                    "path search abandoned at expansion cap"
                );
                return None;
            }

            if entry.cell == goal {
                return Some(search.reconstruct(goal));
            }
            search.closed[key] = true;

            let next_cost = entry.cost + 1;
            for neighbor in cardinal_neighbors(entry.cell, tile_count) {
                if obstacles.is_blocked(neighbor) {
                    continue;
                }
                search.relax(neighbor, next_cost, Some(entry.cell));
            }
        }

        tracing::trace!(?start, ?goal, expansions, "frontier exhausted without route");
        None
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_ITERATION_CAP)
    }
}

/// Finds a route with the default expansion cap.
#[must_use]
pub fn find_path(start: Cell, goal: Cell, obstacles: &ObstacleMap) -> Option<Vec<Cell>> {
    PathFinder::default().find_path(start, goal, obstacles)
}

/// Enumerates the in-bounds 4-adjacent cells in North, East, South, West order.
///
/// Cells on the border have fewer neighbors; the grid never wraps here.
pub fn cardinal_neighbors(cell: Cell, tile_count: TileCount) -> impl Iterator<Item = Cell> {
    let mut candidates = [None; 4];
    let mut count = 0;

    for direction in Direction::ALL {
        let (dx, dy) = direction.delta();
        let column = cell.column().checked_add_signed(dx);
        let row = cell.row().checked_add_signed(dy);
        if let (Some(column), Some(row)) = (column, row) {
            let neighbor = Cell::new(column, row);
            if tile_count.contains(neighbor) {
                candidates[count] = Some(neighbor);
                count += 1;
            }
        }
    }

    candidates.into_iter().take(count).flatten()
}

/// Per-call bookkeeping, discarded when the search returns.
#[derive(Debug)]
struct SearchState {
    tile_count: TileCount,
    goal: Cell,
    cost: Vec<u32>,
    came_from: Vec<Option<Cell>>,
    closed: Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
    sequence: u64,
}

impl SearchState {
    fn new(tile_count: TileCount, goal: Cell) -> Self {
        let cells = tile_count.cell_count();
        Self {
            tile_count,
            goal,
            cost: vec![u32::MAX; cells],
            came_from: vec![None; cells],
            closed: vec![false; cells],
            frontier: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Records `cost` for `cell` when it strictly improves the best known cost.
    fn relax(&mut self, cell: Cell, cost: u32, via: Option<Cell>) {
        let Some(key) = self.tile_count.key(cell) else {
            return;
        };
        if cost >= self.cost[key] {
            return;
        }

        self.cost[key] = cost;
        self.came_from[key] = via;
        let remaining = cell.manhattan_distance(self.goal);
        self.frontier.push(FrontierEntry {
            estimate: cost + remaining,
            remaining,
            sequence: self.sequence,
            cost,
            cell,
        });
        self.sequence += 1;
    }

    fn reconstruct(&self, goal: Cell) -> Vec<Cell> {
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(previous) = self
            .tile_count
            .key(current)
            .and_then(|key| self.came_from[key])
        {
            path.push(previous);
            current = previous;
            if path.len() > self.came_from.len() {
                break;
            }
        }
        path.reverse();
        path
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    estimate: u32,
    remaining: u32,
    sequence: u64,
    cost: u32,
    cell: Cell,
}

impl Ord for FrontierEntry {
    // Reversed so the max-heap pops the lowest estimate first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.remaining.cmp(&self.remaining))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
