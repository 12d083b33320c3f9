#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous steering system that plans a route to the target every tick.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_pilot_core::{BodyView, Cell, Command, Direction, Heading, TileCount};
use snake_pilot_system_pathfinding::{cardinal_neighbors, ObstacleMap, PathFinder};

/// Configuration parameters required to construct the autopilot.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    iteration_cap: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided search cap and seed.
    #[must_use]
    pub const fn new(iteration_cap: usize, rng_seed: u64) -> Self {
        Self {
            iteration_cap,
            rng_seed,
        }
    }
}

/// Outcome of a single steering decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// A route to the target exists; the heading follows its first step.
    Route {
        /// Direction of the first step along the route.
        direction: Direction,
        /// Number of cells in the route, head and target included.
        path_len: usize,
    },
    /// No usable route; the heading turns toward a random unoccupied neighbor.
    Fallback {
        /// Direction toward the chosen neighbor.
        direction: Direction,
    },
    /// Every neighbor is occupied; the heading is left unchanged.
    Trapped,
}

impl Decision {
    /// Direction the decision steers toward, if any.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        match self {
            Self::Route { direction, .. } | Self::Fallback { direction } => Some(*direction),
            Self::Trapped => None,
        }
    }
}

/// System that converts a planned route into a heading command.
#[derive(Debug)]
pub struct Autopilot {
    path_finder: PathFinder,
    rng: ChaCha8Rng,
}

impl Autopilot {
    /// Creates a new autopilot using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            path_finder: PathFinder::new(config.iteration_cap),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Reads the body and target and emits at most one heading command.
    ///
    /// Nothing is emitted when the head is fully enclosed, leaving the current
    /// heading in force.
    pub fn handle(
        &mut self,
        body: BodyView<'_>,
        target: Option<Cell>,
        tile_count: TileCount,
        out: &mut Vec<Command>,
    ) {
        if let Some(direction) = self.decide(body, target, tile_count).direction() {
            out.push(Command::SetHeading {
                heading: Heading::Moving(direction),
            });
        }
    }

    /// Chooses the next direction for the head.
    ///
    /// The route is planned with the whole body except the head as obstacles.
    /// A missing route, a capped search, or a route of a single cell (already
    /// on the target) all fall back to a random in-bounds neighbor the body
    /// does not occupy.
    pub fn decide(
        &mut self,
        body: BodyView<'_>,
        target: Option<Cell>,
        tile_count: TileCount,
    ) -> Decision {
        let Some(head) = body.head() else {
            return Decision::Trapped;
        };

        if let Some(decision) = target.and_then(|goal| self.route(body, head, goal, tile_count)) {
            tracing::trace!(?head, ?decision, "following planned route");
            return decision;
        }

        let decision = self.fallback(body, head, tile_count);
        tracing::trace!(?head, ?target, ?decision, "no usable route");
        decision
    }

    fn route(
        &self,
        body: BodyView<'_>,
        head: Cell,
        goal: Cell,
        tile_count: TileCount,
    ) -> Option<Decision> {
        let obstacles = ObstacleMap::from_cells(tile_count, body.iter_without_head());
        let path = self.path_finder.find_path(head, goal, &obstacles)?;
        let next = path.get(1).copied()?;
        let direction = Direction::between(head, next)?;
        Some(Decision::Route {
            direction,
            path_len: path.len(),
        })
    }

    fn fallback(&mut self, body: BodyView<'_>, head: Cell, tile_count: TileCount) -> Decision {
        let safe: Vec<Cell> = cardinal_neighbors(head, tile_count)
            .filter(|cell| !body.contains(*cell))
            .collect();

        safe.choose(&mut self.rng)
            .and_then(|cell| Direction::between(head, *cell))
            .map_or(Decision::Trapped, |direction| Decision::Fallback { direction })
    }
}
