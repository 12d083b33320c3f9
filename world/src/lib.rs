#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Snake Pilot.
//!
//! The world exclusively owns the body, heading, target and score. It only
//! changes in response to [`Command`] values passed to [`apply`], and reports
//! every change as [`Event`] values. Collisions and target reaches are normal
//! transitions here, resolved locally and never surfaced as errors.

mod placement;

use std::collections::VecDeque;

use snake_pilot_core::{Cell, Command, ConfigError, Event, Heading, SimulationConfig, TileCount};

use crate::placement::TargetPlacer;

/// Represents the authoritative Snake Pilot world state.
#[derive(Clone, Debug)]
pub struct World {
    tile_count: TileCount,
    start: Cell,
    body: VecDeque<Cell>,
    heading: Heading,
    target: Option<Cell>,
    score: u32,
    tick_index: u64,
    placer: TargetPlacer,
}

impl World {
    /// Creates a world on the default 20x20 grid with a randomly placed target.
    #[must_use]
    pub fn new() -> Self {
        Self::from_validated(&SimulationConfig::default())
    }

    /// Creates a world from the provided configuration.
    pub fn with_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &SimulationConfig) -> Self {
        let mut world = Self {
            tile_count: config.tile_count,
            start: config.start,
            body: VecDeque::from(vec![config.start]),
            heading: Heading::Stationary,
            target: None,
            score: 0,
            tick_index: 0,
            placer: TargetPlacer::new(config.seed, config.placement_attempts),
        };
        world.target = match config.initial_target {
            Some(target) => Some(target),
            None => world.placer.place(world.tile_count, &world.body),
        };
        world
    }

    /// Replaces the body with the provided segments, head first.
    ///
    /// An empty iterator resets the body to the start cell.
    #[cfg(any(test, feature = "scaffolding"))]
    pub fn replace_body<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        self.body = cells.into_iter().collect();
        if self.body.is_empty() {
            self.body.push_back(self.start);
        }
    }

    fn set_heading(&mut self, heading: Heading, out_events: &mut Vec<Event>) {
        if self.heading == heading {
            return;
        }
        self.heading = heading;
        out_events.push(Event::HeadingChanged { heading });
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        let from = self.body.front().copied().unwrap_or(self.start);

        // A stationary heading lands the head on itself.
        let to = from.wrapped_step(self.heading, self.tile_count);
        if self.body.contains(&to) {
            self.collide(to, out_events);
            return;
        }

        self.body.push_front(to);
        out_events.push(Event::Advanced { from, to });

        if self.target == Some(to) {
            self.score = self.score.saturating_add(1);
            tracing::debug!(cell = ?to, score = self.score, "target reached");
            out_events.push(Event::TargetReached {
                cell: to,
                score: self.score,
            });
            self.place_target(out_events);
        } else {
            let _ = self.body.pop_back();
        }
    }

    fn collide(&mut self, cell: Cell, out_events: &mut Vec<Event>) {
        let final_score = self.score;
        tracing::debug!(
            ?cell,
            final_score,
            length = self.body.len(),
            "self-collision, restarting episode"
        );

        self.body.clear();
        self.body.push_back(self.start);
        self.heading = Heading::Stationary;
        self.score = 0;
        out_events.push(Event::Collided { cell, final_score });
        self.place_target(out_events);
    }

    fn place_target(&mut self, out_events: &mut Vec<Event>) {
        self.target = self.placer.place(self.tile_count, &self.body);
        match self.target {
            Some(cell) => {
                tracing::debug!(?cell, "target placed");
                out_events.push(Event::TargetPlaced { cell });
            }
            None => {
                tracing::debug!(length = self.body.len(), "board filled, no target placed");
                out_events.push(Event::BoardFilled);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.advance(out_events);
        }
        Command::SetHeading { heading } => world.set_heading(heading, out_events),
        Command::Steer { direction } => {
            if world.heading.admits(direction) {
                world.set_heading(Heading::Moving(direction), out_events);
            } else {
                out_events.push(Event::SteerRejected { direction });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use snake_pilot_core::{BodyView, Cell, Heading, TileCount};

    /// Captures a read-only view of the body, head first.
    #[must_use]
    pub fn body(world: &World) -> BodyView<'_> {
        BodyView::new(&world.body)
    }

    /// Cell currently holding the head.
    #[must_use]
    pub fn head(world: &World) -> Cell {
        world.body.front().copied().unwrap_or(world.start)
    }

    /// Cell holding the target, absent only when the body fills the board.
    #[must_use]
    pub fn target(world: &World) -> Option<Cell> {
        world.target
    }

    /// Number of targets reached since the last collision.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Movement vector applied on the next tick.
    #[must_use]
    pub fn heading(world: &World) -> Heading {
        world.heading
    }

    /// Edge length of the grid.
    #[must_use]
    pub fn tile_count(world: &World) -> TileCount {
        world.tile_count
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
