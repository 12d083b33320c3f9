#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that couples the world with its steering source.
//!
//! [`AgentController::step`] is a plain synchronous call. It decides the
//! heading (autopilot or latched manual input), advances the world by one
//! tick and reports what happened. Scheduling is left to the caller.

use snake_pilot_core::{Command, ConfigError, ControlMode, Direction, Event, SimulationConfig};
use snake_pilot_system_autopilot::{self as autopilot, Autopilot};
use snake_pilot_world::{self as world, World};

const AUTOPILOT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Summary of the state transition performed by a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The head moved and the tail followed.
    Advanced,
    /// The head entered the target cell and the body grew by one segment.
    TargetReached {
        /// Score after the increment.
        score: u32,
    },
    /// The head ran into the body, or stood still onto itself, and the
    /// episode restarted.
    Collided {
        /// Score held immediately before the reset.
        final_score: u32,
    },
}

impl TickOutcome {
    /// Resolves the events of a single tick. Every tick either collides or
    /// moves the head, so a batch without collision or growth is an advance.
    fn from_events(events: &[Event]) -> Self {
        let mut outcome = Self::Advanced;
        for event in events {
            match event {
                Event::Collided { final_score, .. } => {
                    return Self::Collided {
                        final_score: *final_score,
                    }
                }
                Event::TargetReached { score, .. } => {
                    outcome = Self::TargetReached { score: *score };
                }
                _ => {}
            }
        }
        outcome
    }
}

/// Owns the simulation and runs it one tick at a time.
#[derive(Debug)]
pub struct AgentController {
    world: World,
    autopilot: Autopilot,
    mode: ControlMode,
    pending_steer: Option<Direction>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl AgentController {
    /// Creates an autonomous controller from the provided configuration.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let world = World::with_config(config)?;
        let autopilot = Autopilot::new(autopilot::Config::new(
            config.search_iteration_cap,
            config.seed.rotate_left(32) ^ AUTOPILOT_STREAM,
        ));
        Ok(Self::from_parts(world, autopilot, ControlMode::Autonomous))
    }

    /// Assembles a controller from an existing world and autopilot.
    #[must_use]
    pub fn from_parts(world: World, autopilot: Autopilot, mode: ControlMode) -> Self {
        Self {
            world,
            autopilot,
            mode,
            pending_steer: None,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Switches between autonomous and manual steering.
    ///
    /// Any latched manual input is discarded.
    pub fn set_mode(&mut self, mode: ControlMode) {
        if self.mode != mode {
            tracing::debug!(?mode, "control mode changed");
        }
        self.mode = mode;
        self.pending_steer = None;
    }

    /// Steering source currently in charge.
    #[must_use]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Latches a manual steering request for the next tick.
    ///
    /// Only the most recent request survives until the tick. Requests are
    /// dropped while the autopilot is in charge.
    pub fn steer(&mut self, direction: Direction) {
        if self.mode == ControlMode::Manual {
            self.pending_steer = Some(direction);
        }
    }

    /// Runs one tick: decide the heading, advance the body, resolve the outcome.
    pub fn step(&mut self) -> TickOutcome {
        self.commands.clear();
        self.events.clear();

        match self.mode {
            ControlMode::Autonomous => self.autopilot.handle(
                world::query::body(&self.world),
                world::query::target(&self.world),
                world::query::tile_count(&self.world),
                &mut self.commands,
            ),
            ControlMode::Manual => {
                if let Some(direction) = self.pending_steer.take() {
                    self.commands.push(Command::Steer { direction });
                }
            }
        }
        self.commands.push(Command::Tick);

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let outcome = TickOutcome::from_events(&self.events);
        tracing::trace!(
            tick = world::query::tick_index(&self.world),
            ?outcome,
            "tick resolved"
        );
        outcome
    }

    /// Events produced by the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Read-only access to the simulation state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_pilot_core::{Cell, Heading};

    #[test]
    fn outcome_prefers_collision_then_growth() {
        let advanced = Event::Advanced {
            from: Cell::new(0, 0),
            to: Cell::new(1, 0),
        };
        let reached = Event::TargetReached {
            cell: Cell::new(1, 0),
            score: 3,
        };

        assert_eq!(
            TickOutcome::from_events(&[
                Event::HeadingChanged {
                    heading: Heading::Moving(Direction::East)
                },
                advanced.clone(),
            ]),
            TickOutcome::Advanced
        );
        assert_eq!(
            TickOutcome::from_events(&[advanced, reached]),
            TickOutcome::TargetReached { score: 3 }
        );
        assert_eq!(
            TickOutcome::from_events(&[
                Event::Collided {
                    cell: Cell::new(2, 2),
                    final_score: 4
                },
                Event::TargetPlaced {
                    cell: Cell::new(0, 1)
                },
            ]),
            TickOutcome::Collided { final_score: 4 }
        );
    }
}
