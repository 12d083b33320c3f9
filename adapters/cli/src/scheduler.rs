//! Fixed-delay tick loop that drives the controller and the renderer.

use std::{sync::mpsc::Receiver, thread, time::Duration};

use anyhow::Result;
use snake_pilot_core::{Direction, Event};
use snake_pilot_rendering::{Renderer, Scene};
use snake_pilot_system_controller::{AgentController, TickOutcome};
use snake_pilot_world::query;

/// Cadence and length of a run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Schedule {
    /// Delay slept after each tick has been presented.
    pub(crate) interval: Duration,
    /// Number of ticks to run, or `None` to run until interrupted.
    pub(crate) tick_limit: Option<u64>,
}

/// Totals gathered over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) targets_reached: u64,
    pub(crate) collisions: u64,
    pub(crate) best_score: u32,
}

/// Presents the initial state, then steps and presents until the tick limit.
///
/// Pending manual input is drained right before each tick; the controller
/// keeps only the most recent direction.
pub(crate) fn run<R: Renderer>(
    controller: &mut AgentController,
    renderer: &mut R,
    input: Option<&Receiver<Direction>>,
    schedule: Schedule,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    renderer.present(&capture_scene(controller))?;

    while schedule.tick_limit.map_or(true, |limit| summary.ticks < limit) {
        if let Some(input) = input {
            for direction in input.try_iter() {
                controller.steer(direction);
            }
        }

        match controller.step() {
            TickOutcome::TargetReached { score } => {
                summary.targets_reached += 1;
                summary.best_score = summary.best_score.max(score);
            }
            TickOutcome::Collided { .. } => summary.collisions += 1,
            TickOutcome::Advanced => {}
        }
        summary.ticks += 1;

        renderer.present(&capture_scene(controller))?;
        if !schedule.interval.is_zero() {
            thread::sleep(schedule.interval);
        }
    }

    Ok(summary)
}

/// Snapshots the controller state for presentation.
pub(crate) fn capture_scene(controller: &AgentController) -> Scene {
    let world = controller.world();
    let final_score = controller.events().iter().find_map(|event| match event {
        Event::Collided { final_score, .. } => Some(*final_score),
        _ => None,
    });

    Scene {
        tile_count: query::tile_count(world),
        body: query::body(world).iter().collect(),
        target: query::target(world),
        score: query::score(world),
        final_score,
        mode: controller.mode(),
        tick: query::tick_index(world),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_pilot_core::{Cell, ControlMode, SimulationConfig};
    use std::sync::mpsc;

    #[derive(Default)]
    struct RecordingRenderer {
        scenes: Vec<Scene>,
    }

    impl Renderer for RecordingRenderer {
        fn present(&mut self, scene: &Scene) -> Result<()> {
            self.scenes.push(scene.clone());
            Ok(())
        }
    }

    fn immediate(ticks: u64) -> Schedule {
        Schedule {
            interval: Duration::ZERO,
            tick_limit: Some(ticks),
        }
    }

    #[test]
    fn presents_initial_state_and_every_tick() {
        let config = SimulationConfig {
            initial_target: Some(Cell::new(5, 5)),
            ..SimulationConfig::default()
        };
        let mut controller = AgentController::new(&config).expect("valid config");
        let mut renderer = RecordingRenderer::default();

        let summary = run(&mut controller, &mut renderer, None, immediate(10)).expect("run");

        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.targets_reached, 1);
        assert_eq!(summary.best_score, 1);
        assert_eq!(renderer.scenes.len(), 11);
        assert_eq!(renderer.scenes[0].tick, 0);
        assert_eq!(renderer.scenes[10].head(), Some(Cell::new(5, 5)));
        assert_eq!(renderer.scenes[10].score, 1);
    }

    #[test]
    fn drains_latest_manual_input_before_tick() {
        let config = SimulationConfig {
            initial_target: Some(Cell::new(0, 0)),
            ..SimulationConfig::default()
        };
        let mut controller = AgentController::new(&config).expect("valid config");
        controller.set_mode(ControlMode::Manual);
        let (sender, receiver) = mpsc::channel();
        sender.send(Direction::North).expect("send");
        sender.send(Direction::West).expect("send");
        let mut renderer = RecordingRenderer::default();

        let _ = run(&mut controller, &mut renderer, Some(&receiver), immediate(2)).expect("run");

        let last = renderer.scenes.last().expect("scenes");
        assert_eq!(last.head(), Some(Cell::new(8, 10)));
        assert_eq!(last.mode, ControlMode::Manual);
    }
}
