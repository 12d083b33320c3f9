use snake_pilot_core::{
    Cell, Command, ControlMode, Direction, Event, Heading, SimulationConfig, TileCount,
};
use snake_pilot_system_autopilot::{self as autopilot, Autopilot};
use snake_pilot_system_controller::{AgentController, TickOutcome};
use snake_pilot_world::{self as world, query, World};

fn controller(config: SimulationConfig) -> AgentController {
    AgentController::new(&config).expect("valid config")
}

fn head(controller: &AgentController) -> Cell {
    query::head(controller.world())
}

#[test]
fn autopilot_reaches_target_along_shortest_route() {
    let mut controller = controller(SimulationConfig {
        initial_target: Some(Cell::new(5, 5)),
        ..SimulationConfig::default()
    });

    for step in 1..10 {
        assert_eq!(controller.step(), TickOutcome::Advanced, "step {step}");
        assert_eq!(
            head(&controller).manhattan_distance(Cell::new(5, 5)),
            10 - step
        );
    }

    assert_eq!(controller.step(), TickOutcome::TargetReached { score: 1 });
    assert_eq!(head(&controller), Cell::new(5, 5));
    assert_eq!(query::body(controller.world()).len(), 2);
}

#[test]
fn autonomous_run_preserves_tick_invariants() {
    let mut controller = controller(SimulationConfig {
        tile_count: TileCount::new(8),
        start: Cell::new(4, 4),
        seed: 2024,
        ..SimulationConfig::default()
    });
    let mut collisions = 0;
    let mut growths = 0;

    for _ in 0..3_000 {
        let length_before = query::body(controller.world()).len();
        let score_before = query::score(controller.world());

        let outcome = controller.step();
        let state = controller.world();
        let body = query::body(state);

        match outcome {
            TickOutcome::Advanced => {
                assert_eq!(body.len(), length_before);
                assert_eq!(query::score(state), score_before);
            }
            TickOutcome::TargetReached { score } => {
                growths += 1;
                assert_eq!(body.len(), length_before + 1);
                assert_eq!(score, score_before + 1);
                assert_eq!(query::score(state), score);
            }
            TickOutcome::Collided { final_score } => {
                collisions += 1;
                assert_eq!(final_score, score_before);
                assert_eq!(body.len(), 1);
                assert_eq!(query::head(state), Cell::new(4, 4));
                assert_eq!(query::score(state), 0);
                assert_eq!(query::heading(state), Heading::Stationary);
            }
        }

        let cells: Vec<_> = body.iter().collect();
        for (index, cell) in cells.iter().enumerate() {
            assert!(query::tile_count(state).contains(*cell));
            assert!(!cells[index + 1..].contains(cell), "body overlaps at {cell:?}");
        }
        if let Some(target) = query::target(state) {
            assert!(!body.contains(target), "target placed on the body");
        }
    }

    assert!(growths > 0, "the autopilot should eat at least once");
    assert!(collisions + growths > 0);
}

#[test]
fn trapped_head_keeps_heading_and_collides() {
    let config = SimulationConfig {
        tile_count: TileCount::new(5),
        start: Cell::new(4, 4),
        initial_target: Some(Cell::new(4, 0)),
        ..SimulationConfig::default()
    };
    let mut state = World::with_config(&config).expect("valid config");
    state.replace_body([
        Cell::new(1, 1),
        Cell::new(1, 0),
        Cell::new(2, 0),
        Cell::new(2, 1),
        Cell::new(2, 2),
        Cell::new(1, 2),
        Cell::new(0, 2),
        Cell::new(0, 1),
    ]);
    let mut events = Vec::new();
    world::apply(
        &mut state,
        Command::SetHeading {
            heading: Heading::Moving(Direction::East),
        },
        &mut events,
    );
    let mut controller = AgentController::from_parts(
        state,
        Autopilot::new(autopilot::Config::new(1_000, 3)),
        ControlMode::Autonomous,
    );

    let outcome = controller.step();

    assert_eq!(outcome, TickOutcome::Collided { final_score: 0 });
    assert!(!controller
        .events()
        .iter()
        .any(|event| matches!(event, Event::HeadingChanged { .. })));
    let body = query::body(controller.world());
    assert_eq!(body.len(), 1);
    assert_eq!(body.head(), Some(Cell::new(4, 4)));
    let target = query::target(controller.world()).expect("target placed");
    assert!(!body.contains(target));
}

#[test]
fn single_cell_grid_collides_every_tick() {
    let mut controller = controller(SimulationConfig {
        tile_count: TileCount::new(1),
        start: Cell::new(0, 0),
        ..SimulationConfig::default()
    });
    assert_eq!(query::target(controller.world()), None);

    for _ in 0..5 {
        assert_eq!(
            controller.step(),
            TickOutcome::Collided { final_score: 0 }
        );
        assert_eq!(
            controller.events(),
            &[
                Event::Collided {
                    cell: Cell::new(0, 0),
                    final_score: 0,
                },
                Event::BoardFilled,
            ]
        );
    }
    assert_eq!(head(&controller), Cell::new(0, 0));
    assert_eq!(query::body(controller.world()).len(), 1);
}

#[test]
fn manual_mode_applies_only_latest_input() {
    let mut controller = controller(SimulationConfig {
        initial_target: Some(Cell::new(0, 0)),
        ..SimulationConfig::default()
    });
    controller.set_mode(ControlMode::Manual);

    controller.steer(Direction::North);
    controller.steer(Direction::East);
    assert_eq!(controller.step(), TickOutcome::Advanced);

    assert_eq!(head(&controller), Cell::new(11, 10));
    assert!(!controller.events().contains(&Event::HeadingChanged {
        heading: Heading::Moving(Direction::North)
    }));
}

#[test]
fn manual_mode_without_input_collides_and_resets() {
    let mut controller = controller(SimulationConfig {
        initial_target: Some(Cell::new(0, 0)),
        ..SimulationConfig::default()
    });
    controller.set_mode(ControlMode::Manual);

    assert_eq!(controller.step(), TickOutcome::Collided { final_score: 0 });
    assert_eq!(head(&controller), Cell::new(10, 10));
    assert_eq!(query::score(controller.world()), 0);
    assert_eq!(query::body(controller.world()).len(), 1);
    assert!(controller
        .events()
        .iter()
        .any(|event| matches!(event, Event::TargetPlaced { .. })));
    let target = query::target(controller.world()).expect("target placed after reset");
    assert!(!query::body(controller.world()).contains(target));
}

#[test]
fn manual_reversal_is_rejected() {
    let mut controller = controller(SimulationConfig {
        initial_target: Some(Cell::new(0, 0)),
        ..SimulationConfig::default()
    });
    controller.set_mode(ControlMode::Manual);

    controller.steer(Direction::East);
    let _ = controller.step();
    controller.steer(Direction::West);
    let _ = controller.step();

    assert!(controller.events().contains(&Event::SteerRejected {
        direction: Direction::West
    }));
    assert_eq!(head(&controller), Cell::new(12, 10));
    assert_eq!(
        query::heading(controller.world()),
        Heading::Moving(Direction::East)
    );
}

#[test]
fn input_is_ignored_while_autonomous() {
    let mut controller = controller(SimulationConfig {
        initial_target: Some(Cell::new(0, 0)),
        ..SimulationConfig::default()
    });

    controller.steer(Direction::South);
    controller.set_mode(ControlMode::Manual);

    assert_eq!(controller.mode(), ControlMode::Manual);
    assert_eq!(controller.step(), TickOutcome::Collided { final_score: 0 });
    assert_eq!(head(&controller), Cell::new(10, 10));
}

#[test]
fn identically_seeded_runs_replay_identically() {
    let config = SimulationConfig {
        tile_count: TileCount::new(10),
        start: Cell::new(5, 5),
        seed: 5,
        ..SimulationConfig::default()
    };
    let mut first = controller(config.clone());
    let mut second = controller(config);

    for _ in 0..1_000 {
        assert_eq!(first.step(), second.step());
        assert_eq!(first.events(), second.events());
    }
}
