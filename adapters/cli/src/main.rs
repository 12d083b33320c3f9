#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Snake Pilot simulation in a terminal.

mod config;
mod scheduler;
mod terminal;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use snake_pilot_core::ControlMode;
use snake_pilot_system_controller::AgentController;

use crate::{
    config::Overrides,
    scheduler::Schedule,
    terminal::{HeadlessRenderer, TerminalRenderer},
};

/// Runs a self-steering snake on a wrap-around grid.
#[derive(Debug, Parser)]
#[command(name = "snake-pilot", version, about)]
struct CliArgs {
    /// TOML file holding the simulation configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Grid edge length, overriding the configuration file.
    #[arg(long)]
    tile_count: Option<u32>,
    /// Random seed, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Delay between ticks in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
    /// Stop after this many ticks instead of running until interrupted.
    #[arg(long)]
    ticks: Option<u64>,
    /// Steer from stdin instead of the autopilot, one direction per line:
    /// w/a/s/d, k/h/j/l, up/left/down/right, north/west/south/east, or n/e.
    #[arg(long)]
    manual: bool,
    /// Skip frame output; only log episode endings.
    #[arg(long)]
    headless: bool,
}

/// Entry point for the Snake Pilot command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let config = config::load(
        args.config.as_deref(),
        Overrides {
            tile_count: args.tile_count,
            seed: args.seed,
        },
    )?;
    let mut controller =
        AgentController::new(&config).context("failed to construct the simulation")?;
    if args.manual {
        controller.set_mode(ControlMode::Manual);
    }
    let input = args.manual.then(terminal::spawn_input_reader);
    let schedule = Schedule {
        interval: Duration::from_millis(args.tick_ms),
        tick_limit: args.ticks,
    };

    tracing::info!(
        tile_count = config.tile_count.get(),
        seed = config.seed,
        mode = ?controller.mode(),
        "starting simulation"
    );

    let summary = if args.headless {
        scheduler::run(&mut controller, &mut HeadlessRenderer, input.as_ref(), schedule)?
    } else {
        let mut renderer = TerminalRenderer::new(io::stdout());
        scheduler::run(&mut controller, &mut renderer, input.as_ref(), schedule)?
    };

    tracing::info!(
        ticks = summary.ticks,
        targets_reached = summary.targets_reached,
        collisions = summary.collisions,
        best_score = summary.best_score,
        "simulation finished"
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}
