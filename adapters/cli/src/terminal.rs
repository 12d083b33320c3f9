//! Terminal presentation and keyboard-line input for the command-line adapter.

use std::{
    io::{self, BufRead, Write},
    sync::mpsc::{self, Receiver},
    thread,
};

use anyhow::{Context, Result};
use snake_pilot_core::Direction;
use snake_pilot_rendering::{compose_text, Renderer, Scene};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Writes every scene as a text frame, clearing the screen first.
#[derive(Debug)]
pub(crate) struct TerminalRenderer<W> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        write!(self.out, "{CLEAR_SCREEN}{}", compose_text(scene)).context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")
    }
}

/// Renderer for runs without a display; only episode endings are logged.
#[derive(Debug, Default)]
pub(crate) struct HeadlessRenderer;

impl Renderer for HeadlessRenderer {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        if let Some(final_score) = scene.final_score {
            tracing::info!(tick = scene.tick, final_score, "episode ended");
        }
        Ok(())
    }
}

/// Maps a line of keyboard input onto a direction.
///
/// Accepts WASD, vi keys, arrow names, compass names and the compass
/// letters `n` and `e`; `s` and `w` already belong to WASD.
pub(crate) fn parse_direction(input: &str) -> Option<Direction> {
    match input.trim().to_ascii_lowercase().as_str() {
        "w" | "k" | "n" | "up" | "north" => Some(Direction::North),
        "d" | "l" | "e" | "right" | "east" => Some(Direction::East),
        "s" | "j" | "down" | "south" => Some(Direction::South),
        "a" | "h" | "left" | "west" => Some(Direction::West),
        _ => None,
    }
}

/// Reads stdin on a background thread and forwards every recognised direction.
///
/// The thread ends when stdin closes or the receiver is dropped.
pub(crate) fn spawn_input_reader() -> Receiver<Direction> {
    let (sender, receiver) = mpsc::channel();
    let _ = thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_direction(&line) {
                Some(direction) => {
                    if sender.send(direction).is_err() {
                        break;
                    }
                }
                None => tracing::debug!(input = %line, "ignoring unrecognised input"),
            }
        }
    });
    receiver
}
