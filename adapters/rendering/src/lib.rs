#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Pilot adapters.

use anyhow::Result as AnyResult;
use snake_pilot_core::{Cell, ControlMode, TileCount};

/// Glyph drawn for the head segment.
pub const HEAD_GLYPH: char = '@';
/// Glyph drawn for every segment behind the head.
pub const BODY_GLYPH: char = 'o';
/// Glyph drawn for the target cell.
pub const TARGET_GLYPH: char = '*';
/// Glyph drawn for empty cells.
pub const EMPTY_GLYPH: char = '.';

/// Immutable snapshot of everything a renderer needs after a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Edge length of the grid.
    pub tile_count: TileCount,
    /// Body segments, head first.
    pub body: Vec<Cell>,
    /// Target cell, absent only when the body fills the board.
    pub target: Option<Cell>,
    /// Score of the running episode.
    pub score: u32,
    /// Score of the episode that ended on this tick, if the head collided.
    pub final_score: Option<u32>,
    /// Steering source in charge.
    pub mode: ControlMode,
    /// Number of ticks simulated so far.
    pub tick: u64,
}

impl Scene {
    /// Head segment, if the body is non-empty.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.body.first().copied()
    }
}

/// Presentation surface that receives a scene after every tick.
pub trait Renderer {
    /// Draws the provided scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Composes the scene as text: one line per grid row followed by a status line.
///
/// Cells outside the grid are skipped. When the target and a body segment
/// share a cell the segment wins.
#[must_use]
pub fn compose_text(scene: &Scene) -> String {
    let edge = scene.tile_count.get();
    let mut glyphs = vec![EMPTY_GLYPH; scene.tile_count.cell_count()];
    let mut put = |cell: Cell, glyph: char| {
        if let Some(slot) = scene.tile_count.key(cell).and_then(|key| glyphs.get_mut(key)) {
            *slot = glyph;
        }
    };

    if let Some(target) = scene.target {
        put(target, TARGET_GLYPH);
    }
    for cell in scene.body.iter().skip(1) {
        put(*cell, BODY_GLYPH);
    }
    if let Some(head) = scene.head() {
        put(head, HEAD_GLYPH);
    }

    let width = usize::try_from(edge).unwrap_or(0);
    let mut frame = String::with_capacity((width + 1) * width + 32);
    if width > 0 {
        for row in glyphs.chunks(width) {
            frame.extend(row.iter());
            frame.push('\n');
        }
    }

    frame.push_str(&format!("Score: {}", scene.score));
    if scene.mode == ControlMode::Manual {
        frame.push_str("  [manual]");
    }
    if let Some(final_score) = scene.final_score {
        frame.push_str(&format!("\nCrashed with score {final_score}, restarting"));
    }
    frame.push('\n');
    frame
}
