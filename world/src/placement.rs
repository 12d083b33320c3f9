//! Target placement over the free cells of the grid.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_pilot_core::{Cell, TileCount};

/// Chooses target cells uniformly among the cells the body does not occupy.
///
/// A bounded number of rejection-sampling draws handles the common sparse
/// board. When every draw lands on the body the free cells are enumerated and
/// one of them is chosen directly, so placement always terminates.
#[derive(Clone, Debug)]
pub(crate) struct TargetPlacer {
    rng: ChaCha8Rng,
    attempts: u32,
}

impl TargetPlacer {
    pub(crate) fn new(seed: u64, attempts: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            attempts: attempts.max(1),
        }
    }

    /// Returns a free cell, or `None` when the body covers the whole grid.
    pub(crate) fn place(&mut self, tile_count: TileCount, body: &VecDeque<Cell>) -> Option<Cell> {
        let edge = tile_count.get();
        if edge == 0 {
            return None;
        }

        for _ in 0..self.attempts {
            let candidate = Cell::new(self.rng.gen_range(0..edge), self.rng.gen_range(0..edge));
            if !body.contains(&candidate) {
                return Some(candidate);
            }
        }

        let mut occupied = vec![false; tile_count.cell_count()];
        for key in body.iter().filter_map(|cell| tile_count.key(*cell)) {
            occupied[key] = true;
        }
        let free: Vec<Cell> = tile_count
            .cells()
            .zip(occupied)
            .filter_map(|(cell, taken)| (!taken).then_some(cell))
            .collect();

        tracing::debug!(
            free = free.len(),
            attempts = self.attempts,
            "random target draws exhausted, choosing among free cells"
        );
        free.choose(&mut self.rng).copied()
    }
}
