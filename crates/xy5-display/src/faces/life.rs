//! Conway's Game of Life on a 14x28 torus.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;
use xy5_hw::PixelBuffer;

use super::{Face, Frame};
use crate::config::LifeConfig;

/// Counts live cells around `(row, col)`, wrapping at every edge.
fn live_neighbors(grid: &PixelBuffer, row: usize, col: usize) -> u8 {
    let rows = grid.rows();
    let cols = grid.columns();
    let mut count = 0;
    for dr in [rows - 1, 0, 1] {
        for dc in [cols - 1, 0, 1] {
            if dr == 0 && dc == 0 {
                continue;
            }
            if grid.get((row + dr) % rows, (col + dc) % cols) == Some(true) {
                count += 1;
            }
        }
    }
    count
}

/// Advances one generation: live cells survive with 2 or 3 neighbours,
/// dead cells with exactly 3 come alive.
pub fn next_generation(grid: &PixelBuffer) -> PixelBuffer {
    let mut next = PixelBuffer::new(grid.shape());
    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            let alive = grid.get(row, col) == Some(true);
            let alive_next = matches!((alive, live_neighbors(grid, row, col)), (true, 2) | (_, 3));
            next.set(row, col, alive_next);
        }
    }
    next
}

/// Fills a 14x28 grid, each cell alive with probability `density`.
fn random_grid<R: Rng>(rng: &mut R, density: f64) -> PixelBuffer {
    let mut grid = PixelBuffer::dual_panel();
    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            grid.set(row, col, rng.gen::<f64>() < density);
        }
    }
    grid
}

/// Game of Life, reseeded after a fixed number of generations.
pub struct LifeFace {
    grid: PixelBuffer,
    step: u32,
    max_steps: u32,
    density: f64,
    rng: StdRng,
    interval: Duration,
}

impl LifeFace {
    /// Creates a new Life face with a random seed grid.
    pub fn new(config: &LifeConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = random_grid(&mut rng, config.density);
        Self {
            grid,
            step: 0,
            max_steps: config.max_steps,
            density: config.density,
            rng,
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    /// Replaces the current grid.
    pub fn with_grid(mut self, grid: PixelBuffer) -> Self {
        self.grid = grid;
        self.step = 0;
        self
    }

    /// Returns the current generation.
    pub fn grid(&self) -> &PixelBuffer {
        &self.grid
    }

    fn reseed(&mut self) {
        self.grid = random_grid(&mut self.rng, self.density);
        self.step = 0;
        debug!("Life reseeded with {} live cells", self.grid.count_set());
    }
}

impl Face for LifeFace {
    fn name(&self) -> &str {
        "life"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn next_frame(&mut self) -> Result<Frame> {
        if self.step >= self.max_steps {
            self.reseed();
        }
        self.grid = next_generation(&self.grid);
        self.step += 1;
        Ok(Frame::Pixels(self.grid.clone()))
    }
}
