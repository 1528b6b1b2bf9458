//! Random walk ("drunkard's walk") cave generation
//!
//! One walker starts at the grid centre and stamps a square of floor at every
//! step. Half of its steps draw a fresh heading out of the four cardinal
//! directions, the other half keep the current one. The result is a single
//! connected, organic-looking cave.

use log::trace;

use crate::config::GenConfig;
use crate::error::{GenError, Result};
use crate::grid::{Grid, Rect, Tile};

use super::Strategy;
use super::retry::{Attempt, GenerationReport, RetryClock, RetryReason, run_with_retries};

/// Headings picked by rolls 0..4 of a d8; rolls 4..8 keep the old heading
const HEADINGS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Grid {
    /// Carve `tile_count` floor tiles with a single random walker
    ///
    /// Stamp size is drawn from `min_door_size..=max_door_size`. An attempt
    /// whose floor has a gap across the midline of its bounding box is
    /// retried from scratch.
    pub fn generate_random_walk(&mut self, tile_count: usize) -> Result<GenerationReport> {
        self.config.validate()?;
        let band = self.band();
        let capacity = i64::from(band.w.max(0)) * i64::from(band.h.max(0));
        if tile_count as i64 > capacity {
            return Err(GenError::NotEnoughSpace {
                requested: tile_count,
                capacity,
            });
        }
        let config = self.config.clone();
        run_with_retries(self, Strategy::RandomWalk, |grid, clock| {
            walk(grid, clock, &config, tile_count)
        })
    }
}

/// Inclusive bounding box of walker positions
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl Extent {
    fn empty(grid: &Grid) -> Self {
        Self {
            min_x: grid.width(),
            max_x: 0,
            min_y: grid.height(),
            max_y: 0,
        }
    }

    fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn mid_row(&self) -> i32 {
        self.min_y + (self.max_y - self.min_y) / 2
    }
}

/// Heading after a d8 `roll`: 0..4 pick from `HEADINGS`, anything else keeps `current`
fn next_heading(roll: u32, current: (i32, i32)) -> (i32, i32) {
    HEADINGS.get(roll as usize).copied().unwrap_or(current)
}

fn walk(
    grid: &mut Grid,
    clock: &RetryClock,
    config: &GenConfig,
    tile_count: usize,
) -> Result<Attempt> {
    let (home_x, home_y) = (grid.width() / 2, grid.height() / 2);
    let (mut x, mut y) = (home_x, home_y);
    let (mut dx, mut dy) = (0, 0);
    let mut extent = Extent::empty(grid);
    let band = grid.band();

    let mut placed = 0usize;
    while placed < tile_count {
        if let Some(reason) = clock.tick()? {
            return Ok(Attempt::Retry(reason));
        }

        (dx, dy) = next_heading(grid.rng().rn2(8), (dx, dy));
        x += dx;
        y += dy;

        let size = grid
            .rng()
            .range_inclusive(config.min_door_size, config.max_door_size);
        let stamp = Rect::new(x - size / 2, y - size / 2, size, size);
        if !band.contains_rect(&stamp) {
            trace!("random walk: stamp at ({x}, {y}) left the band, back to centre");
            (x, y) = (home_x, home_y);
            continue;
        }

        for (sx, sy) in stamp.cells() {
            if grid.get(sx, sy)? == Tile::Void {
                grid.set(sx, sy, Tile::Floor)?;
                placed += 1;
            }
        }
        extent.include(x, y);
    }

    if grid.row_has_gap(extent.mid_row(), extent.min_x, extent.max_x + 1) {
        return Ok(Attempt::Retry(RetryReason::NotConvex));
    }
    Ok(Attempt::Done)
}
