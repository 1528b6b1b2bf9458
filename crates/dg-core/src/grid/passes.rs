//! Post-processing passes run by callers after a strategy succeeds

use hashbrown::HashSet;
use log::debug;

use super::{Bounds, Grid, Rect, Tile};

impl Grid {
    /// Surround every floor cell with `wall_thickness` tiles of wall
    ///
    /// Void within Chebyshev distance `wall_thickness` of floor becomes `Wall`,
    /// even inside the border band. Every `PreWall` becomes `Wall`.
    pub fn add_walls(&mut self) {
        let t = self.config.wall_thickness;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let tile = self.tiles()[y as usize][x as usize];
                match tile {
                    Tile::Floor => {
                        for dy in -t..=t {
                            for dx in -t..=t {
                                if self.tile_at(x + dx, y + dy, Bounds::Array) == Ok(Tile::Void) {
                                    self.tiles_mut()[(y + dy) as usize][(x + dx) as usize] =
                                        Tile::Wall;
                                }
                            }
                        }
                    }
                    Tile::PreWall => self.tiles_mut()[y as usize][x as usize] = Tile::Wall,
                    _ => {}
                }
            }
        }
    }

    /// Turn walls with at least `min_floor_neighbors` floor neighbours into floor
    ///
    /// Shaves slivers and notches off jagged edges. Cells are updated in place
    /// in row-major order.
    pub fn clean_walls(&mut self, min_floor_neighbors: usize) {
        let band = self.band();
        for (x, y) in band.cells() {
            if self.get(x, y) == Ok(Tile::Wall)
                && self.count_surrounding8(x, y, Tile::Floor) >= min_floor_neighbors
            {
                self.tiles_mut()[y as usize][x as usize] = Tile::Floor;
            }
        }
    }

    /// Fill every void island smaller than `min_island_size` with floor
    ///
    /// One visited set is shared by the whole scan, so each void cell is
    /// flood-filled exactly once.
    pub fn clean_islands(&mut self) {
        let min = self.config.min_island_size;
        let band = self.band();
        let mut visited: HashSet<Rect> = HashSet::new();
        let mut filled = 0usize;
        for (x, y) in band.cells() {
            if visited.contains(&Rect::point(x, y)) {
                continue;
            }
            let island = self.flood_fill_into(x, y, Tile::Void, &mut visited);
            if island.is_empty() || island.len() >= min {
                continue;
            }
            for cell in &island {
                self.tiles_mut()[cell.y as usize][cell.x as usize] = Tile::Floor;
            }
            filled += 1;
        }
        debug!("clean_islands: filled {filled} islands below {min} tiles");
    }
}
