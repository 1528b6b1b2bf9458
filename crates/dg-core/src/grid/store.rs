//! Grid store
//!
//! Fixed-size tile array plus the room and door registries filled in by the
//! generation strategies. Tiles are stored row-major (`tiles[y][x]`) but every
//! accessor takes `(x, y)`.

use std::fmt;

use hashbrown::{HashMap, HashSet};

use crate::config::GenConfig;
use crate::error::{GenError, Result};
use crate::rng::GenRng;

use super::{DoorDirection, Rect, Tile};

/// Which rectangle a coordinate is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// `[border, dim - border)` on both axes: where floor may live
    Band,
    /// The raw tile array
    Array,
}

impl Bounds {
    /// Floor writes are held to the band, every other tile only to the array
    pub const fn for_write(tile: Tile) -> Self {
        match tile {
            Tile::Floor => Bounds::Band,
            _ => Bounds::Array,
        }
    }
}

/// The generated level: tiles, rooms, doors and the settings that shape them
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Vec<Tile>>,
    rooms: HashSet<Rect>,
    doors: HashMap<Rect, DoorDirection>,
    /// Parameters for the next generation call
    pub config: GenConfig,
    rng: GenRng,
}

fn void_tiles(width: i32, height: i32) -> Vec<Vec<Tile>> {
    vec![vec![Tile::Void; width.max(0) as usize]; height.max(0) as usize]
}

impl Grid {
    /// Create an empty grid with default settings and an entropy-seeded RNG
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_rng(width, height, GenRng::from_entropy())
    }

    /// Create an empty grid whose generation is reproducible from `seed`
    pub fn with_seed(width: i32, height: i32, seed: u64) -> Self {
        Self::with_rng(width, height, GenRng::new(seed))
    }

    fn with_rng(width: i32, height: i32, rng: GenRng) -> Self {
        Self {
            width,
            height,
            tiles: void_tiles(width, height),
            rooms: HashSet::new(),
            doors: HashMap::new(),
            config: GenConfig::default(),
            rng,
        }
    }

    /// Replace the settings, builder style
    pub fn with_config(mut self, config: GenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Raw rows, indexed `[y][x]`
    pub fn tiles(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Vec<Tile>] {
        &mut self.tiles
    }

    /// Every room footprint placed by the last generation
    pub fn rooms(&self) -> &HashSet<Rect> {
        &self.rooms
    }

    /// Every door placed by the last generation
    pub fn doors(&self) -> &HashMap<Rect, DoorDirection> {
        &self.doors
    }

    /// Seed of the current random source
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Restart the random source from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = GenRng::new(seed);
    }

    pub(crate) fn rng(&mut self) -> &mut GenRng {
        &mut self.rng
    }

    /// Reallocate every tile to `Void` and forget all rooms and doors
    pub fn reset(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.tiles = void_tiles(width, height);
        self.rooms.clear();
        self.doors.clear();
    }

    /// Reset keeping the current dimensions
    pub fn clear(&mut self) {
        self.reset(self.width, self.height);
    }

    /// Cells where floor may be written
    pub fn band(&self) -> Rect {
        let b = self.config.border;
        Rect::new(b, b, self.width - 2 * b, self.height - 2 * b)
    }

    pub fn in_bounds(&self, x: i32, y: i32, bounds: Bounds) -> bool {
        match bounds {
            Bounds::Band => self.band().contains(x, y),
            Bounds::Array => x >= 0 && y >= 0 && x < self.width && y < self.height,
        }
    }

    /// Tile at `(x, y)`, failing outside the generation band
    pub fn get(&self, x: i32, y: i32) -> Result<Tile> {
        self.tile_at(x, y, Bounds::Band)
    }

    /// Tile at `(x, y)`, checked against the given bounds
    pub fn tile_at(&self, x: i32, y: i32, bounds: Bounds) -> Result<Tile> {
        if !self.in_bounds(x, y, bounds) {
            return Err(GenError::OutOfBounds { x, y });
        }
        Ok(self.tiles[y as usize][x as usize])
    }

    /// Write one tile
    ///
    /// `Floor` must land inside the band; anything else may go anywhere in
    /// the array. A failed write leaves the grid untouched.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> Result<()> {
        if !self.in_bounds(x, y, Bounds::for_write(tile)) {
            return Err(GenError::OutOfBounds { x, y });
        }
        self.tiles[y as usize][x as usize] = tile;
        Ok(())
    }

    /// Write `tile` over the whole rectangle, or nothing if any cell is out of bounds
    pub fn fill(&mut self, rect: Rect, tile: Tile) -> Result<()> {
        let bounds = Bounds::for_write(tile);
        if let Some((x, y)) = rect.cells().find(|&(x, y)| !self.in_bounds(x, y, bounds)) {
            return Err(GenError::OutOfBounds { x, y });
        }
        for (x, y) in rect.cells() {
            self.tiles[y as usize][x as usize] = tile;
        }
        Ok(())
    }

    pub(crate) fn add_room(&mut self, room: Rect) {
        self.rooms.insert(room);
    }

    pub(crate) fn add_door(&mut self, door: Rect, direction: DoorDirection) {
        self.doors.insert(door, direction);
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles
            .iter()
            .map(|row| row.iter().filter(|&&t| t == tile).count())
            .sum()
    }

    /// Smallest rectangle covering every floor cell
    pub fn floor_bounds(&self) -> Option<Rect> {
        let mut found: Option<(i32, i32, i32, i32)> = None;
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                if tile != Tile::Floor {
                    continue;
                }
                let (x, y) = (x as i32, y as i32);
                found = Some(match found {
                    None => (x, y, x, y),
                    Some((lx, ly, hx, hy)) => (lx.min(x), ly.min(y), hx.max(x), hy.max(y)),
                });
            }
        }
        found.map(|(lx, ly, hx, hy)| Rect::new(lx, ly, hx - lx + 1, hy - ly + 1))
    }

    /// Paint doors and room corners with their debug markers
    ///
    /// Doors become `Door`; each room's first cell becomes `RoomBegin` and its
    /// last cell `RoomEnd`. Only meant for visual inspection.
    pub fn mark_features(&mut self) {
        let doors: Vec<Rect> = self.doors.keys().copied().collect();
        for door in doors {
            for (x, y) in door.cells() {
                self.paint(x, y, Tile::Door);
            }
        }
        let rooms: Vec<Rect> = self.rooms.iter().copied().collect();
        for room in rooms {
            if room.area() == 0 {
                continue;
            }
            self.paint(room.x, room.y, Tile::RoomBegin);
            self.paint(room.right() - 1, room.bottom() - 1, Tile::RoomEnd);
        }
    }

    fn paint(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y, Bounds::Array) {
            self.tiles[y as usize][x as usize] = tile;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.tiles {
            let line: String = row.iter().map(Tile::symbol).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_void() {
        let grid = Grid::with_seed(10, 6, 1);
        assert_eq!(grid.tiles().len(), 6);
        assert_eq!(grid.tiles()[0].len(), 10);
        assert_eq!(grid.count(Tile::Void), 60);
        assert!(grid.rooms().is_empty());
        assert!(grid.doors().is_empty());
    }

    #[test]
    fn test_floor_write_held_to_band() {
        let mut grid = Grid::with_seed(10, 10, 1);
        assert_eq!(
            grid.set(1, 5, Tile::Floor),
            Err(GenError::OutOfBounds { x: 1, y: 5 })
        );
        assert_eq!(grid.count(Tile::Floor), 0);
        assert!(grid.set(2, 2, Tile::Floor).is_ok());
        assert!(grid.set(7, 7, Tile::Floor).is_ok());
        assert!(grid.set(8, 7, Tile::Floor).is_err());
    }

    #[test]
    fn test_other_tiles_may_touch_edge() {
        let mut grid = Grid::with_seed(10, 10, 1);
        assert!(grid.set(0, 0, Tile::Wall).is_ok());
        assert!(grid.set(9, 9, Tile::PreWall).is_ok());
        assert!(grid.set(10, 9, Tile::Wall).is_err());
        assert!(grid.set(-1, 0, Tile::Wall).is_err());
        assert_eq!(grid.tiles()[0][0], Tile::Wall);
    }

    #[test]
    fn test_get_is_band_checked() {
        let mut grid = Grid::with_seed(10, 10, 1);
        grid.set(0, 0, Tile::Wall).unwrap();
        assert!(grid.get(0, 0).is_err());
        assert_eq!(grid.tile_at(0, 0, Bounds::Array), Ok(Tile::Wall));
        assert_eq!(grid.get(2, 2), Ok(Tile::Void));
    }

    #[test]
    fn test_fill_is_all_or_nothing() {
        let mut grid = Grid::with_seed(10, 10, 1);
        assert!(grid.fill(Rect::new(6, 6, 3, 3), Tile::Floor).is_err());
        assert_eq!(grid.count(Tile::Floor), 0);
        grid.fill(Rect::new(3, 3, 3, 2), Tile::Floor).unwrap();
        assert_eq!(grid.count(Tile::Floor), 6);
    }

    #[test]
    fn test_reset_clears_registries() {
        let mut grid = Grid::with_seed(10, 10, 1);
        grid.set(4, 4, Tile::Floor).unwrap();
        grid.add_room(Rect::new(4, 4, 1, 1));
        grid.add_door(Rect::new(5, 4, 1, 1), DoorDirection::Vertical);
        grid.reset(12, 8);
        assert_eq!(grid.width(), 12);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.count(Tile::Void), 96);
        assert!(grid.rooms().is_empty());
        assert!(grid.doors().is_empty());
    }

    #[test]
    fn test_floor_bounds() {
        let mut grid = Grid::with_seed(10, 10, 1);
        assert_eq!(grid.floor_bounds(), None);
        grid.set(3, 4, Tile::Floor).unwrap();
        grid.set(6, 2, Tile::Floor).unwrap();
        assert_eq!(grid.floor_bounds(), Some(Rect::new(3, 2, 4, 3)));
    }

    #[test]
    fn test_mark_features() {
        let mut grid = Grid::with_seed(12, 12, 1);
        grid.add_room(Rect::new(2, 2, 3, 3));
        grid.add_door(Rect::new(5, 3, 1, 1), DoorDirection::Vertical);
        grid.mark_features();
        assert_eq!(grid.tiles()[2][2], Tile::RoomBegin);
        assert_eq!(grid.tiles()[4][4], Tile::RoomEnd);
        assert_eq!(grid.tiles()[3][5], Tile::Door);
    }

    #[test]
    fn test_display_rows() {
        let mut grid = Grid::with_seed(4, 4, 1);
        grid.config.border = 0;
        grid.set(1, 1, Tile::Floor).unwrap();
        grid.set(0, 0, Tile::Wall).unwrap();
        assert_eq!(grid.to_string(), "#   \n .  \n    \n    \n");
    }
}
