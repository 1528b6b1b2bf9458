//! Organic dungeon generation
//!
//! Rooms of random size are chained one after another: each new room is put
//! beside the previous one, exactly one wall apart, and joined to it by a
//! short corridor. When a room does not fit the chain resumes from a random
//! earlier room.

use log::{debug, warn};

use crate::config::GenConfig;
use crate::error::{GenError, Result};
use crate::grid::{DoorDirection, Grid, Rect, Tile};

use super::retry::{Attempt, GenerationReport, RetryClock, RetryReason, run_with_retries};
use super::{Strategy, door_slit};

/// Side of the anchor room the next room grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    West,
    East,
    North,
    South,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::West, Heading::East, Heading::North, Heading::South];

    /// Wall orientation the connecting door sits in
    fn door_direction(self) -> DoorDirection {
        match self {
            Heading::West | Heading::East => DoorDirection::Vertical,
            Heading::North | Heading::South => DoorDirection::Horizontal,
        }
    }

    /// Room of size `w` x `h` beside `anchor`, `gap` tiles away, centred on it
    fn neighbour(self, anchor: Rect, w: i32, h: i32, gap: i32) -> Rect {
        let mid_y = anchor.y + anchor.h / 2 - h / 2;
        let mid_x = anchor.x + anchor.w / 2 - w / 2;
        match self {
            Heading::West => Rect::new(anchor.x - gap - w, mid_y, w, h),
            Heading::East => Rect::new(anchor.right() + gap, mid_y, w, h),
            Heading::North => Rect::new(mid_x, anchor.y - gap - h, w, h),
            Heading::South => Rect::new(mid_x, anchor.bottom() + gap, w, h),
        }
    }

    /// Start and length of the stretch where the facing edges of `a` and `b` overlap
    fn shared_edge(self, a: Rect, b: Rect) -> (i32, i32) {
        match self.door_direction() {
            DoorDirection::Vertical => {
                let lo = a.y.max(b.y);
                (lo, a.bottom().min(b.bottom()) - lo)
            }
            DoorDirection::Horizontal => {
                let lo = a.x.max(b.x);
                (lo, a.right().min(b.right()) - lo)
            }
        }
    }

    /// Corridor of `width` starting at `start` along the shared edge, spanning the gap
    fn corridor(self, a: Rect, b: Rect, start: i32, width: i32, gap: i32) -> Rect {
        match self.door_direction() {
            DoorDirection::Vertical => {
                let left = if a.x < b.x { a } else { b };
                Rect::new(left.right(), start, gap, width)
            }
            DoorDirection::Horizontal => {
                let top = if a.y < b.y { a } else { b };
                Rect::new(start, top.bottom(), width, gap)
            }
        }
    }
}

impl Grid {
    /// Chain `room_count` randomly sized rooms together with corridors
    ///
    /// Fails fast with `NotEnoughSpace` when the room count is clearly more
    /// than the grid can hold; the grid is left as it was.
    pub fn generate_dungeon(&mut self, room_count: usize) -> Result<GenerationReport> {
        self.config.validate()?;
        let config = self.config.clone();
        let cols = (self.width() - 2 * config.border) / config.max_room_width;
        let rows = (self.height() - 2 * config.border) / config.max_room_height;
        let capacity = i64::from(cols - 2) * i64::from(rows - 2);
        if room_count as i64 > capacity {
            return Err(GenError::NotEnoughSpace {
                requested: room_count,
                capacity,
            });
        }
        run_with_retries(self, Strategy::Dungeon, |grid, clock| {
            chain_rooms(grid, clock, &config, room_count)
        })
    }

    /// Place a room: floor inside `room`, pre-wall on a `wall_thickness` margin
    ///
    /// Fails without writing anything if the room plus margin leaves the band
    /// or touches existing floor. Margin cells that are not void keep their
    /// tile, so neighbouring rooms share walls.
    pub fn place_room(&mut self, room: Rect) -> Result<()> {
        let footprint = room.inflate(self.config.wall_thickness);
        for (x, y) in footprint.cells() {
            if self.get(x, y)? == Tile::Floor {
                return Err(GenError::FloorAlreadyPlaced { x, y });
            }
        }
        for (x, y) in footprint.cells() {
            if room.contains(x, y) {
                self.set(x, y, Tile::Floor)?;
            } else if self.get(x, y)? == Tile::Void {
                self.set(x, y, Tile::PreWall)?;
            }
        }
        self.add_room(room);
        Ok(())
    }
}

fn random_room_size(grid: &mut Grid, config: &GenConfig) -> (i32, i32) {
    let w = grid
        .rng()
        .range_inclusive(config.min_room_width, config.max_room_width);
    let h = grid
        .rng()
        .range_inclusive(config.min_room_height, config.max_room_height);
    (w, h)
}

fn chain_rooms(
    grid: &mut Grid,
    clock: &RetryClock,
    config: &GenConfig,
    room_count: usize,
) -> Result<Attempt> {
    if room_count == 0 {
        return Ok(Attempt::Done);
    }
    let loud = config.show_error_messages;
    let gap = config.wall_thickness;

    let (w, h) = random_room_size(grid, config);
    let first = Rect::new(grid.width() / 2 - w / 2, grid.height() / 2 - h / 2, w, h);
    match grid.place_room(first) {
        Ok(()) => {}
        Err(err) if !err.is_fatal() => {
            debug!("dungeon: first room {first:?} rejected: {err}");
            return Ok(Attempt::Retry(RetryReason::FirstRoomRejected));
        }
        Err(err) => return Err(err),
    }

    let mut placed = vec![first];
    let mut anchor = first;
    while placed.len() < room_count {
        if let Some(reason) = clock.tick()? {
            return Ok(Attempt::Retry(reason));
        }

        let (w, h) = random_room_size(grid, config);
        let door_size = grid
            .rng()
            .range_inclusive(config.min_door_size, config.max_door_size);
        let heading = Heading::ALL[grid.rng().rn2(4) as usize];
        let room = heading.neighbour(anchor, w, h, gap);

        let (edge_start, edge_len) = heading.shared_edge(anchor, room);
        let width = door_size.min(edge_len);
        let slack = edge_len - width;
        let mut along = slack / 2;
        if config.allow_random_corridor_offset {
            along += grid.rng().range_inclusive(-slack / 2, slack / 2);
        }
        let along = along.clamp(0, slack);

        match grid.place_room(room) {
            Ok(()) => {
                let direction = heading.door_direction();
                let corridor = heading.corridor(anchor, room, edge_start + along, width, gap);
                grid.fill(corridor, Tile::Floor)?;
                grid.add_door(door_slit(corridor, direction, gap), direction);
                placed.push(room);
                anchor = room;
            }
            Err(err) if !err.is_fatal() => {
                if loud {
                    warn!("dungeon: rollback, {room:?} rejected: {err}");
                } else {
                    debug!("dungeon: rollback, {room:?} rejected: {err}");
                }
                if let Some(&earlier) = grid.rng().choose(&placed) {
                    anchor = earlier;
                }
            }
            Err(err) => return Err(err),
        }
    }
    Ok(Attempt::Done)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbour_is_one_wall_away() {
        let anchor = Rect::new(20, 20, 6, 4);
        let east = Heading::East.neighbour(anchor, 4, 6, 2);
        assert_eq!(east, Rect::new(28, 19, 4, 6));
        let west = Heading::West.neighbour(anchor, 4, 6, 2);
        assert_eq!(west.right() + 2, anchor.x);
        let north = Heading::North.neighbour(anchor, 4, 6, 2);
        assert_eq!(north, Rect::new(21, 12, 4, 6));
        let south = Heading::South.neighbour(anchor, 4, 6, 2);
        assert_eq!(south.y, anchor.bottom() + 2);
    }

    #[test]
    fn test_corridor_joins_both_rooms() {
        let anchor = Rect::new(20, 20, 6, 4);
        let east = Heading::East.neighbour(anchor, 4, 6, 2);
        let (start, len) = Heading::East.shared_edge(anchor, east);
        assert_eq!((start, len), (20, 4));
        let corridor = Heading::East.corridor(anchor, east, start + 1, 2, 2);
        assert_eq!(corridor, Rect::new(26, 21, 2, 2));

        let north = Heading::North.neighbour(anchor, 4, 6, 2);
        let (start, len) = Heading::North.shared_edge(anchor, north);
        assert_eq!((start, len), (21, 4));
        let corridor = Heading::North.corridor(anchor, north, start, 1, 2);
        assert_eq!(corridor, Rect::new(21, 18, 1, 2));
    }

    #[test]
    fn test_place_room_writes_floor_and_prewall() {
        let mut grid = Grid::with_seed(20, 20, 1);
        grid.config.wall_thickness = 1;
        grid.place_room(Rect::new(5, 5, 3, 2)).unwrap();
        assert_eq!(grid.count(Tile::Floor), 6);
        assert_eq!(grid.count(Tile::PreWall), 5 * 4 - 6);
        assert!(grid.rooms().contains(&Rect::new(5, 5, 3, 2)));
    }

    #[test]
    fn test_place_room_rejects_overlap() {
        let mut grid = Grid::with_seed(20, 20, 1);
        grid.config.wall_thickness = 1;
        grid.place_room(Rect::new(5, 5, 3, 3)).unwrap();
        let before = grid.tiles().to_vec();
        let result = grid.place_room(Rect::new(8, 5, 3, 3));
        assert!(matches!(result, Err(GenError::FloorAlreadyPlaced { .. })));
        assert!(result.is_err_and(|err| !err.is_fatal()));
        assert_eq!(grid.tiles(), before.as_slice());
        assert_eq!(grid.rooms().len(), 1);
    }

    #[test]
    fn test_place_room_shares_walls() {
        let mut grid = Grid::with_seed(20, 20, 1);
        grid.config.wall_thickness = 1;
        grid.place_room(Rect::new(5, 5, 3, 3)).unwrap();
        grid.place_room(Rect::new(10, 5, 3, 3)).unwrap();
        // column 8 and 9 are the two rooms' margins side by side
        assert_eq!(grid.get(8, 6), Ok(Tile::PreWall));
        assert_eq!(grid.get(9, 6), Ok(Tile::PreWall));
        assert_eq!(grid.rooms().len(), 2);
    }

    #[test]
    fn test_place_room_margin_must_fit_band() {
        let mut grid = Grid::with_seed(20, 20, 1);
        grid.config.wall_thickness = 2;
        let result = grid.place_room(Rect::new(3, 3, 4, 4));
        assert!(matches!(result, Err(GenError::OutOfBounds { .. })));
        assert!(result.is_err_and(|err| !err.is_fatal()));
        assert_eq!(grid.count(Tile::Floor), 0);
        assert_eq!(grid.count(Tile::PreWall), 0);
    }

    #[test]
    fn test_generates_requested_rooms() {
        let mut grid = Grid::with_seed(80, 80, 31);
        grid.generate_dungeon(10).unwrap();
        assert_eq!(grid.rooms().len(), 10);
        assert_eq!(grid.doors().len(), 9);
        for door in grid.doors().keys() {
            assert!(door.cells().all(|(x, y)| grid.get(x, y) == Ok(Tile::Floor)));
        }
    }

    #[test]
    fn test_zero_rooms() {
        let mut grid = Grid::with_seed(40, 40, 31);
        grid.generate_dungeon(0).unwrap();
        assert_eq!(grid.count(Tile::Floor), 0);
    }
}
