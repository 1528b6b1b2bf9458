//! Grid dungeon generation
//!
//! The level is divided into a coarse lattice of equal square rooms. A walker
//! wanders the lattice, claiming cells; each claimed cell becomes a room and
//! each step between two cells becomes a corridor through the wall between
//! them. When the walker gets boxed in it jumps back to an earlier cell that
//! still has room to grow and opens a new branch from there.

use log::{debug, trace};

use crate::config::GenConfig;
use crate::error::{GenError, Result};
use crate::grid::{DoorDirection, Grid, Rect, Tile};

use super::retry::{Attempt, GenerationReport, RetryClock, RetryReason, run_with_retries};
use super::{Strategy, door_slit};

const STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Mapping between lattice cells and world rectangles
///
/// Lattice coordinates start at 1; column and row 0 are never used.
#[derive(Debug, Clone, Copy)]
struct Lattice {
    cols: i32,
    rows: i32,
    room_size: i32,
    wall: i32,
    border: i32,
}

impl Lattice {
    fn new(width: i32, height: i32, config: &GenConfig) -> Self {
        let pitch = config.max_room_width + config.wall_thickness;
        Self {
            cols: (width - 2 * config.border) / pitch + 1,
            rows: (height - 2 * config.border) / pitch + 1,
            room_size: config.max_room_width,
            wall: config.wall_thickness,
            border: config.border,
        }
    }

    fn pitch(&self) -> i32 {
        self.room_size + self.wall
    }

    /// Number of usable lattice cells
    fn capacity(&self) -> i64 {
        i64::from((self.cols - 1).max(0)) * i64::from((self.rows - 1).max(0))
    }

    fn contains(&self, (cx, cy): (i32, i32)) -> bool {
        cx > 0 && cy > 0 && cx < self.cols && cy < self.rows
    }

    fn room(&self, (cx, cy): (i32, i32)) -> Rect {
        Rect::new(
            self.border + (cx - 1) * self.pitch(),
            self.border + (cy - 1) * self.pitch(),
            self.room_size,
            self.room_size,
        )
    }

    /// Corridor through the wall between two neighbouring cells
    ///
    /// `along` is the corridor's offset from the rooms' shared edge start.
    fn corridor(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        width: i32,
        along: i32,
    ) -> Option<(Rect, DoorDirection)> {
        let (a, b) = (self.room(from), self.room(to));
        match (to.0 - from.0, to.1 - from.1) {
            (1, 0) | (-1, 0) => {
                let left = if a.x < b.x { a } else { b };
                Some((
                    Rect::new(left.right(), left.y + along, self.wall, width),
                    DoorDirection::Vertical,
                ))
            }
            (0, 1) | (0, -1) => {
                let top = if a.y < b.y { a } else { b };
                Some((
                    Rect::new(top.x + along, top.bottom(), width, self.wall),
                    DoorDirection::Horizontal,
                ))
            }
            _ => None,
        }
    }
}

/// Claimed lattice cells
struct Claims {
    cols: i32,
    used: Vec<bool>,
}

impl Claims {
    fn new(lattice: &Lattice) -> Self {
        let len = (lattice.cols.max(0) * lattice.rows.max(0)) as usize;
        Self {
            cols: lattice.cols,
            used: vec![false; len],
        }
    }

    fn index(&self, (cx, cy): (i32, i32)) -> Option<usize> {
        if cx < 0 || cy < 0 || cx >= self.cols {
            return None;
        }
        let idx = (cy * self.cols + cx) as usize;
        (idx < self.used.len()).then_some(idx)
    }

    fn is_used(&self, cell: (i32, i32)) -> bool {
        self.index(cell).is_some_and(|i| self.used[i])
    }

    /// Claim a cell, returning true if it was free
    fn claim(&mut self, cell: (i32, i32)) -> bool {
        match self.index(cell) {
            Some(i) if !self.used[i] => {
                self.used[i] = true;
                true
            }
            _ => false,
        }
    }

    fn used_neighbors(&self, (cx, cy): (i32, i32)) -> usize {
        STEPS
            .iter()
            .filter(|(dx, dy)| self.is_used((cx + dx, cy + dy)))
            .count()
    }
}

impl Grid {
    /// Lay out `room_count` identical square rooms on a lattice
    ///
    /// Rooms are `max_room_width` on a side, separated by `wall_thickness`.
    ///
    /// `NotEnoughSpace` is returned up front when `room_count` exceeds the
    /// number of lattice cells. That count is only an upper bound: the walker
    /// refuses to re-enter crowded cells, so it rarely claims every cell, and
    /// counts near the bound usually end in `GenerationTimeout` instead.
    pub fn generate_dungeon_grid(&mut self, room_count: usize) -> Result<GenerationReport> {
        self.config.validate()?;
        let config = self.config.clone();
        let lattice = Lattice::new(self.width(), self.height(), &config);
        let capacity = lattice.capacity();
        debug!(
            "dungeon grid: lattice is {} x {}, so at most {capacity} rooms",
            lattice.cols - 1,
            lattice.rows - 1
        );
        if room_count as i64 > capacity {
            return Err(GenError::NotEnoughSpace {
                requested: room_count,
                capacity,
            });
        }
        run_with_retries(self, Strategy::DungeonGrid, |grid, clock| {
            let Some(branches) = wander(grid, clock, &lattice, room_count)? else {
                return Ok(Attempt::Retry(RetryReason::Stalled));
            };
            carve(grid, &config, &lattice, &branches)?;
            Ok(Attempt::Done)
        })
    }
}

/// Walk the lattice until `room_count` distinct cells are claimed
///
/// Returns the visited cells grouped into branches, or `None` when the
/// attempt stalled.
fn wander(
    grid: &mut Grid,
    clock: &RetryClock,
    lattice: &Lattice,
    room_count: usize,
) -> Result<Option<Vec<Vec<(i32, i32)>>>> {
    let mut claims = Claims::new(lattice);
    let mut branches: Vec<Vec<(i32, i32)>> = vec![Vec::new()];
    let mut pos = (lattice.cols / 2, lattice.rows / 2);
    let mut remaining = room_count;

    while remaining > 0 {
        if clock.tick()?.is_some() {
            return Ok(None);
        }
        let prev = pos;
        let (dx, dy) = STEPS[grid.rng().rn2(4) as usize];
        pos = (pos.0 + dx, pos.1 + dy);

        let crowded = claims.is_used(pos) && claims.used_neighbors(pos) >= 2;
        if !lattice.contains(pos) || crowded {
            let nothing_claimed = branches.iter().all(Vec::is_empty);
            let restart = branches
                .iter()
                .flatten()
                .copied()
                .find(|&cell| claims.used_neighbors(cell) <= 2);
            match restart {
                Some(cell) => {
                    trace!("dungeon grid: boxed in at {pos:?}, branching from {cell:?}");
                    pos = cell;
                    open_branch(&mut branches, cell);
                }
                None if nothing_claimed => pos = prev,
                None => {
                    return Err(GenError::NotEnoughSpace {
                        requested: room_count,
                        capacity: lattice.capacity(),
                    });
                }
            }
            continue;
        }

        if claims.claim(pos) {
            remaining -= 1;
        }
        if let Some(branch) = branches.last_mut() {
            branch.push(pos);
        }
    }
    Ok(Some(branches))
}

/// Start a new branch at `cell`
///
/// A branch holding only `cell` is reused, so a walker that keeps getting
/// boxed in at the same place does not pile up empty branches.
fn open_branch(branches: &mut Vec<Vec<(i32, i32)>>, cell: (i32, i32)) {
    if branches.last().is_some_and(|b| b.as_slice() == [cell]) {
        return;
    }
    branches.push(vec![cell]);
}

/// Write rooms and connecting corridors for every branch
fn carve(
    grid: &mut Grid,
    config: &GenConfig,
    lattice: &Lattice,
    branches: &[Vec<(i32, i32)>],
) -> Result<()> {
    for branch in branches {
        for (i, &cell) in branch.iter().enumerate() {
            let room = lattice.room(cell);
            grid.fill(room, Tile::Floor)?;
            grid.add_room(room);

            let Some(&prev) = i.checked_sub(1).and_then(|p| branch.get(p)) else {
                continue;
            };
            let width = grid
                .rng()
                .range_inclusive(config.min_door_size, config.max_door_size)
                .min(lattice.room_size);
            let slack = lattice.room_size - width;
            let mut along = slack / 2;
            if config.allow_random_corridor_offset {
                along += grid.rng().range_inclusive(-slack / 2, slack / 2);
            }
            let along = along.clamp(0, slack);

            match lattice.corridor(prev, cell, width, along) {
                Some((corridor, direction)) => {
                    grid.fill(corridor, Tile::Floor)?;
                    grid.add_door(door_slit(corridor, direction, config.wall_thickness), direction);
                }
                None => debug!("dungeon grid: cells {prev:?} and {cell:?} are not neighbours"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_dimensions() {
        let lattice = Lattice::new(80, 80, &GenConfig::default());
        assert_eq!(lattice.cols, 8);
        assert_eq!(lattice.rows, 8);
        assert_eq!(lattice.capacity(), 49);
    }

    #[test]
    fn test_lattice_rooms_stay_in_band() {
        let config = GenConfig::default();
        let lattice = Lattice::new(80, 80, &config);
        let band = Rect::new(2, 2, 76, 76);
        for cx in 1..lattice.cols {
            for cy in 1..lattice.rows {
                assert!(band.contains_rect(&lattice.room((cx, cy))));
            }
        }
        assert_eq!(lattice.room((1, 1)), Rect::new(2, 2, 8, 8));
        assert_eq!(lattice.room((2, 1)), Rect::new(12, 2, 8, 8));
    }

    #[test]
    fn test_corridor_orientation() {
        let lattice = Lattice::new(80, 80, &GenConfig::default());
        let (east, dir) = lattice.corridor((1, 1), (2, 1), 2, 3).unwrap();
        assert_eq!(dir, DoorDirection::Vertical);
        assert_eq!(east, Rect::new(10, 5, 2, 2));
        let (west, _) = lattice.corridor((2, 1), (1, 1), 2, 3).unwrap();
        assert_eq!(west, east);
        let (south, dir) = lattice.corridor((1, 1), (1, 2), 1, 0).unwrap();
        assert_eq!(dir, DoorDirection::Horizontal);
        assert_eq!(south, Rect::new(2, 10, 1, 2));
        assert!(lattice.corridor((1, 1), (2, 2), 1, 0).is_none());
    }

    #[test]
    fn test_claims_neighbours() {
        let lattice = Lattice::new(80, 80, &GenConfig::default());
        let mut claims = Claims::new(&lattice);
        assert!(claims.claim((2, 2)));
        assert!(!claims.claim((2, 2)));
        claims.claim((3, 2));
        claims.claim((2, 3));
        assert_eq!(claims.used_neighbors((2, 2)), 2);
        assert_eq!(claims.used_neighbors((3, 3)), 2);
        assert!(!claims.is_used((-1, 2)));
        assert!(!claims.is_used((8, 2)));
    }

    #[test]
    fn test_repeated_backtrack_reuses_branch() {
        let mut branches = vec![vec![(1, 1), (2, 1), (2, 2)]];
        open_branch(&mut branches, (1, 1));
        open_branch(&mut branches, (1, 1));
        open_branch(&mut branches, (1, 1));
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1], vec![(1, 1)]);

        branches[1].push((1, 2));
        open_branch(&mut branches, (1, 1));
        assert_eq!(branches.len(), 3);
        open_branch(&mut branches, (2, 2));
        assert_eq!(branches.len(), 4);
    }

    #[test]
    fn test_generates_requested_rooms() {
        let mut grid = Grid::with_seed(80, 80, 21);
        grid.generate_dungeon_grid(12).unwrap();
        assert_eq!(grid.rooms().len(), 12);
        for room in grid.rooms() {
            assert!(room.cells().all(|(x, y)| grid.get(x, y) == Ok(Tile::Floor)));
        }
    }

    #[test]
    fn test_too_many_rooms_rejected() {
        let mut grid = Grid::with_seed(40, 40, 21);
        let result = grid.generate_dungeon_grid(50);
        assert!(matches!(result, Err(GenError::NotEnoughSpace { .. })));
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_capacity_is_only_an_upper_bound() {
        let mut grid = Grid::with_seed(40, 40, 23);
        grid.config.duration_before_retry = std::time::Duration::from_millis(5);
        grid.config.duration_before_error = std::time::Duration::from_millis(40);
        assert_eq!(
            grid.generate_dungeon_grid(10).unwrap_err(),
            GenError::NotEnoughSpace {
                requested: 10,
                capacity: 9
            }
        );
        match grid.generate_dungeon_grid(9) {
            Ok(_) => assert_eq!(grid.rooms().len(), 9),
            Err(err) => assert!(matches!(err, GenError::GenerationTimeout { .. })),
        }
    }

    #[test]
    fn test_huge_rooms_rejected_before_lattice() {
        let mut grid = Grid::with_seed(40, 40, 24);
        grid.config.max_room_width = i32::MAX;
        grid.config.wall_thickness = 1;
        assert!(matches!(
            grid.generate_dungeon_grid(1),
            Err(GenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_thin_walls_keep_full_door() {
        let mut grid = Grid::with_seed(80, 80, 22);
        grid.config.wall_thickness = 1;
        grid.config.border = 1;
        grid.generate_dungeon_grid(6).unwrap();
        for door in grid.doors().keys() {
            assert!(door.w == 1 || door.h == 1);
            assert!(door.cells().all(|(x, y)| grid.get(x, y) == Ok(Tile::Floor)));
        }
    }
}
