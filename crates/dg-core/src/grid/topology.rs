//! Read-only topology queries: neighbour counts, flood fill, convexity probe
//!
//! All queries go through the band-checked `get`, so cells in the border band
//! never count as neighbours and never join a component.

use hashbrown::HashSet;

use super::{Grid, Rect, Tile};

const NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Grid {
    fn is_kind(&self, x: i32, y: i32, kind: Tile) -> bool {
        self.get(x, y) == Ok(kind)
    }

    /// Number of the 8 surrounding cells equal to `kind`
    pub fn count_surrounding8(&self, x: i32, y: i32, kind: Tile) -> usize {
        NEIGHBORS_8
            .iter()
            .filter(|(dx, dy)| self.is_kind(x + dx, y + dy, kind))
            .count()
    }

    /// Number of the 4 orthogonal neighbours equal to `kind`
    pub fn count_surrounding4(&self, x: i32, y: i32, kind: Tile) -> usize {
        NEIGHBORS_4
            .iter()
            .filter(|(dx, dy)| self.is_kind(x + dx, y + dy, kind))
            .count()
    }

    /// 4-connected component of `kind` containing `(x, y)`
    ///
    /// Cells are keyed by zero-sized `Rect`s. Empty if the start cell is not
    /// `kind` or lies outside the band.
    pub fn flood_fill(&self, x: i32, y: i32, kind: Tile) -> HashSet<Rect> {
        let mut component = HashSet::new();
        self.flood_fill_into(x, y, kind, &mut component);
        component
    }

    /// Flood fill that skips (and records into) an existing visited set
    ///
    /// Returns the cells newly added by this call.
    pub(crate) fn flood_fill_into(
        &self,
        x: i32,
        y: i32,
        kind: Tile,
        visited: &mut HashSet<Rect>,
    ) -> Vec<Rect> {
        let mut added = Vec::new();
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            if !self.is_kind(cx, cy, kind) || !visited.insert(Rect::point(cx, cy)) {
                continue;
            }
            added.push(Rect::point(cx, cy));
            for (dx, dy) in NEIGHBORS_4 {
                stack.push((cx + dx, cy + dy));
            }
        }
        added
    }

    /// Scan row `y` over columns `[min_x, max_x)` for floor, then void, then floor
    ///
    /// A hit means the shape is concave (or holed) along that row.
    pub fn row_has_gap(&self, y: i32, min_x: i32, max_x: i32) -> bool {
        let mut found_floor = false;
        let mut in_gap = false;
        for x in min_x..max_x {
            match self.get(x, y) {
                Ok(Tile::Floor) => {
                    if found_floor && in_gap {
                        return true;
                    }
                    found_floor = true;
                }
                Ok(Tile::Void) => {
                    if found_floor {
                        in_gap = true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}
