//! Axis-aligned integer rectangles
//!
//! Used for room and corridor footprints, and (with zero size) as unit
//! coordinate keys in flood-fill sets.

/// Rectangle with top-left corner `(x, y)` spanning `w` columns and `h` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Zero-sized key for a single coordinate
    pub const fn point(x: i32, y: i32) -> Self {
        Self { x, y, w: 0, h: 0 }
    }

    /// One past the last column
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the last row
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn area(&self) -> i32 {
        self.w * self.h
    }

    /// Check if the point lies inside
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle fully contains another
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `margin` on every side
    pub const fn inflate(&self, margin: i32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + 2 * margin,
            self.h + 2 * margin,
        )
    }

    /// Every cell covered, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Rect { x, y, w, h } = *self;
        (y..y + h).flat_map(move |cy| (x..x + w).map(move |cx| (cx, cy)))
    }
}
