//! Tile kinds and door orientation

use strum::{Display, EnumIter};

/// Content of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Void = 0,
    Wall = 1,
    /// Placeholder wall written around organic rooms, turned into `Wall` by `add_walls`
    PreWall = 2,
    Floor = 3,

    // Debug markers, only ever painted by callers
    Door = 4,
    RoomBegin = 5,
    RoomEnd = 6,
}

impl Tile {
    /// Display glyph for text dumps
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Void => ' ',
            Tile::Wall => '#',
            Tile::PreWall => '+',
            Tile::Floor => '.',
            Tile::Door => 'D',
            Tile::RoomBegin => '<',
            Tile::RoomEnd => '>',
        }
    }
}

/// Orientation of a door, used to narrow it to a one tile slit in thick walls
///
/// A `Vertical` door sits in a vertical wall between horizontally adjacent
/// rooms; a `Horizontal` door sits in a horizontal wall between stacked rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DoorDirection {
    Horizontal,
    Vertical,
}
