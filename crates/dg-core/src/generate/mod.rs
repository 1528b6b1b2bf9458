//! Generation strategies
//!
//! Contains the random walk, grid dungeon and organic dungeon algorithms,
//! the retry controller they share, and the style presets that pair a
//! strategy with its post-processing recipe.

mod grid_dungeon;
mod organic;
mod random_walk;
mod retry;
mod style;

use strum::{Display, EnumIter};

use crate::grid::{DoorDirection, Rect};

pub use retry::{Attempt, GenerationReport, RetryClock, RetryReason};
pub use style::Style;

/// Which algorithm populated a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Strategy {
    #[strum(serialize = "random walk")]
    RandomWalk,
    #[strum(serialize = "dungeon grid")]
    DungeonGrid,
    #[strum(serialize = "dungeon")]
    Dungeon,
}

/// Door rect recorded for a corridor
///
/// With walls thicker than one tile the door is narrowed to a one-tile slit
/// near the middle of the corridor's length.
pub(crate) fn door_slit(corridor: Rect, direction: DoorDirection, thickness: i32) -> Rect {
    if thickness <= 1 {
        return corridor;
    }
    let inset = thickness / 2 + thickness % 2 - 1;
    match direction {
        DoorDirection::Horizontal => Rect::new(corridor.x, corridor.y + inset, corridor.w, 1),
        DoorDirection::Vertical => Rect::new(corridor.x + inset, corridor.y, 1, corridor.h),
    }
}
