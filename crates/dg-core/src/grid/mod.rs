//! Grid data model
//!
//! Contains tiles, rectangles, the grid store, topology queries and the
//! post-processing passes.

mod passes;
mod rect;
mod store;
mod tile;
mod topology;

pub use rect::Rect;
pub use store::{Bounds, Grid};
pub use tile::{DoorDirection, Tile};
