//! dg-core: procedural dungeon generation
//!
//! Fills a fixed-size tile grid with caves, room lattices or chained rooms.
//! Every strategy runs under a two-tier deadline: a stalled attempt is
//! restarted, and the whole call fails once its total time budget is spent.
//!
//! The crate is pure: no terminal or file I/O. Output is read straight off
//! the [`Grid`] (tiles, rooms and doors).

pub mod config;
pub mod error;
pub mod generate;
pub mod grid;
mod rng;

pub use config::GenConfig;
pub use error::{GenError, Result};
pub use generate::{GenerationReport, RetryReason, Strategy, Style};
pub use grid::{Bounds, DoorDirection, Grid, Rect, Tile};
pub use rng::GenRng;
