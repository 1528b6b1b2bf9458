//! Ready-made level styles
//!
//! A style is one strategy plus the settings and clean-up passes that make
//! its output look right.

use strum::{Display, EnumIter, EnumString};

use crate::config::GenConfig;
use crate::error::Result;
use crate::grid::Grid;

use super::{GenerationReport, Strategy};

/// Preset pairing of strategy, settings and post-processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Style {
    /// Single connected cave
    RandomWalk,
    /// Identical square rooms on a lattice
    DungeonGrid,
    /// Randomly sized rooms chained by short corridors
    Dungeon,
}

impl Style {
    pub fn strategy(self) -> Strategy {
        match self {
            Style::RandomWalk => Strategy::RandomWalk,
            Style::DungeonGrid => Strategy::DungeonGrid,
            Style::Dungeon => Strategy::Dungeon,
        }
    }

    /// Apply this style's preferred settings
    pub fn tune(self, config: &mut GenConfig) {
        match self {
            Style::RandomWalk | Style::DungeonGrid => {
                config.wall_thickness = 2;
            }
            Style::Dungeon => {
                config.wall_thickness = 1;
                config.allow_random_corridor_offset = true;
            }
        }
        config.border = config.wall_thickness;
    }

    /// Sensible tile or room count for a `width` x `height` grid
    pub fn default_count(self, width: i32, height: i32) -> usize {
        match self {
            Style::RandomWalk => (width.max(0) as usize * height.max(0) as usize) / 4,
            Style::DungeonGrid | Style::Dungeon => 10,
        }
    }

    /// Run the strategy with `count` tiles or rooms
    pub fn run(self, grid: &mut Grid, count: usize) -> Result<GenerationReport> {
        match self {
            Style::RandomWalk => grid.generate_random_walk(count),
            Style::DungeonGrid => grid.generate_dungeon_grid(count),
            Style::Dungeon => grid.generate_dungeon(count),
        }
    }

    /// Clean-up passes applied after a successful run
    pub fn finish(self, grid: &mut Grid) {
        if self == Style::RandomWalk {
            grid.clean_islands();
            grid.clean_walls(5);
            grid.clean_walls(5);
            grid.clean_islands();
            grid.clean_walls(6);
            grid.clean_walls(6);
        }
        grid.add_walls();
    }

    /// Run the strategy and its clean-up passes
    pub fn generate(self, grid: &mut Grid, count: usize) -> Result<GenerationReport> {
        let report = self.run(grid, count)?;
        self.finish(grid);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::time::Duration;

    use super::*;
    use crate::grid::Tile;

    #[test]
    fn test_parse_names() {
        assert_eq!(Style::from_str("random-walk"), Ok(Style::RandomWalk));
        assert_eq!(Style::from_str("dungeon-grid"), Ok(Style::DungeonGrid));
        assert_eq!(Style::Dungeon.to_string(), "dungeon");
        assert!(Style::from_str("cave").is_err());
    }

    #[test]
    fn test_tune_ties_border_to_walls() {
        let mut config = GenConfig::default();
        Style::Dungeon.tune(&mut config);
        assert_eq!(config.wall_thickness, 1);
        assert_eq!(config.border, 1);
        assert!(config.allow_random_corridor_offset);

        Style::DungeonGrid.tune(&mut config);
        assert_eq!(config.wall_thickness, 2);
        assert_eq!(config.border, 2);
    }

    #[test]
    fn test_default_count() {
        assert_eq!(Style::RandomWalk.default_count(40, 20), 200);
        assert_eq!(Style::Dungeon.default_count(40, 20), 10);
    }

    #[test]
    fn test_generate_leaves_no_prewall() {
        for style in [Style::DungeonGrid, Style::Dungeon] {
            let mut grid = Grid::with_seed(80, 80, 5);
            style.tune(&mut grid.config);
            grid.config.duration_before_error = Duration::from_secs(10);
            let report = style.generate(&mut grid, 8).unwrap();
            assert_eq!(report.strategy, style.strategy());
            assert_eq!(grid.count(Tile::PreWall), 0);
            assert!(grid.count(Tile::Wall) > 0);
        }
    }

    #[test]
    fn test_random_walk_style_finishes_cave() {
        let mut grid = Grid::with_seed(60, 60, 6);
        Style::RandomWalk.tune(&mut grid.config);
        grid.config.duration_before_error = Duration::from_secs(10);
        Style::RandomWalk.generate(&mut grid, 600).unwrap();
        assert!(grid.count(Tile::Floor) >= 600);
        assert!(grid.count(Tile::Wall) > 0);
    }
}
