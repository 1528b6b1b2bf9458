//! Generation configuration
//!
//! Every tunable of the generator lives in one plain value. The grid keeps a
//! copy that callers may edit between runs; each generation call snapshots it
//! at entry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Largest border, wall thickness, door or room size accepted by `validate`
///
/// Keeps every sum of two sizes, doubled, well inside `i32`.
pub const MAX_EXTENT: i32 = 1 << 16;

/// Parameters shared by every strategy and post-processing pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Inset from the grid edge where floor may never be placed
    pub border: i32,
    /// Dilation radius used when turning floor-adjacent void into wall
    pub wall_thickness: i32,
    pub min_door_size: i32,
    pub max_door_size: i32,
    /// Jitter corridors sideways instead of centring them
    pub allow_random_corridor_offset: bool,
    pub min_room_width: i32,
    pub min_room_height: i32,
    pub max_room_width: i32,
    pub max_room_height: i32,
    /// Void islands smaller than this are filled by `clean_islands`
    pub min_island_size: usize,
    /// Restart an attempt once it has run this long
    #[serde(with = "millis")]
    pub duration_before_retry: Duration,
    /// Give up once all attempts together have run this long
    #[serde(with = "millis")]
    pub duration_before_error: Duration,
    /// Promote retry diagnostics from debug to warn
    pub show_error_messages: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            border: 2,
            wall_thickness: 2,
            min_door_size: 1,
            max_door_size: 1,
            allow_random_corridor_offset: false,
            min_room_width: 4,
            min_room_height: 4,
            max_room_width: 8,
            max_room_height: 8,
            min_island_size: 26,
            duration_before_retry: Duration::from_millis(250),
            duration_before_error: Duration::from_secs(1),
            show_error_messages: false,
        }
    }
}

impl GenConfig {
    /// Reject values no strategy can work with
    pub fn validate(&self) -> Result<()> {
        if self.border < 0 {
            return Err(invalid(format!("border must be >= 0, got {}", self.border)));
        }
        if self.wall_thickness < 0 {
            return Err(invalid(format!(
                "wall_thickness must be >= 0, got {}",
                self.wall_thickness
            )));
        }
        check_extent("border", self.border)?;
        check_extent("wall_thickness", self.wall_thickness)?;
        check_range("door size", self.min_door_size, self.max_door_size)?;
        check_range("room width", self.min_room_width, self.max_room_width)?;
        check_range("room height", self.min_room_height, self.max_room_height)?;
        if self.duration_before_retry.is_zero() || self.duration_before_error.is_zero() {
            return Err(invalid("retry and error durations must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn check_range(what: &str, min: i32, max: i32) -> Result<()> {
    if min < 1 {
        return Err(invalid(format!("minimum {what} must be >= 1, got {min}")));
    }
    if max < min {
        return Err(invalid(format!("maximum {what} {max} is below minimum {min}")));
    }
    check_extent(what, max)
}

fn check_extent(what: &str, value: i32) -> Result<()> {
    if value > MAX_EXTENT {
        return Err(invalid(format!("{what} must be <= {MAX_EXTENT}, got {value}")));
    }
    Ok(())
}

fn invalid(msg: String) -> GenError {
    GenError::InvalidConfig(msg)
}

/// Durations as integer milliseconds
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
