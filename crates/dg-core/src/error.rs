//! Error types for dungeon generation

use std::time::Duration;

/// Result type alias
pub type Result<T> = std::result::Result<T, GenError>;

/// Generation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    /// A floor write (or a bounded read) landed outside the generation band
    #[error("Coordinate ({x}, {y}) out of bounds")]
    OutOfBounds { x: i32, y: i32 },

    /// The grid cannot hold the requested layout
    #[error("Not enough space to generate dungeon: requested {requested}, capacity {capacity}")]
    NotEnoughSpace { requested: usize, capacity: i64 },

    /// Total time across every attempt exceeded the error deadline
    #[error("Took too long to generate dungeon ({elapsed:?} over {attempts} attempts)")]
    GenerationTimeout { elapsed: Duration, attempts: u32 },

    /// Room footprint (or its wall margin) overlaps existing floor
    #[error("Floor tile already placed at ({x}, {y})")]
    FloorAlreadyPlaced { x: i32, y: i32 },

    /// Configuration value cannot drive any strategy
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GenError {
    /// True for the errors that end a generation call
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenError::NotEnoughSpace { .. }
                | GenError::GenerationTimeout { .. }
                | GenError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(!GenError::OutOfBounds { x: 0, y: 0 }.is_fatal());
        assert!(!GenError::FloorAlreadyPlaced { x: 1, y: 1 }.is_fatal());
        assert!(
            GenError::NotEnoughSpace {
                requested: 5,
                capacity: 1
            }
            .is_fatal()
        );
        assert!(
            GenError::GenerationTimeout {
                elapsed: Duration::from_millis(5),
                attempts: 1
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_messages() {
        let err = GenError::OutOfBounds { x: -1, y: 4 };
        assert_eq!(err.to_string(), "Coordinate (-1, 4) out of bounds");
    }
}
