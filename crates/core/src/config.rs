//! Generation parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::error::DungeonError;
use crate::mapgen::{MARGIN, MIN_EXTENT};

pub const DEFAULT_WIDTH: usize = 43;
pub const DEFAULT_HEIGHT: usize = 43;
pub const DEFAULT_ROOM_MIN_SIZE: usize = 4;
pub const DEFAULT_ROOM_MAX_SIZE: usize = 8;
pub const DEFAULT_ROOM_COUNT: usize = 7;

/// Smallest grid side that still fits one minimum-size room inside the margin.
pub const MIN_GRID_SIDE: usize = MIN_EXTENT + 2 * MARGIN as usize;
/// Largest accepted grid side. Keeps `width * height` cells to about a million
/// and every coordinate well inside `i32`.
pub const MAX_GRID_SIDE: usize = 1024;
/// Largest accepted room count; each room past the first also carves a corridor.
pub const MAX_ROOM_COUNT: usize = 1024;

/// Input tuple for one generation call.
///
/// `seed == 0` asks for a fresh seed; the seed actually used is recorded on
/// the resulting dungeon. Room sizes are drawn from `[room_min_size,
/// room_max_size)`, collapsing to `room_min_size` when both bounds are equal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: usize,
    pub height: usize,
    pub room_min_size: usize,
    pub room_max_size: usize,
    pub room_count: usize,
    pub seed: u64,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            room_min_size: DEFAULT_ROOM_MIN_SIZE,
            room_max_size: DEFAULT_ROOM_MAX_SIZE,
            room_count: DEFAULT_ROOM_COUNT,
            seed: 0,
        }
    }
}

impl DungeonConfig {
    pub fn new(
        width: usize,
        height: usize,
        room_min_size: usize,
        room_max_size: usize,
        room_count: usize,
        seed: u64,
    ) -> Self {
        Self { width, height, room_min_size, room_max_size, room_count, seed }
    }

    pub fn validate(&self) -> Result<(), DungeonError> {
        if self.width == 0 || self.height == 0 {
            return Err(DungeonError::invalid_input(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(DungeonError::invalid_input(format!(
                "grid {}x{} cannot hold a {MIN_EXTENT}x{MIN_EXTENT} room inside a {MARGIN}-cell margin (minimum side {MIN_GRID_SIDE})",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(DungeonError::invalid_input(format!(
                "grid {}x{} exceeds the maximum side of {MAX_GRID_SIDE}",
                self.width, self.height
            )));
        }
        if self.room_min_size < MIN_EXTENT {
            return Err(DungeonError::invalid_input(format!(
                "room_min_size must be at least {MIN_EXTENT}, got {}",
                self.room_min_size
            )));
        }
        if self.room_min_size > self.room_max_size {
            return Err(DungeonError::invalid_input(format!(
                "room_min_size {} exceeds room_max_size {}",
                self.room_min_size, self.room_max_size
            )));
        }
        if self.room_count == 0 {
            return Err(DungeonError::invalid_input("room_count must be at least 1"));
        }
        if self.room_count > MAX_ROOM_COUNT {
            return Err(DungeonError::invalid_input(format!(
                "room_count {} exceeds the maximum of {MAX_ROOM_COUNT}",
                self.room_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(config: &DungeonConfig) -> String {
        match config.validate() {
            Err(DungeonError::InvalidInput { reason }) => reason,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DungeonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_dimensions() {
        let config = DungeonConfig { width: 0, ..DungeonConfig::default() };
        assert!(reason(&config).contains("positive"));
    }

    #[test]
    fn rejects_grids_smaller_than_one_room_plus_margin() {
        let config = DungeonConfig { height: MIN_GRID_SIDE - 1, ..DungeonConfig::default() };
        assert!(reason(&config).contains("margin"));

        let smallest = DungeonConfig {
            width: MIN_GRID_SIDE,
            height: MIN_GRID_SIDE,
            room_min_size: 3,
            room_max_size: 3,
            ..DungeonConfig::default()
        };
        assert_eq!(smallest.validate(), Ok(()));
    }

    #[test]
    fn rejects_grids_and_room_counts_past_the_maximum() {
        let wide = DungeonConfig { width: MAX_GRID_SIDE + 1, ..DungeonConfig::default() };
        assert!(reason(&wide).contains("maximum side"));

        let overflowing = DungeonConfig { width: usize::MAX, height: usize::MAX, ..DungeonConfig::default() };
        assert!(reason(&overflowing).contains("maximum side"));

        let largest = DungeonConfig { width: MAX_GRID_SIDE, height: MAX_GRID_SIDE, ..DungeonConfig::default() };
        assert_eq!(largest.validate(), Ok(()));

        let crowded = DungeonConfig { room_count: MAX_ROOM_COUNT + 1, ..DungeonConfig::default() };
        assert!(reason(&crowded).contains("room_count"));
    }

    #[test]
    fn rejects_inverted_or_undersized_room_bounds() {
        let inverted = DungeonConfig { room_min_size: 9, room_max_size: 5, ..DungeonConfig::default() };
        assert!(reason(&inverted).contains("exceeds"));

        let undersized = DungeonConfig { room_min_size: 2, ..DungeonConfig::default() };
        assert!(reason(&undersized).contains("at least"));
    }

    #[test]
    fn rejects_zero_rooms() {
        let config = DungeonConfig { room_count: 0, ..DungeonConfig::default() };
        assert!(reason(&config).contains("room_count"));
    }

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let config: DungeonConfig =
            serde_json::from_str(r#"{ "room_count": 3, "seed": 99 }"#).expect("config should parse");
        assert_eq!(config.room_count, 3);
        assert_eq!(config.seed, 99);
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.room_max_size, DEFAULT_ROOM_MAX_SIZE);
    }
}
