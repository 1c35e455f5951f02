//! Procedural dungeon generation split into coherent submodules.

pub mod invariants;
pub mod model;
pub mod render;
pub mod trace;

mod generator;
mod grid;
mod layout;
mod seed;
mod walls;

pub use generator::DungeonGenerator;
pub use grid::{Cell, Grid};
pub use model::{Dungeon, Structure, StructureKind};
pub use render::TextRenderOptions;
pub use trace::Polygon;

use crate::config::DungeonConfig;
use crate::error::DungeonError;

/// Cells kept clear between any carved structure and the grid edge.
pub const MARGIN: i32 = 2;
/// Smallest width or height a room or corridor may have.
pub const MIN_EXTENT: usize = 3;

/// Generates one dungeon from the six input parameters; see [`DungeonGenerator`].
pub fn generate(
    width: usize,
    height: usize,
    room_min_size: usize,
    room_max_size: usize,
    room_count: usize,
    seed: u64,
) -> Result<Dungeon, DungeonError> {
    let config = DungeonConfig::new(width, height, room_min_size, room_max_size, room_count, seed);
    DungeonGenerator::new(config).generate()
}

#[cfg(test)]
mod tests {
    use super::{DungeonConfig, DungeonGenerator};

    #[test]
    fn generate_matches_dungeon_generator_output() {
        let from_helper = super::generate(43, 43, 4, 8, 5, 123);
        let from_generator = DungeonGenerator::new(DungeonConfig::new(43, 43, 4, 8, 5, 123)).generate();

        assert_eq!(from_helper, from_generator);
    }
}
