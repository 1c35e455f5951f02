pub mod config;
pub mod error;
pub mod mapgen;
pub mod types;

pub use config::DungeonConfig;
pub use error::DungeonError;
pub use mapgen::{
    Dungeon, DungeonGenerator, Grid, Polygon, Structure, StructureKind, TextRenderOptions, generate,
};
pub use types::*;
