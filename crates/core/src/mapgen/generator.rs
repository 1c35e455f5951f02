//! High-level generation orchestration: validate, carve, classify.

use tracing::{debug_span, info};

use crate::config::DungeonConfig;
use crate::error::DungeonError;

use super::layout::LayoutEngine;
use super::model::Dungeon;
use super::seed::resolve_seed;
use super::walls::relax;

/// Turns a [`DungeonConfig`] into a classified [`Dungeon`].
pub struct DungeonGenerator {
    config: DungeonConfig,
}

impl DungeonGenerator {
    pub fn new(config: DungeonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Runs the full pipeline. Invalid configs are rejected before any grid
    /// is allocated; every other failure discards the partially built grid.
    pub fn generate(&self) -> Result<Dungeon, DungeonError> {
        self.config.validate()?;

        let seed = resolve_seed(self.config.seed);
        let _span = debug_span!(
            "generate",
            seed,
            width = self.config.width,
            height = self.config.height,
            rooms = self.config.room_count
        )
        .entered();
        info!(seed, requested = self.config.seed, "resolved dungeon seed");

        let mut engine = LayoutEngine::new(self.config.width, self.config.height, seed);
        engine.build(&self.config)?;
        let (mut grid, structures) = engine.into_parts();

        let passes = relax(&mut grid)?;
        info!(structures = structures.len(), passes, "generated dungeon");

        Ok(Dungeon { seed, grid, structures })
    }
}
