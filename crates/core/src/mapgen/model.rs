//! Public data models for carved structures and generated dungeons.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::DungeonError;
use crate::types::{Corner, Pos};

use super::grid::Grid;
use super::render::{TextRenderOptions, render_text};
use super::seed::DungeonRng;
use super::trace::{Polygon, trace_polygons};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Room,
    Corridor,
}

/// A carved rectangle. Extents are inclusive on both corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub id: u32,
    pub kind: StructureKind,
    pub top_left: Pos,
    pub bottom_right: Pos,
}

impl Structure {
    pub fn width(&self) -> usize {
        (self.bottom_right.x - self.top_left.x + 1) as usize
    }

    pub fn height(&self) -> usize {
        (self.bottom_right.y - self.top_left.y + 1) as usize
    }

    pub fn center(&self) -> Pos {
        Pos {
            y: self.top_left.y + (self.height() / 2) as i32,
            x: self.top_left.x + (self.width() / 2) as i32,
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.top_left.x
            && pos.x <= self.bottom_right.x
            && pos.y >= self.top_left.y
            && pos.y <= self.bottom_right.y
    }

    /// True for cells exactly on the rectangle's edge.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.contains(pos)
            && (pos.x == self.top_left.x
                || pos.x == self.bottom_right.x
                || pos.y == self.top_left.y
                || pos.y == self.bottom_right.y)
    }

    pub fn is_interior(&self, pos: Pos) -> bool {
        self.contains(pos) && !self.is_wall(pos)
    }

    pub fn corner_at(&self, pos: Pos) -> Option<Corner> {
        let left = pos.x == self.top_left.x;
        let right = pos.x == self.bottom_right.x;
        let top = pos.y == self.top_left.y;
        let bottom = pos.y == self.bottom_right.y;
        match (left, right, top, bottom) {
            (true, _, true, _) => Some(Corner::UpperLeft),
            (_, true, true, _) => Some(Corner::UpperRight),
            (true, _, _, true) => Some(Corner::LowerLeft),
            (_, true, _, true) => Some(Corner::LowerRight),
            _ => None,
        }
    }

    pub fn is_corner(&self, pos: Pos) -> bool {
        self.corner_at(pos).is_some()
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.top_left.x <= other.bottom_right.x
            && self.bottom_right.x >= other.top_left.x
            && self.top_left.y <= other.bottom_right.y
            && self.bottom_right.y >= other.top_left.y
    }

    /// Interiors overlap or share an edge, so floor runs from one into the
    /// other once walls are reconciled.
    pub fn interior_touches(&self, other: &Self) -> bool {
        let gap = |low: (i32, i32), high: (i32, i32)| (low.0.max(low.1) + 1) - (high.0.min(high.1) - 1);
        let gap_x = gap((self.top_left.x, other.top_left.x), (self.bottom_right.x, other.bottom_right.x));
        let gap_y = gap((self.top_left.y, other.top_left.y), (self.bottom_right.y, other.bottom_right.y));
        (gap_x <= 0 && gap_y <= 1) || (gap_y <= 0 && gap_x <= 1)
    }

    /// Uniformly picks an edge, then a non-corner cell along it.
    pub(super) fn random_wall_position(&self, rng: &mut DungeonRng) -> Pos {
        if rng.coin() {
            let x = rng.pick(self.top_left.x, self.bottom_right.x);
            let y = rng.range_i32(self.top_left.y + 1, self.bottom_right.y);
            Pos { y, x }
        } else {
            let y = rng.pick(self.top_left.y, self.bottom_right.y);
            let x = rng.range_i32(self.top_left.x + 1, self.bottom_right.x);
            Pos { y, x }
        }
    }
}

/// Result of one generation call: the classified grid, the structures carved
/// into it (id order), and the seed that reproduces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dungeon {
    pub(super) seed: u64,
    pub(super) grid: Grid,
    pub(super) structures: Vec<Structure>,
}

impl Dungeon {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn structure(&self, id: u32) -> Option<&Structure> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.structures.get(index)
    }

    pub fn render_text(&self) -> String {
        render_text(self, &TextRenderOptions::default())
    }

    pub fn render_text_with(&self, options: &TextRenderOptions) -> String {
        render_text(self, options)
    }

    pub fn trace_polygons(&self) -> Result<Vec<Polygon>, DungeonError> {
        trace_polygons(&self.grid, &self.structures)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        bytes.extend(self.seed.to_le_bytes());
        for cell in self.grid.cells() {
            bytes.push(cell.symbol.code());
            bytes.extend(cell.owner.to_le_bytes());
        }

        bytes.extend((self.structures.len() as u32).to_le_bytes());
        for structure in &self.structures {
            bytes.extend(structure.id.to_le_bytes());
            bytes.push(match structure.kind {
                StructureKind::Room => 0,
                StructureKind::Corridor => 1,
            });
            bytes.extend(structure.top_left.y.to_le_bytes());
            bytes.extend(structure.top_left.x.to_le_bytes());
            bytes.extend(structure.bottom_right.y.to_le_bytes());
            bytes.extend(structure.bottom_right.x.to_le_bytes());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
