//! Room placement and corridor carving for the base floor plan.

use tracing::{debug, warn};

use crate::config::DungeonConfig;
use crate::error::DungeonError;
use crate::types::{Direction, Pos, Symbol};

use super::grid::Grid;
use super::model::{Structure, StructureKind};
use super::seed::DungeonRng;
use super::{MARGIN, MIN_EXTENT};

pub(super) const MAX_PLACEMENT_ATTEMPTS: u32 = 256;

const CORRIDOR_WIDTH_RANGE: (usize, usize) = (3, 5);
const CORRIDOR_LENGTH_RANGE: (usize, usize) = (6, 12);

/// Mutable carving state for one generation call.
pub(super) struct LayoutEngine {
    grid: Grid,
    structures: Vec<Structure>,
    rng: DungeonRng,
}

impl LayoutEngine {
    pub(super) fn new(width: usize, height: usize, seed: u64) -> Self {
        Self { grid: Grid::new(width, height), structures: Vec::new(), rng: DungeonRng::from_seed(seed) }
    }

    #[cfg(test)]
    pub(super) fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub(super) fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub(super) fn into_parts(self) -> (Grid, Vec<Structure>) {
        (self.grid, self.structures)
    }

    /// Carves the starting room, then alternates corridor and room growth until
    /// `room_count` rooms exist, and finally reconciles shared floor.
    pub(super) fn build(&mut self, config: &DungeonConfig) -> Result<(), DungeonError> {
        let (room_width, room_height) = self.room_size(config);
        let x = (self.grid.width() / 2) as i32 - (room_width / 2) as i32;
        let y = (self.grid.height() / 2) as i32 - (room_height / 2) as i32;
        self.carve_rect(StructureKind::Room, x, y, room_width, room_height)?;

        for _ in 1..config.room_count {
            self.grow_corridor()?;
            self.grow_room(config)?;
        }

        self.fill_common_floor();
        Ok(())
    }

    fn room_size(&mut self, config: &DungeonConfig) -> (usize, usize) {
        let width = self.rng.range(config.room_min_size, config.room_max_size);
        let height = self.rng.range(config.room_min_size, config.room_max_size);
        (width, height)
    }

    /// Grows a corridor out of the most recent structure, retrying with a new
    /// anchor until one fits inside the margin and joins its parent.
    pub(super) fn grow_corridor(&mut self) -> Result<Structure, DungeonError> {
        let parent = self.parent()?;

        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let anchor = parent.random_wall_position(&mut self.rng);
            let direction = self.direction_at(anchor);
            let corridor_width = self.rng.range(CORRIDOR_WIDTH_RANGE.0, CORRIDOR_WIDTH_RANGE.1);
            let length = self.rng.range(CORRIDOR_LENGTH_RANGE.0, CORRIDOR_LENGTH_RANGE.1);

            let (x, y, width, height) = corridor_rect(anchor, direction, corridor_width, length);
            if self.fits_margin(x, y, width, height) {
                let corridor = self.place_rect(StructureKind::Corridor, x, y, width, height)?;
                if self.joins(&corridor, &parent) {
                    return Ok(self.carve(corridor));
                }
            }

            if attempt == MAX_PLACEMENT_ATTEMPTS / 4 {
                warn!(parent = parent.id, attempt, "corridor placement keeps getting rejected");
            }
        }

        Err(self.exhausted())
    }

    /// Grows a room out of the most recent corridor. The room is pushed from a
    /// random wall cell toward that cell's growth direction so its interior
    /// covers the cell, then clamped; placements that no longer join the
    /// corridor are retried from a new anchor.
    pub(super) fn grow_room(&mut self, config: &DungeonConfig) -> Result<Structure, DungeonError> {
        let parent = self.parent()?;
        let (width, height) = self.room_size(config);

        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let anchor = parent.random_wall_position(&mut self.rng);
            let (x, y) = room_origin(anchor, self.direction_at(anchor), width, height);
            let room = self.place_rect(StructureKind::Room, x, y, width, height)?;
            if self.joins(&room, &parent) {
                return Ok(self.carve(room));
            }

            if attempt == MAX_PLACEMENT_ATTEMPTS / 4 {
                warn!(parent = parent.id, attempt, "room placement keeps getting rejected");
            }
        }

        Err(self.exhausted())
    }

    fn parent(&self) -> Result<Structure, DungeonError> {
        self.structures
            .last()
            .copied()
            .ok_or_else(|| DungeonError::invalid_input("growth needs an existing structure"))
    }

    fn direction_at(&self, pos: Pos) -> Direction {
        self.grid.cell(pos).map_or(Direction::default(), |cell| cell.direction)
    }

    fn exhausted(&self) -> DungeonError {
        DungeonError::PlacementExhausted { structure_id: self.next_id(), attempts: MAX_PLACEMENT_ATTEMPTS }
    }

    fn fits_margin(&self, x: i32, y: i32, width: usize, height: usize) -> bool {
        let max_x = self.grid.width() as i32 - MARGIN;
        let max_y = self.grid.height() as i32 - MARGIN;
        x >= MARGIN && y >= MARGIN && x + width as i32 <= max_x && y + height as i32 <= max_y
    }

    /// A candidate joins when its floor meets the parent's floor and carving it
    /// leaves no empty pocket sealed off from the outside.
    fn joins(&self, candidate: &Structure, parent: &Structure) -> bool {
        candidate.interior_touches(parent) && !self.encloses_void(candidate)
    }

    fn encloses_void(&self, candidate: &Structure) -> bool {
        let open = |pos: Pos| self.grid.symbol_at(pos) == Symbol::Empty && !candidate.contains(pos);
        // The margin keeps the origin empty and outside every structure.
        let outside = self.grid.flood_fill(Pos { y: 0, x: 0 }, open);
        self.grid.cells().iter().zip(outside).any(|(cell, reached)| !reached && open(cell.pos))
    }

    fn next_id(&self) -> u32 {
        self.structures.len() as u32 + 1
    }

    /// Validates a rectangle and clamps it into the margin without touching
    /// the grid.
    fn place_rect(
        &self,
        kind: StructureKind,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    ) -> Result<Structure, DungeonError> {
        if width < MIN_EXTENT || height < MIN_EXTENT {
            return Err(DungeonError::invalid_input(format!(
                "structure extent {width}x{height} is below {MIN_EXTENT}x{MIN_EXTENT}"
            )));
        }

        let usable_width = self.grid.width().saturating_sub(2 * MARGIN as usize);
        let usable_height = self.grid.height().saturating_sub(2 * MARGIN as usize);
        if usable_width < MIN_EXTENT || usable_height < MIN_EXTENT {
            return Err(DungeonError::invalid_input(format!(
                "grid {}x{} has no room inside its margin",
                self.grid.width(),
                self.grid.height()
            )));
        }

        let width = width.min(usable_width);
        let height = height.min(usable_height);
        let x = x.clamp(MARGIN, self.grid.width() as i32 - MARGIN - width as i32);
        let y = y.clamp(MARGIN, self.grid.height() as i32 - MARGIN - height as i32);

        Ok(Structure {
            id: self.next_id(),
            kind,
            top_left: Pos { y, x },
            bottom_right: Pos { y: y + height as i32 - 1, x: x + width as i32 - 1 },
        })
    }

    /// Clamps the rectangle into the margin and carves it.
    pub(super) fn carve_rect(
        &mut self,
        kind: StructureKind,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    ) -> Result<Structure, DungeonError> {
        let structure = self.place_rect(kind, x, y, width, height)?;
        Ok(self.carve(structure))
    }

    /// Commits floor under the structure, records per-cell growth direction
    /// and staged wall symbols, then appends it.
    fn carve(&mut self, structure: Structure) -> Structure {
        let (width, height) = (structure.width(), structure.height());
        let center = structure.center();
        for j in structure.top_left.y..=structure.bottom_right.y {
            for i in structure.top_left.x..=structure.bottom_right.x {
                let pos = Pos { y: j, x: i };
                let direction = growth_direction(pos, center, width, height, &mut self.rng);
                let existing = self
                    .grid
                    .cell(pos)
                    .map(|cell| cell.owner)
                    .filter(|owner| *owner != 0 && *owner != structure.id)
                    .and_then(|owner| self.structures.get(owner as usize - 1).copied());

                let Some(cell) = self.grid.cell_mut(pos) else {
                    continue;
                };
                cell.commit(Symbol::Floor);
                cell.direction = direction;

                if !cell.is_claimed() {
                    cell.owner = structure.id;
                    if structure.is_wall(pos) {
                        cell.staged = structure.corner_at(pos).map_or(Symbol::Wall, |corner| corner.outer());
                    }
                } else if let Some(existing) = existing {
                    let new_corner = structure.corner_at(pos);
                    if existing.is_wall(pos) {
                        cell.staged = match new_corner {
                            Some(corner) if existing.corner_at(pos) == Some(corner) => corner.outer(),
                            _ => Symbol::Wall,
                        };
                    } else if let Some(corner) = new_corner {
                        cell.staged = corner.inner();
                    }
                }
            }
        }

        debug!(
            id = structure.id,
            kind = ?structure.kind,
            x = structure.top_left.x,
            y = structure.top_left.y,
            width,
            height,
            "carved structure"
        );
        self.structures.push(structure);
        structure
    }

    /// Forces floor on every cell that lies inside more structures than it
    /// lies on the edge of.
    pub(super) fn fill_common_floor(&mut self) {
        let positions: Vec<Pos> = self.grid.cells().iter().map(|cell| cell.pos).collect();
        for pos in positions {
            let members = self.structures.iter().filter(|structure| structure.contains(pos)).count();
            let walls = self.structures.iter().filter(|structure| structure.is_wall(pos)).count();
            if walls < members {
                self.grid.commit(pos, Symbol::Floor);
            }
        }
    }
}

/// Corridor rectangle `(x, y, width, height)` grown from `anchor` toward
/// `direction`. The cross-axis offset is 2 for both legal corridor widths.
pub(super) fn corridor_rect(
    anchor: Pos,
    direction: Direction,
    corridor_width: usize,
    length: usize,
) -> (i32, i32, usize, usize) {
    let half = corridor_width / 2;
    let offset = (half + half % 2) as i32;
    let cw = corridor_width as i32;
    let len = length as i32;
    match direction {
        Direction::West => (anchor.x - len + 1, anchor.y - offset, length, corridor_width),
        Direction::East => (anchor.x - 1, anchor.y - offset, length, corridor_width),
        Direction::North => (anchor.x - cw + offset, anchor.y - len + 1, corridor_width, length),
        Direction::South => (anchor.x - offset, anchor.y - 1, corridor_width, length),
    }
}

/// Room origin `(x, y)` for a room grown from `anchor` toward `direction`.
/// The room overlaps the anchor's structure by one cell, like a corridor, and
/// is centered on the anchor across the growth axis, so the anchor lands in
/// the room's interior.
pub(super) fn room_origin(anchor: Pos, direction: Direction, width: usize, height: usize) -> (i32, i32) {
    let (w, h) = (width as i32, height as i32);
    match direction {
        Direction::West => (anchor.x - w + 2, anchor.y - h / 2),
        Direction::East => (anchor.x - 1, anchor.y - h / 2),
        Direction::North => (anchor.x - w / 2, anchor.y - h + 2),
        Direction::South => (anchor.x - w / 2, anchor.y - 1),
    }
}

/// Outward heading of a cell: the axis with the larger displacement from the
/// center, scaled by the structure's extent on that axis. Ties pick one of the
/// two quadrant headings at random.
fn growth_direction(
    pos: Pos,
    center: Pos,
    width: usize,
    height: usize,
    rng: &mut DungeonRng,
) -> Direction {
    let dx = pos.x.abs_diff(center.x) as usize * 200 / width;
    let dy = pos.y.abs_diff(center.y) as usize * 200 / height;
    let horizontal = if pos.x <= center.x { Direction::West } else { Direction::East };
    let vertical = if pos.y <= center.y { Direction::North } else { Direction::South };
    if dx > dy {
        horizontal
    } else if dy > dx {
        vertical
    } else {
        rng.pick(horizontal, vertical)
    }
}
