//! Structural checks shared by the integration tests and the seed sweep.
//!
//! Each check returns a human-readable description of the first violation.

use std::collections::BTreeMap;

use crate::types::{Direction, Pos, Symbol};

use super::model::{Dungeon, StructureKind};
use super::trace::Polygon;

/// Cells covered by a structure are occupied; every other cell is empty.
pub fn check_coverage(dungeon: &Dungeon) -> Result<(), String> {
    for cell in dungeon.grid().cells() {
        let covered = dungeon.structures().iter().any(|structure| structure.contains(cell.pos));
        let occupied = cell.symbol != Symbol::Empty;
        if covered != occupied {
            return Err(format!(
                "cell ({}, {}) is {:?} but {} covered by a structure",
                cell.pos.x,
                cell.pos.y,
                cell.symbol,
                if covered { "is" } else { "is not" }
            ));
        }
    }
    Ok(())
}

/// No floor cell touches empty space or the grid edge on any side.
pub fn check_enclosure(dungeon: &Dungeon) -> Result<(), String> {
    let grid = dungeon.grid();
    for cell in grid.cells().iter().filter(|cell| cell.symbol == Symbol::Floor) {
        for direction in Direction::ALL {
            let open = grid
                .neighbor(cell.pos, direction)
                .is_none_or(|next| grid.symbol_at(next) == Symbol::Empty);
            if open {
                return Err(format!(
                    "floor at ({}, {}) is open to the {direction:?}",
                    cell.pos.x, cell.pos.y
                ));
            }
        }
    }
    Ok(())
}

/// Every room's floor is reachable from the first room's floor by walking
/// over floor cells only, and every structure's interior meets the interior of
/// the one carved before it.
pub fn check_connectivity(dungeon: &Dungeon) -> Result<(), String> {
    for pair in dungeon.structures().windows(2) {
        if !pair[1].interior_touches(&pair[0]) {
            return Err(format!("structure #{} does not join #{}", pair[1].id, pair[0].id));
        }
    }

    let grid = dungeon.grid();
    let Some(first) = dungeon.structures().first() else {
        return Ok(());
    };
    let Some(start) = grid
        .cells()
        .iter()
        .find(|cell| cell.symbol == Symbol::Floor && first.is_interior(cell.pos))
        .map(|cell| cell.pos)
    else {
        return Err(format!("structure #{} has no floor", first.id));
    };

    let reached = grid.flood_fill(start, |pos| grid.symbol_at(pos) == Symbol::Floor);
    for room in dungeon.structures().iter().filter(|structure| structure.kind == StructureKind::Room) {
        let connected = grid
            .cells()
            .iter()
            .zip(&reached)
            .any(|(cell, reached)| *reached && room.is_interior(cell.pos));
        if !connected {
            return Err(format!(
                "room #{} has no floor reachable from ({}, {})",
                room.id, start.x, start.y
            ));
        }
    }
    Ok(())
}

/// Every empty cell is connected to the grid edge; no pocket is sealed inside
/// the walls.
pub fn check_exterior(dungeon: &Dungeon) -> Result<(), String> {
    let grid = dungeon.grid();
    let outside = grid.flood_fill(Pos { y: 0, x: 0 }, |pos| grid.symbol_at(pos) == Symbol::Empty);
    for (cell, reached) in grid.cells().iter().zip(outside) {
        if cell.symbol == Symbol::Empty && !reached {
            return Err(format!("empty cell ({}, {}) is sealed inside the walls", cell.pos.x, cell.pos.y));
        }
    }
    Ok(())
}

/// Every corner sits in exactly one polygon and a cross in at most two.
/// Polygon vertices are corners or crosses.
pub fn check_polygons(dungeon: &Dungeon, polygons: &[Polygon]) -> Result<(), String> {
    let grid = dungeon.grid();
    let mut appearances: BTreeMap<Pos, usize> = BTreeMap::new();
    for (index, polygon) in polygons.iter().enumerate() {
        if polygon.is_empty() {
            return Err(format!("polygon {index} has no vertices"));
        }
        let ring = polygon.ring();
        if ring.first() != ring.last() {
            return Err(format!("polygon {index} does not close"));
        }
        for &point in polygon.points() {
            if !grid.symbol_at(point).is_trace_target() {
                return Err(format!(
                    "polygon {index} passes through non-corner ({}, {})",
                    point.x, point.y
                ));
            }
            *appearances.entry(point).or_default() += 1;
        }
    }

    for cell in grid.cells().iter().filter(|cell| cell.symbol.is_trace_target()) {
        let count = appearances.get(&cell.pos).copied().unwrap_or(0);
        let allowed = if cell.symbol == Symbol::WallCross { 1..=2 } else { 1..=1 };
        if !allowed.contains(&count) {
            return Err(format!(
                "{:?} at ({}, {}) appears in {count} polygon vertices",
                cell.symbol, cell.pos.x, cell.pos.y
            ));
        }
    }
    Ok(())
}

/// Coverage, enclosure, exterior and connectivity in one call.
pub fn check_layout(dungeon: &Dungeon) -> Result<(), String> {
    check_coverage(dungeon)?;
    check_enclosure(dungeon)?;
    check_exterior(dungeon)?;
    check_connectivity(dungeon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::generate;
    use crate::mapgen::layout::LayoutEngine;
    use crate::mapgen::walls::relax;

    #[test]
    fn single_room_passes_every_check() {
        let dungeon = generate(43, 43, 4, 8, 1, 42).expect("one room always fits");
        let polygons = dungeon.trace_polygons().expect("room outline should close");
        assert_eq!(check_layout(&dungeon), Ok(()));
        assert_eq!(check_polygons(&dungeon, &polygons), Ok(()));
    }

    #[test]
    fn missing_polygon_is_reported() {
        let dungeon = generate(43, 43, 4, 8, 1, 42).expect("one room always fits");
        let error = check_polygons(&dungeon, &[]).expect_err("corners are untraced");
        assert!(error.contains("0 polygon vertices"), "{error}");
    }

    #[test]
    fn room_meeting_its_corridor_on_a_wall_line_is_disconnected() {
        let mut engine = LayoutEngine::new(43, 43, 4);
        engine.carve_rect(StructureKind::Room, 18, 20, 8, 8).expect("first room");
        engine.carve_rect(StructureKind::Corridor, 21, 26, 11, 3).expect("corridor");
        engine.carve_rect(StructureKind::Room, 30, 28, 7, 5).expect("second room");
        engine.fill_common_floor();
        let (mut grid, structures) = engine.into_parts();
        relax(&mut grid).expect("relaxation should settle");
        let dungeon = Dungeon { seed: 4, grid, structures };

        let error = check_connectivity(&dungeon).expect_err("the second room only shares a wall");
        assert!(error.contains("#3 does not join #2"), "{error}");
    }

    #[test]
    fn room_without_reachable_floor_is_reported() {
        let mut dungeon = generate(43, 43, 4, 8, 2, 11).expect("two rooms fit a 43x43 grid");
        assert_eq!(check_connectivity(&dungeon), Ok(()));

        let last = dungeon.structures[2];
        let positions: Vec<Pos> =
            dungeon.grid.cells().iter().map(|cell| cell.pos).filter(|pos| last.is_interior(*pos)).collect();
        for pos in positions {
            dungeon.grid.commit(pos, Symbol::Wall);
        }
        let error = check_connectivity(&dungeon).expect_err("the last room is walled off");
        assert!(error.contains("room #3"), "{error}");
    }

    #[test]
    fn sealed_empty_cell_is_reported() {
        let mut dungeon = generate(43, 43, 4, 8, 1, 42).expect("one room always fits");
        assert_eq!(check_exterior(&dungeon), Ok(()));

        let room = dungeon.structures[0];
        let inside = Pos { y: room.top_left.y + 1, x: room.top_left.x + 1 };
        dungeon.grid.commit(inside, Symbol::Empty);
        let error = check_exterior(&dungeon).expect_err("the hole has no way out");
        assert!(error.contains("sealed"), "{error}");
    }
}
