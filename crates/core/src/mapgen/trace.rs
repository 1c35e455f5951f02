//! Corner-to-corner walk that turns classified walls into closed outlines.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::DungeonError;
use crate::types::{Direction, Pos, Symbol};

use super::grid::Grid;
use super::model::Structure;

/// One closed wall outline in grid units.
///
/// `points` holds each vertex once, in walk order; the closing edge runs from
/// the last point back to the first. A cross junction may appear twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Polygon {
    points: Vec<Pos>,
}

impl Polygon {
    pub fn points(&self) -> &[Pos] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertices with the first repeated at the end.
    pub fn ring(&self) -> Vec<Pos> {
        let mut ring = self.points.clone();
        if let Some(&first) = self.points.first() {
            ring.push(first);
        }
        ring
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.points.contains(&pos)
    }
}

/// Heading taken after arriving at `corner`, or `None` for symbols that do not
/// turn the walk.
fn heading(corner: Symbol, clockwise: bool) -> Option<Direction> {
    let (cw, ccw) = match corner {
        Symbol::CornerUpperRight => (Direction::South, Direction::West),
        Symbol::CornerUpperLeft => (Direction::East, Direction::South),
        Symbol::CornerLowerRight => (Direction::West, Direction::North),
        Symbol::CornerLowerLeft => (Direction::North, Direction::East),
        Symbol::InnerUpperRight => (Direction::West, Direction::South),
        Symbol::InnerUpperLeft => (Direction::South, Direction::East),
        Symbol::InnerLowerRight => (Direction::North, Direction::West),
        Symbol::InnerLowerLeft => (Direction::East, Direction::North),
        _ => return None,
    };
    Some(if clockwise { cw } else { ccw })
}

/// Traces every corner and cross inside the structures' bounding box into
/// closed polygons. The first polygon starts at the first upper-left corner
/// in row-major order; later ones start at the first unvisited vertex.
pub(super) fn trace_polygons(
    grid: &Grid,
    structures: &[Structure],
) -> Result<Vec<Polygon>, DungeonError> {
    let targets = trace_targets(grid, structures);
    let Some(&first) = targets
        .iter()
        .find(|pos| grid.symbol_at(**pos) == Symbol::CornerUpperLeft)
        .or_else(|| targets.first())
    else {
        return Ok(Vec::new());
    };

    let mut visited = BTreeSet::new();
    let mut polygons = Vec::new();
    let mut start = Some(first);
    while let Some(origin) = start {
        let polygon = trace_one(grid, origin, &mut visited)?;
        debug!(start = ?origin, points = polygon.len(), "traced wall outline");
        polygons.push(polygon);
        start = targets.iter().copied().find(|pos| !visited.contains(pos));
    }

    Ok(polygons)
}

fn trace_targets(grid: &Grid, structures: &[Structure]) -> Vec<Pos> {
    let Some(low) = structures.iter().map(|structure| structure.top_left).reduce(|a, b| Pos {
        y: a.y.min(b.y),
        x: a.x.min(b.x),
    }) else {
        return Vec::new();
    };
    let high = structures
        .iter()
        .map(|structure| structure.bottom_right)
        .fold(low, |a, b| Pos { y: a.y.max(b.y), x: a.x.max(b.x) });

    let mut targets = Vec::new();
    for y in low.y..=high.y {
        for x in low.x..=high.x {
            let pos = Pos { y, x };
            if grid.symbol_at(pos).is_trace_target() {
                targets.push(pos);
            }
        }
    }
    targets
}

fn trace_one(grid: &Grid, origin: Pos, visited: &mut BTreeSet<Pos>) -> Result<Polygon, DungeonError> {
    let mut clockwise = true;
    let mut direction = heading(grid.symbol_at(origin), clockwise).unwrap_or(Direction::East);
    let mut points = vec![origin];
    visited.insert(origin);

    let mut current = origin;
    loop {
        let next = walk_to_vertex(grid, current, direction)?;
        let symbol = grid.symbol_at(next);
        let seen = points.iter().filter(|point| **point == next).count();
        if seen > 0 && !(symbol == Symbol::WallCross && seen == 1) {
            break;
        }

        points.push(next);
        visited.insert(next);
        if symbol == Symbol::WallCross {
            clockwise = !clockwise;
        } else if let Some(turn) = heading(symbol, clockwise) {
            direction = turn;
        }
        current = next;
    }

    Ok(Polygon { points })
}

/// Steps from `from` toward `direction` until the next corner or cross.
fn walk_to_vertex(grid: &Grid, from: Pos, direction: Direction) -> Result<Pos, DungeonError> {
    let mut pos = from;
    loop {
        let Some(next) = grid.neighbor(pos, direction) else {
            return Err(DungeonError::OpenBoundary { at: pos });
        };
        let symbol = grid.symbol_at(next);
        if symbol == Symbol::Empty {
            return Err(DungeonError::OpenBoundary { at: next });
        }
        if symbol.is_trace_target() {
            return Ok(next);
        }
        pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::layout::LayoutEngine;
    use crate::mapgen::model::StructureKind;
    use crate::mapgen::walls::relax;

    fn classified(rects: &[(i32, i32, usize, usize)]) -> (Grid, Vec<Structure>) {
        let mut engine = LayoutEngine::new(16, 16, 11);
        for &(x, y, width, height) in rects {
            engine.carve_rect(StructureKind::Room, x, y, width, height).expect("rect should fit");
        }
        engine.fill_common_floor();
        let (mut grid, structures) = engine.into_parts();
        relax(&mut grid).expect("relaxation should settle");
        (grid, structures)
    }

    fn xy(points: &[Pos]) -> Vec<(i32, i32)> {
        points.iter().map(|pos| (pos.x, pos.y)).collect()
    }

    #[test]
    fn single_room_traces_its_four_corners_clockwise() {
        let (grid, structures) = classified(&[(3, 4, 5, 4)]);
        let polygons = trace_polygons(&grid, &structures).expect("room outline should close");
        assert_eq!(polygons.len(), 1);
        assert_eq!(xy(polygons[0].points()), vec![(3, 4), (7, 4), (7, 7), (3, 7)]);
        assert_eq!(polygons[0].ring().first(), polygons[0].ring().last());
        assert_eq!(polygons[0].ring().len(), 5);
    }

    #[test]
    fn disjoint_rooms_trace_to_separate_polygons() {
        let (grid, structures) = classified(&[(2, 2, 4, 4), (9, 9, 4, 4)]);
        let polygons = trace_polygons(&grid, &structures).expect("both outlines should close");
        assert_eq!(polygons.len(), 2);
        assert_eq!(xy(polygons[0].points()), vec![(2, 2), (5, 2), (5, 5), (2, 5)]);
        assert_eq!(xy(polygons[1].points()), vec![(9, 9), (12, 9), (12, 12), (9, 12)]);
    }

    #[test]
    fn overlapping_rooms_trace_one_notched_outline() {
        let (grid, structures) = classified(&[(2, 2, 6, 5), (5, 5, 6, 6)]);
        let polygons = trace_polygons(&grid, &structures).expect("merged outline should close");
        assert_eq!(polygons.len(), 1);
        assert_eq!(
            xy(polygons[0].points()),
            vec![(2, 2), (7, 2), (7, 5), (10, 5), (10, 10), (5, 10), (5, 6), (2, 6)]
        );
        assert_eq!(grid.symbol_at(Pos { y: 5, x: 7 }), Symbol::InnerLowerLeft);
        assert_eq!(grid.symbol_at(Pos { y: 6, x: 5 }), Symbol::InnerUpperRight);
    }

    #[test]
    fn every_target_lands_in_exactly_one_polygon() {
        let (grid, structures) = classified(&[(2, 2, 6, 5), (5, 5, 6, 6)]);
        let polygons = trace_polygons(&grid, &structures).expect("merged outline should close");
        for target in trace_targets(&grid, &structures) {
            let owners = polygons.iter().filter(|polygon| polygon.contains(target)).count();
            assert_eq!(owners, 1, "{target:?}");
        }
    }

    #[test]
    fn no_structures_means_no_polygons() {
        let grid = Grid::new(8, 8);
        assert_eq!(trace_polygons(&grid, &[]), Ok(Vec::new()));
    }

    #[test]
    fn broken_outline_reports_open_boundary() {
        let (mut grid, structures) = classified(&[(3, 4, 5, 4)]);
        // Knock a hole in the top wall.
        grid.commit(Pos { y: 4, x: 5 }, Symbol::Empty);
        assert_eq!(
            trace_polygons(&grid, &structures),
            Err(DungeonError::OpenBoundary { at: Pos { y: 4, x: 5 } })
        );
    }

    #[test]
    fn heading_table_reverses_with_orientation() {
        assert_eq!(heading(Symbol::CornerUpperLeft, true), Some(Direction::East));
        assert_eq!(heading(Symbol::CornerUpperLeft, false), Some(Direction::South));
        assert_eq!(heading(Symbol::InnerLowerLeft, true), Some(Direction::East));
        assert_eq!(heading(Symbol::InnerUpperRight, true), Some(Direction::West));
        assert_eq!(heading(Symbol::WallCross, true), None);
        assert_eq!(heading(Symbol::WallHorizontal, false), None);
    }
}
