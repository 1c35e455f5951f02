//! Neighbor relaxation that turns carved floor into classified walls.
//!
//! Each pass walks the grid row-major and re-derives the committed symbol of
//! every floor or wall cell from its eight neighbors. Cells above and to the
//! left have already been updated in the current pass; cells below and to the
//! right still hold last pass's value. Passes repeat until nothing changes.

use tracing::debug;

use crate::error::DungeonError;
use crate::types::{Pos, Symbol};

use super::grid::Grid;

pub(super) const MAX_RELAXATION_PASSES: u32 = 256;

/// Runs relaxation passes to a fixed point. Returns the number of passes,
/// including the final pass that changed nothing.
pub(super) fn relax(grid: &mut Grid) -> Result<u32, DungeonError> {
    for pass in 1..=MAX_RELAXATION_PASSES {
        let changed = relax_pass(grid);
        debug!(pass, changed, "wall relaxation pass");
        if changed == 0 {
            return Ok(pass);
        }
    }
    Err(DungeonError::ClassificationNonTermination { passes: MAX_RELAXATION_PASSES })
}

fn relax_pass(grid: &mut Grid) -> usize {
    let mut changed = 0;
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let pos = Pos { y, x };
            let current = grid.symbol_at(pos);
            if current != Symbol::Floor && !current.is_wall() {
                continue;
            }
            if let Some(symbol) = classify(&Neighborhood { grid: &*grid, pos }) {
                if symbol != current {
                    changed += 1;
                }
                grid.commit(pos, symbol);
            }
        }
    }
    changed
}

/// Read-only view of one cell and its eight neighbors. Positions outside the
/// grid read as empty and unclaimed.
struct Neighborhood<'a> {
    grid: &'a Grid,
    pos: Pos,
}

#[derive(Clone, Copy)]
enum At {
    Here,
    Above,
    Below,
    Left,
    Right,
    LeftAbove,
    RightAbove,
    LeftBelow,
    RightBelow,
}

impl At {
    const AROUND: [Self; 8] = [
        Self::Above,
        Self::LeftAbove,
        Self::RightAbove,
        Self::Below,
        Self::LeftBelow,
        Self::RightBelow,
        Self::Left,
        Self::Right,
    ];

    fn delta(self) -> (i32, i32) {
        match self {
            Self::Here => (0, 0),
            Self::Above => (0, -1),
            Self::Below => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::LeftAbove => (-1, -1),
            Self::RightAbove => (1, -1),
            Self::LeftBelow => (-1, 1),
            Self::RightBelow => (1, 1),
        }
    }
}

impl Neighborhood<'_> {
    fn at(&self, at: At) -> Pos {
        let (dx, dy) = at.delta();
        self.pos.offset(dx, dy)
    }

    fn symbol(&self, at: At) -> Symbol {
        self.grid.symbol_at(self.at(at))
    }

    fn staged(&self, at: At) -> Symbol {
        self.grid.staged_at(self.at(at))
    }

    fn empty(&self, at: At) -> bool {
        self.symbol(at) == Symbol::Empty
    }

    fn floor(&self, at: At) -> bool {
        self.symbol(at) == Symbol::Floor
    }

    fn wall(&self, at: At) -> bool {
        self.symbol(at).is_wall()
    }

    fn staged_floor(&self, at: At) -> bool {
        self.staged(at) == Symbol::Floor
    }

    fn staged_wall(&self, at: At) -> bool {
        self.staged(at).is_wall()
    }

    fn foreign(&self, at: At) -> bool {
        self.grid.owner_at(self.pos) != self.grid.owner_at(self.at(at))
    }

    fn floor_neighbors(&self) -> usize {
        At::AROUND.into_iter().filter(|at| self.floor(*at)).count()
    }

    /// `side` is open, or it belongs to a different structure whose staged
    /// corner `expected` continues the wall through `diagonal`.
    fn open_or_joined(&self, side: At, expected: Symbol, diagonal: At) -> bool {
        self.empty(side)
            || (self.foreign(side) && self.staged(side) == expected && self.staged_wall(diagonal))
    }
}

fn classify(n: &Neighborhood<'_>) -> Option<Symbol> {
    if is_cross(n) {
        return Some(Symbol::WallCross);
    }
    if let Some(corner) = outer_corner(n) {
        return Some(corner);
    }
    let not_corner = !n.symbol(At::Here).is_corner();
    if n.empty(At::Above) != n.empty(At::Below) && not_corner {
        return Some(Symbol::WallHorizontal);
    }
    if n.empty(At::Left) != n.empty(At::Right) && not_corner {
        return Some(Symbol::WallVertical);
    }
    inner_corner(n)
}

fn is_cross(n: &Neighborhood<'_>) -> bool {
    (n.staged_wall(At::Here) || n.staged_floor(At::Here))
        && matches!(
            n.staged(At::Above),
            Symbol::WallVertical | Symbol::CornerLowerLeft | Symbol::CornerLowerRight
        )
        && matches!(
            n.staged(At::Below),
            Symbol::WallVertical | Symbol::CornerUpperLeft | Symbol::CornerUpperRight
        )
        && matches!(
            n.staged(At::Left),
            Symbol::WallHorizontal | Symbol::CornerLowerRight | Symbol::CornerUpperRight
        )
        && matches!(
            n.staged(At::Right),
            Symbol::WallHorizontal | Symbol::CornerUpperLeft | Symbol::CornerLowerLeft
        )
}

fn outer_corner(n: &Neighborhood<'_>) -> Option<Symbol> {
    if n.floor_neighbors() == 8 {
        return None;
    }

    if n.staged_wall(At::Below)
        && n.staged_wall(At::Right)
        && n.staged_floor(At::RightBelow)
        && !n.floor(At::LeftAbove)
        && !n.floor(At::Above)
        && !n.floor(At::Left)
        && n.symbol(At::Left) != Symbol::CornerLowerLeft
        && n.open_or_joined(At::Above, Symbol::CornerLowerRight, At::LeftAbove)
        && n.open_or_joined(At::Left, Symbol::CornerLowerRight, At::LeftAbove)
    {
        return Some(Symbol::CornerUpperLeft);
    }

    if n.staged_wall(At::Below)
        && n.wall(At::Left)
        && n.floor(At::LeftBelow)
        && !n.staged_floor(At::RightAbove)
        && !n.floor(At::Above)
        && !n.staged_floor(At::Right)
        && n.symbol(At::Right) != Symbol::CornerLowerRight
        && n.open_or_joined(At::Above, Symbol::CornerLowerLeft, At::RightAbove)
        && n.open_or_joined(At::Right, Symbol::CornerLowerLeft, At::RightAbove)
    {
        return Some(Symbol::CornerUpperRight);
    }

    if n.wall(At::Above)
        && n.staged_wall(At::Right)
        && n.staged_floor(At::RightAbove)
        && !n.floor(At::LeftBelow)
        && !n.staged_floor(At::Below)
        && !n.floor(At::Left)
        && n.symbol(At::Left) != Symbol::CornerUpperLeft
        && n.open_or_joined(At::Below, Symbol::CornerUpperRight, At::LeftBelow)
        && n.open_or_joined(At::Left, Symbol::CornerUpperRight, At::LeftBelow)
    {
        return Some(Symbol::CornerLowerLeft);
    }

    if n.wall(At::Above)
        && n.wall(At::Left)
        && n.floor(At::LeftAbove)
        && !n.staged_floor(At::RightBelow)
        && !n.staged_floor(At::Below)
        && !n.staged_floor(At::Right)
        && n.symbol(At::Right) != Symbol::CornerUpperRight
        && n.open_or_joined(At::Below, Symbol::CornerUpperLeft, At::RightBelow)
        && n.open_or_joined(At::Right, Symbol::CornerUpperLeft, At::RightBelow)
    {
        return Some(Symbol::CornerLowerRight);
    }

    None
}

fn inner_corner(n: &Neighborhood<'_>) -> Option<Symbol> {
    if n.empty(At::LeftAbove)
        && n.staged_wall(At::Above)
        && n.staged_wall(At::Left)
        && (n.floor(At::Below) || n.floor(At::Right))
    {
        Some(Symbol::InnerLowerRight)
    } else if n.empty(At::RightAbove)
        && n.staged_wall(At::Above)
        && n.staged_wall(At::Right)
        && (n.floor(At::Below) || n.floor(At::Left))
    {
        Some(Symbol::InnerLowerLeft)
    } else if n.empty(At::LeftBelow)
        && n.staged_wall(At::Below)
        && n.staged_wall(At::Left)
        && (n.floor(At::Above) || n.floor(At::Right))
    {
        Some(Symbol::InnerUpperRight)
    } else if n.empty(At::RightBelow)
        && n.staged_wall(At::Below)
        && n.staged_wall(At::Right)
        && (n.floor(At::Above) || n.floor(At::Left))
    {
        Some(Symbol::InnerUpperLeft)
    } else {
        None
    }
}
