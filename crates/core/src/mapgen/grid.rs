//! Fixed-size cell storage with 4-directional neighbor lookup.

use std::collections::VecDeque;

use crate::types::{Direction, Pos, Symbol};

/// One grid position.
///
/// `symbol` is the committed (rendered) type. `staged` is the type the cell is
/// meant to become, recorded at carve time and read by the relaxation passes.
/// Committing a symbol overwrites both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pos: Pos,
    pub symbol: Symbol,
    pub staged: Symbol,
    /// Id of the first structure that claimed this cell, 0 when unclaimed.
    pub owner: u32,
    pub direction: Direction,
}

impl Cell {
    fn empty(pos: Pos) -> Self {
        Self {
            pos,
            symbol: Symbol::Empty,
            staged: Symbol::Empty,
            owner: 0,
            direction: Direction::default(),
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.owner != 0
    }

    pub(super) fn commit(&mut self, symbol: Symbol) {
        self.symbol = symbol;
        self.staged = symbol;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::empty(Pos { y: y as i32, x: x as i32 }));
            }
        }
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    pub(super) fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.index(pos).map(move |index| &mut self.cells[index])
    }

    /// Committed symbol; positions outside the grid read as empty.
    pub fn symbol_at(&self, pos: Pos) -> Symbol {
        self.cell(pos).map_or(Symbol::Empty, |cell| cell.symbol)
    }

    pub fn staged_at(&self, pos: Pos) -> Symbol {
        self.cell(pos).map_or(Symbol::Empty, |cell| cell.staged)
    }

    pub fn owner_at(&self, pos: Pos) -> u32 {
        self.cell(pos).map_or(0, |cell| cell.owner)
    }

    pub(super) fn commit(&mut self, pos: Pos, symbol: Symbol) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.commit(symbol);
        }
    }

    /// Neighbor one step in `direction`. The grid neither wraps nor clamps, so
    /// stepping off the outer ring yields `None`.
    pub fn neighbor(&self, pos: Pos, direction: Direction) -> Option<Pos> {
        let (dx, dy) = direction.delta();
        let next = pos.offset(dx, dy);
        self.contains(next).then_some(next)
    }

    pub fn above(&self, pos: Pos) -> Option<Pos> {
        self.neighbor(pos, Direction::North)
    }

    pub fn below(&self, pos: Pos) -> Option<Pos> {
        self.neighbor(pos, Direction::South)
    }

    pub fn left_of(&self, pos: Pos) -> Option<Pos> {
        self.neighbor(pos, Direction::West)
    }

    pub fn right_of(&self, pos: Pos) -> Option<Pos> {
        self.neighbor(pos, Direction::East)
    }

    /// Marks every cell 4-connected to `start` through cells accepted by
    /// `passable`. The mask is row-major, parallel to [`Grid::cells`]; it is
    /// all `false` when `start` itself is rejected.
    pub fn flood_fill(&self, start: Pos, passable: impl Fn(Pos) -> bool) -> Vec<bool> {
        let mut reached = vec![false; self.cells.len()];
        let Some(index) = self.index(start).filter(|_| passable(start)) else {
            return reached;
        };
        reached[index] = true;

        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(next) = self.neighbor(pos, direction) else {
                    continue;
                };
                let Some(index) = self.index(next) else {
                    continue;
                };
                if !reached[index] && passable(next) {
                    reached[index] = true;
                    queue.push_back(next);
                }
            }
        }
        reached
    }

    /// Smallest `(top_left, bottom_right)` box holding every non-empty cell.
    pub fn occupied_bounds(&self) -> Option<(Pos, Pos)> {
        let mut bounds: Option<(Pos, Pos)> = None;
        for cell in self.cells.iter().filter(|cell| cell.symbol != Symbol::Empty) {
            let pos = cell.pos;
            bounds = Some(match bounds {
                None => (pos, pos),
                Some((low, high)) => (
                    Pos { y: low.y.min(pos.y), x: low.x.min(pos.x) },
                    Pos { y: high.y.max(pos.y), x: high.x.max(pos.x) },
                ),
            });
        }
        bounds
    }
}
