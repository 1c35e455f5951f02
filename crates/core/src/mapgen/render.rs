//! Plain-text rendering of a generated dungeon.

use crate::types::Pos;

use super::model::Dungeon;

/// Knobs for [`Dungeon::render_text_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRenderOptions {
    /// Blank cells kept around the occupied area, clamped to the grid.
    pub margin: usize,
    /// Overwrite the tail of the last line with the seed.
    pub stamp_seed: bool,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self { margin: 1, stamp_seed: false }
    }
}

/// One glyph per cell over the occupied bounding box plus margin, rows
/// separated and terminated by `'\n'`. An empty grid renders as `""`.
///
/// The seed stamp is skipped when the seed is wider than a row.
pub(super) fn render_text(dungeon: &Dungeon, options: &TextRenderOptions) -> String {
    let grid = dungeon.grid();
    let Some((low, high)) = grid.occupied_bounds() else {
        return String::new();
    };

    let margin = options.margin as i32;
    let left = (low.x - margin).max(0);
    let top = (low.y - margin).max(0);
    let right = (high.x + margin).min(grid.width() as i32 - 1);
    let bottom = (high.y + margin).min(grid.height() as i32 - 1);

    let mut rows: Vec<Vec<char>> = (top..=bottom)
        .map(|y| {
            (left..=right)
                .map(|x| grid.cell(Pos { y, x }).map_or(' ', |cell| cell.symbol.glyph()))
                .collect()
        })
        .collect();

    if options.stamp_seed {
        let stamp: Vec<char> = dungeon.seed().to_string().chars().collect();
        if let Some(last) = rows.last_mut()
            && stamp.len() <= last.len()
        {
            let start = last.len() - stamp.len();
            last[start..].copy_from_slice(&stamp);
        }
    }

    let mut text = String::with_capacity(rows.len() * (rows.first().map_or(0, Vec::len) + 1));
    for row in rows {
        text.extend(row);
        text.push('\n');
    }
    text
}
