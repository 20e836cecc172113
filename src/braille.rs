/* -----------------------------
   Braille encoding: 2×4 cells -> U+2800..U+28FF
------------------------------ */

use crate::grid::Grid;
use serde::{Deserialize, Serialize};

pub const BLOCK_W: usize = 2;
pub const BLOCK_H: usize = 4;

const BRAILLE_BASE: u32 = 0x2800;

/// Which bit each sub-cell of a 2×4 block sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotLayout {
    /// Unicode braille dot numbering; what a terminal actually draws.
    #[default]
    Unicode,
    /// Bit `dy * 2 + dx`.
    RowMajor,
}

impl DotLayout {
    pub fn bit(self, dx: usize, dy: usize) -> u8 {
        match self {
            // Dot mapping:
            // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
            // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
            DotLayout::Unicode => match (dx, dy) {
                (0, 0) => 0x01,
                (0, 1) => 0x02,
                (0, 2) => 0x04,
                (0, 3) => 0x40,
                (1, 0) => 0x08,
                (1, 1) => 0x10,
                (1, 2) => 0x20,
                (1, 3) => 0x80,
                _ => 0x00,
            },
            DotLayout::RowMajor if dx < BLOCK_W && dy < BLOCK_H => 1 << (dy * BLOCK_W + dx),
            DotLayout::RowMajor => 0x00,
        }
    }
}

pub fn braille_char(mask: u8) -> char {
    char::from_u32(BRAILLE_BASE + mask as u32).unwrap_or(' ')
}

/// A rendered display grid, `cols` × `rows` glyphs in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub cols: usize,
    pub rows: usize,
    pub glyphs: Vec<char>,
    /// Display cell replaced by the cursor glyph, if any.
    pub cursor: Option<(usize, usize)>,
}

impl Frame {
    pub fn glyph(&self, col: usize, row: usize) -> char {
        self.glyphs[row * self.cols + col]
    }

    pub fn lines(&self) -> Vec<String> {
        self.glyphs
            .chunks(self.cols.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

#[derive(Clone, Debug)]
pub struct DotMatrixRenderer {
    pub layout: DotLayout,
    pub cursor_glyph: char,
}

impl Default for DotMatrixRenderer {
    fn default() -> Self {
        Self {
            layout: DotLayout::Unicode,
            cursor_glyph: '■',
        }
    }
}

impl DotMatrixRenderer {
    pub fn new(layout: DotLayout, cursor_glyph: char) -> Self {
        Self {
            layout,
            cursor_glyph,
        }
    }

    pub fn mask_at(&self, grid: &Grid, base_x: usize, base_y: usize) -> u8 {
        let mut mask = 0u8;
        for dy in 0..BLOCK_H {
            for dx in 0..BLOCK_W {
                if grid.get_bounded(base_x + dx, base_y + dy) {
                    mask |= self.layout.bit(dx, dy);
                }
            }
        }
        mask
    }

    /// Glyph for the 2×4 block whose top-left cell is `(base_x, base_y)`.
    /// Cells past the grid edge count as dead here; they do not wrap.
    pub fn render_cell(&self, grid: &Grid, base_x: usize, base_y: usize) -> char {
        braille_char(self.mask_at(grid, base_x, base_y))
    }

    pub fn render_frame(&self, grid: &Grid, cursor: Option<(usize, usize)>) -> Frame {
        let cols = grid.width().div_ceil(BLOCK_W);
        let rows = grid.height().div_ceil(BLOCK_H);
        let cursor = cursor.map(|(x, y)| (x / BLOCK_W, y / BLOCK_H));

        let mut glyphs = Vec::with_capacity(cols * rows);
        for cy in 0..rows {
            for cx in 0..cols {
                if cursor == Some((cx, cy)) {
                    glyphs.push(self.cursor_glyph);
                } else {
                    glyphs.push(self.render_cell(grid, cx * BLOCK_W, cy * BLOCK_H));
                }
            }
        }
        Frame {
            cols,
            rows,
            glyphs,
            cursor: cursor.filter(|&(cx, cy)| cx < cols && cy < rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(w: usize, h: usize) -> Grid {
        let mut g = Grid::new(w, h).unwrap();
        for y in 0..h as isize {
            for x in 0..w as isize {
                g.set(x, y, true);
            }
        }
        g
    }

    #[test]
    fn empty_and_full_blocks() {
        for layout in [DotLayout::Unicode, DotLayout::RowMajor] {
            let r = DotMatrixRenderer::new(layout, '■');
            assert_eq!(r.render_cell(&Grid::new(2, 4).unwrap(), 0, 0), '\u{2800}');
            assert_eq!(r.render_cell(&filled(2, 4), 0, 0), '\u{28FF}');
        }
    }

    #[test]
    fn every_subcell_sets_a_distinct_bit() {
        for layout in [DotLayout::Unicode, DotLayout::RowMajor] {
            let mut seen = 0u8;
            for dy in 0..BLOCK_H {
                for dx in 0..BLOCK_W {
                    let b = layout.bit(dx, dy);
                    assert_eq!(b.count_ones(), 1);
                    assert_eq!(seen & b, 0);
                    seen |= b;
                }
            }
            assert_eq!(seen, 0xFF);
        }
    }

    #[test]
    fn single_dot_positions() {
        let mut g = Grid::new(2, 4).unwrap();
        g.set(1, 0, true);
        let unicode = DotMatrixRenderer::new(DotLayout::Unicode, '■');
        let row_major = DotMatrixRenderer::new(DotLayout::RowMajor, '■');
        assert_eq!(unicode.render_cell(&g, 0, 0), '\u{2808}');
        assert_eq!(row_major.render_cell(&g, 0, 0), '\u{2802}');

        let mut g = Grid::new(2, 4).unwrap();
        g.set(0, 3, true);
        assert_eq!(unicode.render_cell(&g, 0, 0), '\u{2840}');
        assert_eq!(row_major.render_cell(&g, 0, 0), '\u{2840}');
    }

    #[test]
    fn ragged_edges_read_as_dead() {
        // 3×5: the last column and row only partly fill their blocks.
        let g = filled(3, 5);
        let r = DotMatrixRenderer::default();
        let frame = r.render_frame(&g, None);
        assert_eq!((frame.cols, frame.rows), (2, 2));
        assert_eq!(frame.glyph(0, 0), '\u{28FF}');
        // x=2 only, rows 0..4: dots 1,2,3,7.
        assert_eq!(frame.glyph(1, 0), '\u{2847}');
        // y=4 only, columns 0..2: dots 1,4.
        assert_eq!(frame.glyph(0, 1), '\u{2809}');
        assert_eq!(frame.glyph(1, 1), '\u{2801}');
    }

    #[test]
    fn cursor_replaces_its_block() {
        let g = filled(8, 8);
        let r = DotMatrixRenderer::default();
        let frame = r.render_frame(&g, Some((5, 6)));
        assert_eq!(frame.cursor, Some((2, 1)));
        assert_eq!(frame.glyph(2, 1), '■');
        assert_eq!(frame.glyphs.iter().filter(|&&c| c == '■').count(), 1);
    }

    #[test]
    fn lines_have_frame_shape() {
        let g = Grid::new(10, 12).unwrap();
        let frame = DotMatrixRenderer::default().render_frame(&g, None);
        let lines = frame.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 5));
        assert_eq!(frame.to_text().lines().count(), 3);
    }
}
