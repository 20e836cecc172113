//! Named stamps and their geometry.

use crate::braille::DotMatrixRenderer;
use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub key: char,
    pub name: &'static str,
    /// `(dx, dy)` from the anchor; independent of grid size.
    pub cells: &'static [(i32, i32)],
}

impl Shape {
    /// `(min_x, min_y, max_x, max_y)` over the offsets.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        self.cells.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(x0, y0, x1, y1), &(dx, dy)| (x0.min(dx), y0.min(dy), x1.max(dx), y1.max(dy)),
        )
    }
}

const GLIDER: &[(i32, i32)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
const BLOCK: &[(i32, i32)] = &[(0, 0), (1, 0), (0, 1), (1, 1)];
const BOAT: &[(i32, i32)] = &[(0, 0), (1, 0), (0, 1), (2, 1), (1, 2)];

pub const SHAPES: &[Shape] = &[
    Shape { key: 'g', name: "glider", cells: GLIDER },
    Shape { key: 'b', name: "blinker", cells: &[(0, 0), (0, 1), (0, 2)] },
    Shape { key: 'p', name: "pulsar seed", cells: &[(-1, 1), (0, 1), (1, 1)] },
    Shape { key: 'h', name: "hacker glider", cells: GLIDER },
    Shape { key: 'l', name: "block", cells: BLOCK },
    Shape {
        key: 'v',
        name: "beehive",
        cells: &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2)],
    },
    Shape {
        key: 'o',
        name: "loaf",
        cells: &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (3, 2), (2, 3)],
    },
    Shape { key: 't', name: "boat", cells: BOAT },
    Shape { key: 'u', name: "tub", cells: &[(1, 0), (0, 1), (2, 1), (1, 2)] },
    Shape {
        key: 's',
        name: "lightweight spaceship",
        cells: &[
            (1, 0),
            (4, 0),
            (0, 1),
            (0, 2),
            (4, 2),
            (0, 3),
            (1, 3),
            (2, 3),
            (3, 3),
        ],
    },
    Shape { key: 'x', name: "block (low)", cells: &[(0, 1), (1, 1), (0, 2), (1, 2)] },
    Shape { key: 'c', name: "boat (flipped)", cells: &[(1, 0), (0, 1), (2, 1), (1, 2), (2, 2)] },
];

#[derive(Clone, Copy, Debug)]
pub struct ShapeCatalog {
    shapes: &'static [Shape],
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self { shapes: SHAPES }
    }
}

impl ShapeCatalog {
    pub fn shapes(&self) -> &'static [Shape] {
        self.shapes
    }

    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.shapes.iter().map(|s| s.key)
    }

    pub fn find(&self, key: char) -> Option<&'static Shape> {
        self.shapes.iter().find(|s| s.key == key)
    }

    /// OR the shape's cells onto `grid` around the anchor, wrapping at the
    /// edges. Never clears a cell. Returns false for an unknown key.
    pub fn stamp(&self, grid: &mut Grid, key: char, anchor_x: isize, anchor_y: isize) -> bool {
        let Some(shape) = self.find(key) else {
            return false;
        };
        for &(dx, dy) in shape.cells {
            grid.set(anchor_x + dx as isize, anchor_y + dy as isize, true);
        }
        true
    }

    /// Dot-matrix rendering of the shape's bounding box.
    pub fn preview(&self, shape: &Shape, renderer: &DotMatrixRenderer) -> String {
        let (x0, y0, x1, y1) = shape.bounds();
        let w = (x1 - x0 + 1).max(1) as usize;
        let h = (y1 - y0 + 1).max(1) as usize;
        let Ok(mut grid) = Grid::new(w, h) else {
            return String::new();
        };
        for &(dx, dy) in shape.cells {
            grid.set((dx - x0) as isize, (dy - y0) as isize, true);
        }
        renderer.render_frame(&grid, None).lines().join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamped(w: usize, h: usize, key: char, x: isize, y: isize) -> Grid {
        let mut g = Grid::new(w, h).unwrap();
        assert!(ShapeCatalog::default().stamp(&mut g, key, x, y));
        g
    }

    #[test]
    fn keys_are_unique() {
        let cat = ShapeCatalog::default();
        let mut keys: Vec<char> = cat.keys().collect();
        let n = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), n);
        assert_eq!(n, 12);
    }

    #[test]
    fn unknown_key_is_noop() {
        let mut g = Grid::new(8, 8).unwrap();
        assert!(!ShapeCatalog::default().stamp(&mut g, 'z', 3, 3));
        assert_eq!(g.live_count(), 0);
    }

    #[test]
    fn stamp_wraps_around_edges() {
        let g = stamped(10, 10, 'l', 9, 9);
        for (x, y) in [(9, 9), (0, 9), (9, 0), (0, 0)] {
            assert!(g.get(x, y), "({x},{y}) should be alive");
        }
        assert_eq!(g.live_count(), 4);
    }

    #[test]
    fn stamp_is_additive() {
        let cat = ShapeCatalog::default();
        let mut g = Grid::new(12, 12).unwrap();
        cat.stamp(&mut g, 'g', 3, 3);
        let first: Vec<bool> = g.cells().to_vec();
        cat.stamp(&mut g, 'v', 2, 4);
        for (i, &alive) in first.iter().enumerate() {
            if alive {
                assert!(g.cells()[i]);
            }
        }
    }

    #[test]
    fn geometry_ignores_grid_width() {
        let narrow = stamped(12, 12, 's', 2, 2);
        let wide = stamped(40, 12, 's', 2, 2);
        for y in 0..12isize {
            for x in 0..12isize {
                assert_eq!(narrow.get(x, y), wide.get(x, y));
            }
        }
    }

    #[test]
    fn still_lifes_are_still() {
        for key in ['l', 'v', 'o', 't', 'u', 'x', 'c'] {
            let g = stamped(16, 16, key, 6, 6);
            assert_eq!(g.next_generation(), g, "{key} should be a still life");
        }
    }

    #[test]
    fn preview_of_block_is_one_glyph() {
        let cat = ShapeCatalog::default();
        let r = DotMatrixRenderer::default();
        let block = cat.find('l').unwrap();
        assert_eq!(cat.preview(block, &r), "\u{281B}");
        let lwss = cat.find('s').unwrap();
        assert_eq!(cat.preview(lwss, &r).chars().count(), 3);
    }
}
