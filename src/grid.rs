//! Toroidal bitmap of Life cells.
//!
//! Coordinates are logical: every accessor wraps `x` modulo the width and `y`
//! modulo the height, so there are no out-of-range positions.

use anyhow::{ensure, Result};
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    w: usize,
    h: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// All-dead grid. Zero dimensions are rejected.
    pub fn new(w: usize, h: usize) -> Result<Self> {
        ensure!(w > 0 && h > 0, "grid dimensions must be positive, got {w}x{h}");
        Ok(Self {
            w,
            h,
            cells: vec![false; w * h],
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn idx(&self, x: isize, y: isize) -> usize {
        let x = x.rem_euclid(self.w as isize) as usize;
        let y = y.rem_euclid(self.h as isize) as usize;
        y * self.w + x
    }

    pub fn get(&self, x: isize, y: isize) -> bool {
        self.cells[self.idx(x, y)]
    }

    pub fn set(&mut self, x: isize, y: isize, alive: bool) {
        let i = self.idx(x, y);
        self.cells[i] = alive;
    }

    pub fn toggle(&mut self, x: isize, y: isize) {
        let i = self.idx(x, y);
        self.cells[i] = !self.cells[i];
    }

    /// Unwrapped lookup: anything past the right or bottom edge reads as dead.
    pub(crate) fn get_bounded(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.cells[y * self.w + x]
    }

    pub fn count_live_neighbors(&self, x: isize, y: isize) -> u8 {
        let mut n = 0u8;
        for dy in [-1isize, 0, 1] {
            for dx in [-1isize, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.get(x + dx, y + dy) {
                    n += 1;
                }
            }
        }
        n
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Next generation under B3/S23, computed from `self` without touching it.
    pub fn next_generation(&self) -> Grid {
        let mut next = vec![false; self.w * self.h];
        for y in 0..self.h {
            for x in 0..self.w {
                let i = y * self.w + x;
                let n = self.count_live_neighbors(x as isize, y as isize);
                next[i] = n == 3 || (n == 2 && self.cells[i]);
            }
        }
        Grid {
            w: self.w,
            h: self.h,
            cells: next,
        }
    }

    /// Advance one generation in place; the previous buffer is dropped.
    pub fn step(&mut self) {
        *self = self.next_generation();
    }

    /// Rectangular crop/pad into a fresh `w`x`h` grid. The overlap keeps its
    /// coordinates; nothing wraps.
    pub fn resized(&self, w: usize, h: usize) -> Result<Grid> {
        let mut out = Grid::new(w, h)?;
        let keep_w = self.w.min(w);
        for y in 0..self.h.min(h) {
            let src = y * self.w;
            let dst = y * w;
            out.cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }
        Ok(out)
    }

    pub fn seed_random<R: Rng>(&mut self, rng: &mut R, density: f64) {
        let p = density.clamp(0.0, 1.0);
        for c in &mut self.cells {
            *c = rng.gen_bool(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(w: usize, h: usize, live: &[(isize, isize)]) -> Grid {
        let mut g = Grid::new(w, h).unwrap();
        for &(x, y) in live {
            g.set(x, y, true);
        }
        g
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(Grid::new(0, 4).is_err());
        assert!(Grid::new(4, 0).is_err());
    }

    #[test]
    fn coordinates_wrap() {
        let mut g = Grid::new(5, 3).unwrap();
        g.set(-1, -1, true);
        assert!(g.get(4, 2));
        assert!(g.get(9, 5));
        g.toggle(4, 2);
        assert!(!g.get(-1, -1));
    }

    #[test]
    fn corner_neighbors_wrap() {
        let g = grid_with(8, 6, &[(7, 5)]);
        assert_eq!(g.count_live_neighbors(0, 0), 1);

        let g = grid_with(8, 6, &[(7, 5), (7, 0), (0, 5), (1, 1)]);
        assert_eq!(g.count_live_neighbors(0, 0), 4);
    }

    #[test]
    fn neighbor_count_excludes_self() {
        let mut g = Grid::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                g.set(x, y, true);
            }
        }
        assert_eq!(g.count_live_neighbors(1, 1), 8);
    }

    #[test]
    fn birth_on_three() {
        let g = grid_with(6, 6, &[(1, 1), (2, 1), (3, 1)]);
        let next = g.next_generation();
        assert!(next.get(2, 0));
        assert!(next.get(2, 2));
    }

    #[test]
    fn survival_on_two_and_death_otherwise() {
        // (2,1) has two neighbours and survives; the ends have one and die.
        let g = grid_with(6, 6, &[(1, 1), (2, 1), (3, 1)]);
        let next = g.next_generation();
        assert!(next.get(2, 1));
        assert!(!next.get(1, 1));
        assert!(!next.get(3, 1));

        // A dead cell with two neighbours stays dead.
        let g = grid_with(6, 6, &[(1, 1), (3, 1)]);
        assert!(!g.next_generation().get(2, 1));
    }

    #[test]
    fn overcrowding_kills() {
        let g = grid_with(7, 7, &[(3, 3), (2, 2), (3, 2), (4, 2), (2, 3)]);
        assert_eq!(g.count_live_neighbors(3, 3), 4);
        assert!(!g.next_generation().get(3, 3));
    }

    #[test]
    fn step_does_not_read_its_own_writes() {
        let mut g = grid_with(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        g.step();
        let expected = grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        assert_eq!(g, expected);
    }

    #[test]
    fn resize_grow_and_shrink() {
        let g = grid_with(10, 10, &[(2, 2)]);
        let big = g.resized(20, 20).unwrap();
        assert_eq!(big.live_count(), 1);
        assert!(big.get(2, 2));

        let small = big.resized(5, 5).unwrap();
        assert!(small.get(2, 2));
        assert_eq!(small.live_count(), 1);
    }

    #[test]
    fn resize_truncates_without_wrapping() {
        let g = grid_with(10, 10, &[(8, 1), (1, 8)]);
        let small = g.resized(5, 5).unwrap();
        assert_eq!(small.live_count(), 0);
        assert!(g.resized(0, 5).is_err());
    }

    #[test]
    fn resize_mixed_axes() {
        let g = grid_with(4, 8, &[(3, 7), (1, 1)]);
        let r = g.resized(9, 2).unwrap();
        assert!(r.get(1, 1));
        assert_eq!(r.live_count(), 1);
    }
}
