use crate::grid::Grid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsTracker {
    pub total_living: usize,
    /// High-water mark of the generation counter. Never decreases.
    pub longest_living: u64,
}

impl StatsTracker {
    pub fn refresh(&mut self, grid: &Grid, generation: u64) {
        self.total_living = grid.live_count();
        self.longest_living = self.longest_living.max(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_live_cells() {
        let mut g = Grid::new(4, 4).unwrap();
        g.set(0, 0, true);
        g.set(3, 3, true);
        let mut s = StatsTracker::default();
        s.refresh(&g, 1);
        assert_eq!(s.total_living, 2);
        assert_eq!(s.longest_living, 1);
    }

    #[test]
    fn longest_is_monotonic() {
        let g = Grid::new(4, 4).unwrap();
        let mut s = StatsTracker::default();
        s.refresh(&g, 7);
        s.refresh(&g, 3);
        assert_eq!(s.longest_living, 7);
        assert_eq!(s.total_living, 0);
    }
}
