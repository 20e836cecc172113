//! One simulation: grid, cursor, clock and counters, owned together and handed
//! to whatever drives the display.

use crate::braille::{DotMatrixRenderer, Frame};
use crate::clock::{SimulationClock, SpeedLevel};
use crate::grid::Grid;
use crate::shapes::ShapeCatalog;
use crate::stats::StatsTracker;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::Rng;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    fn clamp_to(&mut self, w: usize, h: usize) {
        self.x = self.x.min(w - 1);
        self.y = self.y.min(h - 1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub total_living: usize,
    pub longest_living: u64,
    pub generation: u64,
    pub period: Duration,
    pub generations_per_sec: u32,
}

#[derive(Clone, Debug)]
pub struct Session {
    grid: Grid,
    cursor: Cursor,
    clock: SimulationClock,
    stats: StatsTracker,
    generation: u64,
    renderer: DotMatrixRenderer,
    catalog: ShapeCatalog,
}

impl Session {
    pub fn new(
        w: usize,
        h: usize,
        level: SpeedLevel,
        renderer: DotMatrixRenderer,
        now: Instant,
    ) -> Result<Self> {
        let grid = Grid::new(w, h).context("initial grid")?;
        info!("session started: {w}x{h} cells, speed level {level}");
        Ok(Self {
            grid,
            cursor: Cursor { x: w / 2, y: h / 2 },
            clock: SimulationClock::new(level, now),
            stats: StatsTracker::default(),
            generation: 0,
            renderer,
            catalog: ShapeCatalog::default(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn renderer(&self) -> &DotMatrixRenderer {
        &self.renderer
    }

    /// Reallocate to `w`x`h`, keeping the overlapping rectangle and pulling the
    /// cursor inside. A zero dimension is rejected and nothing changes.
    pub fn resize(&mut self, w: usize, h: usize) -> Result<()> {
        let (old_w, old_h) = (self.grid.width(), self.grid.height());
        if (old_w, old_h) == (w, h) {
            return Ok(());
        }
        let grid = match self.grid.resized(w, h) {
            Ok(g) => g,
            Err(e) => {
                warn!("resize to {w}x{h} rejected: {e}");
                return Err(e);
            }
        };
        self.grid = grid;
        self.cursor.clamp_to(w, h);
        self.stats.refresh(&self.grid, self.generation);
        info!("resized {old_w}x{old_h} -> {w}x{h}");
        Ok(())
    }

    /// Move by a logical offset; the result is clamped to the grid.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let max_x = self.grid.width() as isize - 1;
        let max_y = self.grid.height() as isize - 1;
        self.cursor.x = (self.cursor.x as isize + dx).clamp(0, max_x) as usize;
        self.cursor.y = (self.cursor.y as isize + dy).clamp(0, max_y) as usize;
    }

    pub fn toggle_cell(&mut self) {
        let Cursor { x, y } = self.cursor;
        self.grid.toggle(x as isize, y as isize);
        self.stats.refresh(&self.grid, self.generation);
    }

    /// Stamp the catalog shape bound to `key` at the cursor. Unknown keys are
    /// ignored.
    pub fn stamp_shape(&mut self, key: char) -> bool {
        let Cursor { x, y } = self.cursor;
        let stamped = self.catalog.stamp(&mut self.grid, key, x as isize, y as isize);
        if stamped {
            debug!("stamped '{key}' at ({x},{y})");
            self.stats.refresh(&self.grid, self.generation);
        } else {
            debug!("no shape bound to '{key}'");
        }
        stamped
    }

    pub fn set_speed(&mut self, level: SpeedLevel, now: Instant) {
        if level != self.clock.level() {
            info!("speed level {} -> {level}", self.clock.level());
        }
        self.clock.set_level(level, now);
    }

    /// One generation: step, count, refresh stats.
    pub fn advance(&mut self) {
        self.grid.step();
        self.generation += 1;
        self.stats.refresh(&self.grid, self.generation);
    }

    /// Advance if the clock says a generation is due. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.clock.poll(now) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        info!("session stopped after {} generations", self.generation);
    }

    pub fn seed_random<R: Rng>(&mut self, rng: &mut R, density: f64) {
        self.grid.seed_random(rng, density);
        self.stats.refresh(&self.grid, self.generation);
    }

    pub fn render_frame(&self) -> Frame {
        self.renderer
            .render_frame(&self.grid, Some((self.cursor.x, self.cursor.y)))
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_living: self.stats.total_living,
            longest_living: self.stats.longest_living,
            generation: self.generation,
            period: self.clock.period(),
            generations_per_sec: self.clock.generations_per_sec(),
        }
    }
}
