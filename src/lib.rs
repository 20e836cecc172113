//! Toroidal Game of Life rendered as braille dot-matrix text.
//!
//! [`Session`] is the entry point for a front end: it owns the grid, the
//! cursor, the generation clock and the counters, and hands back [`Frame`]s
//! ready to print.

pub mod braille;
pub mod clock;
pub mod grid;
pub mod session;
pub mod shapes;
pub mod stats;

pub use braille::{DotLayout, DotMatrixRenderer, Frame};
pub use clock::{SimulationClock, SpeedLevel};
pub use grid::Grid;
pub use session::{Cursor, Session, Stats};
pub use shapes::{Shape, ShapeCatalog};
pub use stats::StatsTracker;
