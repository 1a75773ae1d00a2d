//! Platform layer
//!
//! Handles native timing for the tick loop:
//! - Repeating interval timer on a worker thread
//! - Wall-clock elapsed time between ticks

pub mod timer;

pub use timer::{RepeatingTimer, TickClock};
