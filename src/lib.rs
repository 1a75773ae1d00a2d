//! Comet Ring - light animation engine for a spinning LED ring game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ring topology, comets, domes, engine tick)
//! - `renderer`: Frame sinks consuming the node buffer (console, ring layout)
//! - `platform`: Repeating tick timer and wall-clock measurement
//! - `config`: Tuning constants, validation and JSON loading
//! - `scoreboard`: Per-session tallies built from simulation events

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod scoreboard;
pub mod sim;

pub use config::{DomePlacement, RingConfig};
pub use error::ConfigError;
pub use scoreboard::Scoreboard;

use glam::Vec2;

/// Default tuning constants (mirrored by `RingConfig::default`)
pub mod consts {
    /// Number of addressable nodes on the ring
    pub const NUM_NODES: usize = 40;

    /// Launch speed in nodes per second
    pub const START_VELOCITY: f64 = 5.0;
    /// Added to the speed magnitude every spin step (must be negative)
    pub const ACCELERATION: f64 = -0.2;
    /// Comets at or below this speed magnitude stop and are removed
    pub const REMOVAL_SPEED: f64 = 1.0;

    /// Dome defaults: five domes of width 4, one every 8 nodes
    pub const DOME_WIDTH: usize = 4;
    pub const DOME_COUNT: usize = 5;
    pub const DOME_SPACING: usize = 8;

    /// Scheduler period in seconds
    pub const TICK_INTERVAL_SECS: f64 = 0.1;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
