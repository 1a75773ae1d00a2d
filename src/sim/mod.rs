//! Deterministic simulation module
//!
//! All light logic lives here. This module must stay pure and deterministic:
//! - Elapsed time is passed in, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (launch order for comets, config order for domes)

pub mod dome;
pub mod engine;
pub mod ring;
pub mod state;

pub use dome::{Dome, find_dome};
pub use engine::SimulationEngine;
pub use ring::RingTopology;
pub use state::{Color, Comet, CometPhase, Direction, Player, SimEvent};
