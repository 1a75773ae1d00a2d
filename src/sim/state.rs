//! Simulation entity types
//!
//! Comets are the only entities that move. Everything a frame depends on is
//! plain data here so the engine can stay deterministic.

use serde::{Deserialize, Serialize};

use super::ring::RingTopology;

/// 24-bit LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The two launching players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Player one spins forward, player two spins backward
    pub fn direction(self) -> Direction {
        match self {
            Player::One => Direction::Forward,
            Player::Two => Direction::Reverse,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// Travel direction around the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing node indices
    Forward,
    /// Decreasing node indices
    Reverse,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// Lifecycle phase of a comet
///
/// While `Spinning` the comet obeys the shared physics parameters. Both
/// stopped phases are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CometPhase {
    Spinning,
    StoppedSuccess,
    StoppedFailure,
}

impl CometPhase {
    pub fn is_stopped(self) -> bool {
        !matches!(self, CometPhase::Spinning)
    }
}

/// A single moving light on the ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comet {
    pub id: u32,
    pub player: Player,
    /// Continuous arc-length position in `[0, num_nodes)`
    pub position: f64,
    /// Node the comet lights, `round(position) mod num_nodes` (ties to even)
    pub node: usize,
    pub color: Color,
    /// Signed speed; only its magnitude drives motion
    pub speed: f64,
    pub direction: Direction,
    pub phase: CometPhase,
}

impl Comet {
    pub fn new(
        id: u32,
        player: Player,
        color: Color,
        speed: f64,
        start_position: f64,
        ring: &RingTopology,
    ) -> Self {
        let position = ring.wrap(start_position);
        Self {
            id,
            player,
            position,
            node: ring.to_index(position),
            color,
            speed,
            direction: player.direction(),
            phase: CometPhase::Spinning,
        }
    }

    /// One step of the spin animation
    ///
    /// The distance covered uses the speed from before this step's decay.
    /// The speed is re-based to its magnitude before `acceleration` is
    /// added, so a sign flip never reverses the comet.
    pub fn step_spin(&mut self, dt: f64, acceleration: f64, ring: &RingTopology) {
        let distance = self.speed * self.direction.sign() * dt;
        self.speed = self.speed.abs() + acceleration;
        self.position = ring.wrap(self.position + distance);
        self.node = ring.to_index(self.position);
    }

    /// True once the comet is slow enough to stop
    #[inline]
    pub fn can_remove(&self, removal_speed: f64) -> bool {
        self.speed.abs() <= removal_speed
    }
}

/// Things that happened during a launch or tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    CometLaunched {
        comet_id: u32,
        player: Player,
        node: usize,
    },
    CometStopped {
        comet_id: u32,
        player: Player,
        node: usize,
        phase: CometPhase,
    },
    /// A dome took the color of the comet that stopped inside it
    DomeScored {
        dome: usize,
        color: Color,
        player: Player,
    },
}
