//! Ring configuration
//!
//! Every tuning constant lives here. Values are fixed once the engine is
//! built; there is no runtime reload.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Color, Player};

/// Where a dome sits on the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomePlacement {
    pub start: usize,
    pub width: usize,
}

impl DomePlacement {
    /// `count` domes of `width` nodes, one every `spacing` nodes from node 0
    pub fn evenly_spaced(count: usize, spacing: usize, width: usize) -> Vec<Self> {
        (0..count)
            .map(|i| DomePlacement {
                start: i * spacing,
                width,
            })
            .collect()
    }
}

/// Tuning constants for one ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Number of LED nodes on the ring
    pub num_nodes: usize,

    // === Physics ===
    /// Launch speed (nodes per second)
    pub start_speed: f64,
    /// Speed change per spin step (negative)
    pub acceleration: f64,
    /// Comets at or below this speed magnitude stop
    pub removal_speed: f64,

    // === Layout ===
    pub domes: Vec<DomePlacement>,

    // === Colors ===
    pub background: Color,
    pub player_one_color: Color,
    pub player_two_color: Color,

    // === Launch ===
    /// Uniform launch speed jitter (+/-), 0 disables
    pub launch_jitter: f64,
    /// Seed for the launch jitter stream
    pub seed: u64,

    // === Scheduling ===
    /// Scheduler period in seconds
    pub tick_interval_secs: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            num_nodes: NUM_NODES,

            start_speed: START_VELOCITY,
            acceleration: ACCELERATION,
            removal_speed: REMOVAL_SPEED,

            domes: DomePlacement::evenly_spaced(DOME_COUNT, DOME_SPACING, DOME_WIDTH),

            background: Color::BLACK,
            player_one_color: Color::rgb(255, 80, 0),
            player_two_color: Color::rgb(0, 120, 255),

            launch_jitter: 0.0,
            seed: 0,

            tick_interval_secs: TICK_INTERVAL_SECS,
        }
    }
}

impl RingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded ring config from {} ({} nodes, {} domes)",
            path.as_ref().display(),
            config.num_nodes,
            config.domes.len()
        );
        Ok(config)
    }

    pub fn player_color(&self, player: Player) -> Color {
        match player {
            Player::One => self.player_one_color,
            Player::Two => self.player_two_color,
        }
    }

    /// Reject layouts and physics the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::EmptyRing);
        }

        for (name, value) in [
            ("start_speed", self.start_speed),
            ("removal_speed", self.removal_speed),
            ("launch_jitter", self.launch_jitter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }
        if !(self.acceleration < 0.0) {
            // Also catches NaN
            return Err(ConfigError::NonDecelerating(self.acceleration));
        }
        // Below half a step the speed flips sign around zero and never stops
        if self.removal_speed < -self.acceleration / 2.0 {
            return Err(ConfigError::NeverStops {
                removal_speed: self.removal_speed,
                acceleration: self.acceleration,
            });
        }
        if !(self.tick_interval_secs > 0.0) || !self.tick_interval_secs.is_finite() {
            return Err(ConfigError::InvalidInterval(self.tick_interval_secs));
        }

        for (index, dome) in self.domes.iter().enumerate() {
            if dome.width == 0 {
                return Err(ConfigError::EmptyDome { index });
            }
            let end = dome.start.checked_add(dome.width).unwrap_or(usize::MAX);
            if end > self.num_nodes {
                return Err(ConfigError::DomeCrossesSeam {
                    index,
                    start: dome.start,
                    end,
                    num_nodes: self.num_nodes,
                });
            }
        }

        let mut order: Vec<usize> = (0..self.domes.len()).collect();
        order.sort_by_key(|&i| self.domes[i].start);
        for pair in order.windows(2) {
            let (a, b) = (&self.domes[pair[0]], &self.domes[pair[1]]);
            if b.start < a.start + a.width {
                return Err(ConfigError::OverlappingDomes {
                    first: pair[0].min(pair[1]),
                    second: pair[0].max(pair[1]),
                });
            }
        }

        Ok(())
    }
}
