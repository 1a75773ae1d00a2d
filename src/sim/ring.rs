//! Ring topology
//!
//! The ring is a fixed circular index space of `num_nodes` nodes. Comet
//! positions are continuous arc lengths measured in nodes; every position
//! is folded back into `[0, num_nodes)` before it is used.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Circular index space over the ring's nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingTopology {
    num_nodes: usize,
}

impl RingTopology {
    pub fn new(num_nodes: usize) -> Result<Self, ConfigError> {
        if num_nodes == 0 {
            return Err(ConfigError::EmptyRing);
        }
        Ok(Self { num_nodes })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Fold an arc-length position into `[0, num_nodes)` (negative values wrap backwards)
    pub fn wrap(&self, x: f64) -> f64 {
        let n = self.num_nodes as f64;
        let wrapped = x.rem_euclid(n);
        // -1e-17 rem_euclid 40 rounds up to exactly 40.0
        if wrapped >= n { 0.0 } else { wrapped }
    }

    /// Nearest node index for a position (halves go to the even node)
    pub fn to_index(&self, x: f64) -> usize {
        (self.wrap(x).round_ties_even() as usize) % self.num_nodes
    }

    /// Integer step around the ring
    pub fn offset(&self, index: usize, delta: isize) -> usize {
        let n = self.num_nodes as isize;
        ((index as isize % n) + delta % n).rem_euclid(n) as usize
    }

    /// Angle of a node around the ring (radians, node 0 at angle 0, counter-clockwise)
    pub fn angle_of(&self, index: usize) -> f32 {
        (index % self.num_nodes) as f32 / self.num_nodes as f32 * std::f32::consts::TAU
    }
}
