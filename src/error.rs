//! Startup errors
//!
//! Everything here is fatal to startup. A running engine has no error path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ring must have at least one node")]
    EmptyRing,

    #[error("dome {index} has zero width")]
    EmptyDome { index: usize },

    #[error("dome {index} spans [{start}, {end}) which crosses the ring seam at {num_nodes}")]
    DomeCrossesSeam {
        index: usize,
        start: usize,
        end: usize,
        num_nodes: usize,
    },

    #[error("domes {first} and {second} overlap")]
    OverlappingDomes { first: usize, second: usize },

    #[error("acceleration must be negative, got {0}")]
    NonDecelerating(f64),

    #[error("removal speed {removal_speed} is below half of |acceleration| ({acceleration}); comets would never stop")]
    NeverStops {
        removal_speed: f64,
        acceleration: f64,
    },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidSpeed { name: &'static str, value: f64 },

    #[error("tick interval must be positive, got {0}")]
    InvalidInterval(f64),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
