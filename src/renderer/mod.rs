//! Frame sinks
//!
//! The engine hands every finished node buffer to a `FrameSink`. Sinks own
//! their failures: a terminal that goes away must never stall the tick loop.

mod console;
mod ring_layout;

pub use console::{ConsoleSink, Palette};
pub use ring_layout::RingLayoutSink;

use crate::sim::Color;

/// One rendered frame, borrowed from the engine
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// One color per node, in ring order
    pub colors: &'a [Color],
    /// `true` where the node belongs to a dome
    pub dome_mask: &'a [bool],
}

impl Frame<'_> {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn to_owned_frame(&self) -> OwnedFrame {
        OwnedFrame {
            colors: self.colors.to_vec(),
            dome_mask: self.dome_mask.to_vec(),
        }
    }
}

/// Owned copy of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedFrame {
    pub colors: Vec<Color>,
    pub dome_mask: Vec<bool>,
}

/// Consumer of rendered frames (console, LED driver, recorder)
pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>);
}

/// Keeps every frame it is shown
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<OwnedFrame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&OwnedFrame> {
        self.frames.last()
    }
}

impl FrameSink for RecordingSink {
    fn present(&mut self, frame: &Frame<'_>) {
        self.frames.push(frame.to_owned_frame());
    }
}

/// Drops every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame<'_>) {}
}
