//! Circular console rendering
//!
//! Projects the nodes onto a circle in a character grid, the way the LEDs
//! sit on the physical ring. Terminal cells are roughly twice as tall as
//! they are wide, so x is stretched by `ASPECT`.

use std::io::{self, Write};

use glam::Vec2;

use super::{Frame, FrameSink, Palette};
use crate::polar_to_cartesian;

const ASPECT: f32 = 2.0;
/// Distance between the node circle and the dome marker circle
const DOME_INSET: f32 = 1.5;

pub struct RingLayoutSink<W: Write> {
    out: W,
    palette: Palette,
    radius: f32,
}

impl<W: Write> RingLayoutSink<W> {
    pub fn new(out: W, palette: Palette, radius: f32) -> Self {
        Self {
            out,
            palette,
            radius: radius.max(2.0),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn grid_size(&self) -> (usize, usize) {
        let r = self.radius.ceil() as usize;
        (2 * r + 1, 2 * (ASPECT as usize) * r + 1)
    }

    fn cell(&self, point: Vec2) -> (usize, usize) {
        let (rows, cols) = self.grid_size();
        let center = Vec2::new((cols / 2) as f32, (rows / 2) as f32);
        let col = (center.x + point.x * ASPECT).round().clamp(0.0, (cols - 1) as f32);
        // Screen rows grow downward
        let row = (center.y - point.y).round().clamp(0.0, (rows - 1) as f32);
        (row as usize, col as usize)
    }

    /// Rows of the rendered grid
    pub fn render_rows(&self, frame: &Frame<'_>) -> Vec<String> {
        let (rows, cols) = self.grid_size();
        let mut grid = vec![vec![' '; cols]; rows];
        let n = frame.len().max(1) as f32;

        for (i, &in_dome) in frame.dome_mask.iter().enumerate() {
            if in_dome {
                let theta = i as f32 / n * std::f32::consts::TAU;
                let (row, col) = self.cell(polar_to_cartesian(self.radius - DOME_INSET, theta));
                grid[row][col] = '_';
            }
        }
        for (i, &color) in frame.colors.iter().enumerate() {
            let theta = i as f32 / n * std::f32::consts::TAU;
            let (row, col) = self.cell(polar_to_cartesian(self.radius, theta));
            grid[row][col] = self.palette.symbol(color);
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let mut text = self.render_rows(frame).join("\n");
        text.push('\n');
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for RingLayoutSink<W> {
    fn present(&mut self, frame: &Frame<'_>) {
        if let Err(e) = self.write_frame(frame) {
            log::warn!("Ring frame dropped: {}", e);
        }
    }
}
