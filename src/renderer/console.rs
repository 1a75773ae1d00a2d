//! Linear console rendering
//!
//! Two rows per frame: a dome marker row (`_` over dome nodes) and a node
//! row. Plain mode prints one palette symbol per node; ANSI mode prints a
//! truecolor glyph instead.

use std::io::{self, Write};

use super::{Frame, FrameSink};
use crate::config::RingConfig;
use crate::sim::Color;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Maps known colors to single-character symbols for plain output
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<(Color, char)>,
    background: Color,
    unknown: char,
}

impl Palette {
    /// Background `0`, player one `1`, player two `2`, anything else `*`
    pub fn from_config(config: &RingConfig) -> Self {
        Self {
            entries: vec![
                (config.background, '0'),
                (config.player_one_color, '1'),
                (config.player_two_color, '2'),
            ],
            background: config.background,
            unknown: '*',
        }
    }

    pub fn symbol(&self, color: Color) -> char {
        self.entries
            .iter()
            .find(|(c, _)| *c == color)
            .map(|(_, s)| *s)
            .unwrap_or(self.unknown)
    }

    pub fn background(&self) -> Color {
        self.background
    }
}

/// Prints frames as text rows
pub struct ConsoleSink<W: Write> {
    out: W,
    palette: Palette,
    ansi: bool,
    clear: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(palette: Palette) -> Self {
        Self::new(io::stdout(), palette)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            ansi: false,
            clear: false,
        }
    }

    /// Truecolor glyphs instead of palette digits
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Clear the terminal before every frame
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self, frame: &Frame<'_>) -> String {
        let mut text = String::with_capacity(frame.len() * 24 + 16);
        if self.clear {
            text.push_str(CLEAR_SCREEN);
        }

        for &in_dome in frame.dome_mask {
            text.push(if in_dome { '_' } else { ' ' });
        }
        text.push('\n');

        for &color in frame.colors {
            if self.ansi {
                if color == self.palette.background() {
                    text.push('·');
                } else {
                    text.push_str(&format!(
                        "\x1b[38;2;{};{};{}m●\x1b[0m",
                        color.r, color.g, color.b
                    ));
                }
            } else {
                text.push(self.palette.symbol(color));
            }
        }
        text.push('\n');
        text
    }

    fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let text = self.render(frame);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for ConsoleSink<W> {
    fn present(&mut self, frame: &Frame<'_>) {
        if let Err(e) = self.write_frame(frame) {
            log::warn!("Console frame dropped: {}", e);
        }
    }
}
