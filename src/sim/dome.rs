//! Scoring domes
//!
//! A dome is a contiguous run of nodes that animate together. Domes never
//! cross the ring seam and never overlap; `RingConfig::validate` enforces both.

use serde::{Deserialize, Serialize};

use super::state::Color;

/// A group of nodes that takes the color of the comet stopping inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dome {
    pub start: usize,
    pub width: usize,
    pub color: Color,
    /// Reserved for per-dome idle animation
    pub animation_color: Color,
}

impl Dome {
    pub fn new(start: usize, width: usize, background: Color) -> Self {
        Self {
            start,
            width,
            color: background,
            animation_color: background,
        }
    }

    /// One past the last node of the dome
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.width
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end()
    }

    pub fn resolve_hit(&mut self, color: Color) {
        self.color = color;
    }

    /// Back to the unscored look for a new session
    pub fn reset(&mut self, background: Color) {
        self.color = background;
        self.animation_color = background;
    }

    /// Paint the dome's color over its node range
    pub fn paint(&self, buffer: &mut [Color]) {
        let end = self.end().min(buffer.len());
        if self.start < end {
            buffer[self.start..end].fill(self.color);
        }
    }
}

/// First dome in iteration order containing `index`
pub fn find_dome(domes: &[Dome], index: usize) -> Option<usize> {
    domes.iter().position(|d| d.contains(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let dome = Dome::new(8, 4, Color::BLACK);
        assert!(!dome.contains(7));
        assert!(dome.contains(8));
        assert!(dome.contains(11));
        assert!(!dome.contains(12));
    }

    #[test]
    fn test_resolve_hit_and_reset() {
        let red = Color::rgb(255, 0, 0);
        let mut dome = Dome::new(0, 4, Color::BLACK);
        dome.resolve_hit(red);
        assert_eq!(dome.color, red);

        dome.reset(Color::BLACK);
        assert_eq!(dome.color, Color::BLACK);
        assert_eq!(dome.animation_color, Color::BLACK);
    }

    #[test]
    fn test_paint_fills_range_only() {
        let green = Color::rgb(0, 255, 0);
        let mut dome = Dome::new(2, 3, Color::BLACK);
        dome.resolve_hit(green);

        let mut buffer = vec![Color::BLACK; 8];
        dome.paint(&mut buffer);
        assert_eq!(buffer[1], Color::BLACK);
        assert_eq!(&buffer[2..5], &[green; 3]);
        assert_eq!(buffer[5], Color::BLACK);
    }

    #[test]
    fn test_find_dome_first_match() {
        let domes = vec![
            Dome::new(0, 4, Color::BLACK),
            Dome::new(8, 4, Color::BLACK),
        ];
        assert_eq!(find_dome(&domes, 3), Some(0));
        assert_eq!(find_dome(&domes, 9), Some(1));
        assert_eq!(find_dome(&domes, 5), None);
    }
}
