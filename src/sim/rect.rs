//! Axis-aligned rectangles for collision shapes
//!
//! Coordinates are screen space: origin at the top-left of the playfield,
//! y grows downward. A rectangle is anchored at its top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of edge `size` anchored at `pos`
    #[inline]
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_interior() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_edge_touch_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Shares the right edge
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        // Shares the bottom edge
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        // Touches only at a corner
        let corner = Rect::new(10.0, 10.0, 5.0, 5.0);

        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 2.0, 2.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_square_anchored_top_left() {
        let r = Rect::square(Vec2::new(1.0, 2.0), 8.0);
        assert_eq!(r, Rect::new(1.0, 2.0, 8.0, 8.0));
        assert!(r.overlaps(&Rect::new(8.5, 9.5, 1.0, 1.0)));
        assert!(!r.overlaps(&Rect::new(9.0, 2.0, 1.0, 1.0)));
    }
}
