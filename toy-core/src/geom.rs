use serde::{Deserialize, Serialize};

/// Basic two dimensional point in CSS pixels, y pointing down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn dist(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Size of the drawing surface in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Clamp `p` into the viewport shrunk by `margin` on every edge.
    ///
    /// When the viewport is smaller than twice the margin the lower bound
    /// wins, so a degenerate viewport pins the point at `(margin, margin)`.
    pub fn clamp_inset(&self, p: Point, margin: f64) -> Point {
        Point {
            x: p.x.min(self.width - margin).max(margin),
            y: p.y.min(self.height - margin).max(margin),
        }
    }
}
