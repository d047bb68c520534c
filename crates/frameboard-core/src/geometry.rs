//! Pixel geometry and the viewport constraint applied to every frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The visible page area. `header_band` is the height reserved at the top for
/// the dashboard header; frames never overlap it.
///
/// The band is measured by the caller on every event since it can change
/// (fonts loading, header widgets wrapping).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub header_band: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64, header_band: f64) -> Self {
        Self {
            width,
            height,
            header_band,
        }
    }

    /// Clamp a frame's top-left so the rectangle stays inside the viewport
    /// below the header band. When the frame is larger than the space
    /// available, the left/top bounds win over the right/bottom fit.
    pub fn constrain(&self, position: Point, size: Size) -> Point {
        let max_x = self.width - size.width;
        let max_y = self.height - size.height;
        let x = if position.x.is_finite() { position.x } else { 0.0 };
        let y = if position.y.is_finite() {
            position.y
        } else {
            self.header_band
        };
        Point {
            x: x.min(max_x).max(0.0),
            y: y.min(max_y).max(self.header_band),
        }
    }

    /// Largest size a frame anchored at `position` may take without its far
    /// edges leaving the viewport.
    pub fn max_size_at(&self, position: Point) -> Size {
        Size {
            width: self.width - position.x,
            height: self.height - position.y,
        }
    }
}
