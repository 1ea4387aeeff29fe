//! World/screen coordinate transform.
//!
//! World coordinates are meters, Cartesian, Y-up; screen coordinates are
//! pixels, Y-down, with the world origin mapped to the viewport center when
//! the pan offset is zero.

use kurbo::{Point, Size, Vec2};

/// Minimum zoom scale (pixels per meter).
pub const MIN_SCALE: f64 = 5.0;
/// Maximum zoom scale (pixels per meter).
pub const MAX_SCALE: f64 = 1000.0;

/// Clamp a zoom scale to the allowed range.
///
/// Only the zoom operators clamp; the transform itself accepts any
/// non-zero scale.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// A snapshot of the view parameters used to map between world and screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Pan offset in world meters.
    pub offset: Vec2,
    /// Zoom scale in pixels per meter.
    pub scale: f64,
    /// Viewport size in pixels.
    pub viewport: Size,
}

impl ViewTransform {
    /// Create a view transform from explicit parameters.
    pub fn new(offset: Vec2, scale: f64, viewport: Size) -> Self {
        Self {
            offset,
            scale,
            viewport,
        }
    }

    /// Map a world point to screen pixels (Y flips).
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            self.viewport.width / 2.0 + (world.x + self.offset.x) * self.scale,
            self.viewport.height / 2.0 - (world.y + self.offset.y) * self.scale,
        )
    }

    /// Map a screen point back to world meters. Exact algebraic inverse of
    /// [`ViewTransform::world_to_screen`].
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.viewport.width / 2.0) / self.scale - self.offset.x,
            (self.viewport.height / 2.0 - screen.y) / self.scale - self.offset.y,
        )
    }
}
