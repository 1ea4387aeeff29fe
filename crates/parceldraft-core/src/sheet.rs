//! Drafting sheet modes and boundary clamping.
//!
//! A bounded sheet is a fixed paper size in meters, centered on the world
//! origin. Points are clamped to stay on the sheet; the unbounded mode never
//! clamps.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Drafting sheet size, in world meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SheetMode {
    /// Unbounded plane; no clamping.
    #[default]
    Infinite,
    /// 21 x 29.7 m.
    A4Portrait,
    /// 29.7 x 21 m.
    A4Landscape,
    /// 10.5 x 14.8 m.
    A6Portrait,
    /// 14.8 x 10.5 m.
    A6Landscape,
}

impl SheetMode {
    /// Physical dimensions of the sheet, or `None` when unbounded.
    pub fn dimensions(self) -> Option<Size> {
        match self {
            SheetMode::Infinite => None,
            SheetMode::A4Portrait => Some(Size::new(21.0, 29.7)),
            SheetMode::A4Landscape => Some(Size::new(29.7, 21.0)),
            SheetMode::A6Portrait => Some(Size::new(10.5, 14.8)),
            SheetMode::A6Landscape => Some(Size::new(14.8, 10.5)),
        }
    }

    /// Whether the sheet has a boundary.
    pub fn is_bounded(self) -> bool {
        !matches!(self, SheetMode::Infinite)
    }

    /// Geometric center of the sheet. Sheets are origin-centered, so this
    /// is the world origin in every mode; it is the pivot for global
    /// rotation.
    pub fn center(self) -> Point {
        Point::ZERO
    }

    /// Clamp each axis of `p` independently to the sheet rectangle.
    /// Identity when unbounded.
    pub fn clamp(self, p: Point) -> Point {
        match self.dimensions() {
            None => p,
            Some(size) => Point::new(
                p.x.clamp(-size.width / 2.0, size.width / 2.0),
                p.y.clamp(-size.height / 2.0, size.height / 2.0),
            ),
        }
    }

    /// Clamp `to` against the sheet boundary along the ray `from -> to`.
    ///
    /// Unlike [`SheetMode::clamp`], this preserves the direction of the
    /// ray: when `to` falls outside the sheet the result is the point where
    /// the ray crosses the boundary. Host-facing: for placing a point a
    /// given heading away from another while staying on the sheet. The
    /// editor's own placement paths clamp per-axis.
    pub fn clamp_along(self, from: Point, to: Point) -> Point {
        let Some(size) = self.dimensions() else {
            return to;
        };

        let x_max = size.width / 2.0;
        let y_max = size.height / 2.0;
        if to.x >= -x_max && to.x <= x_max && to.y >= -y_max && to.y <= y_max {
            return to;
        }

        let dx = to.x - from.x;
        let dy = to.y - from.y;

        let mut t = f64::INFINITY;
        if dx > 0.0 {
            t = t.min((x_max - from.x) / dx);
        } else if dx < 0.0 {
            t = t.min((-x_max - from.x) / dx);
        }
        if dy > 0.0 {
            t = t.min((y_max - from.y) / dy);
        } else if dy < 0.0 {
            t = t.min((-y_max - from.y) / dy);
        }

        Point::new(from.x + t * dx, from.y + t * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_never_clamps() {
        let p = Point::new(1e6, -1e6);
        assert_eq!(SheetMode::Infinite.clamp(p), p);
        assert_eq!(SheetMode::Infinite.clamp_along(Point::ZERO, p), p);
    }

    #[test]
    fn test_landscape_is_transposed_portrait() {
        let portrait = SheetMode::A4Portrait.dimensions().unwrap();
        let landscape = SheetMode::A4Landscape.dimensions().unwrap();
        assert_eq!(portrait.width, landscape.height);
        assert_eq!(portrait.height, landscape.width);
    }

    #[test]
    fn test_clamp_per_axis() {
        // A4 portrait: x in [-10.5, 10.5], y in [-14.85, 14.85].
        let p = SheetMode::A4Portrait.clamp(Point::new(50.0, -3.0));
        assert!((p.x - 10.5).abs() < 1e-12);
        assert!((p.y + 3.0).abs() < 1e-12);

        let p = SheetMode::A4Portrait.clamp(Point::new(-50.0, 100.0));
        assert!((p.x + 10.5).abs() < 1e-12);
        assert!((p.y - 14.85).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let p = Point::new(3.0, -4.0);
        assert_eq!(SheetMode::A6Portrait.clamp(p), p);
    }

    #[test]
    fn test_clamp_along_hits_boundary() {
        // Ray from origin heading due east on A4 portrait stops at x = 10.5.
        let hit = SheetMode::A4Portrait.clamp_along(Point::ZERO, Point::new(100.0, 0.0));
        assert!((hit.x - 10.5).abs() < 1e-12);
        assert!(hit.y.abs() < 1e-12);

        // Diagonal ray keeps its direction.
        let hit = SheetMode::A4Portrait.clamp_along(Point::ZERO, Point::new(21.0, 21.0));
        assert!((hit.x - hit.y).abs() < 1e-12);
        assert!(hit.x <= 10.5 + 1e-12);
    }

    #[test]
    fn test_center_is_origin() {
        assert_eq!(SheetMode::Infinite.center(), Point::ZERO);
        assert_eq!(SheetMode::A6Landscape.center(), Point::ZERO);
    }
}
