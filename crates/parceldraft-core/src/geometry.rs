//! Pure geometry kernel: areas, distances, rotation, SSS solving.
//!
//! All functions operate on world coordinates (meters, Cartesian, Y-up)
//! and have no access to the document.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid pitch for snapping, in meters.
pub const GRID_STEP: f64 = 1.0;

/// Area slack for the barycentric point-in-triangle test, in square meters.
pub const AREA_EPSILON: f64 = 0.01;

/// Errors from geometric construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The given side lengths cannot form a triangle on the given base edge.
    #[error("side lengths cannot form a triangle")]
    InvalidTriangle,
}

/// Which of the two mirror-image SSS solutions to take, relative to the
/// base edge `p1 -> p2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    /// Vertex on the counter-clockwise side of the base edge.
    #[default]
    Ccw,
    /// Vertex on the clockwise side (mirror solution).
    Cw,
}

impl Handedness {
    /// Derive the handedness of `vertex` relative to the edge `p1 -> p2`
    /// from the sign of the cross product.
    pub fn of_vertex(p1: Point, p2: Point, vertex: Point) -> Self {
        let cross = (p2.x - p1.x) * (vertex.y - p1.y) - (p2.y - p1.y) * (vertex.x - p1.x);
        if cross >= 0.0 { Self::Ccw } else { Self::Cw }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Ccw => 1.0,
            Self::Cw => -1.0,
        }
    }
}

/// Unsigned triangle area via the shoelace formula.
///
/// Zero iff the three points are collinear (coincident included).
pub fn triangle_area(p1: Point, p2: Point, p3: Point) -> f64 {
    (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y)).abs() / 2.0
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Midpoint of a segment.
pub fn midpoint(p1: Point, p2: Point) -> Point {
    Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// Rotate `p` about `pivot` by `angle_degrees`, counter-clockwise positive
/// in world space.
pub fn rotate_about(p: Point, pivot: Point, angle_degrees: f64) -> Point {
    let rad = angle_degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// Solve for the third vertex of a triangle given the base edge `p1 -> p2`
/// and the remaining side lengths `b = |p1 vertex|`, `c = |p2 vertex|`.
///
/// Fails when the base edge is degenerate or the triangle inequality is
/// violated (`b + c < a` or `|b - c| > a`). `handedness` picks one of the
/// two mirror solutions, which keeps re-solving an existing triangle
/// orientation-stable.
pub fn sss_vertex(
    p1: Point,
    p2: Point,
    b: f64,
    c: f64,
    handedness: Handedness,
) -> Result<Point, GeometryError> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let a = (dx * dx + dy * dy).sqrt();

    if a == 0.0 || b + c < a || (b - c).abs() > a {
        return Err(GeometryError::InvalidTriangle);
    }

    // Law of cosines for the angle at p1, clamped against rounding.
    let cos_a = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    let sin_a = (1.0 - cos_a * cos_a).max(0.0).sqrt();

    let ux = dx / a;
    let uy = dy / a;
    let side = handedness.sign();

    Ok(Point::new(
        p1.x + b * (ux * cos_a - uy * sin_a * side),
        p1.y + b * (ux * sin_a * side + uy * cos_a),
    ))
}

/// Barycentric containment test: `p` is inside (or on the boundary of) the
/// triangle iff the three sub-areas sum to the outer area.
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let outer = triangle_area(a, b, c);
    let a1 = triangle_area(p, b, c);
    let a2 = triangle_area(a, p, c);
    let a3 = triangle_area(a, b, p);
    (outer - (a1 + a2 + a3)).abs() < AREA_EPSILON
}

/// Snap a world point to the nearest grid intersection.
pub fn snap_to_grid(p: Point) -> Point {
    Point::new(
        (p.x / GRID_STEP).round() * GRID_STEP,
        (p.y / GRID_STEP).round() * GRID_STEP,
    )
}

/// Distance from a point to a line segment `a -> b`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    distance(point, proj)
}
