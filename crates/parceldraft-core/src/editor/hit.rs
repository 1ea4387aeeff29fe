//! Screen-space hit testing.
//!
//! All radii are in screen pixels, so hit targets keep a constant physical
//! size on screen regardless of zoom. Entities drawn later sit on top, so
//! the stacked tests (triangles, texts) iterate in reverse.

use crate::document::{Document, LineId, PointId, TextId, Triangle, TriangleId};
use crate::geometry;
use crate::transform::ViewTransform;
use kurbo::Point;

/// Hit radius around a point marker.
pub const POINT_HIT_RADIUS: f64 = 15.0;
/// Hit radius around a line's midpoint distance pill.
pub const PILL_HIT_RADIUS: f64 = 20.0;
/// Hit distance from a line segment.
pub const SEGMENT_HIT_DIST: f64 = 10.0;
/// Screen offset of the rotation handle above the selected triangle's
/// centroid.
pub const ROTATE_HANDLE_OFFSET: f64 = 40.0;
/// Screen offset of the scale handle below the centroid. Also the
/// reference distance for the scale gesture's factor.
pub const SCALE_HANDLE_OFFSET: f64 = 50.0;
/// Hit radius around either handle.
pub const HANDLE_HIT_RADIUS: f64 = 15.0;
/// Padding around a text label's bounding box.
const TEXT_HIT_PADDING: f64 = 10.0;
/// Approximate glyph advance as a fraction of the font size. The engine is
/// headless and cannot measure text, so the bounding box is an estimate.
const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// The two gesture handles shown for a selected triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Rotate,
    Scale,
}

/// Topmost point within [`POINT_HIT_RADIUS`] of the cursor.
pub fn hit_point(doc: &Document, view: &ViewTransform, screen: Point) -> Option<PointId> {
    doc.points
        .iter()
        .rev()
        .find(|p| view.world_to_screen(p.position).distance(screen) < POINT_HIT_RADIUS)
        .map(|p| p.id)
}

/// Line whose midpoint pill is under the cursor.
pub fn hit_line_pill(doc: &Document, view: &ViewTransform, screen: Point) -> Option<LineId> {
    doc.lines
        .iter()
        .find(|l| {
            let (Some(p1), Some(p2)) = (doc.position(l.p1), doc.position(l.p2)) else {
                return false;
            };
            let mid = geometry::midpoint(view.world_to_screen(p1), view.world_to_screen(p2));
            mid.distance(screen) < PILL_HIT_RADIUS
        })
        .map(|l| l.id)
}

/// Line whose segment passes within [`SEGMENT_HIT_DIST`] of the cursor.
pub fn hit_line_segment(doc: &Document, view: &ViewTransform, screen: Point) -> Option<LineId> {
    doc.lines
        .iter()
        .find(|l| {
            let (Some(p1), Some(p2)) = (doc.position(l.p1), doc.position(l.p2)) else {
                return false;
            };
            let d = geometry::point_to_segment_dist(
                screen,
                view.world_to_screen(p1),
                view.world_to_screen(p2),
            );
            d < SEGMENT_HIT_DIST
        })
        .map(|l| l.id)
}

/// Topmost triangle containing the cursor's world position.
pub fn hit_triangle(doc: &Document, view: &ViewTransform, screen: Point) -> Option<TriangleId> {
    let world = view.screen_to_world(screen);
    doc.triangles
        .iter()
        .rev()
        .find(|t| {
            doc.triangle_vertices(t)
                .is_some_and(|[a, b, c]| geometry::point_in_triangle(world, a, b, c))
        })
        .map(|t| t.id)
}

/// Topmost text label whose padded bounding box contains the cursor.
pub fn hit_text(doc: &Document, view: &ViewTransform, screen: Point) -> Option<TextId> {
    doc.texts
        .iter()
        .rev()
        .find(|t| {
            let anchor = view.world_to_screen(t.position);
            let half_width = t.content.chars().count() as f64 * t.size * TEXT_WIDTH_FACTOR / 2.0;
            screen.x >= anchor.x - half_width - TEXT_HIT_PADDING
                && screen.x <= anchor.x + half_width + TEXT_HIT_PADDING
                && screen.y >= anchor.y - t.size - TEXT_HIT_PADDING
                && screen.y <= anchor.y + TEXT_HIT_PADDING
        })
        .map(|t| t.id)
}

/// Rotation/scale handle of the given triangle under the cursor. The
/// handles sit at fixed screen offsets above and below the centroid.
pub fn hit_handle(
    doc: &Document,
    view: &ViewTransform,
    triangle: &Triangle,
    screen: Point,
) -> Option<Handle> {
    let centroid = doc.triangle_centroid(triangle)?;
    let c = view.world_to_screen(centroid);

    let rotate = Point::new(c.x, c.y - ROTATE_HANDLE_OFFSET);
    if rotate.distance(screen) < HANDLE_HIT_RADIUS {
        return Some(Handle::Rotate);
    }
    let scale = Point::new(c.x, c.y + SCALE_HANDLE_OFFSET);
    if scale.distance(screen) < HANDLE_HIT_RADIUS {
        return Some(Handle::Scale);
    }
    None
}
