//! Document model: the entity graph of a survey drawing plus view state.
//!
//! All mutation of a [`Document`] goes through copy-on-write snapshots: an
//! edit operation clones the current snapshot, mutates the clone, and hands
//! it to the history as either a preview replacement or a committed push.

use crate::geometry;
use crate::sheet::SheetMode;
use crate::tools::ToolKind;
use crate::transform::ViewTransform;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for reference points.
pub type PointId = Uuid;
/// Unique identifier for lines.
pub type LineId = Uuid;
/// Unique identifier for triangles.
pub type TriangleId = Uuid;
/// Unique identifier for text labels.
pub type TextId = Uuid;

/// Default color for new reference points.
pub const DEFAULT_POINT_COLOR: &str = "#3b82f6";
/// Default color for new lines.
pub const DEFAULT_LINE_COLOR: &str = "#475569";
/// Default stroke thickness for new lines.
pub const DEFAULT_LINE_THICKNESS: f64 = 2.0;
/// Default fill color for new triangles.
pub const DEFAULT_FILL_COLOR: &str = "#3b82f6";
/// Default border color for new triangles.
pub const DEFAULT_BORDER_COLOR: &str = "#2563eb";
/// Default fill opacity for new triangles.
pub const DEFAULT_TRIANGLE_OPACITY: f64 = 0.25;
/// Default color for new text labels.
pub const DEFAULT_TEXT_COLOR: &str = "#0f172a";
/// Default size for new text labels, in screen pixels.
pub const DEFAULT_TEXT_SIZE: f64 = 24.0;
/// Default zoom scale, in pixels per meter.
pub const DEFAULT_SCALE: f64 = 40.0;

/// A surveyed reference point, in world meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefPoint {
    pub id: PointId,
    pub position: Point,
    pub label: String,
    pub color: String,
}

impl RefPoint {
    /// Create a new point with the default color.
    pub fn new(position: Point, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            label: label.into(),
            color: DEFAULT_POINT_COLOR.to_string(),
        }
    }
}

/// A line between two reference points.
///
/// Endpoints are non-owning references; deleting either endpoint deletes
/// the line. Degenerate (zero-length) lines are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub p1: PointId,
    pub p2: PointId,
    pub color: String,
    pub thickness: f64,
}

impl Line {
    /// Create a new line with default styling.
    pub fn new(p1: PointId, p2: PointId) -> Self {
        Self {
            id: Uuid::new_v4(),
            p1,
            p2,
            color: DEFAULT_LINE_COLOR.to_string(),
            thickness: DEFAULT_LINE_THICKNESS,
        }
    }

    /// Whether this line touches the given point.
    pub fn touches(&self, id: PointId) -> bool {
        self.p1 == id || self.p2 == id
    }

    /// Whether this line joins the given endpoint pair, in either order.
    pub fn joins(&self, a: PointId, b: PointId) -> bool {
        (self.p1 == a && self.p2 == b) || (self.p1 == b && self.p2 == a)
    }
}

/// A triangular parcel over three reference points.
///
/// `area` is a cached derived value; every vertex-moving operation must
/// recompute it through [`Document::refresh_areas_touching`] so it never
/// goes stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub id: TriangleId,
    pub points: [PointId; 3],
    pub name: String,
    pub fill_color: String,
    pub border_color: String,
    pub opacity: f64,
    pub area: f64,
}

impl Triangle {
    /// Create a new triangle with default styling.
    pub fn new(points: [PointId; 3], name: impl Into<String>, area: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            name: name.into(),
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            opacity: DEFAULT_TRIANGLE_OPACITY,
            area,
        }
    }

    /// Whether this triangle uses the given point as a vertex.
    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains(&id)
    }
}

/// A free-floating text annotation, anchored in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub id: TextId,
    pub position: Point,
    pub content: String,
    pub color: String,
    pub size: f64,
}

impl TextLabel {
    /// Create a new text label with default styling.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            color: DEFAULT_TEXT_COLOR.to_string(),
            size: DEFAULT_TEXT_SIZE,
        }
    }
}

/// The single selected entity, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Point(PointId),
    Line(LineId),
    Triangle(TriangleId),
    Text(TextId),
}

impl Selection {
    /// The selected entity id, if any.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Selection::None => None,
            Selection::Point(id)
            | Selection::Line(id)
            | Selection::Triangle(id)
            | Selection::Text(id) => Some(*id),
        }
    }

    /// Whether nothing is selected.
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// One complete snapshot of the drawing: entities, selection, and view
/// state. The unit of undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub points: Vec<RefPoint>,
    pub lines: Vec<Line>,
    pub triangles: Vec<Triangle>,
    pub texts: Vec<TextLabel>,
    pub selection: Selection,
    /// Pan offset in world meters.
    pub offset: Vec2,
    /// Zoom scale in pixels per meter.
    pub scale: f64,
    pub grid_visible: bool,
    pub snap_to_grid: bool,
    pub sheet_mode: SheetMode,
    pub active_tool: ToolKind,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with default view state.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            lines: Vec::new(),
            triangles: Vec::new(),
            texts: Vec::new(),
            selection: Selection::None,
            offset: Vec2::ZERO,
            scale: DEFAULT_SCALE,
            grid_visible: true,
            snap_to_grid: true,
            sheet_mode: SheetMode::default(),
            active_tool: ToolKind::default(),
        }
    }

    /// View transform for the current offset/scale and the given viewport.
    pub fn view(&self, viewport: Size) -> ViewTransform {
        ViewTransform::new(self.offset, self.scale, viewport)
    }

    // --- lookups -----------------------------------------------------------

    pub fn point(&self, id: PointId) -> Option<&RefPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut RefPoint> {
        self.points.iter_mut().find(|p| p.id == id)
    }

    /// Position of a point, if it still exists.
    pub fn position(&self, id: PointId) -> Option<Point> {
        self.point(id).map(|p| p.position)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn triangle(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.iter().find(|t| t.id == id)
    }

    pub fn triangle_mut(&mut self, id: TriangleId) -> Option<&mut Triangle> {
        self.triangles.iter_mut().find(|t| t.id == id)
    }

    pub fn text(&self, id: TextId) -> Option<&TextLabel> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn text_mut(&mut self, id: TextId) -> Option<&mut TextLabel> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    /// Vertex positions of a triangle, or `None` if any vertex dangles.
    pub fn triangle_vertices(&self, triangle: &Triangle) -> Option<[Point; 3]> {
        Some([
            self.position(triangle.points[0])?,
            self.position(triangle.points[1])?,
            self.position(triangle.points[2])?,
        ])
    }

    /// Centroid of a triangle, or `None` if any vertex dangles.
    pub fn triangle_centroid(&self, triangle: &Triangle) -> Option<Point> {
        let [a, b, c] = self.triangle_vertices(triangle)?;
        Some(Point::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
        ))
    }

    // --- creation ----------------------------------------------------------

    /// Label for the next point, following the `P1`, `P2`, ... convention.
    pub fn next_point_label(&self) -> String {
        format!("P{}", self.points.len() + 1)
    }

    /// Name for the next triangle, following the `Plot 1`, `Plot 2`, ...
    /// convention.
    pub fn next_plot_name(&self) -> String {
        format!("Plot {}", self.triangles.len() + 1)
    }

    /// Create a point at the given world position with an auto-generated
    /// label, and return its id.
    pub fn add_point_at(&mut self, position: Point) -> PointId {
        let point = RefPoint::new(position, self.next_point_label());
        let id = point.id;
        self.points.push(point);
        id
    }

    /// Whether a line already joins the two endpoints, in either order.
    pub fn has_edge(&self, a: PointId, b: PointId) -> bool {
        self.lines.iter().any(|l| l.joins(a, b))
    }

    /// Add a line between the endpoints unless one already exists.
    pub fn upsert_edge(&mut self, a: PointId, b: PointId) {
        if !self.has_edge(a, b) {
            self.lines.push(Line::new(a, b));
        }
    }

    // --- deletion (cascading) ----------------------------------------------

    /// Delete a point together with every line and triangle referencing it.
    /// Clears the selection if it pointed at any removed entity. One atomic
    /// snapshot transition.
    pub fn delete_point(&mut self, id: PointId) {
        let mut removed: Vec<Uuid> = vec![id];
        self.lines.retain(|l| {
            let keep = !l.touches(id);
            if !keep {
                removed.push(l.id);
            }
            keep
        });
        self.triangles.retain(|t| {
            let keep = !t.contains(id);
            if !keep {
                removed.push(t.id);
            }
            keep
        });
        self.points.retain(|p| p.id != id);

        if let Some(selected) = self.selection.id() {
            if removed.contains(&selected) {
                self.selection = Selection::None;
            }
        }
    }

    /// Delete a line; points are left in place.
    pub fn delete_line(&mut self, id: LineId) {
        self.lines.retain(|l| l.id != id);
        if self.selection == Selection::Line(id) {
            self.selection = Selection::None;
        }
    }

    /// Delete a triangle; its vertices and edges are left in place.
    pub fn delete_triangle(&mut self, id: TriangleId) {
        self.triangles.retain(|t| t.id != id);
        if self.selection == Selection::Triangle(id) {
            self.selection = Selection::None;
        }
    }

    /// Delete a text label.
    pub fn delete_text(&mut self, id: TextId) {
        self.texts.retain(|t| t.id != id);
        if self.selection == Selection::Text(id) {
            self.selection = Selection::None;
        }
    }

    // --- derived state -----------------------------------------------------

    /// Recompute the cached area of every triangle that uses the given
    /// point as a vertex. Must be called after any operation that moves the
    /// point, preview frames included.
    pub fn refresh_areas_touching(&mut self, id: PointId) {
        let mut areas: Vec<(TriangleId, f64)> = Vec::new();
        for t in &self.triangles {
            if t.contains(id) {
                if let Some([a, b, c]) = self.triangle_vertices(t) {
                    areas.push((t.id, geometry::triangle_area(a, b, c)));
                }
            }
        }
        for (tid, area) in areas {
            if let Some(t) = self.triangle_mut(tid) {
                t.area = area;
            }
        }
    }

    /// Recompute every cached triangle area.
    pub fn refresh_all_areas(&mut self) {
        let ids: Vec<TriangleId> = self.triangles.iter().map(|t| t.id).collect();
        for tid in ids {
            if let Some(t) = self.triangle(tid) {
                if let Some([a, b, c]) = self.triangle_vertices(t) {
                    let area = geometry::triangle_area(a, b, c);
                    if let Some(t) = self.triangle_mut(tid) {
                        t.area = area;
                    }
                }
            }
        }
    }

    /// Sum of all cached triangle areas, in square meters.
    pub fn total_area(&self) -> f64 {
        self.triangles.iter().map(|t| t.area).sum()
    }

    // --- serialization -----------------------------------------------------

    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode a snapshot from JSON. The selection is always reset so an
    /// imported document never points at stale UI state.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.selection = Selection::None;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_triangle() -> (Document, [PointId; 3], TriangleId) {
        let mut doc = Document::new();
        let a = doc.add_point_at(Point::new(0.0, 0.0));
        let b = doc.add_point_at(Point::new(4.0, 0.0));
        let c = doc.add_point_at(Point::new(0.0, 3.0));
        let pts = [a, b, c];
        let area = {
            let [pa, pb, pc] = [
                doc.position(a).unwrap(),
                doc.position(b).unwrap(),
                doc.position(c).unwrap(),
            ];
            geometry::triangle_area(pa, pb, pc)
        };
        let triangle = Triangle::new(pts, doc.next_plot_name(), area);
        let tid = triangle.id;
        doc.triangles.push(triangle);
        for (x, y) in [(a, b), (b, c), (c, a)] {
            doc.upsert_edge(x, y);
        }
        (doc, pts, tid)
    }

    #[test]
    fn test_point_labels_follow_count() {
        let mut doc = Document::new();
        doc.add_point_at(Point::ZERO);
        doc.add_point_at(Point::new(1.0, 0.0));
        assert_eq!(doc.points[0].label, "P1");
        assert_eq!(doc.points[1].label, "P2");
    }

    #[test]
    fn test_upsert_edge_skips_reversed_duplicate() {
        let mut doc = Document::new();
        let a = doc.add_point_at(Point::ZERO);
        let b = doc.add_point_at(Point::new(1.0, 0.0));
        doc.upsert_edge(a, b);
        doc.upsert_edge(b, a);
        assert_eq!(doc.lines.len(), 1);
    }

    #[test]
    fn test_delete_point_cascades() {
        let (mut doc, [a, ..], _) = doc_with_triangle();
        doc.selection = Selection::Point(a);
        doc.delete_point(a);

        assert!(doc.point(a).is_none());
        assert!(doc.triangles.is_empty());
        // Only the b-c edge survives.
        assert_eq!(doc.lines.len(), 1);
        assert!(doc.selection.is_none());
    }

    #[test]
    fn test_delete_point_clears_cascaded_selection() {
        let (mut doc, [a, ..], tid) = doc_with_triangle();
        doc.selection = Selection::Triangle(tid);
        doc.delete_point(a);
        assert!(doc.selection.is_none());
    }

    #[test]
    fn test_delete_point_keeps_unrelated_selection() {
        let (mut doc, [a, b, _], _) = doc_with_triangle();
        doc.delete_triangle(doc.triangles[0].id);
        doc.selection = Selection::Point(b);
        doc.delete_point(a);
        assert_eq!(doc.selection, Selection::Point(b));
    }

    #[test]
    fn test_refresh_areas_touching() {
        let (mut doc, [a, ..], tid) = doc_with_triangle();
        assert!((doc.triangle(tid).unwrap().area - 6.0).abs() < 1e-9);

        doc.point_mut(a).unwrap().position = Point::new(0.0, -3.0);
        doc.refresh_areas_touching(a);
        // Base 4 along x at y=0.., vertex moved: recompute exactly.
        let [pa, pb, pc] = doc.triangle_vertices(doc.triangle(tid).unwrap()).unwrap();
        let expected = geometry::triangle_area(pa, pb, pc);
        assert!((doc.triangle(tid).unwrap().area - expected).abs() < 1e-12);
    }

    #[test]
    fn test_total_area() {
        let (doc, _, _) = doc_with_triangle();
        assert!((doc.total_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_roundtrip_resets_selection() {
        let (mut doc, [a, ..], _) = doc_with_triangle();
        doc.selection = Selection::Point(a);

        let json = doc.to_json().unwrap();
        let loaded = Document::from_json(&json).unwrap();

        assert!(loaded.selection.is_none());
        assert_eq!(loaded.points.len(), doc.points.len());
        assert_eq!(loaded.triangles.len(), doc.triangles.len());
        assert_eq!(loaded.sheet_mode, doc.sheet_mode);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Document::from_json("not json").is_err());
        assert!(Document::from_json("{\"points\": 5}").is_err());
    }
}
