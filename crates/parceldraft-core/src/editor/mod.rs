//! Edit operations: the per-tool pointer protocol, pending prompts, and
//! gestures.
//!
//! The editor owns the document history. Every operation reads the current
//! snapshot, builds a new one, and hands it back as either a preview
//! (`replace`, used for every intermediate frame of a gesture and for pure
//! view-state changes) or a commit (`push`, one undoable step). Pointer
//! coordinates arriving from the host are screen pixels; everything stored
//! in the document is world meters.

pub mod hit;

use crate::document::{
    Document, LineId, PointId, Selection, TextId, TextLabel, Triangle, TriangleId,
};
use crate::geometry::{self, GeometryError, Handedness};
use crate::history::History;
use crate::tools::{ToolKind, ToolState};
use crate::transform::{ViewTransform, clamp_scale};
use hit::{Handle, SCALE_HANDLE_OFFSET};
use kurbo::{Point, Size, Vec2};
use log::warn;
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// Zoom factor per wheel notch.
const WHEEL_ZOOM_FACTOR: f64 = 1.1;
/// Zoom factor for the discrete zoom buttons.
const BUTTON_ZOOM_FACTOR: f64 = 1.2;

/// Errors surfaced by edit operations. None of these mutate the document.
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A prompt value was non-finite or out of range.
    #[error("input must be a positive finite number")]
    InvalidInput,
    /// A zero-length line cannot be used as a rescale basis.
    #[error("line has zero length")]
    DegenerateEdge,
}

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Middle button pans regardless of the active tool.
    Middle,
}

/// Target of a pending rotation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationTarget {
    /// Rotate one triangle about its centroid.
    Triangle(TriangleId),
    /// Rotate every point about the sheet center.
    Global,
}

/// A pending modal prompt awaiting user input.
///
/// Opening a prompt never mutates the document; only the matching
/// `apply_*` call does. Cancelling (or invalid input) discards the prompt
/// with no snapshot change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prompt {
    /// Place a point at an exact distance from `anchor` along a fixed
    /// direction (radians, world space). With the LINE tool active the
    /// commit also connects the two points.
    PrecisionLength { anchor: PointId, angle: f64 },
    /// Two side lengths for an SSS construction over the picked base edge.
    SideLengths { p1: PointId, p2: PointId },
    /// All three side lengths of a triangle. `p2`/`p3` are `None` when the
    /// construction starts from a single anchor; `defaults` prefill the
    /// inputs when re-editing an existing triangle.
    TriangleSides {
        p1: PointId,
        p2: Option<PointId>,
        p3: Option<PointId>,
        defaults: Option<[f64; 3]>,
    },
    /// Rescale a line to an exact length. `current` prefills the input.
    LineLength { line: LineId, current: f64 },
    /// Rotation angle in degrees for the given target.
    Rotation { target: RotationTarget },
    /// Text content for a label anchored at the clicked world position.
    Text { position: Point },
}

/// An in-flight pointer gesture between down and up.
#[derive(Debug, Clone)]
enum Gesture {
    Pan { last_screen: Point },
    DragPoint { point: PointId },
    /// Handle rotation; `initial` captures the vertex positions at gesture
    /// start so each frame rotates the originals, never compounding.
    RotateTriangle {
        center: Point,
        initial: Vec<(PointId, Point)>,
    },
    ScaleTriangle {
        center: Point,
        initial: Vec<(PointId, Point)>,
    },
}

enum SelectAction {
    StartHandle(Handle, Point, Vec<(PointId, Point)>),
    OpenTriangleSides(TriangleId),
    OpenLineLength(LineId, f64),
    PickPoint(PointId),
    PickTriangle(TriangleId),
    PickText(TextId),
    Clear,
}

/// The drafting editor: document history plus transient interaction state.
///
/// Transient state (tool accumulation, prompts, gestures) never enters the
/// undo history.
pub struct Editor {
    history: History<Document>,
    viewport: Size,
    tool_state: ToolState,
    prompt: Option<Prompt>,
    gesture: Option<Gesture>,
}

impl Editor {
    /// Create an editor over an empty document.
    pub fn new(viewport: Size) -> Self {
        Self::with_document(Document::new(), viewport)
    }

    /// Create an editor over an existing document.
    pub fn with_document(document: Document, viewport: Size) -> Self {
        Self {
            history: History::new(document),
            viewport,
            tool_state: ToolState::Idle,
            prompt: None,
            gesture: None,
        }
    }

    /// The current document snapshot.
    pub fn document(&self) -> &Document {
        self.history.current()
    }

    /// The pending prompt, if any.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Point ids held by an in-progress tool interaction.
    pub fn pending_points(&self) -> Vec<PointId> {
        self.tool_state.pending_points()
    }

    /// Whether a pointer gesture is in flight.
    pub fn gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// The transform mapping the current view state onto the viewport.
    pub fn view_transform(&self) -> ViewTransform {
        self.document().view(self.viewport)
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    // --- snapshot plumbing -------------------------------------------------

    fn preview(&mut self, f: impl FnOnce(&mut Document)) {
        let mut doc = self.history.current().clone();
        f(&mut doc);
        self.history.replace(doc);
    }

    fn commit(&mut self, f: impl FnOnce(&mut Document)) {
        let mut doc = self.history.current().clone();
        f(&mut doc);
        self.history.push(doc);
    }

    // --- pointer protocol --------------------------------------------------

    /// Handle a pointer press. Dispatches on the active tool; the middle
    /// button starts a pan in any tool. Ignored while a prompt is open.
    pub fn pointer_down(&mut self, screen: Point, button: PointerButton) {
        if self.prompt.is_some() {
            return;
        }
        if button == PointerButton::Middle || self.document().active_tool == ToolKind::Pan {
            self.gesture = Some(Gesture::Pan {
                last_screen: screen,
            });
            return;
        }
        match self.document().active_tool {
            ToolKind::Select => self.select_down(screen),
            ToolKind::Point | ToolKind::Line => self.point_line_down(screen),
            ToolKind::Triangle => self.triangle_down(screen),
            ToolKind::SssTriangle => self.sss_down(screen),
            ToolKind::Text => {
                let position = self.view_transform().screen_to_world(screen);
                self.prompt = Some(Prompt::Text { position });
            }
            ToolKind::Eraser => self.eraser_down(screen),
            ToolKind::Pan => {}
        }
    }

    /// Handle pointer movement; only meaningful while a gesture is active.
    /// Every frame is a preview replacement, never an undo step.
    pub fn pointer_move(&mut self, screen: Point) {
        let Some(gesture) = self.gesture.clone() else {
            return;
        };
        match gesture {
            Gesture::Pan { last_screen } => {
                let scale = self.document().scale;
                let delta = Vec2::new(
                    (screen.x - last_screen.x) / scale,
                    -(screen.y - last_screen.y) / scale,
                );
                self.preview(|doc| doc.offset += delta);
                self.gesture = Some(Gesture::Pan {
                    last_screen: screen,
                });
            }
            Gesture::DragPoint { point } => {
                let mut world = self.view_transform().screen_to_world(screen);
                if self.document().snap_to_grid {
                    world = geometry::snap_to_grid(world);
                }
                self.preview(|doc| {
                    if let Some(p) = doc.point_mut(point) {
                        p.position = world;
                        doc.refresh_areas_touching(point);
                    }
                });
            }
            Gesture::RotateTriangle { center, initial } => {
                let c = self.view_transform().world_to_screen(center);
                // Angle measured from the handle's "up" rest direction.
                let delta = (screen.y - c.y).atan2(screen.x - c.x) + FRAC_PI_2;
                let degrees = delta.to_degrees();
                self.preview(|doc| {
                    for &(pid, pos) in &initial {
                        if let Some(p) = doc.point_mut(pid) {
                            p.position = geometry::rotate_about(pos, center, degrees);
                        }
                    }
                    for &(pid, _) in &initial {
                        doc.refresh_areas_touching(pid);
                    }
                });
            }
            Gesture::ScaleTriangle { center, initial } => {
                let c = self.view_transform().world_to_screen(center);
                let factor = c.distance(screen) / SCALE_HANDLE_OFFSET;
                self.preview(|doc| {
                    for &(pid, pos) in &initial {
                        if let Some(p) = doc.point_mut(pid) {
                            p.position = Point::new(
                                center.x + (pos.x - center.x) * factor,
                                center.y + (pos.y - center.y) * factor,
                            );
                        }
                    }
                    for &(pid, _) in &initial {
                        doc.refresh_areas_touching(pid);
                    }
                });
            }
        }
    }

    /// Handle pointer release. Mutating gestures commit exactly one undo
    /// step regardless of how many preview frames they produced; a pan
    /// remains a pure view change.
    pub fn pointer_up(&mut self) {
        match self.gesture.take() {
            Some(Gesture::DragPoint { .. })
            | Some(Gesture::RotateTriangle { .. })
            | Some(Gesture::ScaleTriangle { .. }) => {
                let doc = self.history.current().clone();
                self.history.push(doc);
            }
            Some(Gesture::Pan { .. }) | None => {}
        }
    }

    /// Wheel zoom toward/away, clamped. A view change, never an undo step.
    pub fn wheel_zoom(&mut self, delta_y: f64) {
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        self.preview(|doc| doc.scale = clamp_scale(doc.scale * factor));
    }

    pub fn zoom_in(&mut self) {
        self.preview(|doc| doc.scale = clamp_scale(doc.scale * BUTTON_ZOOM_FACTOR));
    }

    pub fn zoom_out(&mut self) {
        self.preview(|doc| doc.scale = clamp_scale(doc.scale / BUTTON_ZOOM_FACTOR));
    }

    // --- tool dispatch -----------------------------------------------------

    fn select_down(&mut self, screen: Point) {
        let view = self.view_transform();
        let action = {
            let doc = self.document();

            let handle = match doc.selection {
                Selection::Triangle(tid) => doc.triangle(tid).and_then(|t| {
                    let handle = hit::hit_handle(doc, &view, t, screen)?;
                    let center = doc.triangle_centroid(t)?;
                    let initial = t
                        .points
                        .iter()
                        .filter_map(|&pid| doc.position(pid).map(|p| (pid, p)))
                        .collect();
                    Some(SelectAction::StartHandle(handle, center, initial))
                }),
                _ => None,
            };

            if let Some(action) = handle {
                action
            } else if let Some(line_id) = hit::hit_line_pill(doc, &view, screen) {
                let parent = doc.line(line_id).and_then(|l| {
                    doc.triangles
                        .iter()
                        .find(|t| t.contains(l.p1) && t.contains(l.p2))
                        .map(|t| t.id)
                });
                match parent {
                    Some(tid) => SelectAction::OpenTriangleSides(tid),
                    None => {
                        let current = doc
                            .line(line_id)
                            .and_then(|l| Some((doc.position(l.p1)?, doc.position(l.p2)?)))
                            .map(|(a, b)| geometry::distance(a, b))
                            .unwrap_or(0.0);
                        SelectAction::OpenLineLength(line_id, current)
                    }
                }
            } else if let Some(pid) = hit::hit_point(doc, &view, screen) {
                SelectAction::PickPoint(pid)
            } else if let Some(tid) = hit::hit_triangle(doc, &view, screen) {
                SelectAction::PickTriangle(tid)
            } else if let Some(tid) = hit::hit_text(doc, &view, screen) {
                SelectAction::PickText(tid)
            } else {
                SelectAction::Clear
            }
        };

        match action {
            SelectAction::StartHandle(handle, center, initial) => {
                self.gesture = Some(match handle {
                    Handle::Rotate => Gesture::RotateTriangle { center, initial },
                    Handle::Scale => Gesture::ScaleTriangle { center, initial },
                });
            }
            SelectAction::OpenTriangleSides(tid) => self.open_triangle_sides(tid),
            SelectAction::OpenLineLength(line, current) => {
                self.prompt = Some(Prompt::LineLength { line, current });
            }
            SelectAction::PickPoint(pid) => {
                self.preview(|doc| doc.selection = Selection::Point(pid));
                self.gesture = Some(Gesture::DragPoint { point: pid });
            }
            SelectAction::PickTriangle(tid) => {
                self.preview(|doc| doc.selection = Selection::Triangle(tid));
            }
            SelectAction::PickText(tid) => {
                self.preview(|doc| doc.selection = Selection::Text(tid));
            }
            SelectAction::Clear => {
                self.preview(|doc| doc.selection = Selection::None);
            }
        }
    }

    fn point_line_down(&mut self, screen: Point) {
        let view = self.view_transform();
        let world = view.screen_to_world(screen);
        let clicked = hit::hit_point(self.document(), &view, screen);
        let tool = self.document().active_tool;

        if let ToolState::Anchored { anchor } = self.tool_state {
            match clicked {
                // Re-anchor on another point; with the LINE tool this
                // commits the connection instead.
                Some(pid) if tool == ToolKind::Line => {
                    if pid != anchor {
                        self.commit(|doc| doc.upsert_edge(anchor, pid));
                    }
                    self.tool_state = ToolState::Idle;
                }
                Some(pid) => self.tool_state = ToolState::Anchored { anchor: pid },
                None => {
                    let Some(base) = self.document().position(anchor) else {
                        warn!("precision anchor no longer exists; resetting tool state");
                        self.tool_state = ToolState::Idle;
                        return;
                    };
                    let angle = (world.y - base.y).atan2(world.x - base.x);
                    self.prompt = Some(Prompt::PrecisionLength { anchor, angle });
                    self.tool_state = ToolState::Idle;
                }
            }
            return;
        }

        match clicked {
            Some(pid) => self.tool_state = ToolState::Anchored { anchor: pid },
            None => {
                let position = self.place_position(world);
                let id = {
                    let mut doc = self.history.current().clone();
                    let id = doc.add_point_at(position);
                    self.history.push(doc);
                    id
                };
                if tool == ToolKind::Line {
                    self.tool_state = ToolState::Anchored { anchor: id };
                }
            }
        }
    }

    fn triangle_down(&mut self, screen: Point) {
        let view = self.view_transform();
        let mut picked = match std::mem::take(&mut self.tool_state) {
            ToolState::Accumulating { picked } => picked,
            _ => Vec::new(),
        };

        {
            let doc = self.document();
            if let Some(pid) = hit::hit_point(doc, &view, screen) {
                if !picked.contains(&pid) {
                    picked.push(pid);
                }
            } else if let Some(line_id) = hit::hit_line_segment(doc, &view, screen) {
                if let Some(line) = doc.line(line_id) {
                    for pid in [line.p1, line.p2] {
                        if !picked.contains(&pid) {
                            picked.push(pid);
                        }
                    }
                }
            } else {
                self.tool_state = ToolState::Accumulating { picked };
                return;
            }
        }

        if picked.len() >= 3 {
            picked.truncate(3);
            let defaults = self.side_defaults(picked[0], picked[1], picked[2]);
            self.prompt = Some(Prompt::TriangleSides {
                p1: picked[0],
                p2: Some(picked[1]),
                p3: Some(picked[2]),
                defaults,
            });
            self.tool_state = ToolState::Idle;
        } else if picked.len() == 2 {
            self.prompt = Some(Prompt::SideLengths {
                p1: picked[0],
                p2: picked[1],
            });
            // Keep the picks: a third click after cancelling upgrades the
            // construction to the three-side prompt.
            self.tool_state = ToolState::Accumulating { picked };
        } else {
            self.tool_state = ToolState::Accumulating { picked };
        }
    }

    fn sss_down(&mut self, screen: Point) {
        let view = self.view_transform();
        let world = view.screen_to_world(screen);
        let anchor = match hit::hit_point(self.document(), &view, screen) {
            Some(pid) => pid,
            None => {
                let mut doc = self.history.current().clone();
                let id = doc.add_point_at(world);
                self.history.push(doc);
                id
            }
        };
        self.prompt = Some(Prompt::TriangleSides {
            p1: anchor,
            p2: None,
            p3: None,
            defaults: None,
        });
        self.tool_state = ToolState::Idle;
    }

    fn eraser_down(&mut self, screen: Point) {
        let view = self.view_transform();
        let doc = self.document();
        if let Some(pid) = hit::hit_point(doc, &view, screen) {
            self.commit(|doc| doc.delete_point(pid));
        } else if let Some(tid) = hit::hit_triangle(doc, &view, screen) {
            self.commit(|doc| doc.delete_triangle(tid));
        } else if let Some(tid) = hit::hit_text(doc, &view, screen) {
            self.commit(|doc| doc.delete_text(tid));
        }
    }

    /// Clamp then snap a placement position according to the document's
    /// sheet mode and snapping flag.
    fn place_position(&self, world: Point) -> Point {
        let doc = self.document();
        let clamped = doc.sheet_mode.clamp(world);
        if doc.snap_to_grid {
            geometry::snap_to_grid(clamped)
        } else {
            clamped
        }
    }

    fn side_defaults(&self, p1: PointId, p2: PointId, p3: PointId) -> Option<[f64; 3]> {
        let doc = self.document();
        let (a, b, c) = (doc.position(p1)?, doc.position(p2)?, doc.position(p3)?);
        Some([
            geometry::distance(a, b),
            geometry::distance(a, c),
            geometry::distance(b, c),
        ])
    }

    /// Open the three-side prompt for an existing triangle, prefilled with
    /// its current side lengths.
    pub fn open_triangle_sides(&mut self, triangle: TriangleId) {
        let Some(t) = self.document().triangle(triangle) else {
            warn!("triangle to re-edit no longer exists");
            return;
        };
        let [p1, p2, p3] = t.points;
        let defaults = self.side_defaults(p1, p2, p3);
        self.prompt = Some(Prompt::TriangleSides {
            p1,
            p2: Some(p2),
            p3: Some(p3),
            defaults,
        });
    }

    /// Open a rotation prompt for a triangle or the whole drawing.
    pub fn open_rotation_prompt(&mut self, target: RotationTarget) {
        self.prompt = Some(Prompt::Rotation { target });
    }

    /// Discard the pending prompt without touching the document.
    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    // --- prompt commits ----------------------------------------------------

    /// Commit a precision-length placement: a new point at the prompt's
    /// fixed direction and the given distance from the anchor. With the
    /// LINE tool active the anchor and the new point are also connected.
    pub fn apply_precision_length(&mut self, length: f64) -> Result<(), EditError> {
        let Some(Prompt::PrecisionLength { anchor, angle }) = self.prompt else {
            return Ok(());
        };
        self.prompt = None;
        if !length.is_finite() || length <= 0.0 {
            return Err(EditError::InvalidInput);
        }
        let Some(base) = self.document().position(anchor) else {
            warn!("precision anchor no longer exists; dropping placement");
            return Ok(());
        };

        let position = Point::new(
            base.x + length * angle.cos(),
            base.y + length * angle.sin(),
        );
        let connect = self.document().active_tool == ToolKind::Line;
        self.commit(|doc| {
            let id = doc.add_point_at(position);
            if connect {
                doc.upsert_edge(anchor, id);
            }
        });
        Ok(())
    }

    /// Commit a two-side SSS construction over the picked base edge:
    /// solves the third vertex, then creates the vertex point, the
    /// triangle, and its boundary edges in one step.
    ///
    /// Rejected lengths keep the picked base, so clicking either base
    /// point reopens the prompt without re-picking.
    pub fn apply_side_lengths(&mut self, b: f64, c: f64) -> Result<(), EditError> {
        let Some(Prompt::SideLengths { p1, p2 }) = self.prompt else {
            return Ok(());
        };
        self.prompt = None;
        if !b.is_finite() || !c.is_finite() || b <= 0.0 || c <= 0.0 {
            return Err(EditError::InvalidInput);
        }
        let (Some(a1), Some(a2)) = (self.document().position(p1), self.document().position(p2))
        else {
            warn!("base edge points no longer exist; dropping construction");
            self.tool_state = ToolState::Idle;
            return Ok(());
        };

        let vertex = geometry::sss_vertex(a1, a2, b, c, Handedness::Ccw)?;
        let area = geometry::triangle_area(a1, a2, vertex);
        self.tool_state = ToolState::Idle;
        self.commit(|doc| {
            let v = doc.add_point_at(vertex);
            let name = doc.next_plot_name();
            doc.triangles.push(Triangle::new([p1, p2, v], name, area));
            for (x, y) in [(p1, p2), (p2, v), (v, p1)] {
                doc.upsert_edge(x, y);
            }
        });
        Ok(())
    }

    /// Commit a three-side triangle construction or re-edit.
    ///
    /// The base direction is taken from the existing second vertex when
    /// present (angle of `p1 -> p2`), and the stored handedness of an
    /// existing third vertex is preserved so re-solving never flips the
    /// triangle to the mirror solution. Missing vertices are created;
    /// existing ones are moved in place, keeping their labels and their
    /// references from other entities.
    pub fn apply_triangle_sides(&mut self, a: f64, b: f64, c: f64) -> Result<(), EditError> {
        let Some(Prompt::TriangleSides { p1, p2, p3, .. }) = self.prompt else {
            return Ok(());
        };
        self.prompt = None;
        self.tool_state = ToolState::Idle;
        if [a, b, c].iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(EditError::InvalidInput);
        }
        let Some(base) = self.document().position(p1) else {
            warn!("construction anchor no longer exists; dropping construction");
            return Ok(());
        };

        let doc = self.document();
        let angle = p2
            .and_then(|id| doc.position(id))
            .map(|pos| (pos.y - base.y).atan2(pos.x - base.x))
            .unwrap_or(0.0);
        let handedness = match (p2.and_then(|id| doc.position(id)), p3.and_then(|id| doc.position(id)))
        {
            (Some(second), Some(third)) => Handedness::of_vertex(base, second, third),
            _ => Handedness::Ccw,
        };

        let second = Point::new(base.x + a * angle.cos(), base.y + a * angle.sin());
        let third = geometry::sss_vertex(base, second, b, c, handedness)?;
        let area = geometry::triangle_area(base, second, third);

        self.commit(|doc| {
            let p2_id = move_or_create(doc, p2, second);
            let p3_id = move_or_create(doc, p3, third);

            if let Some(t) = doc
                .triangles
                .iter_mut()
                .find(|t| t.contains(p1) && t.contains(p2_id) && t.contains(p3_id))
            {
                t.points = [p1, p2_id, p3_id];
                t.area = area;
            } else {
                let name = doc.next_plot_name();
                doc.triangles
                    .push(Triangle::new([p1, p2_id, p3_id], name, area));
            }
            for (x, y) in [(p1, p2_id), (p2_id, p3_id), (p3_id, p1)] {
                doc.upsert_edge(x, y);
            }
            // Moved vertices may be shared with other triangles.
            doc.refresh_areas_touching(p2_id);
            doc.refresh_areas_touching(p3_id);
        });
        Ok(())
    }

    /// Commit a line rescale: moves the second endpoint along the edge
    /// direction so the length becomes exactly `new_length`.
    pub fn apply_line_length(&mut self, new_length: f64) -> Result<(), EditError> {
        let Some(Prompt::LineLength { line, .. }) = self.prompt else {
            return Ok(());
        };
        self.prompt = None;
        if !new_length.is_finite() || new_length <= 0.0 {
            return Err(EditError::InvalidInput);
        }
        let doc = self.document();
        let Some((target, a, b)) = doc
            .line(line)
            .and_then(|l| Some((l.p2, doc.position(l.p1)?, doc.position(l.p2)?)))
        else {
            warn!("line to rescale no longer exists; dropping edit");
            return Ok(());
        };

        let current = geometry::distance(a, b);
        if current == 0.0 {
            return Err(EditError::DegenerateEdge);
        }
        let ratio = new_length / current;
        let moved = Point::new(a.x + (b.x - a.x) * ratio, a.y + (b.y - a.y) * ratio);
        self.commit(|doc| {
            if let Some(p) = doc.point_mut(target) {
                p.position = moved;
                doc.refresh_areas_touching(target);
            }
        });
        Ok(())
    }

    /// Commit a rotation prompt. A triangle rotates about its centroid
    /// with the result clamped to the sheet; a global rotation pivots
    /// every point about the sheet center. Negative angles rotate
    /// clockwise.
    pub fn apply_rotation(&mut self, angle_degrees: f64) -> Result<(), EditError> {
        let Some(Prompt::Rotation { target }) = self.prompt else {
            return Ok(());
        };
        self.prompt = None;
        if !angle_degrees.is_finite() {
            return Err(EditError::InvalidInput);
        }

        match target {
            RotationTarget::Triangle(tid) => {
                let doc = self.document();
                let Some((vertices, center)) = doc
                    .triangle(tid)
                    .and_then(|t| Some((t.points, doc.triangle_centroid(t)?)))
                else {
                    warn!("triangle to rotate no longer exists; dropping edit");
                    return Ok(());
                };
                self.commit(|doc| {
                    for pid in vertices {
                        if let Some(pos) = doc.position(pid) {
                            let rotated = geometry::rotate_about(pos, center, angle_degrees);
                            let clamped = doc.sheet_mode.clamp(rotated);
                            if let Some(p) = doc.point_mut(pid) {
                                p.position = clamped;
                            }
                        }
                    }
                    for pid in vertices {
                        doc.refresh_areas_touching(pid);
                    }
                });
            }
            RotationTarget::Global => {
                if self.document().points.is_empty() {
                    return Ok(());
                }
                self.commit(|doc| {
                    let pivot = doc.sheet_mode.center();
                    for p in &mut doc.points {
                        p.position = geometry::rotate_about(p.position, pivot, angle_degrees);
                    }
                    doc.refresh_all_areas();
                });
            }
        }
        Ok(())
    }

    /// Commit a text prompt. Whitespace-only content cancels silently.
    pub fn apply_text(&mut self, content: &str) {
        let Some(Prompt::Text { position }) = self.prompt else {
            return;
        };
        self.prompt = None;
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        let label = TextLabel::new(position, content);
        self.commit(|doc| doc.texts.push(label));
    }

    // --- discrete commands -------------------------------------------------

    /// Scale a triangle about its centroid by a fixed factor (the sidebar's
    /// grow/shrink buttons). One undo step.
    pub fn scale_triangle(&mut self, triangle: TriangleId, factor: f64) -> Result<(), EditError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(EditError::InvalidInput);
        }
        let doc = self.document();
        let Some((vertices, center)) = doc
            .triangle(triangle)
            .and_then(|t| Some((t.points, doc.triangle_centroid(t)?)))
        else {
            warn!("triangle to scale no longer exists; dropping edit");
            return Ok(());
        };
        self.commit(|doc| {
            for pid in vertices {
                if let Some(p) = doc.point_mut(pid) {
                    p.position = Point::new(
                        center.x + (p.position.x - center.x) * factor,
                        center.y + (p.position.y - center.y) * factor,
                    );
                }
            }
            for pid in vertices {
                doc.refresh_areas_touching(pid);
            }
        });
        Ok(())
    }

    /// Switch tools, discarding any in-progress interaction. A view-state
    /// change, never an undo step.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool_state = ToolState::Idle;
        self.prompt = None;
        self.preview(|doc| doc.active_tool = tool);
    }

    pub fn toggle_grid(&mut self) {
        self.preview(|doc| doc.grid_visible = !doc.grid_visible);
    }

    pub fn toggle_snap(&mut self) {
        self.preview(|doc| doc.snap_to_grid = !doc.snap_to_grid);
    }

    pub fn set_sheet_mode(&mut self, mode: crate::sheet::SheetMode) {
        self.preview(|doc| doc.sheet_mode = mode);
    }

    // --- entity property edits (sidebar) ------------------------------------

    pub fn set_point_label(&mut self, id: PointId, label: impl Into<String>) {
        let label = label.into();
        if self.document().point(id).is_some() {
            self.commit(|doc| {
                if let Some(p) = doc.point_mut(id) {
                    p.label = label;
                }
            });
        }
    }

    pub fn set_point_color(&mut self, id: PointId, color: impl Into<String>) {
        let color = color.into();
        if self.document().point(id).is_some() {
            self.commit(|doc| {
                if let Some(p) = doc.point_mut(id) {
                    p.color = color;
                }
            });
        }
    }

    pub fn set_triangle_name(&mut self, id: TriangleId, name: impl Into<String>) {
        let name = name.into();
        if self.document().triangle(id).is_some() {
            self.commit(|doc| {
                if let Some(t) = doc.triangle_mut(id) {
                    t.name = name;
                }
            });
        }
    }

    pub fn set_triangle_fill(&mut self, id: TriangleId, color: impl Into<String>) {
        let color = color.into();
        if self.document().triangle(id).is_some() {
            self.commit(|doc| {
                if let Some(t) = doc.triangle_mut(id) {
                    t.fill_color = color;
                }
            });
        }
    }

    pub fn set_triangle_opacity(&mut self, id: TriangleId, opacity: f64) {
        if self.document().triangle(id).is_some() {
            self.commit(|doc| {
                if let Some(t) = doc.triangle_mut(id) {
                    t.opacity = opacity.clamp(0.0, 1.0);
                }
            });
        }
    }

    /// Delete a point with its cascade (sidebar delete button).
    pub fn delete_point(&mut self, id: PointId) {
        if self.document().point(id).is_some() {
            self.commit(|doc| doc.delete_point(id));
        }
    }

    pub fn delete_triangle(&mut self, id: TriangleId) {
        if self.document().triangle(id).is_some() {
            self.commit(|doc| doc.delete_triangle(id));
        }
    }

    pub fn delete_text(&mut self, id: TextId) {
        if self.document().text(id).is_some() {
            self.commit(|doc| doc.delete_text(id));
        }
    }

    // --- history -----------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the document with a loaded snapshot, as one undoable step.
    /// The selection is reset and any in-progress interaction dropped.
    pub fn load_document(&mut self, mut document: Document) {
        document.selection = Selection::None;
        self.tool_state = ToolState::Idle;
        self.prompt = None;
        self.gesture = None;
        self.history.push(document);
    }

    /// Reset to an empty document, as one undoable step.
    pub fn clear(&mut self) {
        self.tool_state = ToolState::Idle;
        self.prompt = None;
        self.gesture = None;
        self.history.push(Document::new());
    }
}

/// Move an existing point or create a fresh one at `position`. Existing
/// points keep their label and their references from lines and triangles.
fn move_or_create(doc: &mut Document, id: Option<PointId>, position: Point) -> PointId {
    if let Some(id) = id {
        if let Some(p) = doc.point_mut(id) {
            p.position = position;
            return id;
        }
    }
    doc.add_point_at(position)
}
