//! Selection set and manipulation handles.

use crate::scene::{ObjectId, Scene, SceneObject};
use crate::shapes::{MIN_SHAPE_SIZE, Shape, normalize_degrees};
use crate::table::TableKind;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;
/// Distance from object edge to the rotation handle, in model units.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Type of manipulation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for box-like objects (resize).
    Corner(Corner),
    /// Endpoint handle for lines (0 = start, 1 = end).
    Endpoint(usize),
    /// Rotation handle, positioned outside the object.
    Rotate,
}

/// A manipulation handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in model coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in model coordinates) hits this handle.
    /// `tolerance` should be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The current selection: empty, a single object, or an ordered group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    objects: Vec<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.objects
    }

    /// The sole selected object, if exactly one is selected.
    pub fn single(&self) -> Option<ObjectId> {
        if self.objects.len() == 1 {
            self.objects.first().copied()
        } else {
            None
        }
    }

    /// Replace the selection with a single object.
    pub fn set(&mut self, id: ObjectId) {
        self.objects.clear();
        self.objects.push(id);
    }

    /// Replace the selection with a group.
    pub fn set_all(&mut self, ids: Vec<ObjectId>) {
        self.objects = ids;
        self.objects.dedup();
    }

    pub fn add(&mut self, id: ObjectId) {
        if !self.objects.contains(&id) {
            self.objects.push(id);
        }
    }

    pub fn remove(&mut self, id: ObjectId) {
        self.objects.retain(|&o| o != id);
    }

    /// Add the object if absent, remove it if present (shift-click).
    pub fn toggle(&mut self, id: ObjectId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Drop references to objects no longer in the scene.
    pub fn prune(&mut self, scene: &Scene) {
        self.objects.retain(|&id| scene.contains(id));
    }
}

/// Corner handles plus a rotation handle for a bounding box, rotated by the
/// object's angle about its center.
fn corner_and_rotate_handles(bounds: Rect, rotation_degrees: f64, rotate: bool) -> Vec<Handle> {
    let center = bounds.center();
    let half_w = bounds.width() / 2.0;
    let half_h = bounds.height() / 2.0;
    let theta = rotation_degrees.to_radians();
    let (sin_r, cos_r) = theta.sin_cos();

    let rotate_point = |dx: f64, dy: f64| -> Point {
        Point::new(
            center.x + dx * cos_r - dy * sin_r,
            center.y + dx * sin_r + dy * cos_r,
        )
    };

    let mut handles = vec![
        Handle::new(rotate_point(-half_w, -half_h), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(rotate_point(half_w, -half_h), HandleKind::Corner(Corner::TopRight)),
        Handle::new(rotate_point(-half_w, half_h), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(rotate_point(half_w, half_h), HandleKind::Corner(Corner::BottomRight)),
    ];
    if rotate {
        handles.push(Handle::new(
            rotate_point(0.0, -half_h - ROTATE_HANDLE_OFFSET),
            HandleKind::Rotate,
        ));
    }
    handles
}

/// Get the manipulation handles for an object.
pub fn handles_for(scene: &Scene, id: ObjectId) -> Vec<Handle> {
    match id {
        ObjectId::Shape(sid) => {
            let Some(shape) = scene.shape(sid) else {
                return Vec::new();
            };
            match shape {
                Shape::Line(line) => vec![
                    Handle::new(line.start, HandleKind::Endpoint(0)),
                    Handle::new(line.end, HandleKind::Endpoint(1)),
                ],
                Shape::Rect(_) | Shape::Circle(_) | Shape::Text(_) | Shape::Path(_) => {
                    corner_and_rotate_handles(shape.bounds(), shape.rotation_degrees(), true)
                }
            }
        }
        ObjectId::Table(tid) => {
            let Some(table) = scene.table(tid) else {
                return Vec::new();
            };
            // Only rectangular tables rotate
            let rotate = table.kind == TableKind::Rectangle;
            corner_and_rotate_handles(table.bounds(), table.rotation_degrees, rotate)
        }
    }
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(scene: &Scene, id: ObjectId, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(scene, id)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Resize a bounding box by dragging one of its corners, normalizing a
/// crossed-over drag and enforcing a minimum side length.
pub fn resize_bounds(bounds: Rect, corner: Corner, delta: Vec2, min_size: f64) -> Rect {
    let (new_x0, new_y0, new_x1, new_y1) = match corner {
        Corner::TopLeft => (bounds.x0 + delta.x, bounds.y0 + delta.y, bounds.x1, bounds.y1),
        Corner::TopRight => (bounds.x0, bounds.y0 + delta.y, bounds.x1 + delta.x, bounds.y1),
        Corner::BottomLeft => (bounds.x0 + delta.x, bounds.y0, bounds.x1, bounds.y1 + delta.y),
        Corner::BottomRight => (bounds.x0, bounds.y0, bounds.x1 + delta.x, bounds.y1 + delta.y),
    };

    let (x0, x1) = if new_x0 < new_x1 { (new_x0, new_x1) } else { (new_x1, new_x0) };
    let (y0, y1) = if new_y0 < new_y1 { (new_y0, new_y1) } else { (new_y1, new_y0) };

    Rect::new(x0, y0, x0 + (x1 - x0).max(min_size), y0 + (y1 - y0).max(min_size))
}

/// Apply a corner-resize to an object, computed fresh from the gesture's
/// original snapshot so repeated drag updates never compound.
///
/// The scale is folded into width/height/radius/font size/points
/// immediately; no transient scale factor survives the call.
pub fn apply_resize(original: &SceneObject, corner: Corner, delta: Vec2) -> SceneObject {
    let mut object = original.clone();
    match &mut object {
        SceneObject::Shape(shape) => match shape {
            Shape::Rect(rect) => {
                let new_bounds = resize_bounds(rect.bounds(), corner, delta, MIN_SHAPE_SIZE);
                rect.position = Point::new(new_bounds.x0, new_bounds.y0);
                rect.width = new_bounds.width();
                rect.height = new_bounds.height();
            }
            Shape::Circle(circle) => {
                let new_bounds =
                    resize_bounds(circle.bounds(), corner, delta, MIN_SHAPE_SIZE * 2.0);
                circle.center = new_bounds.center();
                circle.radius = (new_bounds.width().min(new_bounds.height()) / 2.0)
                    .max(MIN_SHAPE_SIZE);
            }
            Shape::Text(text) => {
                let old_bounds = text.bounds();
                let new_bounds = resize_bounds(old_bounds, corner, delta, MIN_SHAPE_SIZE);
                text.scale_font(new_bounds.width() / old_bounds.width().max(1.0));
                text.position = Point::new(new_bounds.x0, new_bounds.y0);
            }
            Shape::Path(path) => {
                let new_bounds = resize_bounds(path.bounds(), corner, delta, MIN_SHAPE_SIZE);
                path.scale_into(new_bounds);
            }
            // Lines resize through endpoint handles, not corners
            Shape::Line(_) => {}
        },
        SceneObject::Table(table) => {
            let new_bounds =
                resize_bounds(table.bounds(), corner, delta, crate::table::MIN_TABLE_SIZE);
            table.position = new_bounds.center();
            table.set_size(new_bounds.width(), new_bounds.height());
        }
    }
    object
}

/// Move a line endpoint, computed fresh from the gesture's original
/// snapshot.
pub fn apply_endpoint_move(original: &SceneObject, endpoint: usize, delta: Vec2) -> SceneObject {
    let mut object = original.clone();
    if let SceneObject::Shape(Shape::Line(line)) = &mut object {
        if endpoint == 0 {
            line.start += delta;
        } else {
            line.end += delta;
        }
    }
    object
}

/// Rotation angle (degrees, normalized) implied by a cursor position
/// relative to an object center. 0° points up; Shift snaps to 15° steps.
pub fn rotation_from_cursor(center: Point, cursor: Point, snap_to_15deg: bool) -> f64 {
    let dx = cursor.x - center.x;
    let dy = cursor.y - center.y;
    let mut degrees = dy.atan2(dx).to_degrees() + 90.0; // offset so 0° is up
    if snap_to_15deg {
        degrees = (degrees / 15.0).round() * 15.0;
    }
    normalize_degrees(degrees)
}

/// Set an object's rotation. Round tables ignore rotation; all rotation is
/// about the object's center, so the visual center is fixed by
/// construction and anchors never need recomputing.
pub fn apply_rotation(object: &mut SceneObject, degrees: f64) {
    match object {
        SceneObject::Shape(shape) => shape.set_rotation_degrees(degrees),
        SceneObject::Table(table) => {
            if table.kind == TableKind::Rectangle {
                table.rotation_degrees = normalize_degrees(degrees);
            }
        }
    }
}

/// Helper used by rotation gestures: center of an object.
pub fn object_center(object: &SceneObject) -> Point {
    match object {
        SceneObject::Shape(shape) => shape.bounds().center(),
        SceneObject::Table(table) => table.position,
    }
}
