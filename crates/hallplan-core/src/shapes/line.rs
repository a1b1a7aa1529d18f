//! Line shape.

use super::{ShapeId, ShapeStyle, point_to_segment_dist};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line segment described by absolute model-space endpoints, never
/// relative to a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Rotation in degrees, normalized to [0, 360).
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            rotation_degrees: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end)
            <= tolerance + self.style.stroke_width / 2.0
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    /// Shift both endpoints by the delta; a moved line keeps its direction
    /// and length.
    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
