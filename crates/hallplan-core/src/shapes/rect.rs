//! Rectangle shape.

use super::{MIN_SHAPE_SIZE, ShapeId, ShapeStyle};
use kurbo::{BezPath, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle, optionally rendered rotated about its center.
///
/// Anchored at its top-left corner in model space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle (>= 1 after any edit).
    pub width: f64,
    /// Height of the rectangle (>= 1 after any edit).
    pub height: f64,
    /// Rotation in degrees about the center, normalized to [0, 360).
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation_degrees: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points. The effective top-left
    /// flips if the second corner crosses the first.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(Point::new(min_x, min_y), width, height)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn bounds(&self) -> kurbo::Rect {
        self.as_rect()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.style.fill_color.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            // Outline only: hit on the border
            let outer = rect.inflate(
                tolerance + self.style.stroke_width / 2.0,
                tolerance + self.style.stroke_width / 2.0,
            );
            let inner = rect.inflate(
                -(tolerance + self.style.stroke_width / 2.0),
                -(tolerance + self.style.stroke_width / 2.0),
            );
            outer.contains(point) && !inner.contains(point)
        }
    }

    pub fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Clamp width/height to the minimum shape size.
    pub fn clamp_min_size(&mut self) {
        self.width = self.width.max(MIN_SHAPE_SIZE);
        self.height = self.height.max(MIN_SHAPE_SIZE);
    }
}
