//! Circle shape.

use super::{MIN_SHAPE_SIZE, ShapeId, ShapeStyle};
use kurbo::{BezPath, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle, anchored at its center in model space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center position.
    pub center: Point,
    /// Radius (>= 1 after any edit).
    pub radius: f64,
    /// Rotation in degrees, normalized to [0, 360). Kept for uniformity
    /// with the other shape types; visually a no-op.
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            rotation_degrees: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = ((point.x - self.center.x).powi(2) + (point.y - self.center.y).powi(2)).sqrt();
        if self.style.fill_color.is_some() {
            dist <= self.radius + tolerance
        } else {
            (dist - self.radius).abs() <= tolerance + self.style.stroke_width / 2.0
        }
    }

    pub fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Clamp the radius to the minimum shape size.
    pub fn clamp_min_size(&mut self) {
        self.radius = self.radius.max(MIN_SHAPE_SIZE);
    }
}
