//! Shape definitions for the hall layout.
//!
//! Each shape type keeps its own coordinate convention: rectangles are
//! anchored at their top-left corner, circles at their center, lines by
//! absolute endpoints, text at its top-left anchor and freehand paths by an
//! absolute point list. Geometry is always baked model-space coordinates;
//! no shape carries an unapplied scale factor.

mod circle;
mod line;
mod path;
mod rect;
mod text;

pub use circle::Circle;
pub use line::Line;
pub use path::FreePath;
pub use rect::Rect;
pub use text::Text;

use kurbo::{BezPath, Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Minimum width/height/radius a shape may have after any edit.
pub const MIN_SHAPE_SIZE: f64 = 1.0;

/// Minimum stroke width; smaller values are clamped, not rejected.
pub const MIN_STROKE_WIDTH: f64 = 0.5;

/// Minimum font size for text shapes.
pub const MIN_FONT_SIZE: f64 = 4.0;

/// Normalize an angle in degrees into the range [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by all shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill). Meaningful for rects, circles and paths.
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Set the stroke width, clamping below-minimum values.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width.max(MIN_STROKE_WIDTH);
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Closed sum type over all shape variants.
///
/// Every consumption site (render, move, resize, rotate, export) matches
/// exhaustively, so adding a shape type is a compile-time-checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Text(Text),
    Path(FreePath),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rect(s) => s.id,
            Shape::Circle(s) => s.id,
            Shape::Line(s) => s.id,
            Shape::Text(s) => s.id,
            Shape::Path(s) => s.id,
        }
    }

    /// Assign a fresh unique identifier. Used when duplicating shapes.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rect(s) => s.id = new_id,
            Shape::Circle(s) => s.id = new_id,
            Shape::Line(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Path(s) => s.id = new_id,
        }
    }

    /// Get the bounding box (of the unrotated geometry) in model coordinates.
    pub fn bounds(&self) -> kurbo::Rect {
        match self {
            Shape::Rect(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Path(s) => s.bounds(),
        }
    }

    /// Check if a point (in model coordinates) hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rect(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Path(s) => s.hit_test(point, tolerance),
        }
    }

    /// Get the path representation for rendering.
    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rect(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Path(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rect(s) => &s.style,
            Shape::Circle(s) => &s.style,
            Shape::Line(s) => &s.style,
            Shape::Text(s) => &s.style,
            Shape::Path(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rect(s) => &mut s.style,
            Shape::Circle(s) => &mut s.style,
            Shape::Line(s) => &mut s.style,
            Shape::Text(s) => &mut s.style,
            Shape::Path(s) => &mut s.style,
        }
    }

    /// Move the shape by a model-space delta. Lines shift both endpoints;
    /// paths shift every point.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rect(s) => s.translate(delta),
            Shape::Circle(s) => s.translate(delta),
            Shape::Line(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
            Shape::Path(s) => s.translate(delta),
        }
    }

    /// Get the rotation angle in degrees, normalized to [0, 360).
    pub fn rotation_degrees(&self) -> f64 {
        match self {
            Shape::Rect(s) => s.rotation_degrees,
            Shape::Circle(s) => s.rotation_degrees,
            Shape::Line(s) => s.rotation_degrees,
            Shape::Text(s) => s.rotation_degrees,
            Shape::Path(s) => s.rotation_degrees,
        }
    }

    /// Set the rotation angle in degrees (normalized on write).
    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        let degrees = normalize_degrees(degrees);
        match self {
            Shape::Rect(s) => s.rotation_degrees = degrees,
            Shape::Circle(s) => s.rotation_degrees = degrees,
            Shape::Line(s) => s.rotation_degrees = degrees,
            Shape::Text(s) => s.rotation_degrees = degrees,
            Shape::Path(s) => s.rotation_degrees = degrees,
        }
    }

    /// Short type name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rect(_) => "rect",
            Shape::Circle(_) => "circle",
            Shape::Line(_) => "line",
            Shape::Text(_) => "text",
            Shape::Path(_) => "path",
        }
    }
}
