//! Text shape.

use super::{MIN_FONT_SIZE, ShapeId, ShapeStyle};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_font_family() -> String {
    Text::DEFAULT_FONT_FAMILY.to_string()
}

/// A text label, anchored at the top-left corner of its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Anchor position (top-left corner of the text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in model units.
    pub font_size: f64,
    /// Font family name, as understood by the rendering surface.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Rotation in degrees about the center, normalized to [0, 360).
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Default font family.
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: default_font_family(),
            rotation_degrees: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Set the font size builder-style.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Replace the text content.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Approximate width based on character count and font size.
    /// Actual width depends on the surface's font metrics.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.font_size * 0.55
    }

    /// Approximate height based on font size and number of lines.
    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        line_count as f64 * self.font_size * 1.2
    }

    pub fn bounds(&self) -> kurbo::Rect {
        let width = self.approximate_width().max(self.font_size);
        let height = self.approximate_height();
        kurbo::Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Text has no vector outline here; the bounding box stands in for
    /// selection purposes.
    pub fn to_path(&self) -> BezPath {
        let bounds = self.bounds();
        let mut path = BezPath::new();
        path.move_to(Point::new(bounds.x0, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y1));
        path.line_to(Point::new(bounds.x0, bounds.y1));
        path.close_path();
        path
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Scale the font size by a factor, folding the scale in immediately.
    pub fn scale_font(&mut self, factor: f64) {
        self.font_size = (self.font_size * factor).max(MIN_FONT_SIZE);
    }
}
