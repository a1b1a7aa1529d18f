//! Tool modes and the creation-gesture shape factory.

use crate::shapes::{Circle, FreePath, Line, Rect, Shape, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Tolerance used when simplifying committed freehand paths.
pub const FREEHAND_SIMPLIFY_TOLERANCE: f64 = 2.0;

/// The active tool mode. Governs how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Selection and panning coexist; the pan trigger suspends object
    /// interactivity. The editor's resting state.
    #[default]
    Hybrid,
    /// Every drag pans; object hit-testing is never consulted.
    Pan,
    /// Selection/manipulation only.
    Select,
    /// Freehand drawing.
    FreeDraw,
    Line,
    Rect,
    Circle,
    /// Click to place a text label.
    Text,
    /// Click to place a seating table.
    Table,
    /// Drag to remove objects.
    Eraser,
}

impl ToolKind {
    /// Tools that create a shape through a drag gesture.
    pub fn creates_by_drag(self) -> bool {
        matches!(
            self,
            ToolKind::Rect | ToolKind::Circle | ToolKind::Line | ToolKind::FreeDraw
        )
    }

    /// Tools in which clicking objects selects/manipulates them.
    pub fn allows_object_interaction(self) -> bool {
        matches!(self, ToolKind::Hybrid | ToolKind::Select)
    }

    /// Tools that hand control back to Hybrid once their object is placed.
    pub fn returns_to_hybrid(self) -> bool {
        matches!(
            self,
            ToolKind::Rect | ToolKind::Circle | ToolKind::Line | ToolKind::Text | ToolKind::Table
        )
    }

    /// Display name, for diagnostics and host UIs.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Hybrid => "Hybrid",
            ToolKind::Pan => "Pan",
            ToolKind::Select => "Select",
            ToolKind::FreeDraw => "Free draw",
            ToolKind::Line => "Line",
            ToolKind::Rect => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Text => "Text",
            ToolKind::Table => "Table",
            ToolKind::Eraser => "Eraser",
        }
    }
}

/// Instantiate the provisional zero-size shape for a creation gesture.
/// Returns None for tools that do not create by dragging.
pub fn provisional_shape(tool: ToolKind, start: Point, style: &ShapeStyle) -> Option<Shape> {
    let mut shape = match tool {
        ToolKind::Rect => Some(Shape::Rect(Rect::new(start, 0.0, 0.0))),
        ToolKind::Circle => Some(Shape::Circle(Circle::new(start, 0.0))),
        ToolKind::Line => Some(Shape::Line(Line::new(start, start))),
        ToolKind::FreeDraw => Some(Shape::Path(FreePath::from_points(vec![start]))),
        _ => None,
    };
    if let Some(ref mut s) = shape {
        *s.style_mut() = style.clone();
    }
    shape
}

/// Recompute a provisional shape's geometry from the gesture's start point
/// and the current pointer position.
///
/// Rectangles grow from the anchor and flip their effective top-left when
/// the pointer crosses it; circle radius is the Euclidean start→pointer
/// distance; freehand accumulates points.
pub fn update_provisional(shape: &mut Shape, start: Point, current: Point) {
    match shape {
        Shape::Rect(rect) => {
            rect.position = Point::new(start.x.min(current.x), start.y.min(current.y));
            rect.width = (current.x - start.x).abs();
            rect.height = (current.y - start.y).abs();
        }
        Shape::Circle(circle) => {
            circle.center = start;
            circle.radius =
                ((current.x - start.x).powi(2) + (current.y - start.y).powi(2)).sqrt();
        }
        Shape::Line(line) => {
            line.start = start;
            line.end = current;
        }
        Shape::Path(path) => {
            path.add_point(current);
        }
        Shape::Text(_) => {}
    }
}

/// Finalize a committed shape: enforce minimum sizes and bake bounds.
pub fn finalize_shape(shape: &mut Shape) {
    match shape {
        Shape::Rect(rect) => rect.clamp_min_size(),
        Shape::Circle(circle) => circle.clamp_min_size(),
        Shape::Line(_) | Shape::Text(_) => {}
        Shape::Path(path) => {
            path.simplify(FREEHAND_SIMPLIFY_TOLERANCE);
        }
    }
}
