//! Surface trait abstraction.

use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;

/// Fill and stroke for one primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    /// Fill color (None = no fill).
    pub fill: Option<Color>,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in model units.
    pub stroke_width: f64,
}

impl Paint {
    pub fn stroked(stroke: Color, stroke_width: f64) -> Self {
        Self {
            fill: None,
            stroke,
            stroke_width,
        }
    }
}

/// A retained or immediate 2D drawing surface.
///
/// Coordinates are model-space; the camera transform handed to
/// `begin_frame` maps them to screen. Rotated primitives rotate about
/// their own geometric center.
pub trait Surface {
    /// Start a frame. `transform` is the model→screen camera transform.
    fn begin_frame(&mut self, viewport: Size, transform: Affine);

    fn draw_rect(&mut self, rect: Rect, rotation_degrees: f64, paint: &Paint);

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        rotation_degrees: f64,
        paint: &Paint,
    );

    fn draw_line(&mut self, start: Point, end: Point, paint: &Paint);

    fn draw_text(
        &mut self,
        position: Point,
        content: &str,
        font_size: f64,
        font_family: &str,
        rotation_degrees: f64,
        color: Color,
    );

    /// Draw a polyline through the given points.
    fn draw_polyline(&mut self, points: &[Point], rotation_degrees: f64, paint: &Paint);

    /// Finish the frame.
    fn end_frame(&mut self);
}

/// One recorded primitive call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Frame { viewport: Size, transform: Affine },
    Rect { rect: Rect, rotation_degrees: f64, paint: Paint },
    Ellipse { center: Point, radius_x: f64, radius_y: f64, rotation_degrees: f64, paint: Paint },
    Line { start: Point, end: Point, paint: Paint },
    Text { position: Point, content: String, font_size: f64 },
    Polyline { points: Vec<Point>, paint: Paint },
    End,
}

/// A surface that records every call. Used by tests and useful as a
/// reference implementation for hosts bridging to a real canvas.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since creation or the last `clear`.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Count calls matching a predicate.
    pub fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self, viewport: Size, transform: Affine) {
        self.calls.push(DrawCall::Frame { viewport, transform });
    }

    fn draw_rect(&mut self, rect: Rect, rotation_degrees: f64, paint: &Paint) {
        self.calls.push(DrawCall::Rect { rect, rotation_degrees, paint: *paint });
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        rotation_degrees: f64,
        paint: &Paint,
    ) {
        self.calls.push(DrawCall::Ellipse {
            center,
            radius_x,
            radius_y,
            rotation_degrees,
            paint: *paint,
        });
    }

    fn draw_line(&mut self, start: Point, end: Point, paint: &Paint) {
        self.calls.push(DrawCall::Line { start, end, paint: *paint });
    }

    fn draw_text(
        &mut self,
        position: Point,
        content: &str,
        font_size: f64,
        _font_family: &str,
        _rotation_degrees: f64,
        _color: Color,
    ) {
        self.calls.push(DrawCall::Text {
            position,
            content: content.to_string(),
            font_size,
        });
    }

    fn draw_polyline(&mut self, points: &[Point], _rotation_degrees: f64, paint: &Paint) {
        self.calls.push(DrawCall::Polyline { points: points.to_vec(), paint: *paint });
    }

    fn end_frame(&mut self) {
        self.calls.push(DrawCall::End);
    }
}
