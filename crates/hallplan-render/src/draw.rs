//! Scene walker: issues surface calls for every object in a scene.

use crate::surface::{Paint, Surface};
use hallplan_core::camera::Camera;
use hallplan_core::scene::{ObjectId, Scene};
use hallplan_core::selection::{Selection, handles_for};
use hallplan_core::shapes::Shape;
use hallplan_core::table::{CHAIR_RADIUS, Table, TableKind};
use kurbo::{Point, Size};
use peniko::Color;

/// Colors and toggles for scene presentation.
#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub selection_color: Color,
    pub chair_color: Color,
    pub occupied_chair_color: Color,
    pub handle_color: Color,
    /// Draw selection outlines and handles.
    pub show_selection: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            chair_color: Color::from_rgba8(148, 163, 184, 255),
            occupied_chair_color: Color::from_rgba8(34, 197, 94, 255),
            handle_color: Color::from_rgba8(59, 130, 246, 255),
            show_selection: true,
        }
    }
}

/// Walk the whole scene and issue draw calls: shapes back-to-front, then
/// tables, then the in-progress provisional shape and selection chrome.
///
/// A single malformed object is skipped with a diagnostic; the rest of the
/// scene still renders.
pub fn draw_scene(
    surface: &mut dyn Surface,
    scene: &Scene,
    camera: &Camera,
    viewport: Size,
    selection: &Selection,
    provisional: Option<&Shape>,
    options: &DrawOptions,
) {
    surface.begin_frame(viewport, camera.transform());

    for shape in &scene.shapes {
        draw_shape(surface, shape);
    }
    for table in &scene.tables {
        draw_table(surface, table, options);
    }
    if let Some(shape) = provisional {
        draw_shape(surface, shape);
    }

    if options.show_selection {
        for &id in selection.ids() {
            draw_selection_chrome(surface, scene, id, camera, options);
        }
    }

    surface.end_frame();
}

fn shape_paint(shape: &Shape) -> Paint {
    let style = shape.style();
    Paint {
        fill: style.fill(),
        stroke: style.stroke(),
        stroke_width: style.stroke_width,
    }
}

/// Draw one shape, matching exhaustively over the variants.
fn draw_shape(surface: &mut dyn Surface, shape: &Shape) {
    let paint = shape_paint(shape);
    match shape {
        Shape::Rect(rect) => {
            surface.draw_rect(rect.as_rect(), rect.rotation_degrees, &paint);
        }
        Shape::Circle(circle) => {
            surface.draw_ellipse(
                circle.center,
                circle.radius,
                circle.radius,
                circle.rotation_degrees,
                &paint,
            );
        }
        Shape::Line(line) => {
            surface.draw_line(line.start, line.end, &paint);
        }
        Shape::Text(text) => {
            surface.draw_text(
                text.position,
                &text.content,
                text.font_size,
                &text.font_family,
                text.rotation_degrees,
                text.style.stroke(),
            );
        }
        Shape::Path(path) => {
            if path.points.len() < 2 {
                // Degenerate path data: skip this object, keep rendering
                log::warn!("skipping malformed path shape {} ({} points)", path.id(), path.points.len());
                return;
            }
            surface.draw_polyline(&path.points, path.rotation_degrees, &paint);
        }
    }
}

/// Draw a table body, its chairs and its label.
fn draw_table(surface: &mut dyn Surface, table: &Table, options: &DrawOptions) {
    let body_paint = Paint {
        fill: Some(Color::from_rgba8(255, 255, 255, 255)),
        stroke: Color::from_rgba8(51, 65, 85, 255),
        stroke_width: 2.0,
    };

    match table.kind {
        TableKind::Round => {
            surface.draw_ellipse(table.position, table.radius(), table.radius(), 0.0, &body_paint);
        }
        TableKind::Rectangle => {
            surface.draw_rect(table.bounds(), table.rotation_degrees, &body_paint);
        }
    }

    for (index, seat) in table.seats().iter().enumerate() {
        let color = if seat.is_some() {
            options.occupied_chair_color
        } else {
            options.chair_color
        };
        let chair_paint = Paint {
            fill: seat.is_some().then_some(color),
            stroke: color,
            stroke_width: 1.5,
        };
        surface.draw_ellipse(
            table.seat_position(index),
            CHAIR_RADIUS,
            CHAIR_RADIUS,
            0.0,
            &chair_paint,
        );
    }

    if !table.label.is_empty() {
        let label_pos = Point::new(
            table.position.x - table.label.chars().count() as f64 * 3.5,
            table.position.y - 6.0,
        );
        surface.draw_text(
            label_pos,
            &table.label,
            12.0,
            "sans-serif",
            0.0,
            Color::from_rgba8(51, 65, 85, 255),
        );
    }
}

/// Selection outline plus manipulation handles for one object.
fn draw_selection_chrome(
    surface: &mut dyn Surface,
    scene: &Scene,
    id: ObjectId,
    camera: &Camera,
    options: &DrawOptions,
) {
    let Some(object) = scene.object(id) else {
        return;
    };
    let outline = Paint::stroked(options.selection_color, 1.0 / camera.zoom);
    surface.draw_rect(object.bounds().inflate(2.0, 2.0), 0.0, &outline);

    let handle_paint = Paint {
        fill: Some(Color::from_rgba8(255, 255, 255, 255)),
        stroke: options.handle_color,
        stroke_width: 1.0 / camera.zoom,
    };
    let handle_radius = hallplan_core::selection::HANDLE_SIZE / 2.0 / camera.zoom;
    for handle in handles_for(scene, id) {
        surface.draw_ellipse(handle.position, handle_radius, handle_radius, 0.0, &handle_paint);
    }
}
