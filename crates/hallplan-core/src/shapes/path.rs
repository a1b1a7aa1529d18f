//! Freehand path shape.

use super::{ShapeId, ShapeStyle, point_to_polyline_dist};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand drawing: an ordered sequence of absolute model-space points.
///
/// `position` is the top-left of the point cloud's bounding box and is kept
/// in sync with the points; `bounding_width`/`bounding_height` are
/// informational and recomputed on every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreePath {
    pub(crate) id: ShapeId,
    /// Anchor: top-left of the bounding box.
    pub position: Point,
    /// Points in the path, absolute model coordinates.
    pub points: Vec<Point>,
    /// Bounding box width (informational).
    pub bounding_width: f64,
    /// Bounding box height (informational).
    pub bounding_height: f64,
    /// Rotation in degrees about the center, normalized to [0, 360).
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl FreePath {
    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        let mut path = Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            points,
            bounding_width: 0.0,
            bounding_height: 0.0,
            rotation_degrees: 0.0,
            style: ShapeStyle::default(),
        };
        path.sync_bounds();
        path
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
        self.sync_bounds();
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recompute the anchor and informational bounding size from the points.
    pub fn sync_bounds(&mut self) {
        let bounds = self.bounds();
        self.position = Point::new(bounds.x0, bounds.y0);
        self.bounding_width = bounds.width();
        self.bounding_height = bounds.height();
    }

    /// Simplify the path by removing redundant points
    /// (Ramer-Douglas-Peucker).
    pub fn simplify(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }
        self.points = rdp_simplify(&self.points, tolerance);
        self.sync_bounds();
    }

    pub fn bounds(&self) -> kurbo::Rect {
        if self.points.is_empty() {
            return kurbo::Rect::from_origin_size(self.position, (0.0, 0.0));
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        kurbo::Rect::new(min_x, min_y, max_x, max_y)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            if let Some(p) = self.points.first() {
                let dist = ((point.x - p.x).powi(2) + (point.y - p.y).powi(2)).sqrt();
                return dist <= tolerance + self.style.stroke_width / 2.0;
            }
            return false;
        }
        point_to_polyline_dist(point, &self.points)
            <= tolerance + self.style.stroke_width / 2.0
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some(&first) = self.points.first() {
            path.move_to(first);
            for &point in &self.points[1..] {
                path.line_to(point);
            }
        }
        path
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
        self.position += delta;
    }

    /// Scale every point into new bounds, folding the scale in immediately.
    pub fn scale_into(&mut self, new_bounds: kurbo::Rect) {
        let old = self.bounds();
        let scale_x = new_bounds.width() / old.width().max(1.0);
        let scale_y = new_bounds.height() / old.height().max(1.0);
        for point in &mut self.points {
            point.x = new_bounds.x0 + (point.x - old.x0) * scale_x;
            point.y = new_bounds.y0 + (point.y - old.y0) * scale_y;
        }
        self.sync_bounds();
    }
}

/// Ramer-Douglas-Peucker line simplification.
fn rdp_simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = rdp_simplify(&points[..=max_index], tolerance);
        let right = rdp_simplify(&points[max_index..], tolerance);

        // Combine, removing the duplicate point at the junction
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Perpendicular distance from a point to the line through start/end.
fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;

    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        let px = point.x - line_start.x;
        let py = point.y - line_start.y;
        return (px * px + py * py).sqrt();
    }

    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}
