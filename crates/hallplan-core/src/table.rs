//! Seating table model.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for tables.
pub type TableId = Uuid;

/// Minimum width/height of a table.
pub const MIN_TABLE_SIZE: f64 = 20.0;

/// Visual radius of a chair, in model units.
pub const CHAIR_RADIUS: f64 = 9.0;

/// Gap between the table edge and the center of its chairs.
pub const CHAIR_CLEARANCE: f64 = 14.0;

/// Table errors.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("{provided} occupants provided for {chairs} chairs")]
    SeatCountMismatch { provided: usize, chairs: usize },
    #[error("seat index {index} out of range for {chairs} chairs")]
    SeatOutOfRange { index: usize, chairs: usize },
}

/// A seated guest: a name/group pair owned by the external seating
/// subsystem. Opaque to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub name: String,
    pub group: String,
}

/// Table shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Round,
    Rectangle,
}

/// Configuration for creating a new table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Center position in model coordinates.
    pub position: Point,
    pub kind: TableKind,
    /// Width (diameter for round tables).
    pub width: f64,
    pub height: f64,
    pub chair_count: usize,
    /// Display label, e.g. "Table 4".
    pub label: String,
    /// Initial occupants. Must match `chair_count` in length if provided.
    pub occupants: Option<Vec<Option<Occupant>>>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            kind: TableKind::Round,
            width: 80.0,
            height: 80.0,
            chair_count: 8,
            label: String::new(),
            occupants: None,
        }
    }
}

/// A seating unit with a fixed number of ordered seats.
///
/// Anchored at its CENTER in model coordinates, for both round and
/// rectangular tables. Round tables use `width` as their diameter and keep
/// `height == width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub(crate) id: TableId,
    /// Center position.
    pub position: Point,
    pub kind: TableKind,
    pub width: f64,
    pub height: f64,
    /// Number of chairs; always equals `seats.len()`.
    chair_count: usize,
    /// One slot per chair, empty or holding an occupant.
    seats: Vec<Option<Occupant>>,
    /// Rotation in degrees, normalized to [0, 360). Meaningful for
    /// rectangular tables; round tables keep 0.
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Display label.
    #[serde(default)]
    pub label: String,
}

impl Table {
    /// Create a table from a config.
    ///
    /// `chair_count` below 1 is clamped to 1. A provided occupant list
    /// whose length does not match the chair count is rejected.
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        let chair_count = config.chair_count.max(1);
        let seats = match config.occupants {
            Some(list) => {
                if list.len() != chair_count {
                    return Err(TableError::SeatCountMismatch {
                        provided: list.len(),
                        chairs: chair_count,
                    });
                }
                list
            }
            None => vec![None; chair_count],
        };

        let width = config.width.max(MIN_TABLE_SIZE);
        let height = match config.kind {
            TableKind::Round => width,
            TableKind::Rectangle => config.height.max(MIN_TABLE_SIZE),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            position: config.position,
            kind: config.kind,
            width,
            height,
            chair_count,
            seats,
            rotation_degrees: 0.0,
            label: config.label,
        })
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    /// Assign a fresh unique identifier. Used when duplicating tables.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Radius of a round table (half the width).
    pub fn radius(&self) -> f64 {
        self.width / 2.0
    }

    pub fn chair_count(&self) -> usize {
        self.chair_count
    }

    pub fn seats(&self) -> &[Option<Occupant>] {
        &self.seats
    }

    /// Change the chair count, truncating or padding the seats with empty
    /// slots so `seats.len() == chair_count` always holds. Counts below 1
    /// are clamped.
    pub fn set_chair_count(&mut self, count: usize) {
        let count = count.max(1);
        self.seats.resize(count, None);
        self.chair_count = count;
    }

    /// Seat or unseat an occupant. Returns the previous occupant.
    pub fn set_seat(
        &mut self,
        index: usize,
        occupant: Option<Occupant>,
    ) -> Result<Option<Occupant>, TableError> {
        let slot = self
            .seats
            .get_mut(index)
            .ok_or(TableError::SeatOutOfRange {
                index,
                chairs: self.chair_count,
            })?;
        Ok(std::mem::replace(slot, occupant))
    }

    /// Remove and return every seated occupant, leaving all seats empty.
    pub fn take_occupants(&mut self) -> Vec<Occupant> {
        self.seats.iter_mut().filter_map(|s| s.take()).collect()
    }

    /// Empty all seats without returning the occupants.
    pub fn clear_seats(&mut self) {
        for seat in &mut self.seats {
            *seat = None;
        }
    }

    /// Bounding box of the table body (chairs excluded).
    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.position.x - self.width / 2.0,
            self.position.y - self.height / 2.0,
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Bounding box including the chair ring.
    pub fn outer_bounds(&self) -> kurbo::Rect {
        self.bounds()
            .inflate(CHAIR_CLEARANCE + CHAIR_RADIUS, CHAIR_CLEARANCE + CHAIR_RADIUS)
    }

    /// Check if a point (in model coordinates) hits the table body.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self.kind {
            TableKind::Round => {
                let dist = ((point.x - self.position.x).powi(2)
                    + (point.y - self.position.y).powi(2))
                .sqrt();
                dist <= self.radius() + tolerance
            }
            TableKind::Rectangle => {
                let local = self.to_local(point);
                self.bounds().inflate(tolerance, tolerance).contains(local)
            }
        }
    }

    /// Model-space position of the chair at `index`.
    ///
    /// Round tables place chairs evenly on a circle just outside the rim;
    /// rectangular tables space them evenly along the perimeter, clockwise
    /// from the top edge, rotated with the table.
    pub fn seat_position(&self, index: usize) -> Point {
        let n = self.chair_count as f64;
        match self.kind {
            TableKind::Round => {
                let angle = TAU * index as f64 / n - FRAC_PI_2;
                let ring = self.radius() + CHAIR_CLEARANCE;
                Point::new(
                    self.position.x + ring * angle.cos(),
                    self.position.y + ring * angle.sin(),
                )
            }
            TableKind::Rectangle => {
                // Walk the outset rectangle's perimeter clockwise from the
                // top-left, placing chair centers at even arc lengths.
                let ow = self.width + 2.0 * CHAIR_CLEARANCE;
                let oh = self.height + 2.0 * CHAIR_CLEARANCE;
                let perimeter = 2.0 * (ow + oh);
                let mut arc = (index as f64 + 0.5) * perimeter / n;

                let (mut dx, mut dy);
                if arc < ow {
                    dx = arc - ow / 2.0;
                    dy = -oh / 2.0;
                } else {
                    arc -= ow;
                    if arc < oh {
                        dx = ow / 2.0;
                        dy = arc - oh / 2.0;
                    } else {
                        arc -= oh;
                        if arc < ow {
                            dx = ow / 2.0 - arc;
                            dy = oh / 2.0;
                        } else {
                            arc -= ow;
                            dx = -ow / 2.0;
                            dy = oh / 2.0 - arc;
                        }
                    }
                }

                let theta = self.rotation_degrees.to_radians();
                if theta.abs() > f64::EPSILON {
                    let (sin, cos) = theta.sin_cos();
                    let (rx, ry) = (dx * cos - dy * sin, dx * sin + dy * cos);
                    dx = rx;
                    dy = ry;
                }
                Point::new(self.position.x + dx, self.position.y + dy)
            }
        }
    }

    /// Find the seat under a point, if any.
    pub fn seat_at_point(&self, point: Point, tolerance: f64) -> Option<usize> {
        let reach = CHAIR_RADIUS + tolerance;
        (0..self.chair_count).find(|&i| {
            let seat = self.seat_position(i);
            let dist = ((point.x - seat.x).powi(2) + (point.y - seat.y).powi(2)).sqrt();
            dist <= reach
        })
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Resize to new body dimensions, clamped to the minimum size.
    /// Round tables stay square.
    pub fn set_size(&mut self, width: f64, height: f64) {
        match self.kind {
            TableKind::Round => {
                let size = width.min(height).max(MIN_TABLE_SIZE);
                self.width = size;
                self.height = size;
            }
            TableKind::Rectangle => {
                self.width = width.max(MIN_TABLE_SIZE);
                self.height = height.max(MIN_TABLE_SIZE);
            }
        }
    }

    /// Map a model point into the table's unrotated frame (inverse-rotate
    /// about the center).
    fn to_local(&self, point: Point) -> Point {
        let theta = self.rotation_degrees.to_radians();
        if theta.abs() < f64::EPSILON {
            return point;
        }
        let (sin, cos) = (-theta).sin_cos();
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        Point::new(
            self.position.x + dx * cos - dy * sin,
            self.position.y + dx * sin + dy * cos,
        )
    }

    /// Verify the seats/chair-count invariant. Used when accepting tables
    /// from external data.
    pub fn check_seats(&self) -> Result<(), TableError> {
        if self.seats.len() != self.chair_count {
            return Err(TableError::SeatCountMismatch {
                provided: self.seats.len(),
                chairs: self.chair_count,
            });
        }
        Ok(())
    }
}
