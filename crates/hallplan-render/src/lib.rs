//! HallPlan render abstraction.
//!
//! Defines the surface trait the editor draws through, a scene walker that
//! issues primitive calls for every object, and a recording surface for
//! tests and headless hosts.

mod draw;
mod surface;

pub use draw::{DrawOptions, draw_scene};
pub use surface::{DrawCall, Paint, RecordingSurface, Surface};
