//! HallPlan interaction engine.
//!
//! Owns the scene, camera, history, tool mode and gesture state, translates
//! pointer and keyboard events into scene mutations, and exposes the
//! command surface and outbound callbacks the surrounding application
//! drives.

mod editor;
mod shortcuts;

pub use editor::{DUPLICATE_OFFSET, Editor, GestureState, OBJECT_HIT_TOLERANCE};
pub use shortcuts::{Shortcut, ShortcutRegistry};
