//! HallPlan Core Library
//!
//! Platform-agnostic data structures and logic for the HallPlan seating and
//! hall-layout editor: the shape and table model, the scene aggregate, the
//! viewport camera, undo/redo history, tool definitions, selection handles
//! and the canonical scene file format.

pub mod camera;
pub mod history;
pub mod input;
pub mod scene;
pub mod scenefile;
pub mod selection;
pub mod shapes;
pub mod table;
pub mod tools;

pub use camera::Camera;
pub use history::History;
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use scene::{ObjectId, Scene, SceneObject};
pub use scenefile::{CanvasMeta, ImportError, SceneFile};
pub use selection::{Corner, Handle, HandleKind, Selection};
pub use shapes::{Shape, ShapeId, ShapeStyle};
pub use table::{Occupant, Table, TableConfig, TableError, TableId, TableKind};
pub use tools::ToolKind;
