//! The interaction engine.

use hallplan_core::camera::{Camera, ZOOM_STEP};
use hallplan_core::history::History;
use hallplan_core::input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
use hallplan_core::scene::{ObjectId, Scene, SceneObject};
use hallplan_core::scenefile::{self, ImportError};
use hallplan_core::selection::{
    HANDLE_HIT_TOLERANCE, HandleKind, Selection, apply_endpoint_move, apply_resize,
    apply_rotation, hit_test_handles, object_center, rotation_from_cursor,
};
use hallplan_core::shapes::{Shape, ShapeId, ShapeStyle, Text};
use hallplan_core::table::{Occupant, Table, TableConfig, TableError, TableId};
use hallplan_core::tools::{ToolKind, finalize_shape, provisional_shape, update_provisional};
use hallplan_render::{DrawOptions, Surface, draw_scene};
use kurbo::{Point, Size, Vec2};

/// Offset applied to duplicated objects, in model units.
pub const DUPLICATE_OFFSET: f64 = 10.0;

/// Hit tolerance for object picking, in screen pixels (divided by zoom).
pub const OBJECT_HIT_TOLERANCE: f64 = 5.0;

/// Zoom factor per wheel notch.
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Padding around the scene when fitting the view, in screen pixels.
const FIT_PADDING: f64 = 50.0;

/// Placeholder content for freshly placed text shapes.
const NEW_TEXT_CONTENT: &str = "Text";

/// The one value holding all gesture-scoped transient state. A gesture
/// spans pointer-down → move* → up and is cleared on up or abort; nothing
/// else in the editor remembers an in-progress interaction.
#[derive(Debug, Clone)]
pub enum GestureState {
    Idle,
    /// Dragging the view. Viewport-only; never touches the scene.
    Panning { last_screen: Point },
    /// Dragging out a new shape. The provisional shape lives here, outside
    /// the scene, until commit.
    CreatingShape { start: Point, shape: Shape },
    /// Dragging the current selection. Originals are kept for abort and to
    /// recompute each update from scratch.
    MovingObjects { start: Point, originals: Vec<SceneObject> },
    /// Dragging a corner or endpoint handle.
    ResizingObject {
        start: Point,
        handle: HandleKind,
        original: SceneObject,
    },
    /// Dragging the rotation handle.
    RotatingObject { original: SceneObject },
    /// Sweeping the eraser.
    Erasing { removed_any: bool },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }
}

type SeatClickFn = Box<dyn FnMut(TableId, usize)>;
type TableSelectedFn = Box<dyn FnMut(TableId)>;
type SeatsReleasedFn = Box<dyn FnMut(Vec<Occupant>)>;

#[derive(Default)]
struct Callbacks {
    seat_click: Option<SeatClickFn>,
    table_selected: Option<TableSelectedFn>,
    seats_released: Option<SeatsReleasedFn>,
}

impl Callbacks {
    fn release_seats(&mut self, occupants: Vec<Occupant>) {
        if occupants.is_empty() {
            return;
        }
        if let Some(cb) = &mut self.seats_released {
            cb(occupants);
        }
    }
}

/// The editor: scene, camera, history, tool mode, selection, gesture state
/// and the command surface over them.
pub struct Editor {
    scene: Scene,
    camera: Camera,
    history: History,
    tool: ToolKind,
    selection: Selection,
    gesture: GestureState,
    input: InputState,
    style: ShapeStyle,
    viewport_size: Size,
    next_table_number: usize,
    callbacks: Callbacks,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with an empty scene.
    pub fn new() -> Self {
        let scene = Scene::new();
        let mut history = History::new();
        history.reset(&scene);
        Self {
            scene,
            camera: Camera::new(),
            history,
            tool: ToolKind::default(),
            selection: Selection::new(),
            gesture: GestureState::Idle,
            input: InputState::new(),
            style: ShapeStyle::default(),
            viewport_size: Size::new(800.0, 600.0),
            next_table_number: 0,
            callbacks: Callbacks::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    /// Style applied to newly created shapes.
    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Register the seat-interaction callback. A pointer-down on a chair
    /// dispatches here and does nothing else to the scene.
    pub fn on_seat_click(&mut self, callback: impl FnMut(TableId, usize) + 'static) {
        self.callbacks.seat_click = Some(Box::new(callback));
    }

    /// Register the table-selection callback.
    pub fn on_table_selected(&mut self, callback: impl FnMut(TableId) + 'static) {
        self.callbacks.table_selected = Some(Box::new(callback));
    }

    /// Register the callback receiving occupants of deleted tables, so the
    /// host can return them to its unseated pool.
    pub fn on_seats_released(&mut self, callback: impl FnMut(Vec<Occupant>) + 'static) {
        self.callbacks.seats_released = Some(Box::new(callback));
    }

    // ------------------------------------------------------------------
    // Tool mode

    /// Switch tools. An in-progress creation gesture is discarded, never
    /// committed; manipulation gestures restore their originals.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel_gesture();
        log::debug!("tool: {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
    }

    // ------------------------------------------------------------------
    // Pointer and keyboard events

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.input.handle_pointer_event(&event);
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Wheel { position, delta } => {
                let factor = if delta.y < 0.0 {
                    WHEEL_ZOOM_STEP
                } else {
                    1.0 / WHEEL_ZOOM_STEP
                };
                self.camera.zoom_at(position, factor);
            }
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        self.input.handle_key_event(&event);
        let KeyEvent::Pressed(key) = event else {
            return;
        };
        let mods = self.input.modifiers;
        match key.as_str() {
            "Escape" => self.cancel_gesture(),
            "Delete" | "Backspace" => self.delete_selected(),
            "z" | "Z" if mods.ctrl && mods.shift => {
                self.redo();
            }
            "z" | "Z" if mods.ctrl => {
                self.undo();
            }
            "y" | "Y" if mods.ctrl => {
                self.redo();
            }
            "a" | "A" if mods.ctrl => self.select_all(),
            "d" | "D" if mods.ctrl => self.duplicate_selected(),
            _ => {}
        }
    }

    /// The pointer left the surface mid-gesture: terminate cleanly.
    pub fn pointer_left_surface(&mut self) {
        self.cancel_gesture();
        self.input.clear();
    }

    fn pointer_down(&mut self, screen: Point, button: MouseButton) {
        if !self.gesture.is_idle() {
            return;
        }

        // Pure Pan: navigation only. Object hit-testing is not consulted at
        // all in this mode, so nothing can be selected while navigating.
        if self.tool == ToolKind::Pan {
            self.gesture = GestureState::Panning { last_screen: screen };
            return;
        }

        // Hybrid pan trigger: secondary/middle button, or Space held,
        // suspends object interactivity for the duration of the drag.
        if self.tool == ToolKind::Hybrid
            && (button != MouseButton::Left || self.input.is_key_pressed(" "))
        {
            self.gesture = GestureState::Panning { last_screen: screen };
            return;
        }

        if button != MouseButton::Left {
            return;
        }

        let model = self.camera.screen_to_model(screen);
        match self.tool {
            tool if tool.allows_object_interaction() => self.interaction_down(model),
            tool if tool.creates_by_drag() => {
                if let Some(shape) = provisional_shape(tool, model, &self.style) {
                    self.gesture = GestureState::CreatingShape { start: model, shape };
                }
            }
            ToolKind::Eraser => {
                let tolerance = OBJECT_HIT_TOLERANCE / self.camera.zoom;
                let removed_any = erase_step(
                    &mut self.scene,
                    &mut self.selection,
                    &mut self.callbacks,
                    model,
                    tolerance,
                );
                self.gesture = GestureState::Erasing { removed_any };
            }
            // Text and Table place their object on the click's release;
            // Pan was handled before any hit-testing could be reached.
            _ => {}
        }
    }

    /// Pointer-down while objects are interactive: seat dispatch first,
    /// then handles on the selection, then object picking.
    fn interaction_down(&mut self, model: Point) {
        let tolerance = OBJECT_HIT_TOLERANCE / self.camera.zoom;

        // A click on a chair goes to the host and is otherwise a no-op.
        for table in self.scene.tables.iter().rev() {
            if let Some(seat) = table.seat_at_point(model, tolerance) {
                let id = table.id();
                if let Some(cb) = &mut self.callbacks.seat_click {
                    cb(id, seat);
                }
                return;
            }
        }

        // Handles on already-selected objects win over picking.
        let handle_tolerance = HANDLE_HIT_TOLERANCE / self.camera.zoom;
        for &id in self.selection.ids() {
            let Some(kind) = hit_test_handles(&self.scene, id, model, handle_tolerance) else {
                continue;
            };
            let Some(original) = self.scene.object(id) else {
                continue;
            };
            self.gesture = match kind {
                HandleKind::Rotate => GestureState::RotatingObject { original },
                HandleKind::Corner(_) | HandleKind::Endpoint(_) => GestureState::ResizingObject {
                    start: model,
                    handle: kind,
                    original,
                },
            };
            return;
        }

        match self.scene.object_at_point(model, tolerance) {
            Some(id) => {
                if self.input.modifiers.shift {
                    self.selection.toggle(id);
                    return;
                }
                if !self.selection.contains(id) {
                    self.selection.set(id);
                }
                if let ObjectId::Table(table_id) = id {
                    if let Some(cb) = &mut self.callbacks.table_selected {
                        cb(table_id);
                    }
                }
                let originals: Vec<SceneObject> = self
                    .selection
                    .ids()
                    .iter()
                    .filter_map(|&oid| self.scene.object(oid))
                    .collect();
                if !originals.is_empty() {
                    self.gesture = GestureState::MovingObjects { start: model, originals };
                }
            }
            None => self.selection.clear(),
        }
    }

    fn pointer_move(&mut self, screen: Point) {
        let model = self.camera.screen_to_model(screen);
        let tolerance = OBJECT_HIT_TOLERANCE / self.camera.zoom;

        match &mut self.gesture {
            GestureState::Idle => {}
            GestureState::Panning { last_screen } => {
                let delta = Vec2::new(screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                self.camera.pan(delta);
            }
            GestureState::CreatingShape { start, shape } => {
                update_provisional(shape, *start, model);
            }
            GestureState::MovingObjects { start, originals } => {
                // Recomputed from the originals every update; nothing
                // accumulates across moves.
                let delta = model - *start;
                for original in originals.iter() {
                    let mut moved = original.clone();
                    moved.translate(delta);
                    self.scene.replace_object(moved);
                }
            }
            GestureState::ResizingObject { start, handle, original } => {
                let delta = model - *start;
                let updated = match *handle {
                    HandleKind::Corner(corner) => apply_resize(original, corner, delta),
                    HandleKind::Endpoint(index) => apply_endpoint_move(original, index, delta),
                    HandleKind::Rotate => return,
                };
                self.scene.replace_object(updated);
            }
            GestureState::RotatingObject { original } => {
                let center = object_center(original);
                let degrees = rotation_from_cursor(center, model, self.input.modifiers.shift);
                let mut rotated = original.clone();
                apply_rotation(&mut rotated, degrees);
                self.scene.replace_object(rotated);
            }
            GestureState::Erasing { removed_any } => {
                *removed_any |= erase_step(
                    &mut self.scene,
                    &mut self.selection,
                    &mut self.callbacks,
                    model,
                    tolerance,
                );
            }
        }
    }

    fn pointer_up(&mut self, screen: Point, button: MouseButton) {
        let model = self.camera.screen_to_model(screen);
        let gesture = std::mem::replace(&mut self.gesture, GestureState::Idle);

        match gesture {
            GestureState::Idle => {
                // Click-to-place tools commit on release.
                if button == MouseButton::Left {
                    match self.tool {
                        ToolKind::Text => {
                            self.place_text(model);
                        }
                        ToolKind::Table => {
                            self.place_default_table(model);
                        }
                        _ => {}
                    }
                }
            }
            GestureState::Panning { .. } => {}
            GestureState::CreatingShape { mut shape, .. } => {
                // A freehand stroke needs at least two points to be a shape
                if let Shape::Path(ref path) = shape {
                    if path.len() < 2 {
                        return;
                    }
                }
                finalize_shape(&mut shape);
                let id = self.scene.add_shape(shape);
                self.selection.set(ObjectId::Shape(id));
                self.history.record(&self.scene);
                if self.tool.returns_to_hybrid() {
                    self.tool = ToolKind::Hybrid;
                }
            }
            GestureState::MovingObjects { .. }
            | GestureState::ResizingObject { .. }
            | GestureState::RotatingObject { .. } => {
                // One snapshot per completed gesture; no-op gestures
                // deduplicate away inside the history.
                self.history.record(&self.scene);
            }
            GestureState::Erasing { removed_any } => {
                if removed_any {
                    self.history.record(&self.scene);
                }
            }
        }
    }

    /// Discard the in-progress gesture: provisional shapes are dropped,
    /// manipulated objects restored. Eraser removals already happened and
    /// are committed to history so they stay undoable.
    pub fn cancel_gesture(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, GestureState::Idle);
        match gesture {
            GestureState::Idle | GestureState::Panning { .. } => {}
            GestureState::CreatingShape { shape, .. } => {
                log::debug!("discarding in-progress {} creation", shape.kind_name());
            }
            GestureState::MovingObjects { originals, .. } => {
                for original in originals {
                    self.scene.replace_object(original);
                }
            }
            GestureState::ResizingObject { original, .. }
            | GestureState::RotatingObject { original } => {
                self.scene.replace_object(original);
            }
            GestureState::Erasing { removed_any } => {
                if removed_any {
                    self.history.record(&self.scene);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Command surface

    /// Serialize the scene to its canonical JSON form. Viewport state only
    /// lands in `canvas_meta`; geometry is identical at any zoom/pan.
    pub fn export_scene(&self) -> Result<String, serde_json::Error> {
        scenefile::encode(&self.scene, &self.camera, self.viewport_size)
    }

    /// Replace the scene from JSON. On any failure the live scene is left
    /// exactly as it was. On success the history is re-baselined.
    pub fn import_scene(&mut self, json: &str) -> Result<(), ImportError> {
        let file = scenefile::decode(json)?;
        let (scene, meta) = file.into_parts();
        self.scene = scene;
        self.selection.clear();
        self.gesture = GestureState::Idle;
        if meta.zoom_at_export > 0.0 {
            // Restore the prior view; informational only
            self.camera.zoom = meta
                .zoom_at_export
                .clamp(self.camera.min_zoom, self.camera.max_zoom);
        }
        self.history.reset(&self.scene);
        Ok(())
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_at(self.viewport_center(), ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_at(self.viewport_center(), 1.0 / ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.camera.reset();
    }

    /// Frame the whole scene in the viewport.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.scene.bounds() {
            self.camera.fit_to_bounds(bounds, self.viewport_size, FIT_PADDING);
        }
    }

    /// Create a table, select it and snapshot.
    pub fn add_table(&mut self, config: TableConfig) -> Result<TableId, TableError> {
        let table = Table::new(config)?;
        let id = self.scene.add_table(table);
        self.selection.set(ObjectId::Table(id));
        if let Some(cb) = &mut self.callbacks.table_selected {
            cb(id);
        }
        self.history.record(&self.scene);
        Ok(id)
    }

    /// Create an editable text shape at the viewport center.
    pub fn add_text(&mut self) -> ShapeId {
        let center = self.camera.screen_to_model(self.viewport_center());
        self.place_text(center)
    }

    /// Update a text shape's content. Returns false if `id` is not a text
    /// shape.
    pub fn set_text_content(&mut self, id: ShapeId, content: &str) -> bool {
        let updated = match self.scene.shape_mut(id) {
            Some(Shape::Text(text)) => {
                text.set_content(content.to_string());
                true
            }
            _ => false,
        };
        if updated {
            self.history.record(&self.scene);
        }
        updated
    }

    /// Remove every selected object. Occupants of deleted tables are handed
    /// to the host through the seats-released callback.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        let mut released = Vec::new();
        for id in ids {
            if let Some(SceneObject::Table(mut table)) = self.scene.remove(id) {
                released.extend(table.take_occupants());
            }
        }
        self.selection.clear();
        self.callbacks.release_seats(released);
        self.history.record(&self.scene);
    }

    /// Clone every selected object with fresh ids, offset by
    /// (+10, +10) model units. Line endpoints and path points shift by the
    /// same offset. Duplicated tables start with empty seats. The clones
    /// become the selection.
    pub fn duplicate_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let offset = Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        let mut new_ids = Vec::new();
        for id in ids {
            let Some(mut copy) = self.scene.object(id) else {
                continue;
            };
            copy.regenerate_id();
            copy.translate(offset);
            if let SceneObject::Table(ref mut table) = copy {
                table.clear_seats();
            }
            new_ids.push(self.scene.add_object(copy));
        }
        if new_ids.is_empty() {
            return;
        }
        self.selection.set_all(new_ids);
        self.history.record(&self.scene);
    }

    /// Select every object. A no-op if everything is already selected.
    pub fn select_all(&mut self) {
        let all = self.scene.object_ids();
        if all.is_empty() {
            return;
        }
        let already = all.len() == self.selection.len()
            && all.iter().all(|id| self.selection.contains(*id));
        if already {
            return;
        }
        self.selection.set_all(all);
    }

    /// Restore the previous snapshot. Returns false at the bottom of
    /// history.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(scene) => {
                self.scene = scene;
                self.after_history_jump();
                true
            }
            None => false,
        }
    }

    /// Restore the snapshot undone last. Returns false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(scene) => {
                self.scene = scene;
                self.after_history_jump();
                true
            }
            None => false,
        }
    }

    /// Render the scene, the provisional shape of an in-progress creation
    /// gesture, and the selection chrome.
    pub fn draw(&self, surface: &mut dyn Surface, options: &DrawOptions) {
        let provisional = match &self.gesture {
            GestureState::CreatingShape { shape, .. } => Some(shape),
            _ => None,
        };
        draw_scene(
            surface,
            &self.scene,
            &self.camera,
            self.viewport_size,
            &self.selection,
            provisional,
            options,
        );
    }

    // ------------------------------------------------------------------

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    fn place_text(&mut self, position: Point) -> ShapeId {
        let mut text = Text::new(position, NEW_TEXT_CONTENT.to_string());
        text.style = self.style.clone();
        let id = self.scene.add_shape(Shape::Text(text));
        self.selection.set(ObjectId::Shape(id));
        self.history.record(&self.scene);
        self.tool = ToolKind::Hybrid;
        id
    }

    fn place_default_table(&mut self, position: Point) {
        self.next_table_number += 1;
        let config = TableConfig {
            position,
            label: format!("Table {}", self.next_table_number),
            ..TableConfig::default()
        };
        // The default config carries no occupant list, so creation cannot
        // violate the seat contract
        let Ok(table) = Table::new(config) else {
            return;
        };
        let id = self.scene.add_table(table);
        self.selection.set(ObjectId::Table(id));
        if let Some(cb) = &mut self.callbacks.table_selected {
            cb(id);
        }
        self.history.record(&self.scene);
        self.tool = ToolKind::Hybrid;
    }

    fn after_history_jump(&mut self) {
        self.gesture = GestureState::Idle;
        self.selection.prune(&self.scene);
    }
}

/// Remove the topmost object under the eraser, releasing table occupants
/// to the host. Returns true if anything was removed.
fn erase_step(
    scene: &mut Scene,
    selection: &mut Selection,
    callbacks: &mut Callbacks,
    point: Point,
    tolerance: f64,
) -> bool {
    let Some(id) = scene.object_at_point(point, tolerance) else {
        return false;
    };
    if let Some(SceneObject::Table(mut table)) = scene.remove(id) {
        callbacks.release_seats(table.take_occupants());
    }
    selection.prune(scene);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hallplan_core::shapes::{Circle as CircleShape, Rect as RectShape};
    use hallplan_core::table::TableKind;
    use hallplan_render::{DrawCall, RecordingSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(editor: &mut Editor, x: f64, y: f64) {
        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        });
    }

    fn drag(editor: &mut Editor, x: f64, y: f64) {
        editor.handle_pointer(PointerEvent::Move { position: Point::new(x, y) });
    }

    fn release(editor: &mut Editor, x: f64, y: f64) {
        editor.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        });
    }

    fn click(editor: &mut Editor, x: f64, y: f64) {
        press(editor, x, y);
        release(editor, x, y);
    }

    fn draw_rect_gesture(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> ShapeId {
        editor.set_tool(ToolKind::Rect);
        press(editor, from.0, from.1);
        drag(editor, to.0, to.1);
        release(editor, to.0, to.1);
        match editor.selection().single() {
            Some(ObjectId::Shape(id)) => id,
            other => panic!("expected shape selected after creation, got {other:?}"),
        }
    }

    #[test]
    fn test_create_rect_and_undo() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (10.0, 10.0), (110.0, 60.0));

        assert_eq!(editor.scene().shapes.len(), 1);
        let Shape::Rect(rect) = &editor.scene().shapes[0] else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 10.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);

        // Creation auto-returns to Hybrid
        assert_eq!(editor.tool(), ToolKind::Hybrid);

        assert!(editor.undo());
        assert!(editor.scene().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.scene().shapes.len(), 1);
    }

    #[test]
    fn test_duplicate_circle_offsets_and_reselects() {
        let mut editor = Editor::new();
        let circle = CircleShape::new(Point::new(50.0, 50.0), 20.0);
        let original_id = editor.scene.add_shape(Shape::Circle(circle));
        editor.history.record(&editor.scene);
        editor.selection.set(ObjectId::Shape(original_id));

        editor.duplicate_selected();

        assert_eq!(editor.scene().shapes.len(), 2);
        let new_id = match editor.selection().single() {
            Some(ObjectId::Shape(id)) => id,
            other => panic!("expected duplicated shape selected, got {other:?}"),
        };
        assert_ne!(new_id, original_id);

        let Some(Shape::Circle(copy)) = editor.scene().shape(new_id) else {
            panic!("expected circle");
        };
        assert!((copy.center.x - 60.0).abs() < f64::EPSILON);
        assert!((copy.center.y - 60.0).abs() < f64::EPSILON);
        assert!((copy.radius - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_stable_click_target() {
        let mut editor = Editor::new();
        let mut rect = RectShape::new(Point::new(90.0, 90.0), 20.0, 20.0);
        rect.style.fill_color = Some(hallplan_core::shapes::SerializableColor::white());
        let id = editor.scene.add_shape(Shape::Rect(rect));
        editor.history.record(&editor.scene);

        // At zoom 1, screen (100,100) is model (100,100): hits the rect
        click(&mut editor, 100.0, 100.0);
        assert_eq!(editor.selection().single(), Some(ObjectId::Shape(id)));

        editor.selection.clear();

        // Zoom about that exact screen point: the model point under the
        // cursor is unchanged, so the same click hits the same object.
        editor.camera_mut().zoom_at(Point::new(100.0, 100.0), 2.0);
        click(&mut editor, 100.0, 100.0);
        assert_eq!(editor.selection().single(), Some(ObjectId::Shape(id)));
    }

    #[test]
    fn test_malformed_import_leaves_scene_untouched() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (0.0, 0.0), (50.0, 50.0));
        let before = editor.scene().clone();

        assert!(editor.import_scene("{ not valid json").is_err());
        assert_eq!(editor.scene(), &before);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (10.0, 10.0), (60.0, 40.0));
        editor
            .add_table(TableConfig {
                position: Point::new(300.0, 300.0),
                label: "Table 1".into(),
                ..TableConfig::default()
            })
            .unwrap();

        let json = editor.export_scene().unwrap();
        let before = editor.scene().clone();

        let mut other = Editor::new();
        other.import_scene(&json).unwrap();
        assert_eq!(other.scene(), &before);
        // Import re-baselines history: nothing to undo
        assert!(!other.can_undo());
    }

    #[test]
    fn test_export_independent_of_view() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (10.0, 10.0), (60.0, 40.0));

        let a: serde_json::Value = serde_json::from_str(&editor.export_scene().unwrap()).unwrap();
        editor.camera_mut().zoom_at(Point::new(200.0, 150.0), 2.3);
        editor.camera_mut().pan(Vec2::new(50.0, -30.0));
        let b: serde_json::Value = serde_json::from_str(&editor.export_scene().unwrap()).unwrap();

        assert_eq!(a["tables"], b["tables"]);
        assert_eq!(a["shapes"], b["shapes"]);
    }

    #[test]
    fn test_seat_click_dispatches_without_selecting() {
        let mut editor = Editor::new();
        let table_id = editor
            .add_table(TableConfig {
                position: Point::new(200.0, 200.0),
                chair_count: 4,
                ..TableConfig::default()
            })
            .unwrap();
        editor.selection.clear();

        let clicks: Rc<RefCell<Vec<(TableId, usize)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        editor.on_seat_click(move |table, seat| sink.borrow_mut().push((table, seat)));

        let seat_pos = editor.scene().table(table_id).unwrap().seat_position(2);
        let before = editor.scene().clone();
        click(&mut editor, seat_pos.x, seat_pos.y);

        assert_eq!(clicks.borrow().as_slice(), &[(table_id, 2)]);
        // No selection change, no table movement
        assert!(editor.selection().is_empty());
        assert_eq!(editor.scene(), &before);
    }

    #[test]
    fn test_table_selected_callback() {
        let mut editor = Editor::new();
        let table_id = editor
            .add_table(TableConfig {
                position: Point::new(200.0, 200.0),
                ..TableConfig::default()
            })
            .unwrap();
        editor.selection.clear();

        let selected: Rc<RefCell<Vec<TableId>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selected);
        editor.on_table_selected(move |id| sink.borrow_mut().push(id));

        click(&mut editor, 200.0, 200.0);
        assert_eq!(selected.borrow().last(), Some(&table_id));
        assert_eq!(editor.selection().single(), Some(ObjectId::Table(table_id)));
    }

    #[test]
    fn test_delete_table_releases_occupants() {
        let mut editor = Editor::new();
        let table_id = editor
            .add_table(TableConfig {
                position: Point::new(200.0, 200.0),
                chair_count: 4,
                ..TableConfig::default()
            })
            .unwrap();
        editor
            .scene
            .table_mut(table_id)
            .unwrap()
            .set_seat(1, Some(Occupant { name: "Ada".into(), group: "Family".into() }))
            .unwrap();

        let released: Rc<RefCell<Vec<Occupant>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&released);
        editor.on_seats_released(move |occupants| sink.borrow_mut().extend(occupants));

        editor.selection.set(ObjectId::Table(table_id));
        editor.delete_selected();

        assert!(editor.scene().is_empty());
        assert_eq!(released.borrow().len(), 1);
        assert_eq!(released.borrow()[0].name, "Ada");
    }

    #[test]
    fn test_pan_mode_never_selects() {
        let mut editor = Editor::new();
        let mut rect = RectShape::new(Point::new(90.0, 90.0), 20.0, 20.0);
        rect.style.fill_color = Some(hallplan_core::shapes::SerializableColor::white());
        editor.scene.add_shape(Shape::Rect(rect));
        editor.history.record(&editor.scene);

        editor.set_tool(ToolKind::Pan);
        press(&mut editor, 100.0, 100.0);
        drag(&mut editor, 150.0, 120.0);
        release(&mut editor, 150.0, 120.0);

        assert!(editor.selection().is_empty());
        // The drag panned the view instead
        assert!((editor.camera().offset.x - 50.0).abs() < f64::EPSILON);
        assert!((editor.camera().offset.y - 20.0).abs() < f64::EPSILON);
        // And the scene itself is untouched
        assert_eq!(editor.scene().shapes[0].bounds().origin(), Point::new(90.0, 90.0));
    }

    #[test]
    fn test_hybrid_pan_trigger_suspends_interaction() {
        let mut editor = Editor::new();
        let mut rect = RectShape::new(Point::new(90.0, 90.0), 20.0, 20.0);
        rect.style.fill_color = Some(hallplan_core::shapes::SerializableColor::white());
        editor.scene.add_shape(Shape::Rect(rect));

        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Middle,
        });
        editor.handle_pointer(PointerEvent::Move { position: Point::new(130.0, 100.0) });
        editor.handle_pointer(PointerEvent::Up {
            position: Point::new(130.0, 100.0),
            button: MouseButton::Middle,
        });

        assert!(editor.selection().is_empty());
        assert!((editor.camera().offset.x - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_move_gesture_records_one_snapshot() {
        let mut editor = Editor::new();
        let id = draw_rect_gesture(&mut editor, (10.0, 10.0), (60.0, 60.0));
        assert!(editor.can_undo());

        // Drag the selected rect by (30, 40) with many intermediate moves,
        // grabbing it on its left edge (the rect has no fill)
        press(&mut editor, 10.0, 30.0);
        for step in 1..=10 {
            drag(&mut editor, 10.0 + 3.0 * step as f64, 30.0 + 4.0 * step as f64);
        }
        release(&mut editor, 40.0, 70.0);

        let Some(Shape::Rect(rect)) = editor.scene().shape(id) else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 40.0).abs() < 1e-9);
        assert!((rect.position.y - 50.0).abs() < 1e-9);

        // Exactly one new snapshot despite ten intermediate moves
        assert!(editor.undo());
        let Some(Shape::Rect(rect)) = editor.scene().shape(id) else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_via_corner_handle() {
        let mut editor = Editor::new();
        let id = draw_rect_gesture(&mut editor, (10.0, 10.0), (110.0, 110.0));

        // Grab the bottom-right handle and drag outward
        press(&mut editor, 110.0, 110.0);
        drag(&mut editor, 160.0, 140.0);
        release(&mut editor, 160.0, 140.0);

        let Some(Shape::Rect(rect)) = editor.scene().shape(id) else {
            panic!("expected rect");
        };
        assert!((rect.width - 150.0).abs() < 1e-9);
        assert!((rect.height - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_handle_sets_degrees() {
        let mut editor = Editor::new();
        let id = draw_rect_gesture(&mut editor, (100.0, 100.0), (200.0, 200.0));

        // Rotation handle sits above the top edge center
        press(&mut editor, 150.0, 75.0);
        // Drag to the right of the center: 90 degrees
        drag(&mut editor, 250.0, 150.0);
        release(&mut editor, 250.0, 150.0);

        let Some(shape) = editor.scene().shape(id) else { panic!("missing shape") };
        assert!((shape.rotation_degrees() - 90.0).abs() < 1e-9);
        // Center stays fixed under rotation
        let center = shape.bounds().center();
        assert!((center.x - 150.0).abs() < 1e-9);
        assert!((center.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_tool_switch_mid_gesture_discards_provisional() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Circle);
        press(&mut editor, 50.0, 50.0);
        drag(&mut editor, 90.0, 50.0);

        editor.set_tool(ToolKind::Select);
        release(&mut editor, 90.0, 50.0);

        assert!(editor.scene().is_empty());
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn test_escape_cancels_move() {
        let mut editor = Editor::new();
        let id = draw_rect_gesture(&mut editor, (10.0, 10.0), (60.0, 60.0));

        press(&mut editor, 10.0, 30.0);
        drag(&mut editor, 60.0, 80.0);
        editor.handle_key(KeyEvent::Pressed("Escape".to_string()));

        let Some(Shape::Rect(rect)) = editor.scene().shape(id) else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 10.0).abs() < 1e-9);
        assert!(editor.gesture().is_idle());

        // The aborted gesture left no dangling state: input still works
        press(&mut editor, 10.0, 30.0);
        drag(&mut editor, 20.0, 30.0);
        release(&mut editor, 20.0, 30.0);
        let Some(Shape::Rect(rect)) = editor.scene().shape(id) else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_eraser_removes_and_records_once() {
        let mut editor = Editor::new();
        let mut a = RectShape::new(Point::new(0.0, 0.0), 20.0, 20.0);
        a.style.fill_color = Some(hallplan_core::shapes::SerializableColor::white());
        let mut b = RectShape::new(Point::new(100.0, 0.0), 20.0, 20.0);
        b.style.fill_color = Some(hallplan_core::shapes::SerializableColor::white());
        editor.scene.add_shape(Shape::Rect(a));
        editor.scene.add_shape(Shape::Rect(b));
        editor.history.record(&editor.scene);

        editor.set_tool(ToolKind::Eraser);
        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 110.0, 10.0);
        release(&mut editor, 110.0, 10.0);

        assert!(editor.scene().is_empty());
        // One undo restores both
        assert!(editor.undo());
        assert_eq!(editor.scene().shapes.len(), 2);
    }

    #[test]
    fn test_select_all_then_delete() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (0.0, 0.0), (20.0, 20.0));
        draw_rect_gesture(&mut editor, (50.0, 0.0), (70.0, 20.0));
        editor
            .add_table(TableConfig { position: Point::new(300.0, 300.0), ..TableConfig::default() })
            .unwrap();

        editor.select_all();
        assert_eq!(editor.selection().len(), 3);

        // Selecting all again is a no-op
        let before = editor.selection().clone();
        editor.select_all();
        assert_eq!(editor.selection(), &before);

        editor.delete_selected();
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_add_text_at_viewport_center() {
        let mut editor = Editor::new();
        editor.set_viewport_size(800.0, 600.0);
        let id = editor.add_text();

        let Some(Shape::Text(text)) = editor.scene().shape(id) else {
            panic!("expected text");
        };
        assert!((text.position.x - 400.0).abs() < f64::EPSILON);
        assert!((text.position.y - 300.0).abs() < f64::EPSILON);

        assert!(editor.set_text_content(id, "Dance floor"));
        let Some(Shape::Text(text)) = editor.scene().shape(id) else {
            panic!("expected text");
        };
        assert_eq!(text.content, "Dance floor");
    }

    #[test]
    fn test_table_tool_places_labeled_tables() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Table);
        click(&mut editor, 200.0, 200.0);

        assert_eq!(editor.scene().tables.len(), 1);
        assert_eq!(editor.scene().tables[0].label, "Table 1");
        // Placement returns to Hybrid
        assert_eq!(editor.tool(), ToolKind::Hybrid);

        editor.set_tool(ToolKind::Table);
        click(&mut editor, 400.0, 200.0);
        assert_eq!(editor.scene().tables[1].label, "Table 2");
    }

    #[test]
    fn test_rect_table_resize_keeps_seat_invariant() {
        let mut editor = Editor::new();
        let id = editor
            .add_table(TableConfig {
                position: Point::new(200.0, 200.0),
                kind: TableKind::Rectangle,
                width: 120.0,
                height: 60.0,
                chair_count: 6,
                ..TableConfig::default()
            })
            .unwrap();

        // Bottom-right corner of the body is at (260, 230)
        press(&mut editor, 260.0, 230.0);
        drag(&mut editor, 300.0, 260.0);
        release(&mut editor, 300.0, 260.0);

        let table = editor.scene().table(id).unwrap();
        assert!((table.width - 160.0).abs() < 1e-9);
        assert!((table.height - 90.0).abs() < 1e-9);
        assert_eq!(table.seats().len(), table.chair_count());
    }

    #[test]
    fn test_draw_renders_provisional_shape() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Rect);
        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 60.0, 60.0);

        let mut surface = RecordingSurface::new();
        editor.draw(&mut surface, &DrawOptions::default());
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Rect { .. })), 1);
    }

    #[test]
    fn test_zoom_commands_touch_viewport_only() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (10.0, 10.0), (60.0, 60.0));
        let before = editor.scene().clone();

        editor.zoom_in();
        assert!(editor.camera().zoom > 1.0);
        editor.zoom_out();
        editor.fit_to_content();
        editor.reset_zoom();
        assert!((editor.camera().zoom - 1.0).abs() < f64::EPSILON);

        assert_eq!(editor.scene(), &before);
    }

    #[test]
    fn test_pointer_leaving_surface_aborts_gesture() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Rect);
        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 50.0, 50.0);

        editor.pointer_left_surface();

        assert!(editor.gesture().is_idle());
        assert!(editor.scene().is_empty());
        // A later release finds no dangling gesture to commit
        release(&mut editor, 50.0, 50.0);
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_keyboard_undo_redo() {
        let mut editor = Editor::new();
        draw_rect_gesture(&mut editor, (0.0, 0.0), (20.0, 20.0));

        editor.set_modifiers(Modifiers { ctrl: true, ..Modifiers::default() });
        editor.handle_key(KeyEvent::Pressed("z".to_string()));
        assert!(editor.scene().is_empty());

        editor.set_modifiers(Modifiers { ctrl: true, shift: true, ..Modifiers::default() });
        editor.handle_key(KeyEvent::Pressed("z".to_string()));
        assert_eq!(editor.scene().shapes.len(), 1);
    }
}
