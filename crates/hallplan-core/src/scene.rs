//! Scene aggregate: every table and shape in the hall at a point in time.

use crate::shapes::{Shape, ShapeId};
use crate::table::{Table, TableId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Reference to an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectId {
    Shape(ShapeId),
    Table(TableId),
}

/// An owned scene object, as handed around by move/duplicate gestures.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Shape(Shape),
    Table(Table),
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        match self {
            SceneObject::Shape(s) => ObjectId::Shape(s.id()),
            SceneObject::Table(t) => ObjectId::Table(t.id()),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            SceneObject::Shape(s) => s.bounds(),
            SceneObject::Table(t) => t.bounds(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            SceneObject::Shape(s) => s.translate(delta),
            SceneObject::Table(t) => t.translate(delta),
        }
    }

    pub fn regenerate_id(&mut self) {
        match self {
            SceneObject::Shape(s) => s.regenerate_id(),
            SceneObject::Table(t) => t.regenerate_id(),
        }
    }
}

/// The full set of tables and shapes. This is the unit that history
/// snapshots and the scene file operate on.
///
/// Z-order: shapes render below tables; within each list, later entries
/// render on top. Hit-testing walks front-to-back accordingly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub tables: Vec<Table>,
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.shapes.is_empty()
    }

    /// Total number of objects.
    pub fn len(&self) -> usize {
        self.tables.len() + self.shapes.len()
    }

    /// Add a shape, returning its id.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    /// Add a table, returning its id.
    pub fn add_table(&mut self, table: Table) -> TableId {
        let id = table.id();
        self.tables.push(table);
        id
    }

    /// Insert an owned object back into the scene.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        match object {
            SceneObject::Shape(s) => ObjectId::Shape(self.add_shape(s)),
            SceneObject::Table(t) => ObjectId::Table(self.add_table(t)),
        }
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id() == id)
    }

    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id() == id)
    }

    /// Look up an object by reference, cloned out of the scene.
    pub fn object(&self, id: ObjectId) -> Option<SceneObject> {
        match id {
            ObjectId::Shape(sid) => self.shape(sid).cloned().map(SceneObject::Shape),
            ObjectId::Table(tid) => self.table(tid).cloned().map(SceneObject::Table),
        }
    }

    /// Replace an existing object in place. Returns false if the id is
    /// no longer present.
    pub fn replace_object(&mut self, object: SceneObject) -> bool {
        match object {
            SceneObject::Shape(s) => {
                if let Some(slot) = self.shape_mut(s.id()) {
                    *slot = s;
                    true
                } else {
                    false
                }
            }
            SceneObject::Table(t) => {
                if let Some(slot) = self.table_mut(t.id()) {
                    *slot = t;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove an object, returning it.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        match id {
            ObjectId::Shape(sid) => {
                let idx = self.shapes.iter().position(|s| s.id() == sid)?;
                Some(SceneObject::Shape(self.shapes.remove(idx)))
            }
            ObjectId::Table(tid) => {
                let idx = self.tables.iter().position(|t| t.id() == tid)?;
                Some(SceneObject::Table(self.tables.remove(idx)))
            }
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        match id {
            ObjectId::Shape(sid) => self.shape(sid).is_some(),
            ObjectId::Table(tid) => self.table(tid).is_some(),
        }
    }

    /// Every object reference, tables first, in z-order (back to front).
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.tables
            .iter()
            .map(|t| ObjectId::Table(t.id()))
            .chain(self.shapes.iter().map(|s| ObjectId::Shape(s.id())))
            .collect()
    }

    /// Find the topmost object at a point (in model coordinates).
    /// Tables sit above shapes; within each list, later entries win.
    pub fn object_at_point(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        for table in self.tables.iter().rev() {
            if table.hit_test(point, tolerance) {
                return Some(ObjectId::Table(table.id()));
            }
        }
        for shape in self.shapes.iter().rev() {
            if shape.hit_test(point, tolerance) {
                return Some(ObjectId::Shape(shape.id()));
            }
        }
        None
    }

    /// Bounding box of everything in the scene, chair rings included.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        let mut extend = |bounds: Rect| {
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        };
        for table in &self.tables {
            extend(table.outer_bounds());
        }
        for shape in &self.shapes {
            extend(shape.bounds());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rect as RectShape;
    use crate::table::TableConfig;

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut scene = Scene::new();
        let id = scene.add_shape(Shape::Rect(RectShape::new(Point::ZERO, 100.0, 100.0)));

        assert_eq!(scene.len(), 1);
        assert!(scene.contains(ObjectId::Shape(id)));

        let removed = scene.remove(ObjectId::Shape(id));
        assert!(removed.is_some());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_object_at_point_prefers_topmost() {
        let mut scene = Scene::new();
        let mut below = RectShape::new(Point::ZERO, 100.0, 100.0);
        below.style.fill_color = Some(crate::shapes::SerializableColor::white());
        let mut above = RectShape::new(Point::new(50.0, 50.0), 100.0, 100.0);
        above.style.fill_color = Some(crate::shapes::SerializableColor::white());
        let id_below = scene.add_shape(Shape::Rect(below));
        let id_above = scene.add_shape(Shape::Rect(above));

        // Overlap region: later shape wins
        assert_eq!(
            scene.object_at_point(Point::new(75.0, 75.0), 0.0),
            Some(ObjectId::Shape(id_above))
        );
        // Region only covered by the first shape
        assert_eq!(
            scene.object_at_point(Point::new(25.0, 25.0), 0.0),
            Some(ObjectId::Shape(id_below))
        );
    }

    #[test]
    fn test_tables_hit_above_shapes() {
        let mut scene = Scene::new();
        let mut rect = RectShape::new(Point::new(60.0, 60.0), 80.0, 80.0);
        rect.style.fill_color = Some(crate::shapes::SerializableColor::white());
        scene.add_shape(Shape::Rect(rect));
        let table = Table::new(TableConfig {
            position: Point::new(100.0, 100.0),
            ..TableConfig::default()
        })
        .unwrap();
        let table_id = scene.add_table(table);

        assert_eq!(
            scene.object_at_point(Point::new(100.0, 100.0), 0.0),
            Some(ObjectId::Table(table_id))
        );
    }

    #[test]
    fn test_replace_object() {
        let mut scene = Scene::new();
        let id = scene.add_shape(Shape::Rect(RectShape::new(Point::ZERO, 10.0, 10.0)));

        let mut moved = scene.object(ObjectId::Shape(id)).unwrap();
        moved.translate(Vec2::new(5.0, 5.0));
        assert!(scene.replace_object(moved));

        let Some(Shape::Rect(rect)) = scene.shape(id) else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 5.0).abs() < f64::EPSILON);
    }
}
