//! Canonical scene file format.
//!
//! Scene geometry is stored in canonical coordinates (zoom = 1, no pan), so
//! exporting is a plain serialization of the model and is byte-identical
//! whatever view the user happens to be looking through. `canvas_meta` only
//! records the view for restoring it on reload; it is never needed for
//! geometric correctness.

use crate::camera::Camera;
use crate::scene::Scene;
use crate::shapes::Shape;
use crate::table::Table;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current scene file format version.
pub const SCENE_FORMAT_VERSION: &str = "1.0";

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("table \"{label}\": {source}")]
    Table {
        label: String,
        source: crate::table::TableError,
    },
}

/// Informational view metadata stored alongside the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasMeta {
    /// Zoom level active when the scene was exported.
    pub zoom_at_export: f64,
    /// Viewport width at export, in screen units.
    pub width: f64,
    /// Viewport height at export, in screen units.
    pub height: f64,
}

impl Default for CanvasMeta {
    fn default() -> Self {
        Self {
            zoom_at_export: 1.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// The versioned on-disk scene document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: String,
    pub tables: Vec<Table>,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub canvas_meta: CanvasMeta,
}

impl SceneFile {
    /// Split into the scene aggregate and the view metadata.
    pub fn into_parts(self) -> (Scene, CanvasMeta) {
        (
            Scene {
                tables: self.tables,
                shapes: self.shapes,
            },
            self.canvas_meta,
        )
    }
}

/// Serialize a scene to its canonical JSON form.
pub fn encode(scene: &Scene, camera: &Camera, viewport: Size) -> Result<String, serde_json::Error> {
    let file = SceneFile {
        version: SCENE_FORMAT_VERSION.to_string(),
        tables: scene.tables.clone(),
        shapes: scene.shapes.clone(),
        canvas_meta: CanvasMeta {
            zoom_at_export: camera.zoom,
            width: viewport.width,
            height: viewport.height,
        },
    };
    serde_json::to_string_pretty(&file)
}

/// Parse and validate a scene file.
///
/// Structural failures (malformed JSON, missing tables/shapes arrays, a
/// table whose seat list contradicts its chair count) are rejected; the
/// caller's live scene is left untouched.
pub fn decode(json: &str) -> Result<SceneFile, ImportError> {
    let mut file: SceneFile = serde_json::from_str(json)?;

    for table in &mut file.tables {
        // Chair count is a bounded value: clamp, don't reject
        if table.chair_count() == 0 {
            log::warn!("clamping chair count of table {:?} to 1", table.label);
            table.set_chair_count(1);
        }
        table.check_seats().map_err(|source| {
            log::warn!("rejecting scene import: table {:?} fails seat invariant", table.label);
            ImportError::Table {
                label: table.label.clone(),
                source,
            }
        })?;
    }

    if file.version != SCENE_FORMAT_VERSION {
        log::debug!("importing scene with version {:?}", file.version);
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Line, Rect, Text};
    use crate::table::{Occupant, TableConfig, TableKind};
    use kurbo::{Point, Vec2};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Rect(Rect::new(Point::new(10.0, 10.0), 100.0, 50.0)));
        scene.add_shape(Shape::Circle(Circle::new(Point::new(200.0, 80.0), 30.0)));
        scene.add_shape(Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 120.0),
        )));
        scene.add_shape(Shape::Text(Text::new(Point::new(5.0, 5.0), "Stage".into())));

        let mut table = Table::new(TableConfig {
            position: Point::new(400.0, 300.0),
            kind: TableKind::Rectangle,
            width: 160.0,
            height: 80.0,
            chair_count: 6,
            label: "Table 1".into(),
            occupants: None,
        })
        .unwrap();
        table
            .set_seat(2, Some(Occupant { name: "Ada".into(), group: "Family".into() }))
            .unwrap();
        scene.add_table(table);
        scene
    }

    #[test]
    fn test_round_trip() {
        let scene = sample_scene();
        let json = encode(&scene, &Camera::new(), Size::new(800.0, 600.0)).unwrap();
        let (restored, _) = decode(&json).unwrap().into_parts();
        assert_eq!(restored, scene);
    }

    #[test]
    fn test_export_is_viewport_independent() {
        let scene = sample_scene();
        let viewport = Size::new(800.0, 600.0);

        let canonical = Camera::new();
        let mut zoomed = Camera::new();
        zoomed.zoom = 2.3;
        zoomed.offset = Vec2::new(50.0, -30.0);

        let a: serde_json::Value =
            serde_json::from_str(&encode(&scene, &canonical, viewport).unwrap()).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(&encode(&scene, &zoomed, viewport).unwrap()).unwrap();

        // Geometry payloads are identical; only canvas_meta may differ
        assert_eq!(a["tables"], b["tables"]);
        assert_eq!(a["shapes"], b["shapes"]);
        assert_ne!(a["canvas_meta"], b["canvas_meta"]);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(decode("{ not valid json"), Err(ImportError::Json(_))));
    }

    #[test]
    fn test_missing_arrays_rejected() {
        assert!(decode(r#"{ "version": "1.0" }"#).is_err());
        assert!(decode(r#"{ "version": "1.0", "tables": [] }"#).is_err());
    }

    #[test]
    fn test_seat_invariant_enforced_on_import() {
        let scene = sample_scene();
        let mut json: serde_json::Value =
            serde_json::from_str(&encode(&scene, &Camera::new(), Size::ZERO).unwrap()).unwrap();
        // Corrupt the seat list length
        json["tables"][0]["seats"] = serde_json::json!([null, null]);
        let result = decode(&json.to_string());
        assert!(matches!(result, Err(ImportError::Table { .. })));
    }

    #[test]
    fn test_zero_chair_count_clamped() {
        let scene = sample_scene();
        let mut json: serde_json::Value =
            serde_json::from_str(&encode(&scene, &Camera::new(), Size::ZERO).unwrap()).unwrap();
        json["tables"][0]["chair_count"] = serde_json::json!(0);
        json["tables"][0]["seats"] = serde_json::json!([]);

        let file = decode(&json.to_string()).unwrap();
        assert_eq!(file.tables[0].chair_count(), 1);
        assert_eq!(file.tables[0].seats().len(), 1);
    }

    #[test]
    fn test_canvas_meta_optional() {
        let json = r#"{ "version": "1.0", "tables": [], "shapes": [] }"#;
        let file = decode(json).unwrap();
        assert!((file.canvas_meta.zoom_at_export - 1.0).abs() < f64::EPSILON);
    }
}
