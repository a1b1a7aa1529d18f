//! Bounded undo/redo history of scene snapshots.

use crate::scene::Scene;

/// Maximum number of snapshots kept on the undo stack.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo history.
///
/// The undo stack holds full scene snapshots in gesture-completion order;
/// the top entry is always the current committed state. Recording a
/// snapshot identical to the top is a no-op, so gestures that change
/// nothing never pollute the history. Any new snapshot clears the redo
/// stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<Scene>,
    redo: Vec<Scene>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all history and establish `baseline` as the only entry.
    /// Used when a scene is created or imported wholesale.
    pub fn reset(&mut self, baseline: &Scene) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push(baseline.clone());
    }

    /// Record the scene after a completed gesture.
    ///
    /// Structural equality against the top entry stands in for comparing
    /// serialized forms; for this model the two are equivalent.
    pub fn record(&mut self, scene: &Scene) {
        if self.undo.last() == Some(scene) {
            return;
        }
        self.undo.push(scene.clone());
        self.redo.clear();
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
    }

    /// Step back one snapshot. Returns the scene to restore, or None at
    /// the bottom of history.
    pub fn undo(&mut self) -> Option<Scene> {
        if self.undo.len() < 2 {
            return None;
        }
        let current = self.undo.pop()?;
        self.redo.push(current);
        self.undo.last().cloned()
    }

    /// Step forward one snapshot. Returns the scene to restore, or None if
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<Scene> {
        let scene = self.redo.pop()?;
        self.undo.push(scene.clone());
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
        Some(scene)
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Depth of the undo stack (current state included).
    pub fn depth(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rect, Shape};
    use kurbo::Point;

    fn scene_with_rects(count: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..count {
            scene.add_shape(Shape::Rect(Rect::new(
                Point::new(i as f64 * 10.0, 0.0),
                10.0,
                10.0,
            )));
        }
        scene
    }

    #[test]
    fn test_undo_at_baseline_is_noop() {
        let mut history = History::new();
        history.reset(&Scene::new());
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::new();
        let empty = Scene::new();
        let one = scene_with_rects(1);
        let two = scene_with_rects(2);

        history.reset(&empty);
        history.record(&one);
        history.record(&two);

        assert_eq!(history.undo().as_ref(), Some(&one));
        assert_eq!(history.undo().as_ref(), Some(&empty));
        assert!(history.undo().is_none());

        assert_eq!(history.redo().as_ref(), Some(&one));
        assert_eq!(history.redo().as_ref(), Some(&two));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.reset(&Scene::new());
        history.record(&scene_with_rects(1));
        history.undo();
        assert!(history.can_redo());

        history.record(&scene_with_rects(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_duplicate_record_is_noop() {
        let mut history = History::new();
        let one = scene_with_rects(1);
        history.reset(&one);
        history.record(&one);
        assert_eq!(history.depth(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_history_bounded_at_capacity() {
        let mut history = History::new();
        history.reset(&Scene::new());
        for i in 1..=(MAX_HISTORY + 20) {
            history.record(&scene_with_rects(i));
        }
        assert_eq!(history.depth(), MAX_HISTORY);
    }

    #[test]
    fn test_eviction_drops_oldest_first() {
        let mut history = History::new();
        history.reset(&Scene::new());
        for i in 1..=MAX_HISTORY {
            history.record(&scene_with_rects(i));
        }
        // The baseline (empty scene) was evicted; undoing all the way down
        // lands on the oldest surviving snapshot, not the baseline.
        let mut last = None;
        while let Some(scene) = history.undo() {
            last = Some(scene);
        }
        assert_eq!(last.expect("history had entries").shapes.len(), 1);
    }
}
