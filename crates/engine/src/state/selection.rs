//! Selection state
//!
//! Holds the set of selected object names (weak references into the scene
//! store) and the last-action status line. Names of deleted objects are
//! purged by the command interpreter; `resolve` silently drops any that
//! remain.

use shared::SceneObject;

use super::scene::SceneState;

/// Object selection state (supports multi-select)
#[derive(Default)]
pub struct SelectionState {
    /// Selected object names (in order of selection)
    selected: Vec<String>,
    /// Human-readable outcome of the most recent action
    last_action: String,
}

impl SelectionState {
    /// Toggle selection of a single name
    pub fn toggle(&mut self, name: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == name) {
            self.selected.remove(pos);
            self.last_action = format!("Deselected {name}");
        } else {
            self.selected.push(name.to_string());
            self.last_action = format!("Selected {name}");
        }
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_action = "Deselected all objects".to_string();
    }

    /// Replace the selection with exactly `names`, recording a count message
    pub fn select_all(&mut self, names: Vec<String>) {
        self.last_action = format!("Selected all {} objects", names.len());
        self.selected = names;
    }

    /// Replace the selection without touching the status line
    pub fn set_selected(&mut self, names: Vec<String>) {
        self.selected = names;
    }

    /// Drop a single name from the selection if present
    pub fn discard(&mut self, name: &str) {
        self.selected.retain(|s| s != name);
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// All selected names, in selection order
    pub fn names(&self) -> &[String] {
        &self.selected
    }

    /// Resolve the selection against the live scene, silently dropping
    /// names whose objects no longer exist
    pub fn resolve<'a>(&self, scene: &'a SceneState) -> Vec<&'a SceneObject> {
        self.selected
            .iter()
            .filter_map(|name| scene.get(name))
            .collect()
    }

    pub fn last_action(&self) -> &str {
        &self.last_action
    }

    pub fn set_last_action(&mut self, action: impl Into<String>) {
        self.last_action = action.into();
    }
}
