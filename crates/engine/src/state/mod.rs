//! Application state container
//!
//! All mutable state lives here and is passed by handle into the command
//! interpreter and the terrain generator; nothing is module-global.

pub mod model_search;
pub mod scene;
pub mod selection;
pub mod textures;

pub use model_search::ModelSearchState;
pub use scene::{ObjectPatch, SceneState};
pub use selection::SelectionState;
pub use textures::{TextureCatalog, TextureCategory, TextureEntry};

use shared::SceneContext;

/// Combined application state
#[derive(Default)]
pub struct AppState {
    pub scene: SceneState,
    pub selection: SelectionState,
    pub textures: TextureCatalog,
    pub model_search: ModelSearchState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene summary handed to the language-translation collaborator
    pub fn context(&self) -> SceneContext {
        SceneContext {
            object_names: self.scene.names(),
            selected_names: self.selection.names().to_vec(),
        }
    }
}
