//! Headless harness for programmatic scene manipulation.
//!
//! Bundles the application state with an interpreter wired to in-process
//! collaborators, so commands can be driven without any network or UI.
//! This is both the embedding API and the backbone of the test suite.

use async_trait::async_trait;
use shared::{ModelHit, ModelSearchResponse, SceneContext, SceneObject};

use crate::command::Interpreter;
use crate::services::{CommandTranslator, ModelCatalog, ServiceError};
use crate::state::AppState;

/// In-process model catalog with a tiny fixed inventory, keyed by search
/// term. Unknown terms return an empty result with an error note, the
/// same shape a real catalog produces.
#[derive(Default)]
pub struct FixedModelCatalog;

impl FixedModelCatalog {
    fn inventory(term: &str) -> Vec<(&'static str, &'static str)> {
        match term.to_lowercase().as_str() {
            "car" => vec![
                ("Sports Car", "A sleek sports car model"),
                ("Family Car", "A comfortable family sedan"),
                ("Pickup Truck", "A sturdy pickup truck"),
            ],
            "house" => vec![
                ("Modern House", "A contemporary modern house"),
                ("Cottage", "A cozy cottage house"),
            ],
            "tree" => vec![
                ("Oak Tree", "A large oak tree"),
                ("Pine Tree", "A tall pine tree"),
            ],
            _ => vec![],
        }
    }
}

#[async_trait]
impl ModelCatalog for FixedModelCatalog {
    async fn search_models(&self, term: &str) -> Result<ModelSearchResponse, ServiceError> {
        let hits: Vec<ModelHit> = Self::inventory(term)
            .into_iter()
            .map(|(name, description)| ModelHit {
                name: name.to_string(),
                url: format!(
                    "https://models.local/{}.glb",
                    name.to_lowercase().replace(' ', "-")
                ),
                thumbnail: None,
                description: Some(description.to_string()),
                source: "Fixed Catalog".to_string(),
            })
            .collect();
        let total = hits.len();
        Ok(ModelSearchResponse {
            models: hits,
            total,
            error: if total == 0 {
                Some(format!("No models found for type: {term}"))
            } else {
                None
            },
        })
    }
}

/// Catalog that always fails, for exercising the error path
pub struct FailingModelCatalog;

#[async_trait]
impl ModelCatalog for FailingModelCatalog {
    async fn search_models(&self, _term: &str) -> Result<ModelSearchResponse, ServiceError> {
        Err(ServiceError::Transport("connection refused".to_string()))
    }
}

/// Translator that replies with a fixed line, or fails when given none
pub struct CannedTranslator {
    pub reply: Option<String>,
}

#[async_trait]
impl CommandTranslator for CannedTranslator {
    async fn translate(&self, _raw: &str, _ctx: &SceneContext) -> Result<String, ServiceError> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ServiceError::Unsuccessful("model overloaded".to_string())),
        }
    }
}

/// Headless harness: state plus an interpreter over fixed collaborators
pub struct TestHarness {
    pub state: AppState,
    pub interpreter: Interpreter,
}

impl TestHarness {
    /// Harness with the fixed in-process model catalog and no translator
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            interpreter: Interpreter::new(Box::new(FixedModelCatalog)),
        }
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        Self {
            state: AppState::new(),
            interpreter,
        }
    }

    /// Execute one command line and return its status
    pub async fn run(&mut self, line: &str) -> String {
        self.interpreter.execute(&mut self.state, line).await
    }

    /// Resolve a pending model search by candidate index (0-based)
    pub fn pick_model(&mut self, index: usize) -> String {
        self.interpreter.pick_model(&mut self.state, index)
    }

    /// Cancel a pending model search
    pub fn cancel_model_search(&mut self) -> String {
        self.interpreter.cancel_model_search(&mut self.state)
    }

    /// Export the scene as the versioned document the persistence
    /// collaborator consumes
    pub fn export_scene_json(&self) -> String {
        let file = shared::SceneFile::snapshot(self.state.scene.objects().to_vec());
        serde_json::to_string_pretty(&file).unwrap_or_default()
    }

    // ── Inspection helpers ────────────────────────────────────

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.state.scene.get(name)
    }

    pub fn object_count(&self) -> usize {
        self.state.scene.count()
    }

    pub fn selected(&self) -> Vec<String> {
        self.state.selection.names().to_vec()
    }

    pub fn last_action(&self) -> &str {
        self.state.selection.last_action()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cube_scenario() {
        let mut h = TestHarness::new();
        let status = h.run("create cube at 2 0 0").await;

        assert_eq!(h.object_count(), 1);
        let obj = h.object("box1").unwrap();
        assert_eq!(obj.geometry, shared::GeometryKind::Box);
        assert_eq!(obj.position, [2.0, 0.0, 0.0]);
        assert_eq!(obj.scale, [1.0, 1.0, 1.0]);
        assert_eq!(obj.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(h.selected(), vec!["box1".to_string()]);
        assert_eq!(status, "Created box1 at position [2, 0, 0]");
    }

    #[tokio::test]
    async fn test_create_terrain_scenario() {
        let mut h = TestHarness::new();
        h.run("create terrain heightmap3 at 0 0 0").await;

        let obj = h.object("terrain1").unwrap();
        let params = obj.terrain.as_ref().unwrap();
        assert_eq!(params.variant, shared::TerrainVariant::Heightmap3);
        assert_eq!(params.heightmap_index, 3);

        let config = crate::terrain::variant_config(params.variant);
        assert_eq!(config.displacement_scale, 18.0);
        assert_eq!(config.width_scale, 120.0);
        assert_eq!(config.segments, 120);
    }

    #[tokio::test]
    async fn test_select_all_then_scale_scenario() {
        let mut h = TestHarness::new();
        h.run("create cube at 0 0 0").await;
        h.run("create sphere at 1 0 0").await;

        let status = h.run("select all").await;
        assert_eq!(status, "Selected all 2 objects");
        assert_eq!(h.selected(), vec!["box1".to_string(), "sphere2".to_string()]);

        h.run("scale selected 2").await;
        assert_eq!(h.object("box1").unwrap().scale, [2.0, 2.0, 2.0]);
        assert_eq!(h.object("sphere2").unwrap().scale, [2.0, 2.0, 2.0]);
    }

    #[tokio::test]
    async fn test_move_to_and_by_scenario() {
        let mut h = TestHarness::new();
        h.run("create cube at 1 1 1").await;

        h.run("move box1 to 5 5 5").await;
        assert_eq!(h.object("box1").unwrap().position, [5.0, 5.0, 5.0]);

        h.run("move box1 3 0 0").await;
        assert_eq!(h.object("box1").unwrap().position, [8.0, 5.0, 5.0]);
    }

    #[tokio::test]
    async fn test_change_texture_without_terrain_is_noop() {
        let mut h = TestHarness::new();
        h.run("create cube at 0 0 0").await;
        let before = h.object("box1").unwrap().clone();
        let selected_before = h.selected();

        let status = h.run("change texture grass next").await;

        assert_eq!(h.object("box1").unwrap(), &before);
        assert_eq!(h.selected(), selected_before);
        assert_eq!(status, "No terrain objects selected. Select a terrain first.");
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let mut h = TestHarness::new();
        h.run("create cube at 0 0 0").await;
        h.run("select all").await;

        let status = h.run("delete cube99").await;

        assert_eq!(h.object_count(), 1);
        assert_eq!(h.selected(), vec!["box1".to_string()]);
        assert_eq!(status, "Object not found: cube99");
    }

    #[tokio::test]
    async fn test_model_search_pick_flow() {
        let mut h = TestHarness::new();
        let status = h.run("create model car at 1 2 3").await;
        assert_eq!(
            status,
            "Found 3 models for \"car\". Select one to place at position [1, 2, 3]."
        );
        assert_eq!(h.object_count(), 0);

        let status = h.pick_model(0);
        assert_eq!(status, "Created 3D model: sports_car1 at position [1, 2, 3]");
        let obj = h.object("sports_car1").unwrap();
        assert_eq!(obj.geometry, shared::GeometryKind::Model);
        assert_eq!(obj.position, [1.0, 2.0, 3.0]);
        assert_eq!(
            obj.model.as_ref().unwrap().url,
            "https://models.local/sports-car.glb"
        );
        assert_eq!(h.selected(), vec!["sports_car1".to_string()]);
    }

    #[tokio::test]
    async fn test_model_search_cancel_flow() {
        let mut h = TestHarness::new();
        h.run("create model house").await;
        assert!(h.state.model_search.results().is_some());

        let status = h.cancel_model_search();
        assert_eq!(status, "Model search cancelled");
        assert_eq!(h.object_count(), 0);
        assert_eq!(h.pick_model(0), "No pending model search");
    }

    #[tokio::test]
    async fn test_model_search_no_hits() {
        let mut h = TestHarness::new();
        let status = h.run("create model unicorn").await;
        assert_eq!(status, "No models found for: unicorn");
        assert!(h.state.model_search.is_idle());
    }

    #[tokio::test]
    async fn test_model_search_failure_mutates_nothing() {
        let mut h =
            TestHarness::with_interpreter(Interpreter::new(Box::new(FailingModelCatalog)));
        let status = h.run("create model car").await;
        assert!(status.starts_with("Failed to search for models:"));
        assert_eq!(h.object_count(), 0);
        assert!(h.state.model_search.is_idle());
    }

    #[tokio::test]
    async fn test_export_scene_document_shape() {
        let mut h = TestHarness::new();
        h.run("create cube at 2 0 0").await;
        h.run("create terrain heightmap2").await;

        let json = h.export_scene_json();
        let file: shared::SceneFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.version, "1.0");
        assert_eq!(file.metadata.total_objects, 2);
        assert_eq!(file.scene.objects.len(), 2);
        assert_eq!(file.scene.objects[0].name, "box1");
        assert!(file.scene.objects[1].terrain.is_some());
    }

    #[tokio::test]
    async fn test_translator_reply_is_executed() {
        let interpreter = Interpreter::new(Box::new(FixedModelCatalog)).with_translator(
            Box::new(CannedTranslator {
                reply: Some("create cube at 2 0 0".to_string()),
            }),
        );
        let mut h = TestHarness::with_interpreter(interpreter);
        h.run("please put a cube at two zero zero").await;
        assert_eq!(h.object("box1").unwrap().position, [2.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_translator_failure_aborts() {
        let interpreter = Interpreter::new(Box::new(FixedModelCatalog))
            .with_translator(Box::new(CannedTranslator { reply: None }));
        let mut h = TestHarness::with_interpreter(interpreter);
        let status = h.run("make me a cube").await;
        assert!(status.starts_with("AI parsing failed:"));
        assert_eq!(h.object_count(), 0);
    }
}
