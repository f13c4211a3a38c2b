//! Shared data model for the scenecraft workspace.
//!
//! Everything here is plain serde data: the scene object shape, terrain
//! parameters, the wire DTOs spoken with external collaborators, and the
//! versioned persistence document consumed by the import/export side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Geometry kind of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Box,
    Sphere,
    Cylinder,
    Terrain,
    Model,
}

impl GeometryKind {
    /// Prefix used when generating object names (`box1`, `terrain2`, ...)
    pub fn name_prefix(self) -> &'static str {
        match self {
            GeometryKind::Box => "box",
            GeometryKind::Sphere => "sphere",
            GeometryKind::Cylinder => "cylinder",
            GeometryKind::Terrain => "terrain",
            GeometryKind::Model => "model",
        }
    }

    /// Parse a user-facing kind token. `cube` is accepted as an alias
    /// for `box`.
    pub fn parse_token(token: &str) -> Option<GeometryKind> {
        match token {
            "box" | "cube" => Some(GeometryKind::Box),
            "sphere" => Some(GeometryKind::Sphere),
            "cylinder" => Some(GeometryKind::Cylinder),
            "terrain" => Some(GeometryKind::Terrain),
            "model" => Some(GeometryKind::Model),
            _ => None,
        }
    }

    /// Default fill color for basic shapes
    pub fn default_color(self) -> &'static str {
        match self {
            GeometryKind::Box => "#4a90e2",
            GeometryKind::Sphere => "#e74c3c",
            GeometryKind::Cylinder => "#2ecc71",
            GeometryKind::Terrain | GeometryKind::Model => "#4a90e2",
        }
    }
}

/// One of the five predefined terrain configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainVariant {
    Heightmap1,
    Heightmap2,
    Heightmap3,
    Heightmap4,
    Heightmap5,
}

impl TerrainVariant {
    pub const ALL: [TerrainVariant; 5] = [
        TerrainVariant::Heightmap1,
        TerrainVariant::Heightmap2,
        TerrainVariant::Heightmap3,
        TerrainVariant::Heightmap4,
        TerrainVariant::Heightmap5,
    ];

    /// Parse a `heightmap1`..`heightmap5` token
    pub fn parse_token(token: &str) -> Option<TerrainVariant> {
        match token {
            "heightmap1" => Some(TerrainVariant::Heightmap1),
            "heightmap2" => Some(TerrainVariant::Heightmap2),
            "heightmap3" => Some(TerrainVariant::Heightmap3),
            "heightmap4" => Some(TerrainVariant::Heightmap4),
            "heightmap5" => Some(TerrainVariant::Heightmap5),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TerrainVariant::Heightmap1 => "heightmap1",
            TerrainVariant::Heightmap2 => "heightmap2",
            TerrainVariant::Heightmap3 => "heightmap3",
            TerrainVariant::Heightmap4 => "heightmap4",
            TerrainVariant::Heightmap5 => "heightmap5",
        }
    }

    /// Ordinal of the variant's own heightmap asset (1-5)
    pub fn index(self) -> u8 {
        match self {
            TerrainVariant::Heightmap1 => 1,
            TerrainVariant::Heightmap2 => 2,
            TerrainVariant::Heightmap3 => 3,
            TerrainVariant::Heightmap4 => 4,
            TerrainVariant::Heightmap5 => 5,
        }
    }
}

impl std::fmt::Display for TerrainVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terrain-specific payload of a scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    pub variant: TerrainVariant,
    /// Which heightmap asset to displace with (1-5)
    pub heightmap_index: u8,
    /// Texture keys into the catalog; `None` means "first available"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grass_texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mud_texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rock_texture: Option<String>,
}

impl TerrainParams {
    pub fn new(variant: TerrainVariant) -> Self {
        Self {
            variant,
            heightmap_index: variant.index(),
            grass_texture: None,
            mud_texture: None,
            rock_texture: None,
        }
    }
}

/// Model-specific payload of a scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    /// Download URL of the model file
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Display name as reported by the catalog
    pub original_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Which catalog the model came from
    pub source: String,
}

/// One manipulable entity of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Unique addressing key for commands
    pub name: String,
    pub geometry: GeometryKind,
    pub position: [f32; 3],
    /// Radians, even though the command surface speaks degrees
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainParams>,
}

// ============================================================================
// Collaborator wire DTOs
// ============================================================================

/// One candidate returned by the model catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelHit {
    pub name: String,
    /// Some catalogs call this `fileUrl`
    #[serde(alias = "fileUrl")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: String,
}

/// Reply of `searchModels`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSearchResponse {
    pub models: Vec<ModelHit>,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One texture as reported by the texture service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureHit {
    pub name: String,
    pub url: String,
}

/// Reply of `fetchTexturesByCategory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureFetchResponse {
    pub textures: Vec<TextureHit>,
    pub total: usize,
    pub success: bool,
}

/// Scene summary handed to the language-translation collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneContext {
    pub object_names: Vec<String>,
    pub selected_names: Vec<String>,
}

// ============================================================================
// Persistence document (consumed by import/export, not produced here)
// ============================================================================

fn default_document_version() -> String {
    "1.0".to_string()
}

/// Versioned scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_document_version")]
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: SceneFileMetadata,
    pub scene: SceneDocument,
}

impl SceneFile {
    /// Snapshot a set of objects into a fresh versioned document
    pub fn snapshot(objects: Vec<SceneObject>) -> Self {
        Self {
            version: default_document_version(),
            timestamp: Utc::now(),
            metadata: SceneFileMetadata {
                app_version: None,
                total_objects: objects.len(),
            },
            scene: SceneDocument {
                objects,
                camera: None,
                lighting: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default)]
    pub total_objects: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub objects: Vec<SceneObject>,
    /// Camera and lighting blocks are opaque to this crate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_kind_tokens() {
        assert_eq!(GeometryKind::parse_token("cube"), Some(GeometryKind::Box));
        assert_eq!(GeometryKind::parse_token("box"), Some(GeometryKind::Box));
        assert_eq!(
            GeometryKind::parse_token("cylinder"),
            Some(GeometryKind::Cylinder)
        );
        assert_eq!(GeometryKind::parse_token("cone"), None);
    }

    #[test]
    fn test_geometry_kind_serde_names() {
        let json = serde_json::to_string(&GeometryKind::Box).unwrap();
        assert_eq!(json, "\"box\"");
        let kind: GeometryKind = serde_json::from_str("\"terrain\"").unwrap();
        assert_eq!(kind, GeometryKind::Terrain);
    }

    #[test]
    fn test_terrain_variant_parse() {
        assert_eq!(
            TerrainVariant::parse_token("heightmap3"),
            Some(TerrainVariant::Heightmap3)
        );
        assert_eq!(TerrainVariant::parse_token("heightmap6"), None);
        assert_eq!(TerrainVariant::parse_token("heightmap"), None);
        assert_eq!(TerrainVariant::Heightmap5.index(), 5);
    }

    #[test]
    fn test_scene_object_roundtrip() {
        let obj = SceneObject {
            id: "a-b-c".to_string(),
            name: "box1".to_string(),
            geometry: GeometryKind::Box,
            position: [2.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            color: Some("#ff4444".to_string()),
            model: None,
            terrain: None,
        };
        let json = serde_json::to_string(&obj).unwrap();
        let back: SceneObject = serde_json::from_str(&json).unwrap();
        assert_eq!(obj, back);
        // absent payloads are omitted entirely
        assert!(!json.contains("terrain"));
        assert!(!json.contains("model"));
    }

    #[test]
    fn test_model_hit_accepts_file_url_alias() {
        let json = r#"{"name": "Sports Car", "fileUrl": "https://x/car.glb", "source": "catalog"}"#;
        let hit: ModelHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.url, "https://x/car.glb");
    }

    #[test]
    fn test_scene_file_roundtrip() {
        let json = r#"{
            "version": "1.0",
            "timestamp": "2025-06-01T12:00:00Z",
            "metadata": { "total_objects": 0 },
            "scene": { "objects": [] }
        }"#;
        let file: SceneFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.version, "1.0");
        assert!(file.scene.camera.is_none());
    }
}
