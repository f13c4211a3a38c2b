//! Scene object store
//!
//! Owns the authoritative list of scene objects. The ordered list is
//! paired with a name→index map so lookups stay O(1) while list order is
//! preserved for anything order-sensitive.

use std::collections::HashMap;

use rand::Rng;
use shared::{GeometryKind, ModelAsset, SceneObject, TerrainParams};

/// Partial update applied to an existing object. Only the supplied fields
/// are merged; everything else is left untouched.
#[derive(Debug, Clone, Default)]
pub struct ObjectPatch {
    pub position: Option<[f32; 3]>,
    pub rotation: Option<[f32; 3]>,
    pub scale: Option<[f32; 3]>,
    pub color: Option<String>,
    pub heightmap_index: Option<u8>,
    pub grass_texture: Option<String>,
    pub mud_texture: Option<String>,
    pub rock_texture: Option<String>,
}

impl ObjectPatch {
    pub fn position(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn rotation(rotation: [f32; 3]) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn scale(scale: [f32; 3]) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }
}

/// Scene state with objects and the name-generation counter
pub struct SceneState {
    objects: Vec<SceneObject>,
    index: HashMap<String, usize>,
    counter: u32,
    /// Monotonically increasing version counter; the renderer watches this
    version: u64,
}

fn random_position() -> [f32; 3] {
    let mut rng = rand::thread_rng();
    [
        rng.gen_range(-4.0..4.0),
        rng.gen_range(0.0..2.0),
        rng.gen_range(-4.0..4.0),
    ]
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            index: HashMap::new(),
            counter: 1,
            version: 0,
        }
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    fn next_name(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.counter);
        self.counter += 1;
        name
    }

    fn push(&mut self, object: SceneObject) -> SceneObject {
        self.index.insert(object.name.clone(), self.objects.len());
        self.objects.push(object.clone());
        self.version += 1;
        tracing::debug!(name = %object.name, kind = ?object.geometry, "object added");
        object
    }

    /// Add a basic shape. Position defaults to a random point in the
    /// spawn volume (x, z in [-4, 4], y in [0, 2]); rotation defaults to
    /// zero and scale to one.
    pub fn add_object(
        &mut self,
        kind: GeometryKind,
        color: Option<String>,
        position: Option<[f32; 3]>,
    ) -> SceneObject {
        let name = self.next_name(kind.name_prefix());
        self.push(SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            geometry: kind,
            position: position.unwrap_or_else(random_position),
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: Some(color.unwrap_or_else(|| kind.default_color().to_string())),
            model: None,
            terrain: None,
        })
    }

    /// Add a terrain object carrying the given parameters
    pub fn add_terrain(
        &mut self,
        params: TerrainParams,
        position: Option<[f32; 3]>,
    ) -> SceneObject {
        let name = self.next_name(GeometryKind::Terrain.name_prefix());
        self.push(SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            geometry: GeometryKind::Terrain,
            position: position.unwrap_or([0.0; 3]),
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: None,
            model: None,
            terrain: Some(params),
        })
    }

    /// Add a model-backed object. The name is the sanitized display name
    /// plus the counter (`sports_car3`).
    pub fn add_model(
        &mut self,
        display_name: &str,
        asset: ModelAsset,
        position: Option<[f32; 3]>,
    ) -> SceneObject {
        let prefix = sanitize_model_name(display_name);
        let name = self.next_name(&prefix);
        self.push(SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            geometry: GeometryKind::Model,
            position: position.unwrap_or_else(random_position),
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: None,
            model: Some(asset),
            terrain: None,
        })
    }

    /// Insert a copy of `original` with a fresh id and generated name,
    /// placed at `position`. Kind-specific payloads are deep-copied.
    pub fn clone_of(&mut self, original: &SceneObject, position: [f32; 3]) -> SceneObject {
        let name = self.next_name(original.geometry.name_prefix());
        self.push(SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            position,
            ..original.clone()
        })
    }

    /// Remove an object by name. Returns `false` without mutating if the
    /// name is unknown.
    pub fn remove_object(&mut self, name: &str) -> bool {
        let Some(pos) = self.index.remove(name) else {
            return false;
        };
        self.objects.remove(pos);
        for (i, obj) in self.objects.iter().enumerate().skip(pos) {
            self.index.insert(obj.name.clone(), i);
        }
        self.version += 1;
        tracing::debug!(name, "object removed");
        true
    }

    /// Merge the supplied fields into an existing object. Returns `false`
    /// without mutating if the name is unknown.
    pub fn update_object(&mut self, name: &str, patch: ObjectPatch) -> bool {
        let Some(&pos) = self.index.get(name) else {
            return false;
        };
        let obj = &mut self.objects[pos];
        if let Some(position) = patch.position {
            obj.position = position;
        }
        if let Some(rotation) = patch.rotation {
            obj.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            obj.scale = scale;
        }
        if let Some(color) = patch.color {
            obj.color = Some(color);
        }
        if let Some(terrain) = obj.terrain.as_mut() {
            if let Some(idx) = patch.heightmap_index {
                terrain.heightmap_index = idx;
            }
            if let Some(key) = patch.grass_texture {
                terrain.grass_texture = Some(key);
            }
            if let Some(key) = patch.mud_texture {
                terrain.mud_texture = Some(key);
            }
            if let Some(key) = patch.rock_texture {
                terrain.rock_texture = Some(key);
            }
        }
        self.version += 1;
        true
    }

    /// Clear the scene and reset the name counter
    pub fn reset(&mut self) {
        self.objects.clear();
        self.index.clear();
        self.counter = 1;
        self.version += 1;
    }

    // ── Read accessors ────────────────────────────────────────

    pub fn get(&self, name: &str) -> Option<&SceneObject> {
        self.index.get(name).map(|&i| &self.objects[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    pub fn of_kind(&self, kind: GeometryKind) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(move |o| o.geometry == kind)
    }

    pub fn count(&self) -> usize {
        self.objects.len()
    }

    pub fn count_of(&self, kind: GeometryKind) -> usize {
        self.of_kind(kind).count()
    }
}

/// Lowercase a model display name and replace runs of whitespace with `_`
fn sanitize_model_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}
