//! Command execution
//!
//! The interpreter validates a parsed command against current store state
//! and applies the mutation atomically: every check happens before the
//! first write, so a rejected command leaves both stores untouched. The
//! outcome (success or failure) is recorded as the selection store's
//! last action.

use shared::{GeometryKind, ModelAsset, TerrainParams};

use crate::services::{CommandTranslator, ModelCatalog};
use crate::state::{AppState, ObjectPatch, TextureCategory};

use super::{
    normalize, parse, Command, CommandError, MoveMode, RotateArg, ScaleArg, SelectTarget, Target,
    TextureStep,
};

/// Executes text commands against the application state
pub struct Interpreter {
    models: Box<dyn ModelCatalog + Send + Sync>,
    translator: Option<Box<dyn CommandTranslator + Send + Sync>>,
}

impl Interpreter {
    pub fn new(models: Box<dyn ModelCatalog + Send + Sync>) -> Self {
        Self {
            models,
            translator: None,
        }
    }

    /// Route free-form input through a language translator first
    pub fn with_translator(
        mut self,
        translator: Box<dyn CommandTranslator + Send + Sync>,
    ) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Execute one line, returning the human-readable status. The status
    /// is also recorded as the selection store's last action.
    pub async fn execute(&mut self, state: &mut AppState, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }
        match self.try_execute(state, raw).await {
            Ok(status) => {
                state.selection.set_last_action(status.clone());
                status
            }
            Err(err) => {
                tracing::warn!(command = raw, %err, "command rejected");
                let status = err.to_string();
                state.selection.set_last_action(status.clone());
                status
            }
        }
    }

    async fn try_execute(
        &mut self,
        state: &mut AppState,
        raw: &str,
    ) -> Result<String, CommandError> {
        let line = match &self.translator {
            Some(translator) => translator
                .translate(raw, &state.context())
                .await
                .map_err(|err| {
                    CommandError::ExternalService(format!("AI parsing failed: {err}"))
                })?,
            None => normalize(raw),
        };

        match parse(&line)? {
            Command::CreateShape {
                kind,
                color,
                position,
            } => Ok(create_shape(state, kind, color, position)),
            Command::CreateTerrain { params, position } => {
                Ok(create_terrain(state, params, position))
            }
            Command::CreateModel { term, position } => {
                self.create_model(state, &term, position).await
            }
            Command::Clone { position } => clone_selected(state, position),
            Command::Select(target) => select(state, target),
            Command::Delete(target) => delete(state, target),
            Command::Scale { target, arg } => scale(state, target, arg),
            Command::Rotate { target, arg } => rotate(state, target, arg),
            Command::Move {
                target,
                mode,
                values,
            } => move_objects(state, target, mode, values),
            Command::ChangeTexture { category, step } => change_texture(state, category, step),
            Command::Clear => {
                state.selection.clear();
                Ok(state.selection.last_action().to_string())
            }
            Command::Reset => {
                state.scene.reset();
                state.selection.clear();
                state.model_search.cancel();
                Ok("Scene reset to initial state".to_string())
            }
        }
    }

    /// `create model` suspends on the catalog search; the object itself is
    /// only created once the caller picks a candidate via [`pick_model`].
    ///
    /// [`pick_model`]: Interpreter::pick_model
    async fn create_model(
        &mut self,
        state: &mut AppState,
        term: &str,
        position: Option<[f32; 3]>,
    ) -> Result<String, CommandError> {
        state
            .selection
            .set_last_action(format!("Searching for {term} models..."));
        let pending = position.unwrap_or([0.0; 3]);
        let token = state.model_search.begin(term, pending);

        match self.models.search_models(term).await {
            Err(err) => {
                state.model_search.abort(token);
                Err(CommandError::ExternalService(format!(
                    "Failed to search for models: {err}"
                )))
            }
            Ok(results) => {
                if results.models.is_empty() {
                    state.model_search.abort(token);
                    return Ok(format!("No models found for: {term}"));
                }
                let found = results.models.len();
                if state.model_search.complete(token, results) {
                    Ok(format!(
                        "Found {found} models for \"{term}\". Select one to place at position [{}].",
                        fmt_vec3(pending)
                    ))
                } else {
                    // the search was cancelled while we were waiting
                    Ok("Model search cancelled".to_string())
                }
            }
        }
    }

    /// Resolve a pending model search by picking the candidate at `index`
    /// (0-based). Creates the object with the same auto-select contract as
    /// basic shapes.
    pub fn pick_model(&self, state: &mut AppState, index: usize) -> String {
        let status = if state.model_search.results().is_none() {
            "No pending model search".to_string()
        } else {
            match state.model_search.pick(index) {
                None => format!("No model at index {}", index + 1),
                Some((hit, position)) => {
                    let display_name = hit.name.clone();
                    let asset = ModelAsset {
                        url: hit.url,
                        thumbnail: hit.thumbnail,
                        original_name: hit.name,
                        description: hit.description,
                        source: hit.source,
                    };
                    let object = state.scene.add_model(&display_name, asset, Some(position));
                    state.selection.clear();
                    state.selection.toggle(&object.name);
                    format!(
                        "Created 3D model: {} at position [{}]",
                        object.name,
                        fmt_vec3(object.position)
                    )
                }
            }
        };
        state.selection.set_last_action(status.clone());
        status
    }

    /// Discard a pending model search without creating anything
    pub fn cancel_model_search(&self, state: &mut AppState) -> String {
        let status = if state.model_search.is_idle() {
            "No pending model search".to_string()
        } else {
            state.model_search.cancel();
            "Model search cancelled".to_string()
        };
        state.selection.set_last_action(status.clone());
        status
    }
}

// ── Verb handlers ─────────────────────────────────────────────

fn create_shape(
    state: &mut AppState,
    kind: GeometryKind,
    color: Option<String>,
    position: Option<[f32; 3]>,
) -> String {
    let object = state.scene.add_object(kind, color, position);
    state.selection.clear();
    state.selection.toggle(&object.name);
    format!(
        "Created {} at position [{}]",
        object.name,
        fmt_vec3(object.position)
    )
}

fn create_terrain(
    state: &mut AppState,
    params: TerrainParams,
    position: Option<[f32; 3]>,
) -> String {
    let object = state.scene.add_terrain(params.clone(), position);
    state.selection.clear();
    state.selection.toggle(&object.name);

    let mut status = format!(
        "Created {} terrain with heightmap {} at position [{}]",
        params.variant,
        params.heightmap_index,
        fmt_vec3(object.position)
    );
    let textures: Vec<String> = [
        ("grass", &params.grass_texture),
        ("mud", &params.mud_texture),
        ("rock", &params.rock_texture),
    ]
    .iter()
    .filter_map(|(label, key)| key.as_ref().map(|k| format!("{label}: {k}")))
    .collect();
    if !textures.is_empty() {
        status.push_str(&format!(" ({})", textures.join(", ")));
    }
    status
}

fn clone_selected(
    state: &mut AppState,
    explicit: Option<[f32; 3]>,
) -> Result<String, CommandError> {
    if state.selection.is_empty() {
        return Err(CommandError::NoSelection(
            "No objects selected to clone".to_string(),
        ));
    }

    let names: Vec<String> = state.selection.names().to_vec();
    let mut created = Vec::new();
    for name in &names {
        let Some(original) = state.scene.get(name).cloned() else {
            continue;
        };
        // explicit position applies to every clone; otherwise each clone
        // sits next to its original
        let position = explicit.unwrap_or([
            original.position[0] + 2.0,
            original.position[1],
            original.position[2],
        ]);
        created.push(state.scene.clone_of(&original, position).name);
    }

    state.selection.set_selected(created.clone());
    Ok(format!(
        "Cloned {} object(s): {}",
        created.len(),
        created.join(", ")
    ))
}

fn select(state: &mut AppState, target: SelectTarget) -> Result<String, CommandError> {
    match target {
        SelectTarget::All => {
            state.selection.select_all(state.scene.names());
            Ok(state.selection.last_action().to_string())
        }
        SelectTarget::None => {
            state.selection.clear();
            Ok(state.selection.last_action().to_string())
        }
        SelectTarget::Kind(kind) => {
            let names: Vec<String> = state.scene.of_kind(kind).map(|o| o.name.clone()).collect();
            let count = names.len();
            state.selection.set_selected(names);
            Ok(format!("Selected {count} {}", kind_plural(kind)))
        }
        SelectTarget::Name(name) => {
            if !state.scene.contains(&name) {
                return Err(CommandError::TargetNotFound(name));
            }
            state.selection.set_selected(vec![name.clone()]);
            Ok(format!("Selected {name}"))
        }
    }
}

fn delete(state: &mut AppState, target: Target) -> Result<String, CommandError> {
    match target {
        Target::Selected => {
            if state.selection.is_empty() {
                return Err(CommandError::NoSelection(
                    "No objects selected to delete".to_string(),
                ));
            }
            let names: Vec<String> = state.selection.names().to_vec();
            let mut deleted = Vec::new();
            for name in &names {
                if state.scene.remove_object(name) {
                    deleted.push(name.clone());
                }
            }
            state.selection.set_selected(Vec::new());
            Ok(format!(
                "Deleted {} objects: {}",
                deleted.len(),
                deleted.join(", ")
            ))
        }
        Target::Name(name) => {
            if !state.scene.contains(&name) {
                return Err(CommandError::TargetNotFound(name));
            }
            state.scene.remove_object(&name);
            state.selection.discard(&name);
            Ok(format!("Deleted {name}"))
        }
    }
}

fn scale(state: &mut AppState, target: Target, arg: ScaleArg) -> Result<String, CommandError> {
    let factors = arg.factors();
    if factors.iter().any(|f| *f <= 0.0) {
        return Err(CommandError::InvalidArgument(
            "Scale values must be greater than zero".to_string(),
        ));
    }
    let names = resolve_targets(state, &target, "scale")?;

    for name in &names {
        let Some(current) = state.scene.get(name).map(|o| o.scale) else {
            continue;
        };
        state.scene.update_object(
            name,
            ObjectPatch::scale([
                current[0] * factors[0],
                current[1] * factors[1],
                current[2] * factors[2],
            ]),
        );
    }

    let desc = match arg {
        ScaleArg::Uniform(f) => format!("{f}"),
        ScaleArg::PerAxis([x, y, z]) => format!("{x}, {y}, {z}"),
    };
    Ok(match target {
        Target::Selected => format!("Scaled {} selected objects by {desc}", names.len()),
        Target::Name(name) => format!("Scaled {name} by {desc}"),
    })
}

fn rotate(state: &mut AppState, target: Target, arg: RotateArg) -> Result<String, CommandError> {
    let delta = arg.radians();
    let names = resolve_targets(state, &target, "rotate")?;

    for name in &names {
        let Some(current) = state.scene.get(name).map(|o| o.rotation) else {
            continue;
        };
        state.scene.update_object(
            name,
            ObjectPatch::rotation([
                current[0] + delta[0],
                current[1] + delta[1],
                current[2] + delta[2],
            ]),
        );
    }

    let desc = match arg {
        RotateArg::Yaw(deg) => format!("{deg}° (Y-axis)"),
        RotateArg::PerAxis([x, y, z]) => format!("{x}°, {y}°, {z}° (X, Y, Z)"),
    };
    Ok(match target {
        Target::Selected => format!("Rotated {} selected objects by {desc}", names.len()),
        Target::Name(name) => format!("Rotated {name} by {desc}"),
    })
}

fn move_objects(
    state: &mut AppState,
    target: Target,
    mode: MoveMode,
    values: [f32; 3],
) -> Result<String, CommandError> {
    let names = resolve_targets(state, &target, "move")?;

    for name in &names {
        let Some(current) = state.scene.get(name).map(|o| o.position) else {
            continue;
        };
        let position = match mode {
            MoveMode::Absolute => values,
            MoveMode::Relative => [
                current[0] + values[0],
                current[1] + values[1],
                current[2] + values[2],
            ],
        };
        state
            .scene
            .update_object(name, ObjectPatch::position(position));
    }

    let desc = match mode {
        MoveMode::Absolute => format!(
            "to position ({}, {}, {})",
            values[0], values[1], values[2]
        ),
        MoveMode::Relative => format!("by offset ({}, {}, {})", values[0], values[1], values[2]),
    };
    Ok(match target {
        Target::Selected => format!("Moved {} selected objects {desc}", names.len()),
        Target::Name(name) => format!("Moved {name} {desc}"),
    })
}

fn change_texture(
    state: &mut AppState,
    category: TextureCategory,
    step: TextureStep,
) -> Result<String, CommandError> {
    let terrains: Vec<(String, TerrainParams)> = state
        .selection
        .resolve(&state.scene)
        .into_iter()
        .filter(|o| o.geometry == GeometryKind::Terrain)
        .filter_map(|o| o.terrain.clone().map(|t| (o.name.clone(), t)))
        .collect();

    if terrains.is_empty() {
        return Err(CommandError::NoSelection(
            "No terrain objects selected. Select a terrain first.".to_string(),
        ));
    }

    if category == TextureCategory::Heightmap {
        // heightmaps are a fixed 1-5 range, independent of the catalog
        if let TextureStep::Index(index) = step {
            if !(1..=5).contains(&index) {
                return Err(CommandError::InvalidArgument(
                    "Heightmap index must be between 1 and 5".to_string(),
                ));
            }
        }
        for (name, params) in &terrains {
            let current = params.heightmap_index as u32;
            let next = step_index(step, current, 5);
            state.scene.update_object(
                name,
                ObjectPatch {
                    heightmap_index: Some(next as u8),
                    ..Default::default()
                },
            );
        }
    } else {
        let count = state.textures.count(category) as u32;
        if let TextureStep::Index(index) = step {
            if index < 1 || index > count {
                return Err(CommandError::InvalidArgument(format!(
                    "{category} texture index must be between 1 and {count}"
                )));
            }
        }
        for (name, params) in &terrains {
            let current_key = match category {
                TextureCategory::Grass => params.grass_texture.as_deref(),
                TextureCategory::Mud => params.mud_texture.as_deref(),
                TextureCategory::Rock => params.rock_texture.as_deref(),
                TextureCategory::Heightmap => unreachable!(),
            };
            let current = current_key
                .map(|key| state.textures.index_of(category, key) as u32)
                .unwrap_or(1);
            let next = step_index(step, current, count);
            let Some(key) = state.textures.key_at(category, next as usize) else {
                continue;
            };
            let key = key.to_string();
            let mut patch = ObjectPatch::default();
            match category {
                TextureCategory::Grass => patch.grass_texture = Some(key),
                TextureCategory::Mud => patch.mud_texture = Some(key),
                TextureCategory::Rock => patch.rock_texture = Some(key),
                TextureCategory::Heightmap => unreachable!(),
            }
            state.scene.update_object(name, patch);
        }
    }

    let names: Vec<&str> = terrains.iter().map(|(n, _)| n.as_str()).collect();
    Ok(format!(
        "Changed {category} texture on {}",
        names.join(", ")
    ))
}

/// Step a 1-based index with wraparound at `count`
fn step_index(step: TextureStep, current: u32, count: u32) -> u32 {
    match step {
        TextureStep::Next => {
            if current < count {
                current + 1
            } else {
                1
            }
        }
        TextureStep::Prev => {
            if current > 1 {
                current - 1
            } else {
                count
            }
        }
        TextureStep::Index(index) => index,
    }
}

fn resolve_targets(
    state: &AppState,
    target: &Target,
    action: &str,
) -> Result<Vec<String>, CommandError> {
    match target {
        Target::Selected => {
            if state.selection.is_empty() {
                Err(CommandError::NoSelection(format!(
                    "No objects selected to {action}"
                )))
            } else {
                Ok(state.selection.names().to_vec())
            }
        }
        Target::Name(name) => {
            if state.scene.contains(name) {
                Ok(vec![name.clone()])
            } else {
                Err(CommandError::TargetNotFound(name.clone()))
            }
        }
    }
}

fn kind_plural(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Box => "cubes",
        GeometryKind::Sphere => "spheres",
        GeometryKind::Cylinder => "cylinders",
        GeometryKind::Terrain => "terrains",
        GeometryKind::Model => "models",
    }
}

fn fmt_vec3(v: [f32; 3]) -> String {
    format!("{}, {}, {}", v[0], v[1], v[2])
}
