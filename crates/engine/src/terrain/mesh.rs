//! Terrain mesh generation and height-banded shading
//!
//! Generates a displaced plane from a variant configuration and a
//! heightfield, and implements the banding rule that blends mud, grass,
//! and rock by sampled height. The same rule is exposed as pure functions
//! and as baked per-vertex preview colors.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::TerrainParams;

use crate::state::{TextureCatalog, TextureCategory};

use super::{variant_config, Heightfield, VariantConfig};

/// CPU-side terrain geometry. `heights` keeps the raw heightfield sample
/// (in [0, 1]) per vertex for the banding rule.
pub struct TerrainMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub heights: Vec<f32>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Everything the renderer needs to texture one terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainMaterial {
    pub grass_url: String,
    pub mud_url: String,
    pub rock_url: String,
    pub heightmap_url: String,
    pub displacement_scale: f32,
    pub texture_repeat: f32,
    pub light_dir: [f32; 3],
}

/// Fixed scene light used by the shading rule
pub fn light_dir() -> Vec3 {
    Vec3::new(0.5, 1.0, 0.3).normalize()
}

/// Generate the displaced plane for a variant: `segments × segments`
/// quads spanning `width_scale × height_scale`, each vertex lifted along
/// the plane normal by `sample(u, v) * displacement_scale`, UVs tiled by
/// the variant's texture repeat.
pub fn generate_mesh(config: &VariantConfig, heightfield: &Heightfield) -> TerrainMesh {
    let segments = config.segments;
    let stride = segments + 1;
    let vertex_count = (stride * stride) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut heights = Vec::with_capacity(vertex_count);

    for z in 0..=segments {
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let v = z as f32 / segments as f32;
            let h = heightfield.sample(u, v);
            positions.push([
                (u - 0.5) * config.width_scale,
                h * config.displacement_scale,
                (v - 0.5) * config.height_scale,
            ]);
            uvs.push([u * config.texture_repeat, v * config.texture_repeat]);
            heights.push(h);
        }
    }

    let normals = vertex_normals(&positions, config, segments);

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for z in 0..segments {
        for x in 0..segments {
            let i = z * stride + x;
            indices.extend_from_slice(&[i, i + stride, i + 1]);
            indices.extend_from_slice(&[i + 1, i + stride, i + stride + 1]);
        }
    }

    tracing::debug!(
        vertices = vertex_count,
        triangles = indices.len() / 3,
        "terrain mesh generated"
    );

    TerrainMesh {
        positions,
        normals,
        uvs,
        heights,
        indices,
    }
}

/// Smooth normals from central height differences of neighboring vertices
fn vertex_normals(positions: &[[f32; 3]], config: &VariantConfig, segments: u32) -> Vec<[f32; 3]> {
    let stride = (segments + 1) as usize;
    let step_x = config.width_scale / segments as f32;
    let step_z = config.height_scale / segments as f32;
    let mut normals = Vec::with_capacity(positions.len());

    for z in 0..stride {
        for x in 0..stride {
            let idx = z * stride + x;
            let h_left = positions[if x > 0 { idx - 1 } else { idx }][1];
            let h_right = positions[if x + 1 < stride { idx + 1 } else { idx }][1];
            let h_down = positions[if z > 0 { idx - stride } else { idx }][1];
            let h_up = positions[if z + 1 < stride { idx + stride } else { idx }][1];

            let dydx = (h_right - h_left) / (2.0 * step_x);
            let dydz = (h_up - h_down) / (2.0 * step_z);
            normals.push(Vec3::new(-dydx, 1.0, -dydz).normalize().to_array());
        }
    }

    normals
}

/// Hermite smoothstep, clamped outside [e0, e1]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Blend weights `[mud, grass, rock]` for a sampled height in [0, 1]:
/// mud fades into grass below 0.30, pure grass up to 0.60, grass fades
/// into rock above that.
pub fn band_weights(h: f32) -> [f32; 3] {
    if h < 0.30 {
        let t = smoothstep(0.20, 0.30, h);
        [1.0 - t, t, 0.0]
    } else if h < 0.60 {
        [0.0, 1.0, 0.0]
    } else {
        let t = smoothstep(0.60, 0.75, h);
        [0.0, 1.0 - t, t]
    }
}

/// Diffuse-lit color with the 0.30 floor that keeps fragments from going
/// fully black
pub fn shade(color: [f32; 3], normal: Vec3) -> [f32; 3] {
    let diffuse = normal.normalize().dot(light_dir()).max(0.30);
    [color[0] * diffuse, color[1] * diffuse, color[2] * diffuse]
}

/// Banded color for one height given the three band colors
pub fn blend_color(h: f32, mud: [f32; 3], grass: [f32; 3], rock: [f32; 3]) -> [f32; 3] {
    let [wm, wg, wr] = band_weights(h);
    [
        mud[0] * wm + grass[0] * wg + rock[0] * wr,
        mud[1] * wm + grass[1] * wg + rock[1] * wr,
        mud[2] * wm + grass[2] * wg + rock[2] * wr,
    ]
}

/// Bake shaded band colors into interleaved preview vertices:
/// position(3) + normal(3) + color(3), 9 floats per vertex
pub fn bake_preview_vertices(
    mesh: &TerrainMesh,
    mud: [f32; 3],
    grass: [f32; 3],
    rock: [f32; 3],
) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(mesh.vertex_count() * 9);
    for i in 0..mesh.vertex_count() {
        let normal = Vec3::from_array(mesh.normals[i]);
        let color = shade(blend_color(mesh.heights[i], mud, grass, rock), normal);
        vertices.extend_from_slice(&mesh.positions[i]);
        vertices.extend_from_slice(&mesh.normals[i]);
        vertices.extend_from_slice(&color);
    }
    vertices
}

/// Resolve a terrain's texture keys against the live catalog. Unset or
/// unknown keys fall back to the category's first entry; the catalog
/// itself guarantees a bundled default when a category is empty.
pub fn resolve_material(params: &TerrainParams, catalog: &TextureCatalog) -> TerrainMaterial {
    let config = variant_config(params.variant);
    TerrainMaterial {
        grass_url: catalog
            .resolve_url(TextureCategory::Grass, params.grass_texture.as_deref())
            .to_string(),
        mud_url: catalog
            .resolve_url(TextureCategory::Mud, params.mud_texture.as_deref())
            .to_string(),
        rock_url: catalog
            .resolve_url(TextureCategory::Rock, params.rock_texture.as_deref())
            .to_string(),
        heightmap_url: catalog.heightmap_url(params.heightmap_index).to_string(),
        displacement_scale: config.displacement_scale,
        texture_repeat: config.texture_repeat,
        light_dir: light_dir().to_array(),
    }
}
