//! Procedural terrain
//!
//! A terrain object is described by a variant (plane extents, subdivision,
//! displacement, texture tiling), a heightmap asset index, and three
//! texture keys. This module turns that description into displaced
//! geometry and a height-banded material. Generation is pure: the owning
//! object's transform is never touched.

mod heightfield;
mod mesh;

pub use heightfield::{Heightfield, HeightfieldError};
pub use mesh::{
    bake_preview_vertices, band_weights, blend_color, generate_mesh, light_dir, resolve_material,
    shade, smoothstep, TerrainMaterial, TerrainMesh,
};

use shared::TerrainVariant;

/// Static configuration of one terrain variant. Read-only at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantConfig {
    pub name: &'static str,
    pub displacement_scale: f32,
    pub width_scale: f32,
    pub height_scale: f32,
    pub segments: u32,
    pub texture_repeat: f32,
}

const VARIANTS: [VariantConfig; 5] = [
    VariantConfig {
        name: "Heightmap Terrain 1",
        displacement_scale: 15.0,
        width_scale: 100.0,
        height_scale: 100.0,
        segments: 100,
        texture_repeat: 8.0,
    },
    VariantConfig {
        name: "Heightmap Terrain 2",
        displacement_scale: 12.0,
        width_scale: 80.0,
        height_scale: 80.0,
        segments: 80,
        texture_repeat: 6.0,
    },
    VariantConfig {
        name: "Heightmap Terrain 3",
        displacement_scale: 18.0,
        width_scale: 120.0,
        height_scale: 120.0,
        segments: 120,
        texture_repeat: 10.0,
    },
    VariantConfig {
        name: "Heightmap Terrain 4",
        displacement_scale: 10.0,
        width_scale: 90.0,
        height_scale: 90.0,
        segments: 90,
        texture_repeat: 7.0,
    },
    VariantConfig {
        name: "Heightmap Terrain 5",
        displacement_scale: 20.0,
        width_scale: 110.0,
        height_scale: 110.0,
        segments: 110,
        texture_repeat: 9.0,
    },
];

/// Variant table lookup
pub fn variant_config(variant: TerrainVariant) -> &'static VariantConfig {
    &VARIANTS[(variant.index() - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_table_values() {
        let v3 = variant_config(TerrainVariant::Heightmap3);
        assert_eq!(v3.displacement_scale, 18.0);
        assert_eq!(v3.width_scale, 120.0);
        assert_eq!(v3.segments, 120);
        assert_eq!(v3.texture_repeat, 10.0);

        let v5 = variant_config(TerrainVariant::Heightmap5);
        assert_eq!(v5.displacement_scale, 20.0);
        assert_eq!(v5.segments, 110);
    }

    #[test]
    fn test_every_variant_has_a_config() {
        for variant in TerrainVariant::ALL {
            let config = variant_config(variant);
            assert!(config.segments > 0);
            assert!(config.displacement_scale > 0.0);
            assert_eq!(config.width_scale, config.height_scale);
        }
    }
}
