//! Scalar heightmap sampling

use std::fmt;

/// Decoded heightmap: a row-major grid of heights in [0, 1]
#[derive(Clone)]
pub struct Heightfield {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl fmt::Debug for Heightfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heightfield")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Heightmap bytes could not be decoded
#[derive(Debug)]
pub struct HeightfieldError(String);

impl fmt::Display for HeightfieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode heightmap: {}", self.0)
    }
}

impl std::error::Error for HeightfieldError {}

impl Heightfield {
    /// Decode an image (any format the `image` crate knows) into a
    /// luminance field normalized to [0, 1]
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, HeightfieldError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| HeightfieldError(e.to_string()))?
            .into_luma8();
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(HeightfieldError("empty image".to_string()));
        }
        let samples = decoded
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect();
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a field by evaluating `f(u, v)` on a grid. Used by tests and
    /// procedural fallbacks.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut samples = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let u = x as f32 / (width - 1).max(1) as f32;
                let v = y as f32 / (height - 1).max(1) as f32;
                samples.push(f(u, v).clamp(0.0, 1.0));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    /// Uniform field, handy as a neutral default
    pub fn flat(value: f32) -> Self {
        Self::from_fn(2, 2, |_, _| value)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn at(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.samples[(y * self.width + x) as usize]
    }

    /// Bilinear sample at texture coordinates, clamped to [0, 1]
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let fx = u * (self.width - 1) as f32;
        let fy = v * (self.height - 1) as f32;
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let h00 = self.at(x0, y0);
        let h10 = self.at(x0 + 1, y0);
        let h01 = self.at(x0, y0 + 1);
        let h11 = self.at(x0 + 1, y0 + 1);

        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        top + (bottom - top) * ty
    }
}
