//! Surface materials and colours.
//!
//! Colours are kept in linear RGB. Hex strings are authored in sRGB and get
//! converted on parse, glTF base colour factors are already linear.

use std::sync::Arc;

/// Linear RGB colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::linear(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::linear(1.0, 1.0, 1.0);

    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (or `rrggbb`) as an sRGB colour.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .ok()
                .map(|c| srgb_to_linear(c as f32 / 255.0))
        };
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::linear(r, g, b)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// Material as authored in an imported asset.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub base_color: Color,
    pub emissive: Color,
    pub metallic: f32,
    pub roughness: f32,
}

/// Banded (toon) material, the only shading model the renderer knows.
#[derive(Clone, Debug, PartialEq)]
pub struct ToonMaterial {
    pub color: Color,
    pub emissive: Color,
}

impl ToonMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
        }
    }

    pub fn glowing(color: Color) -> Self {
        Self {
            color,
            emissive: color,
        }
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            color: [self.color.r, self.color.g, self.color.b, 1.0],
            emissive: [self.emissive.r, self.emissive.g, self.emissive.b, 1.0],
        }
    }
}

/// A mesh's material reference.
///
/// Materials are shared immutably; swapping one means pointing the mesh at a
/// new `Arc`, never mutating the old one in place.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Standard(Arc<StandardMaterial>),
    Toon(Arc<ToonMaterial>),
}

impl Material {
    /// The visible base colour, regardless of shading model.
    pub fn base_color(&self) -> Color {
        match self {
            Material::Standard(standard) => standard.base_color,
            Material::Toon(toon) => toon.color,
        }
    }

    pub fn as_toon(&self) -> Option<&ToonMaterial> {
        match self {
            Material::Toon(toon) => Some(toon),
            Material::Standard(_) => None,
        }
    }
}

impl From<ToonMaterial> for Material {
    fn from(toon: ToonMaterial) -> Self {
        Material::Toon(Arc::new(toon))
    }
}

impl From<StandardMaterial> for Material {
    fn from(standard: StandardMaterial) -> Self {
        Material::Standard(Arc::new(standard))
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    // vec4s keep the 16 byte uniform alignment without manual padding
    color: [f32; 4],
    emissive: [f32; 4],
}
