use cgmath::Point2;

use crate::color::Color;
use crate::texture::{Texture, TextureId};
use crate::Float;

/// Index into the scene material palette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Blinn-Phong material with optional transparency
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub diffuse: Color,
    pub specular: Color,
    pub ka: Float,
    pub kd: Float,
    pub ks: Float,
    pub shininess: Float,
    /// 1 is fully opaque
    pub opacity: Float,
    pub refraction_i: Float,
    pub texture: Option<TextureId>,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            diffuse: Color::white(),
            specular: Color::white(),
            ka: 0.1,
            kd: 0.7,
            ks: 0.2,
            shininess: 10.0,
            opacity: 1.0,
            refraction_i: 1.0,
            texture: None,
        }
    }
}

impl Material {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Normal incidence reflectance of the Schlick approximation
    pub fn f0(&self) -> Float {
        let n = self.refraction_i;
        ((n - 1.0) / (n + 1.0)).powi(2)
    }

    /// Diffuse color at the hit, texture overrides the stored color
    pub fn base_color(&self, textures: &[Texture], tex_coords: Option<Point2<Float>>) -> Color {
        match (self.texture, tex_coords) {
            (Some(TextureId(i)), Some(t)) => textures[i].color(t),
            _ => self.diffuse,
        }
    }
}
