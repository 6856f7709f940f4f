use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::intersect::{Intersection, Ray};
use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::mesh::Mesh;
use crate::primitive::Primitive;
use crate::texture::Texture;
use crate::Float;

/// Index into the scene primitive list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveId(pub usize);

/// Distance based blend toward a fog color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthCue {
    pub color: Color,
    pub a_max: Float,
    pub a_min: Float,
    pub dist_max: Float,
    pub dist_min: Float,
}

impl DepthCue {
    /// Weight of the surface color at distance d from the eye
    pub fn alpha(&self, d: Float) -> Float {
        if d <= self.dist_min {
            self.a_max
        } else if d >= self.dist_max {
            self.a_min
        } else {
            self.a_min
                + (self.a_max - self.a_min) * (self.dist_max - d) / (self.dist_max - self.dist_min)
        }
    }

    pub fn apply(&self, color: Color, d: Float) -> Color {
        let a = self.alpha(d);
        (a * color + (1.0 - a) * self.color).clamp()
    }
}

/// Everything needed to render an image, read only after parsing
#[derive(Debug)]
pub struct Scene {
    pub eye: Point3<Float>,
    pub viewdir: Vector3<Float>,
    pub updir: Vector3<Float>,
    /// Horizontal field of view in degrees
    pub hfov: Float,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Light>,
    pub mesh: Mesh,
    pub depth_cue: Option<DepthCue>,
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            eye: Point3::origin(),
            viewdir: -Vector3::unit_z(),
            updir: Vector3::unit_y(),
            hfov: 90.0,
            width: 0,
            height: 0,
            background: Color::black(),
            materials: Vec::new(),
            textures: Vec::new(),
            primitives: Vec::new(),
            lights: Vec::new(),
            mesh: Mesh::new(),
            depth_cue: None,
        }
    }
}

impl Scene {
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Closest hit over all primitives except the excluded one.
    /// Exact ties keep the primitive declared first.
    pub fn find_nearest(
        &self,
        ray: &Ray,
        exclude: Option<PrimitiveId>,
        t_min: Float,
    ) -> Option<Intersection> {
        Ray::record_trace();
        let mut closest: Option<Intersection> = None;
        for (i, primitive) in self.primitives.iter().enumerate() {
            let id = PrimitiveId(i);
            if exclude == Some(id) {
                continue;
            }
            if let Some(hit) = primitive.intersect(&self.mesh, ray, t_min) {
                if closest.map_or(true, |c| hit.t < c.t) {
                    closest = Some(Intersection::new(hit, primitive.material(), id));
                }
            }
        }
        closest
    }
}
