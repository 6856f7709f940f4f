use std::sync::atomic::{AtomicUsize, Ordering};

use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector3};

use crate::material::MaterialId;
use crate::scene::PrimitiveId;
use crate::Float;

static RAY_COUNT: AtomicUsize = AtomicUsize::new(0);

pub trait Intersect {
    /// Closest hit with ray parameter above t_min
    fn intersect(&self, ray: &Ray, t_min: Float) -> Option<Hit>;
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub orig: Point3<Float>,
    /// Always unit length
    pub dir: Vector3<Float>,
}

impl Ray {
    /// Ray with a given origin and direction, the direction gets normalized
    pub fn from_dir(orig: Point3<Float>, dir: Vector3<Float>) -> Ray {
        Ray {
            orig,
            dir: dir.normalize(),
        }
    }

    /// Ray from origin towards another point
    pub fn from_point(orig: Point3<Float>, to: Point3<Float>) -> Ray {
        Ray::from_dir(orig, to - orig)
    }

    pub fn at(&self, t: Float) -> Point3<Float> {
        self.orig + t * self.dir
    }

    /// Number of rays traced through the scene so far, never decreases
    pub fn count() -> usize {
        RAY_COUNT.load(Ordering::Relaxed)
    }

    pub fn record_trace() {
        RAY_COUNT.fetch_add(1, Ordering::Relaxed);
    }
}

/// Geometric result of a single primitive test
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub t: Float,
    pub p: Point3<Float>,
    /// Unit normal as computed by the primitive, not oriented towards the ray
    pub n: Vector3<Float>,
    pub tex_coords: Option<Point2<Float>>,
}

/// Hit record consumed by the shader
#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    pub t: Float,
    pub p: Point3<Float>,
    pub n: Vector3<Float>,
    pub tex_coords: Option<Point2<Float>>,
    pub material: MaterialId,
    pub primitive: PrimitiveId,
    pub reflect_depth: u32,
    pub refract_depth: u32,
    /// Medium the ray travelled through before the hit, None is vacuum
    pub from_material: Option<MaterialId>,
}

impl Intersection {
    pub fn new(hit: Hit, material: MaterialId, primitive: PrimitiveId) -> Self {
        Self {
            t: hit.t,
            p: hit.p,
            n: hit.n,
            tex_coords: hit.tex_coords,
            material,
            primitive,
            reflect_depth: 0,
            refract_depth: 0,
            from_material: None,
        }
    }

    /// Normal flipped to the side the ray arrived from
    pub fn facing_normal(&self, ray: &Ray) -> Vector3<Float> {
        if self.n.dot(ray.dir) > 0.0 {
            -self.n
        } else {
            self.n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::from_dir(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, -4.0));
        assert_abs_diff_eq!(ray.dir.magnitude(), 1.0, epsilon = 1e-6);
        let p = ray.at(2.5);
        assert_abs_diff_eq!(p.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn facing_normal_opposes_ray() {
        let hit = Hit {
            t: 1.0,
            p: Point3::origin(),
            n: Vector3::unit_z(),
            tex_coords: None,
        };
        let isect = Intersection::new(hit, MaterialId(0), PrimitiveId(0));
        let from_above = Ray::from_dir(Point3::new(0.0, 0.0, 1.0), -Vector3::unit_z());
        let from_below = Ray::from_dir(Point3::new(0.0, 0.0, -1.0), Vector3::unit_z());
        assert_eq!(isect.facing_normal(&from_above), Vector3::unit_z());
        assert_eq!(isect.facing_normal(&from_below), -Vector3::unit_z());
    }
}
