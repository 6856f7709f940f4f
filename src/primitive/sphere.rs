use cgmath::prelude::*;
use cgmath::Point3;

use crate::intersect::{Hit, Intersect, Ray};
use crate::material::MaterialId;
use crate::Float;

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Point3<Float>,
    pub radius: Float,
    pub material: MaterialId,
}

impl Sphere {
    pub fn new(center: Point3<Float>, radius: Float, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray, t_min: Float) -> Option<Hit> {
        // Direction is unit length so the quadratic coefficient is one
        let oc = ray.orig - self.center;
        let b = 2.0 * ray.dir.dot(oc);
        let c = oc.magnitude2() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        let near = 0.5 * (-b - sqrt_disc);
        let far = 0.5 * (-b + sqrt_disc);
        // Far root is the exit point for rays that start inside the sphere
        let t = if near > t_min {
            near
        } else if far > t_min {
            far
        } else {
            return None;
        };
        let p = ray.at(t);
        Some(Hit {
            t,
            p,
            n: (p - self.center).normalize(),
            tex_coords: None,
        })
    }
}
