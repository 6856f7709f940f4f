use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::consts;
use crate::intersect::{Hit, Intersect, Ray};
use crate::material::MaterialId;
use crate::Float;

/// Finite cylinder closed with a disk at both ends
#[derive(Clone, Debug)]
pub struct Cylinder {
    /// Center of the bottom cap
    pub base: Point3<Float>,
    /// Unit length
    pub axis: Vector3<Float>,
    pub radius: Float,
    pub height: Float,
    pub material: MaterialId,
}

impl Cylinder {
    pub fn new(
        base: Point3<Float>,
        axis: Vector3<Float>,
        radius: Float,
        height: Float,
        material: MaterialId,
    ) -> Self {
        Self {
            base,
            axis: axis.normalize(),
            radius,
            height,
            material,
        }
    }

    pub fn top(&self) -> Point3<Float> {
        self.base + self.height * self.axis
    }

    fn intersect_side(&self, ray: &Ray, t_min: Float) -> Option<Hit> {
        // Flatten the problem to the plane orthogonal to the axis
        let oc = ray.orig - self.base;
        let d_perp = ray.dir - ray.dir.dot(self.axis) * self.axis;
        let oc_perp = oc - oc.dot(self.axis) * self.axis;
        let a = d_perp.magnitude2();
        if a < consts::EPSILON {
            return None;
        }
        let b = 2.0 * d_perp.dot(oc_perp);
        let c = oc_perp.magnitude2() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        let roots = [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)];
        for &t in roots.iter() {
            if t <= t_min {
                continue;
            }
            let p = ray.at(t);
            let axial = (p - self.base).dot(self.axis);
            if axial < 0.0 || axial > self.height {
                continue;
            }
            let on_axis = self.base + axial * self.axis;
            return Some(Hit {
                t,
                p,
                n: (p - on_axis).normalize(),
                tex_coords: None,
            });
        }
        None
    }

    fn intersect_cap(
        &self,
        center: Point3<Float>,
        n: Vector3<Float>,
        ray: &Ray,
        t_min: Float,
    ) -> Option<Hit> {
        let denom = n.dot(ray.dir);
        if denom.abs() < consts::EPSILON {
            return None;
        }
        let t = n.dot(center - ray.orig) / denom;
        if t <= t_min {
            return None;
        }
        let p = ray.at(t);
        if (p - center).magnitude2() > self.radius * self.radius {
            return None;
        }
        Some(Hit {
            t,
            p,
            n,
            tex_coords: None,
        })
    }
}

impl Intersect for Cylinder {
    fn intersect(&self, ray: &Ray, t_min: Float) -> Option<Hit> {
        let candidates = [
            self.intersect_side(ray, t_min),
            self.intersect_cap(self.base, -self.axis, ray, t_min),
            self.intersect_cap(self.top(), self.axis, ray, t_min),
        ];
        candidates
            .iter()
            .flatten()
            .fold(None, |closest: Option<Hit>, hit| match closest {
                Some(c) if c.t <= hit.t => Some(c),
                _ => Some(*hit),
            })
    }
}
