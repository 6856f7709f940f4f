pub mod cylinder;
pub mod sphere;
pub mod triangle;

pub use self::cylinder::Cylinder;
pub use self::sphere::Sphere;
pub use self::triangle::{Triangle, TriangleBuilder, VertexRef};

use crate::intersect::{Hit, Intersect, Ray};
use crate::material::MaterialId;
use crate::mesh::Mesh;
use crate::Float;

#[derive(Clone, Debug)]
pub enum Primitive {
    Sphere(Sphere),
    Cylinder(Cylinder),
    Triangle(Triangle),
}

impl Primitive {
    /// Triangles need the shared vertex arrays, analytic shapes ignore them
    pub fn intersect(&self, mesh: &Mesh, ray: &Ray, t_min: Float) -> Option<Hit> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(ray, t_min),
            Primitive::Cylinder(cylinder) => cylinder.intersect(ray, t_min),
            Primitive::Triangle(triangle) => triangle.with_mesh(mesh).intersect(ray, t_min),
        }
    }

    pub fn material(&self) -> MaterialId {
        match self {
            Primitive::Sphere(sphere) => sphere.material,
            Primitive::Cylinder(cylinder) => cylinder.material,
            Primitive::Triangle(triangle) => triangle.material,
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Cylinder> for Primitive {
    fn from(cylinder: Cylinder) -> Self {
        Primitive::Cylinder(cylinder)
    }
}

impl From<Triangle> for Primitive {
    fn from(triangle: Triangle) -> Self {
        Primitive::Triangle(triangle)
    }
}
