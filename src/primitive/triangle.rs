use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector3};

use crate::consts;
use crate::intersect::{Hit, Intersect, Ray};
use crate::material::MaterialId;
use crate::mesh::Mesh;
use crate::Float;

/// One index group of a face, all indices are 0-based
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexRef {
    pub position: usize,
    pub tex_coords: Option<usize>,
    pub normal: Option<usize>,
}

/// Collects the vertices of a face before turning it into a triangle
#[derive(Default)]
pub struct TriangleBuilder {
    vertices: Vec<VertexRef>,
}

impl TriangleBuilder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, vertex: VertexRef) {
        self.vertices.push(vertex);
    }

    /// Fails unless there are exactly 3 vertices using the same index form
    pub fn build(self, material: MaterialId) -> Result<Triangle, String> {
        if self.vertices.len() != 3 {
            return Err(format!(
                "Triangle needs 3 vertices, got {}",
                self.vertices.len()
            ));
        }
        let first = self.vertices[0];
        let consistent = self.vertices.iter().all(|v| {
            v.tex_coords.is_some() == first.tex_coords.is_some()
                && v.normal.is_some() == first.normal.is_some()
        });
        if !consistent {
            return Err("Triangle vertices mix index forms".to_string());
        }
        let vertices = [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ];
        let collect = |f: fn(&VertexRef) -> Option<usize>| -> Option<[usize; 3]> {
            Some([
                f(&self.vertices[0])?,
                f(&self.vertices[1])?,
                f(&self.vertices[2])?,
            ])
        };
        let normals = collect(|v: &VertexRef| v.normal);
        let tex_coords = collect(|v: &VertexRef| v.tex_coords);
        Ok(Triangle {
            vertices,
            normals,
            tex_coords,
            material,
        })
    }
}

/// Triangle referring to the shared vertex arrays of a mesh
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [usize; 3],
    pub normals: Option<[usize; 3]>,
    pub tex_coords: Option<[usize; 3]>,
    pub material: MaterialId,
}

impl Triangle {
    /// Pair the triangle with its vertex data for intersection
    pub fn with_mesh<'a>(&'a self, mesh: &'a Mesh) -> MeshTriangle<'a> {
        MeshTriangle { tri: self, mesh }
    }
}

pub struct MeshTriangle<'a> {
    tri: &'a Triangle,
    mesh: &'a Mesh,
}

impl<'a> MeshTriangle<'a> {
    fn positions(&self) -> [Point3<Float>; 3] {
        let [a, b, c] = self.tri.vertices;
        let p = &self.mesh.positions;
        [p[a], p[b], p[c]]
    }

    /// Weights of p against the vertices from sub-triangle area ratios
    pub fn barycentric(&self, p: Point3<Float>) -> Option<[Float; 3]> {
        let [p0, p1, p2] = self.positions();
        let area = (p1 - p0).cross(p2 - p0).magnitude();
        if area < consts::EPSILON {
            return None;
        }
        let alpha = (p1 - p).cross(p2 - p).magnitude() / area;
        let beta = (p2 - p).cross(p0 - p).magnitude() / area;
        let gamma = (p0 - p).cross(p1 - p).magnitude() / area;
        let sum = alpha + beta + gamma;
        let in_range = |w: Float| (0.0..=1.0).contains(&w);
        if (1.0 - sum).abs() < consts::BARYCENTRIC_TOLERANCE
            && in_range(alpha)
            && in_range(beta)
            && in_range(gamma)
        {
            Some([alpha, beta, gamma])
        } else {
            None
        }
    }

    fn shading_normal(&self, face_n: Vector3<Float>, w: [Float; 3]) -> Vector3<Float> {
        match self.tri.normals {
            Some([a, b, c]) => {
                let n = &self.mesh.normals;
                let blend = w[0] * n[a] + w[1] * n[b] + w[2] * n[c];
                if blend.magnitude2() > consts::EPSILON {
                    blend.normalize()
                } else {
                    face_n
                }
            }
            None => face_n,
        }
    }

    fn interp_tex_coords(&self, w: [Float; 3]) -> Option<Point2<Float>> {
        self.tri.tex_coords.map(|[a, b, c]| {
            let t = &self.mesh.tex_coords;
            Point2::from_vec(w[0] * t[a].to_vec() + w[1] * t[b].to_vec() + w[2] * t[c].to_vec())
        })
    }
}

impl<'a> Intersect for MeshTriangle<'a> {
    fn intersect(&self, ray: &Ray, t_min: Float) -> Option<Hit> {
        let [p0, p1, p2] = self.positions();
        let n = (p1 - p0).cross(p2 - p0);
        let denom = n.dot(ray.dir);
        if denom.abs() < consts::EPSILON {
            return None;
        }
        let t = n.dot(p0 - ray.orig) / denom;
        if t <= t_min {
            return None;
        }
        let p = ray.at(t);
        let w = self.barycentric(p)?;
        Some(Hit {
            t,
            p,
            n: self.shading_normal(n.normalize(), w),
            tex_coords: self.interp_tex_coords(w),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        mesh.normals = vec![
            Vector3::unit_z(),
            Vector3::unit_x(),
            Vector3::unit_z(),
        ];
        mesh.tex_coords = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        mesh
    }

    fn build(vertices: &[VertexRef]) -> Result<Triangle, String> {
        let mut builder = TriangleBuilder::new();
        for v in vertices {
            builder.add_vertex(*v);
        }
        builder.build(MaterialId(0))
    }

    fn plain(position: usize) -> VertexRef {
        VertexRef {
            position,
            tex_coords: None,
            normal: None,
        }
    }

    fn full(i: usize) -> VertexRef {
        VertexRef {
            position: i,
            tex_coords: Some(i),
            normal: Some(i),
        }
    }

    #[test]
    fn flat_hit() {
        let mesh = mesh();
        let tri = build(&[plain(0), plain(1), plain(2)]).unwrap();
        let ray = Ray::from_dir(Point3::new(0.25, 0.25, 2.0), -Vector3::unit_z());
        let hit = tri.with_mesh(&mesh).intersect(&ray, 0.01).unwrap();
        assert_abs_diff_eq!(hit.t, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.n.z, 1.0, epsilon = 1e-6);
        assert!(hit.tex_coords.is_none());
    }

    #[test]
    fn barycentric_weights_inside_sum_to_one() {
        let mesh = mesh();
        let tri = build(&[plain(0), plain(1), plain(2)]).unwrap();
        let mt = tri.with_mesh(&mesh);
        let w = mt.barycentric(Point3::new(0.2, 0.3, 0.0)).unwrap();
        assert_abs_diff_eq!(w[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(w[1], 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(w[2], 0.3, epsilon = 1e-6);
        assert!(w.iter().all(|&x| x > 0.0 && x < 1.0));
        assert!(mt.barycentric(Point3::new(0.8, 0.8, 0.0)).is_none());
    }

    #[test]
    fn outside_point_misses() {
        let mesh = mesh();
        let tri = build(&[plain(0), plain(1), plain(2)]).unwrap();
        let ray = Ray::from_dir(Point3::new(1.0, 1.0, 2.0), -Vector3::unit_z());
        assert!(tri.with_mesh(&mesh).intersect(&ray, 0.01).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let mesh = mesh();
        let tri = build(&[plain(0), plain(1), plain(2)]).unwrap();
        let ray = Ray::from_dir(Point3::new(-1.0, 0.2, 0.0), Vector3::unit_x());
        assert!(tri.with_mesh(&mesh).intersect(&ray, 0.01).is_none());
    }

    #[test]
    fn attributes_are_interpolated() {
        let mesh = mesh();
        let tri = build(&[full(0), full(1), full(2)]).unwrap();
        let ray = Ray::from_dir(Point3::new(0.5, 0.0, 1.0), -Vector3::unit_z());
        let hit = tri.with_mesh(&mesh).intersect(&ray, 0.01).unwrap();
        // Halfway between the first two vertices
        let expected = (Vector3::unit_z() + Vector3::unit_x()).normalize();
        assert_abs_diff_eq!(hit.n.dot(expected), 1.0, epsilon = 1e-6);
        let tc = hit.tex_coords.unwrap();
        assert_abs_diff_eq!(tc.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(tc.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_triangle_never_hits() {
        let mut mesh = mesh();
        mesh.positions[2] = Point3::new(2.0, 0.0, 0.0);
        let tri = build(&[plain(0), plain(1), plain(2)]).unwrap();
        let ray = Ray::from_dir(Point3::new(0.5, 0.0, 1.0), -Vector3::unit_z());
        assert!(tri.with_mesh(&mesh).intersect(&ray, 0.01).is_none());
    }

    #[test]
    fn builder_rejects_bad_faces() {
        assert!(build(&[plain(0), plain(1)]).is_err());
        assert!(build(&[plain(0), full(1), plain(2)]).is_err());
        let tri = build(&[full(0), full(1), full(2)]).unwrap();
        assert_eq!(tri.normals, Some([0, 1, 2]));
        assert_eq!(tri.tex_coords, Some([0, 1, 2]));
    }
}
