use cgmath::{Point2, Point3, Vector3};

use crate::Float;

/// Vertex attributes shared by all triangles of a scene
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<Point3<Float>>,
    pub normals: Vec<Vector3<Float>>,
    pub tex_coords: Vec<Point2<Float>>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Mesh {
            ..Default::default()
        }
    }
}
