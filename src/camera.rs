/// Module containing the camera functionality
use cgmath::prelude::*;
use cgmath::{Deg, Point3, Rad, Vector3};

use crate::consts;
use crate::error::CameraError;
use crate::float::*;
use crate::intersect::Ray;

/// Pinhole camera with a viewing window at unit distance from the eye
#[derive(Clone, Debug)]
pub struct Camera {
    /// Position of the camera in world coordinates
    pub pos: Point3<Float>,
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Center of the upper left pixel
    upper_left: Point3<Float>,
    /// Step between pixel centers along a row
    dx: Vector3<Float>,
    /// Step between pixel centers down a column
    dy: Vector3<Float>,
}

impl Camera {
    pub fn new(
        eye: Point3<Float>,
        viewdir: Vector3<Float>,
        updir: Vector3<Float>,
        hfov_degrees: Float,
        width: u32,
        height: u32,
    ) -> Result<Camera, CameraError> {
        if viewdir.magnitude2() < consts::EPSILON || updir.magnitude2() < consts::EPSILON {
            return Err(CameraError::ZeroDirection);
        }
        let n = viewdir.normalize();
        let up = updir.normalize();
        if 1.0 - n.dot(up).abs() < consts::PARALLEL_TOLERANCE {
            return Err(CameraError::ParallelUpDir);
        }
        let u = n.cross(up).normalize();
        let v = u.cross(n).normalize();

        let half_fov: Rad<Float> = Deg(hfov_degrees / 2.0).into();
        let win_width = 2.0 * half_fov.0.tan();
        let win_height = win_width * height.to_float() / width.to_float();

        let dx = u * (win_width / width.to_float());
        let dy = -v * (win_height / height.to_float());
        let upper_left = eye + n - 0.5 * win_width * u + 0.5 * win_height * v + 0.5 * dx + 0.5 * dy;
        Ok(Camera {
            pos: eye,
            width,
            height,
            upper_left,
            dx,
            dy,
        })
    }

    /// Ray through the center of pixel (x, y), (0, 0) is the upper left corner
    pub fn trace_ray(&self, x: u32, y: u32) -> Ray {
        let target = self.upper_left + x.to_float() * self.dx + y.to_float() * self.dy;
        Ray::from_point(self.pos, target)
    }
}
