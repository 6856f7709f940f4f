use cgmath::Vector3;

use rand::Rng;

use crate::consts;
use crate::float::*;

/// Uniformly distributed unit vector
pub fn uniform_sample_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vector3<Float> {
    let phi = 2.0 * consts::PI * rng.gen::<Float>();
    let z = 1.0 - 2.0 * rng.gen::<Float>();
    let r = (1.0 - z.powi(2)).max(0.0).sqrt();
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}
