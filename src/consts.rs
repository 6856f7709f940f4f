use crate::float::*;

#[cfg(not(feature = "single_precision"))]
pub use self::double::*;
#[cfg(feature = "single_precision")]
pub use self::single::*;

#[cfg(not(feature = "single_precision"))]
mod double {
    use super::*;

    pub const EPSILON: Float = 1e-10;
    pub const PI: Float = std::f64::consts::PI;
}

#[cfg(feature = "single_precision")]
mod single {
    use super::*;

    pub const EPSILON: Float = 1e-5;
    pub const PI: Float = std::f32::consts::PI;
}

/// Minimum ray parameter accepted as a hit
pub const HIT_EPSILON: Float = 0.01;
/// Allowed deviation of the barycentric weight sum from one
pub const BARYCENTRIC_TOLERANCE: Float = 0.001;
/// Minimum value of 1 - |viewdir . updir| for a valid camera frame
pub const PARALLEL_TOLERANCE: Float = 0.01;
pub const MAX_REFLECT_DEPTH: u32 = 3;
pub const MAX_REFRACT_DEPTH: u32 = 3;
/// Radius of the sphere that soft shadow samples are drawn from
pub const LIGHT_RADIUS: Float = 0.5;
