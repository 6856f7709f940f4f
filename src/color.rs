use std::ops::{Add, AddAssign, Mul, MulAssign};

use cgmath::prelude::*;
use cgmath::Vector3;

use crate::float::*;

/// Convert u8 color to float color in range [0, 1]
pub fn component_to_float(c: u8) -> Float {
    c.to_float() / 255.0
}

/// Linear color. Components are not bounded until the color is clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    color: Vector3<Float>,
}

impl Color {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self {
            color: Vector3::new(r, g, b),
        }
    }

    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn from_pixel(rgb: image::Rgb<u8>) -> Self {
        Self::new(
            component_to_float(rgb.0[0]),
            component_to_float(rgb.0[1]),
            component_to_float(rgb.0[2]),
        )
    }

    /// Convert to an 8 bit pixel, clamping out of range components
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([
            to_channel(self.color.x),
            to_channel(self.color.y),
            to_channel(self.color.z),
        ])
    }

    /// Clamp every component to [0, 1]
    pub fn clamp(self) -> Self {
        Self::new(
            saturate(self.color.x),
            saturate(self.color.y),
            saturate(self.color.z),
        )
    }

    pub fn r(&self) -> Float {
        self.color.x
    }

    pub fn g(&self) -> Float {
        self.color.y
    }

    pub fn b(&self) -> Float {
        self.color.z
    }
}

// Arithmetic operations

impl Add for Color {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.color += rhs.color;
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Self) {
        self.color.mul_assign_element_wise(rhs.color);
    }
}

impl Mul<Float> for Color {
    type Output = Self;

    fn mul(mut self, rhs: Float) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign<Float> for Color {
    fn mul_assign(&mut self, rhs: Float) {
        self.color *= rhs;
    }
}

impl Mul<Color> for Float {
    type Output = Color;

    // Delegate to Color Mul
    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}
