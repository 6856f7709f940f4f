use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::Float;

/// Distance falloff 1 / (c0 + c1 d + c2 d^2)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub c0: Float,
    pub c1: Float,
    pub c2: Float,
}

impl Attenuation {
    pub fn new(c0: Float, c1: Float, c2: Float) -> Self {
        Self { c0, c1, c2 }
    }

    /// Never brightens, factors above one are ignored
    pub fn factor(&self, d: Float) -> Float {
        if self.c0 == 0.0 && self.c1 == 0.0 && self.c2 == 0.0 {
            return 1.0;
        }
        let f = 1.0 / (self.c0 + self.c1 * d + self.c2 * d * d);
        if f.is_finite() && f > 0.0 && f <= 1.0 {
            f
        } else {
            1.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Positional(Point3<Float>),
    /// Unit direction the light travels in
    Directional(Vector3<Float>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub attenuation: Option<Attenuation>,
}

impl Light {
    pub fn positional(pos: Point3<Float>, color: Color) -> Self {
        Self {
            kind: LightKind::Positional(pos),
            color,
            attenuation: None,
        }
    }

    pub fn directional(dir: Vector3<Float>, color: Color) -> Self {
        Self {
            kind: LightKind::Directional(dir.normalize()),
            color,
            attenuation: None,
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = Some(attenuation);
        self
    }

    /// Unit vector from p toward the light
    pub fn to_light(&self, p: Point3<Float>) -> Vector3<Float> {
        match self.kind {
            LightKind::Positional(pos) => (pos - p).normalize(),
            LightKind::Directional(dir) => -dir,
        }
    }

    /// Attenuation factor at p, directional lights are never attenuated
    pub fn falloff(&self, p: Point3<Float>) -> Float {
        match (self.kind, self.attenuation) {
            (LightKind::Positional(pos), Some(att)) => att.factor(pos.distance(p)),
            _ => 1.0,
        }
    }
}
