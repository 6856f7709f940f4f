use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use rand::rngs::StdRng;

use crate::color::Color;
use crate::config::RenderConfig;
use crate::intersect::{Intersection, Ray};
use crate::light::{Light, LightKind};
use crate::material::Material;
use crate::sample;
use crate::scene::Scene;
use crate::Float;

/// Recursive Whitted shading over a frozen scene
pub struct Shader<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    rng: &'a mut StdRng,
}

impl<'a> Shader<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig, rng: &'a mut StdRng) -> Self {
        Self { scene, config, rng }
    }

    /// Color seen along a camera ray, background on a miss
    pub fn trace(&mut self, ray: &Ray) -> Color {
        match self.scene.find_nearest(ray, None, self.config.epsilon) {
            Some(isect) => self.shade(ray, &isect),
            None => self.scene.background,
        }
    }

    pub fn shade(&mut self, ray: &Ray, isect: &Intersection) -> Color {
        let scene = self.scene;
        let material = scene.material(isect.material);
        let i = -ray.dir;
        let n = isect.facing_normal(ray);
        let base = material.base_color(&scene.textures, isect.tex_coords);
        // Highlights follow the camera, also for secondary hits
        let to_eye = scene.eye - isect.p;
        let v = if to_eye.magnitude2() > 0.0 {
            to_eye.normalize()
        } else {
            i
        };

        let mut result = (base * material.ka).clamp();
        for light in &scene.lights {
            let visibility = self.visibility(light, isect);
            if visibility <= 0.0 {
                continue;
            }
            let l = light.to_light(isect.p);
            let diffuse = base * (material.kd * n.dot(l).max(0.0));
            let h = l + v;
            let specular = if h.magnitude2() > 0.0 {
                let n_dot_h = n.dot(h.normalize()).max(0.0);
                material.specular * (material.ks * n_dot_h.powf(material.shininess))
            } else {
                Color::black()
            };
            let contribution = (diffuse.clamp() + specular).clamp() * light.color;
            result = (result + contribution * (visibility * light.falloff(isect.p))).clamp();
        }

        if let Some(cue) = &scene.depth_cue {
            result = cue.apply(result, scene.eye.distance(isect.p));
        }

        let cos_i = n.dot(i).max(0.0).min(1.0);
        let fr = fresnel(material, cos_i);

        if isect.reflect_depth < self.config.max_reflect_depth {
            result = (result + self.reflect(isect, n, i, cos_i) * fr).clamp();
        }
        if material.is_transparent() && isect.refract_depth < self.config.max_refract_depth {
            let weight = (1.0 - fr) * (1.0 - material.opacity);
            result = (result + self.refract(isect, n, i, cos_i) * weight).clamp();
        }
        result
    }

    fn reflect(
        &mut self,
        isect: &Intersection,
        n: Vector3<Float>,
        i: Vector3<Float>,
        cos_i: Float,
    ) -> Color {
        let r = 2.0 * cos_i * n - i;
        let ray = Ray::from_dir(isect.p, r);
        match self
            .scene
            .find_nearest(&ray, Some(isect.primitive), self.config.epsilon)
        {
            Some(mut next) => {
                next.reflect_depth = isect.reflect_depth + 1;
                next.refract_depth = isect.refract_depth;
                next.from_material = isect.from_material;
                self.shade(&ray, &next)
            }
            None => Color::black(),
        }
    }

    fn refract(
        &mut self,
        isect: &Intersection,
        n: Vector3<Float>,
        i: Vector3<Float>,
        cos_i: Float,
    ) -> Color {
        let n_i = isect
            .from_material
            .map_or(1.0, |m| self.scene.material(m).refraction_i);
        let n_t = self.scene.material(isect.material).refraction_i;
        let eta = n_i / n_t;
        let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
        if k < 0.0 {
            // Total internal reflection
            return Color::black();
        }
        let t = -n * k.sqrt() + eta * (n * cos_i - i);
        if t.magnitude2() == 0.0 {
            return Color::black();
        }
        let ray = Ray::from_dir(isect.p, t);
        // The surface that was just entered has to be found again from inside
        match self.scene.find_nearest(&ray, None, self.config.epsilon) {
            Some(mut next) => {
                next.reflect_depth = isect.reflect_depth;
                next.refract_depth = isect.refract_depth + 1;
                next.from_material = match isect.from_material {
                    None => Some(isect.material),
                    Some(_) => None,
                };
                self.shade(&ray, &next)
            }
            None => Color::black(),
        }
    }

    /// Fraction of the light that reaches the hit point
    fn visibility(&mut self, light: &Light, isect: &Intersection) -> Float {
        match light.kind {
            LightKind::Directional(dir) => {
                let ray = Ray::from_dir(isect.p, -dir);
                if self.occluded(&ray, isect, None) {
                    0.0
                } else {
                    1.0
                }
            }
            LightKind::Positional(pos) => {
                if !self.config.soft_shadows_enabled() {
                    return self.positional_visibility(pos, isect);
                }
                let samples = self.config.shadow_samples;
                let mut visible = 0.0;
                for _ in 0..samples {
                    let offset =
                        self.config.light_radius * sample::uniform_sample_sphere(&mut *self.rng);
                    visible += self.positional_visibility(pos + offset, isect);
                }
                visible / samples as Float
            }
        }
    }

    fn positional_visibility(&mut self, pos: Point3<Float>, isect: &Intersection) -> Float {
        let ray = Ray::from_point(isect.p, pos);
        if self.occluded(&ray, isect, Some(pos.distance(isect.p))) {
            0.0
        } else {
            1.0
        }
    }

    /// Any primitive other than the hit one in front of max_t blocks the ray
    fn occluded(&self, ray: &Ray, isect: &Intersection, max_t: Option<Float>) -> bool {
        match self
            .scene
            .find_nearest(ray, Some(isect.primitive), self.config.epsilon)
        {
            Some(blocker) => max_t.map_or(true, |max_t| blocker.t < max_t),
            None => false,
        }
    }
}

/// Schlick reflectance, stays in [0, 1] for any incidence cosine
fn fresnel(material: &Material, cos_i: Float) -> Float {
    let f0 = material.f0();
    let cos_i = cos_i.max(0.0).min(1.0);
    f0 + (1.0 - f0) * (1.0 - cos_i).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Material, MaterialId};
    use crate::primitive::{Sphere, Triangle};
    use crate::scene::{DepthCue, PrimitiveId};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    fn matte(color: Color) -> Material {
        Material {
            diffuse: color,
            specular: Color::white(),
            ka: 0.1,
            kd: 0.8,
            ks: 0.0,
            shininess: 1.0,
            ..Default::default()
        }
    }

    fn lit_floor() -> Scene {
        let mut scene = Scene::default();
        scene.materials.push(matte(Color::white()));
        // Large floor made of one triangle in the y = 0 plane
        scene.mesh.positions = vec![
            Point3::new(-100.0, 0.0, 100.0),
            Point3::new(100.0, 0.0, 100.0),
            Point3::new(0.0, 0.0, -100.0),
        ];
        scene.primitives.push(
            Triangle {
                vertices: [0, 1, 2],
                normals: None,
                tex_coords: None,
                material: MaterialId(0),
            }
            .into(),
        );
        scene
            .lights
            .push(Light::positional(Point3::new(0.0, 10.0, 0.0), Color::white()));
        scene
    }

    fn floor_color(scene: &Scene, config: &RenderConfig) -> Color {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut shader = Shader::new(scene, config, &mut rng);
        let ray = Ray::from_point(Point3::new(0.0, 5.0, 5.0), Point3::origin());
        shader.trace(&ray)
    }

    #[test]
    fn miss_returns_background() {
        let mut scene = lit_floor();
        scene.background = Color::new(0.2, 0.3, 0.4);
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut shader = Shader::new(&scene, &config, &mut rng);
        let ray = Ray::from_dir(Point3::new(0.0, 5.0, 0.0), Vector3::unit_y());
        assert_eq!(shader.trace(&ray), Color::new(0.2, 0.3, 0.4));
    }

    #[test]
    fn blocker_casts_hard_shadow() {
        let mut scene = lit_floor();
        let config = RenderConfig::default();
        let lit = floor_color(&scene, &config);
        scene
            .primitives
            .push(Sphere::new(Point3::new(0.0, 5.0, 0.0), 1.0, MaterialId(0)).into());
        let shadowed = floor_color(&scene, &config);
        // Only the ambient term remains
        assert_abs_diff_eq!(shadowed.r(), 0.1, epsilon = 1e-6);
        assert!(lit.r() > shadowed.r());
    }

    #[test]
    fn soft_shadow_is_partial() {
        let mut scene = lit_floor();
        // Small blocker just below the light hides part of the sampling sphere
        scene
            .primitives
            .push(Sphere::new(Point3::new(0.0, 9.0, 0.0), 0.3, MaterialId(0)).into());
        let config = RenderConfig {
            light_radius: 2.0,
            ..RenderConfig::soft_shadows(64)
        };
        let c = floor_color(&scene, &config);
        let hard = floor_color(&scene, &RenderConfig::default());
        assert_abs_diff_eq!(hard.r(), 0.1, epsilon = 1e-6);
        assert!(c.r() > 0.1);
        // Deterministic for a fixed seed
        assert_eq!(c, floor_color(&scene, &config));
    }

    #[test]
    fn fresnel_weight_is_bounded() {
        for &ior in &[1.0, 1.33, 1.5, 2.4, 0.5] {
            let material = Material {
                refraction_i: ior,
                ..Default::default()
            };
            for step in -10..=30 {
                let cos_i = step as Float / 20.0;
                let fr = fresnel(&material, cos_i);
                assert!(fr >= 0.0 && fr <= 1.0, "ior {} cos {} fr {}", ior, cos_i, fr);
            }
            assert_abs_diff_eq!(fresnel(&material, 1.0), material.f0(), epsilon = 1e-6);
            assert_abs_diff_eq!(fresnel(&material, 0.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn facing_mirrors_terminate() {
        let mut scene = Scene::default();
        scene.materials.push(Material {
            diffuse: Color::new(0.2, 0.2, 0.2),
            ks: 1.0,
            refraction_i: 3.0,
            ..Default::default()
        });
        scene.mesh.positions = vec![
            Point3::new(-100.0, -100.0, 0.0),
            Point3::new(100.0, -100.0, 0.0),
            Point3::new(0.0, 100.0, 0.0),
            Point3::new(-100.0, -100.0, 10.0),
            Point3::new(100.0, -100.0, 10.0),
            Point3::new(0.0, 100.0, 10.0),
        ];
        for &offset in &[0, 3] {
            scene.primitives.push(
                Triangle {
                    vertices: [offset, offset + 1, offset + 2],
                    normals: None,
                    tex_coords: None,
                    material: MaterialId(0),
                }
                .into(),
            );
        }
        scene
            .lights
            .push(Light::positional(Point3::new(0.0, 0.0, 5.0), Color::white()));
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut shader = Shader::new(&scene, &config, &mut rng);
        let ray = Ray::from_dir(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        let c = shader.trace(&ray);
        assert!(c.r().is_finite() && c.g().is_finite() && c.b().is_finite());
        assert!(c.r() >= 0.0 && c.r() <= 1.0);
    }

    #[test]
    fn glass_sphere_lets_background_light_through() {
        let mut scene = Scene::default();
        scene.materials.push(matte(Color::new(1.0, 0.0, 0.0)));
        scene.materials.push(Material {
            diffuse: Color::black(),
            ka: 0.0,
            kd: 0.0,
            ks: 0.0,
            opacity: 0.0,
            refraction_i: 1.0,
            ..Default::default()
        });
        scene
            .primitives
            .push(Sphere::new(Point3::new(0.0, 0.0, -10.0), 3.0, MaterialId(0)).into());
        scene
            .primitives
            .push(Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0, MaterialId(1)).into());
        // Off to the side so the glass does not shadow the red sphere
        scene
            .lights
            .push(Light::positional(Point3::new(0.0, 10.0, 0.0), Color::white()));
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut shader = Shader::new(&scene, &config, &mut rng);
        let ray = Ray::from_dir(Point3::origin(), -Vector3::unit_z());
        let isect = scene.find_nearest(&ray, None, config.epsilon).unwrap();
        assert_eq!(isect.primitive, PrimitiveId(1));
        // Red sphere behind the invisible glass shows through
        let c = shader.shade(&ray, &isect);
        assert!(c.r() > 0.4);
        assert_abs_diff_eq!(c.g(), 0.0, epsilon = 1e-6);
    }

    fn mirror_finish() -> Material {
        Material {
            diffuse: Color::black(),
            specular: Color::white(),
            ka: 0.0,
            kd: 0.0,
            ks: 1.0,
            shininess: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn specular_highlight_uses_view_toward_eye() {
        let mut scene = lit_floor();
        scene.materials[0] = mirror_finish();
        let config = RenderConfig::default();
        // Straight down onto the floor, the light sits straight above
        let ray = Ray::from_dir(Point3::new(0.0, 5.0, 0.0), -Vector3::unit_y());

        scene.eye = Point3::new(0.0, 5.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let on_axis = Shader::new(&scene, &config, &mut rng).trace(&ray);
        assert_abs_diff_eq!(on_axis.r(), 1.0, epsilon = 1e-6);

        // Same ray, but the eye is elsewhere so the ray is a secondary one
        scene.eye = Point3::new(0.0, 0.0, 10.0);
        let mut rng = StdRng::seed_from_u64(0);
        let off_axis = Shader::new(&scene, &config, &mut rng).trace(&ray);
        assert!(off_axis.r() < 1e-6, "got {:?}", off_axis);
    }

    #[test]
    fn directional_light_blocked_at_any_distance() {
        let mut scene = lit_floor();
        scene.lights = vec![Light::directional(-Vector3::unit_y(), Color::white())];
        let config = RenderConfig::default();
        let lit = floor_color(&scene, &config);
        assert!(lit.r() > 0.5);
        scene
            .primitives
            .push(Sphere::new(Point3::new(0.0, 50.0, 0.0), 1.0, MaterialId(0)).into());
        let shadowed = floor_color(&scene, &config);
        assert_abs_diff_eq!(shadowed.r(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn depth_cue_blends_toward_fog() {
        let mut scene = lit_floor();
        let config = RenderConfig::default();
        let clear = floor_color(&scene, &config);
        scene.depth_cue = Some(DepthCue {
            color: Color::new(0.0, 0.0, 1.0),
            a_max: 1.0,
            a_min: 0.0,
            dist_max: 50.0,
            dist_min: 10.0,
        });

        // Beyond dist_max only fog remains
        scene.eye = Point3::new(0.0, 0.0, 100.0);
        let far = floor_color(&scene, &config);
        assert_abs_diff_eq!(far.r(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(far.b(), 1.0, epsilon = 1e-6);

        // Inside dist_min the surface is untouched
        scene.eye = Point3::new(0.0, 5.0, 5.0);
        assert_eq!(floor_color(&scene, &config), clear);

        // Halfway along the ramp
        scene.eye = Point3::new(0.0, 0.0, 30.0);
        let mid = floor_color(&scene, &config);
        assert_abs_diff_eq!(mid.r(), 0.5 * clear.r(), epsilon = 1e-6);
    }

    #[test]
    fn total_internal_reflection_transmits_nothing() {
        let mut scene = Scene::default();
        // Clear sheet at y = 0, dense medium, bright floor at y = -1
        scene.materials.push(Material {
            ka: 0.0,
            kd: 0.0,
            ks: 0.0,
            opacity: 0.0,
            refraction_i: 1.0,
            ..Default::default()
        });
        scene.materials.push(Material {
            refraction_i: 1.5,
            ..Default::default()
        });
        scene.materials.push(Material {
            diffuse: Color::white(),
            ka: 1.0,
            kd: 0.0,
            ks: 0.0,
            ..Default::default()
        });
        for &y in &[0.0, -1.0] {
            scene.mesh.positions.extend_from_slice(&[
                Point3::new(-100.0, y, 100.0),
                Point3::new(100.0, y, 100.0),
                Point3::new(0.0, y, -100.0),
            ]);
        }
        for &(offset, material) in &[(0, 0), (3, 2)] {
            scene.primitives.push(
                Triangle {
                    vertices: [offset, offset + 1, offset + 2],
                    normals: None,
                    tex_coords: None,
                    material: MaterialId(material),
                }
                .into(),
            );
        }
        let config = RenderConfig::default();
        // Grazing ray onto the sheet
        let ray = Ray::from_point(Point3::new(-10.0, 1.0, 0.0), Point3::origin());
        let mut isect = scene.find_nearest(&ray, None, config.epsilon).unwrap();
        assert_eq!(isect.primitive, PrimitiveId(0));
        let n = isect.facing_normal(&ray);
        let i = -ray.dir;
        let cos_i = n.dot(i);

        let mut rng = StdRng::seed_from_u64(0);
        let mut shader = Shader::new(&scene, &config, &mut rng);
        // Matching indices pass straight through to the bright floor
        assert!(shader.refract(&isect, n, i, cos_i).r() > 0.9);

        // Leaving a denser medium at this angle reflects everything
        isect.from_material = Some(MaterialId(1));
        assert_eq!(shader.refract(&isect, n, i, cos_i), Color::black());
        let c = shader.shade(&ray, &isect);
        assert!(c.r().is_finite() && c.g().is_finite() && c.b().is_finite());
        assert!(c.r() < 0.1);
    }
}
