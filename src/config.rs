use crate::consts;
use crate::Float;

#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Maximum number of threads to use for rendering
    pub max_threads: usize,
    /// Edge length of the square blocks handed to workers
    pub block_size: u32,
    /// Minimum ray parameter accepted as a hit
    pub epsilon: Float,
    /// Shadow rays per positional light. One gives hard shadows.
    pub shadow_samples: usize,
    /// Radius of the sphere that soft shadow samples are drawn from
    pub light_radius: Float,
    pub max_reflect_depth: u32,
    pub max_refract_depth: u32,
    /// Seed for soft shadow sampling
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_threads: num_cpus::get_physical().max(1),
            block_size: 32,
            epsilon: consts::HIT_EPSILON,
            shadow_samples: 1,
            light_radius: consts::LIGHT_RADIUS,
            max_reflect_depth: consts::MAX_REFLECT_DEPTH,
            max_refract_depth: consts::MAX_REFRACT_DEPTH,
            seed: 0,
        }
    }
}

#[allow(dead_code)]
impl RenderConfig {
    pub fn soft_shadows(samples: usize) -> Self {
        RenderConfig {
            shadow_samples: samples.max(1),
            ..Default::default()
        }
    }

    pub fn single_threaded(self) -> Self {
        RenderConfig {
            max_threads: 1,
            ..self
        }
    }

    pub fn soft_shadows_enabled(&self) -> bool {
        self.shadow_samples > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let default = RenderConfig::default();
        assert!(default.max_threads >= 1);
        assert!(!default.soft_shadows_enabled());
        assert_eq!(default.max_reflect_depth, 3);
        let soft = RenderConfig::soft_shadows(16).single_threaded();
        assert_eq!(soft.shadow_samples, 16);
        assert_eq!(soft.max_threads, 1);
        assert!(soft.soft_shadows_enabled());
        assert_eq!(RenderConfig::soft_shadows(0).shadow_samples, 1);
    }
}
