use std::sync::{mpsc::Sender, Arc};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::scene::Scene;

use super::coordinator::{Block, RenderCoordinator};
use super::shade::Shader;

pub struct RenderWorker {
    id: usize,
    scene: Arc<Scene>,
    camera: Camera,
    config: RenderConfig,
    coordinator: Arc<RenderCoordinator>,
    result_tx: Sender<(Block, Vec<Color>)>,
}

impl RenderWorker {
    pub(super) fn new(
        id: usize,
        scene: Arc<Scene>,
        camera: Camera,
        config: RenderConfig,
        coordinator: Arc<RenderCoordinator>,
        result_tx: Sender<(Block, Vec<Color>)>,
    ) -> RenderWorker {
        RenderWorker {
            id,
            scene,
            camera,
            config,
            coordinator,
            result_tx,
        }
    }

    pub fn run(&self) {
        log::debug!("worker {} started", self.id);
        let mut n_blocks = 0;
        while let Some(block) = self.coordinator.next_block() {
            let colors = self.render_block(block);
            n_blocks += 1;
            if self.result_tx.send((block, colors)).is_err() {
                log::warn!("worker {}: receiver closed, stopping", self.id);
                return;
            }
        }
        log::debug!("worker {} finished after {} blocks", self.id, n_blocks);
    }

    fn render_block(&self, block: Block) -> Vec<Color> {
        // Seeded per block so results do not depend on scheduling
        let seed = self
            .config
            .seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(block.index as u64);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shader = Shader::new(&self.scene, &self.config, &mut rng);
        let mut colors = Vec::with_capacity(block.width as usize * block.height as usize);
        for h in 0..block.height {
            for w in 0..block.width {
                let ray = self.camera.trace_ray(block.left + w, block.top + h);
                colors.push(shader.trace(&ray));
            }
        }
        colors
    }
}
