use std::sync::{mpsc, Arc};
use std::thread;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::scene::Scene;
use crate::stats;

mod coordinator;
mod render_worker;
mod shade;
mod traced_image;

use self::coordinator::RenderCoordinator;
use self::render_worker::RenderWorker;
use self::traced_image::TracedImage;

pub struct Renderer;

impl Renderer {
    /// Render the whole image, blocking until every worker is done.
    /// Fails if any block is left unrendered.
    pub fn render(
        scene: Arc<Scene>,
        camera: &Camera,
        config: &RenderConfig,
    ) -> Result<TracedImage> {
        stats::start_render();
        let mut image = TracedImage::empty(camera.width, camera.height);
        let coordinator = Arc::new(RenderCoordinator::new(camera.width, camera.height, config));
        let n_threads = config.max_threads.max(1).min(coordinator.n_blocks().max(1));
        log::info!(
            "rendering {}x{} in {} blocks with {} threads",
            camera.width,
            camera.height,
            coordinator.n_blocks(),
            n_threads
        );

        let (result_tx, result_rx) = mpsc::channel();
        let mut thread_handles = Vec::new();
        for id in 0..n_threads {
            let result_tx = result_tx.clone();
            let coordinator = coordinator.clone();
            let camera = camera.clone();
            let config = config.clone();
            let scene = scene.clone();
            let handle = thread::spawn(move || {
                let worker = RenderWorker::new(id, scene, camera, config, coordinator, result_tx);
                worker.run();
            });
            thread_handles.push(handle);
        }
        // Receiving ends once every worker has dropped its sender
        drop(result_tx);
        let mut rendered = 0;
        for (block, colors) in result_rx {
            image.update_block(block, &colors);
            rendered += 1;
        }
        let panicked = thread_handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(|joined| joined.is_err())
            .count();
        stats::stop_render();

        let total = coordinator.n_blocks();
        if panicked > 0 || rendered < total {
            return Err(RenderError::Worker {
                panicked,
                missing: total - rendered,
                total,
            });
        }
        Ok(image)
    }
}
