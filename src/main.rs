mod camera;
mod cli;
mod color;
mod config;
mod consts;
mod error;
mod float;
mod intersect;
mod light;
mod material;
mod mesh;
mod primitive;
mod renderer;
mod sample;
mod scene;
mod scene_load;
mod stats;
mod texture;

use std::error::Error as StdError;
use std::sync::Arc;

use clap::Parser;

use crate::camera::Camera;
use crate::cli::Args;
use crate::error::{RenderError, Result};
use crate::float::Float;
use crate::renderer::Renderer;

fn run(args: &Args) -> Result<()> {
    let name = args
        .scene
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    stats::new_scene(&name);

    let mut timer = stats::time("Parse");
    let scene = scene_load::load_scene(&args.scene)?;
    timer.stop();
    log::info!(
        "loaded {:?}: {}x{}, {} primitives, {} materials, {} lights",
        args.scene,
        scene.width,
        scene.height,
        scene.primitives.len(),
        scene.materials.len(),
        scene.lights.len()
    );
    stats::set_scene_size(scene.primitives.len(), scene.lights.len());

    let camera = Camera::new(
        scene.eye,
        scene.viewdir,
        scene.updir,
        scene.hfov,
        scene.width,
        scene.height,
    )?;
    let config = args.render_config();
    log::debug!("{:?}", config);

    let image = Renderer::render(Arc::new(scene), &camera, &config)?;
    log::info!("rendering finished");

    let output = args.output_path();
    let mut timer = stats::time("Write");
    image.save_image(&output)?;
    timer.stop();
    log::info!("saved image to {:?}", output);

    if args.stats {
        stats::print();
    }
    if let Some(dir) = &args.stats_dir {
        let path = stats::save(dir).map_err(|source| RenderError::Io {
            path: dir.clone(),
            source,
        })?;
        log::info!("saved statistics to {:?}", path);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    cli::init_logger(args.log_level.clone().into());

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            log::error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
