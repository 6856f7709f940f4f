use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config::RenderConfig;
use crate::Float;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "rusty_the_ray_caster")]
#[command(about = "Whitted style ray caster for tag based scene files")]
pub struct Args {
    /// Scene description file
    pub scene: PathBuf,

    /// Output image, the format follows the extension. Defaults to the scene path with .ppm
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of render threads, defaults to the number of physical cores
    #[arg(long)]
    pub threads: Option<usize>,

    /// Shadow rays per positional light, more than one gives soft shadows
    #[arg(long, default_value = "1")]
    pub shadow_samples: usize,

    /// Radius of the area soft shadow samples are drawn from
    #[arg(long)]
    pub light_radius: Option<Float>,

    /// Minimum ray parameter accepted as a hit
    #[arg(long)]
    pub epsilon: Option<Float>,

    /// Reflection and refraction recursion limit
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for soft shadow sampling
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Print timing statistics after rendering
    #[arg(long)]
    pub stats: bool,

    /// Also save the statistics table to a timestamped file in this directory
    #[arg(long)]
    pub stats_dir: Option<PathBuf>,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::soft_shadows(self.shadow_samples);
        if let Some(threads) = self.threads {
            config.max_threads = threads.max(1);
        }
        if let Some(radius) = self.light_radius {
            config.light_radius = radius;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(depth) = self.max_depth {
            config.max_reflect_depth = depth;
            config.max_refract_depth = depth;
        }
        config.seed = self.seed;
        config
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output(&self.scene),
        }
    }
}

/// Scene path with the extension replaced by ppm
pub fn default_output(scene: &Path) -> PathBuf {
    scene.with_extension("ppm")
}

/// Initialize the logger with the specified level
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
