use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Local;

use prettytable::{cell, row, Table};

use crate::float::*;
use crate::intersect::Ray;

// Helper trait to print out Float type used
trait FloatName {
    fn float_name() -> String;
}

impl FloatName for f32 {
    fn float_name() -> String {
        "f32".to_string()
    }
}

impl FloatName for f64 {
    fn float_name() -> String {
        "f64".to_string()
    }
}

lazy_static::lazy_static! {
    static ref STATS: Mutex<Statistics> = Mutex::new(Statistics::new("scene"));
}

fn stats() -> MutexGuard<'static, Statistics> {
    // A panicking worker must not take the statistics down with it
    STATS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start collecting statistics for a new scene, dropping earlier ones
pub fn new_scene(name: &str) {
    *stats() = Statistics::new(name);
}

pub fn time(name: &str) -> TimerHandle {
    stats().start_timer(name);
    TimerHandle {
        name: name.to_string(),
        active: true,
    }
}

fn stop_timer(name: &str) {
    stats().stop_timer(name);
}

pub fn start_render() {
    let mut handle = time("Render");
    stats().rays_at_start = Ray::count();
    handle.deactivate();
}

pub fn stop_render() {
    stop_timer("Render");
    let mut stats = stats();
    stats.ray_count = Ray::count().saturating_sub(stats.rays_at_start);
}

pub fn set_scene_size(n_primitives: usize, n_lights: usize) {
    let mut stats = stats();
    stats.n_primitives = n_primitives;
    stats.n_lights = n_lights;
}

pub fn print() {
    stats().table().printstd();
}

/// Save the statistics table to a timestamped file under dir
pub fn save(dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(Local::now().format("stats_%F_%H%M%S.txt").to_string());
    let mut file = File::create(&path)?;
    stats().table().print(&mut file)?;
    Ok(path)
}

struct Statistics {
    scene: String,
    timers: Vec<(Timer, usize)>,
    active_timers: Vec<usize>,
    rays_at_start: usize,
    ray_count: usize,
    n_primitives: usize,
    n_lights: usize,
}

impl Statistics {
    fn new(name: &str) -> Statistics {
        Statistics {
            scene: name.to_string(),
            timers: Vec::new(),
            active_timers: Vec::new(),
            rays_at_start: 0,
            ray_count: 0,
            n_primitives: 0,
            n_lights: 0,
        }
    }

    fn start_timer(&mut self, name: &str) {
        let timer = Timer::new(name);
        self.timers.push((timer, self.active_timers.len()));
        self.active_timers.push(self.timers.len() - 1);
    }

    fn stop_timer(&mut self, name: &str) {
        let position = self
            .active_timers
            .iter()
            .rposition(|&i| self.timers[i].0.name == name);
        match position {
            Some(pos) => {
                let i = self.active_timers.remove(pos);
                self.timers[i].0.stop();
            }
            None => log::warn!("tried to stop timer '{}' which is not running", name),
        }
    }

    fn get_timer(&self, name: &str) -> Option<&Timer> {
        self.timers
            .iter()
            .rev()
            .map(|(timer, _)| timer)
            .find(|timer| timer.name == name)
    }

    fn mrps(&self) -> String {
        match self.get_timer("Render").and_then(|timer| timer.duration) {
            Some(duration) if duration > Duration::from_secs(0) => {
                let mrps = self.ray_count as f64 / duration.as_secs_f64() / 1_000_000.0;
                format!("{:#.2?}", mrps)
            }
            _ => "-".to_string(),
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row![Float::float_name(), self.scene]);
        for (timer, level) in &self.timers {
            table.add_row(row![
                format!("{}{}", "| ".repeat(*level), timer.name),
                timer.pretty_duration()
            ]);
        }
        table.add_row(row!["Rays", self.ray_count]);
        table.add_row(row!["Mrays/s", self.mrps()]);
        table.add_row(row!["Primitives", self.n_primitives]);
        table.add_row(row!["Lights", self.n_lights]);
        table
    }
}

#[derive(Clone, Debug)]
pub struct Timer {
    name: String,
    start: Instant,
    duration: Option<Duration>,
}

impl Timer {
    fn new(name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            duration: None,
        }
    }

    fn stop(&mut self) {
        if self.duration.is_none() {
            self.duration = Some(self.start.elapsed());
        }
    }

    fn pretty_duration(&self) -> String {
        if let Some(duration) = &self.duration {
            format!("{:#.2?}", duration)
        } else {
            format!("{:#.2?}", self.start.elapsed())
        }
    }
}

/// Stops its timer when dropped unless stopped explicitly
pub struct TimerHandle {
    name: String,
    active: bool,
}

impl TimerHandle {
    pub fn stop(&mut self) {
        if self.active {
            stop_timer(&self.name);
            self.deactivate();
        }
    }

    // Prevent handle from stopping the timer when dropped
    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop()
    }
}
