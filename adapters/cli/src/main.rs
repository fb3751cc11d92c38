#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a level and runs it in a window.

mod logging;
mod manifest;
mod pacing;
mod scene;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use platformer_core::Event;
use platformer_rendering::{Color, Presentation, RenderingBackend, Scene, ViewportPresentation};
use platformer_rendering_macroquad::MacroquadBackend;
use platformer_system_simulation::{Config, Simulation};
use platformer_world::{LevelGrid, World};

use crate::pacing::{InputLatch, TickPacer};

const ASSETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Side-scrolling tile platformer.
#[derive(Debug, Parser)]
#[command(name = "platformer", author, version, about, long_about = None)]
struct Args {
    /// Level CSV file (row-major tile codes).
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Character manifest TOML file.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,
    /// TOML file overriding tuning constants.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for adversary idle rolls.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,
}

fn asset_path(provided: Option<PathBuf>, file: &str) -> PathBuf {
    provided.unwrap_or_else(|| Path::new(ASSETS).join(file))
}

fn load_level(path: &Path, columns: u32, rows: u32) -> Result<LevelGrid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    LevelGrid::parse(&text, columns, rows)
        .with_context(|| format!("failed to parse level {}", path.display()))
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::TimeAdvanced { .. } | Event::PlayerMoved { .. } => {}
            Event::EntityDied { .. } | Event::LevelCompleted => log::info!("{event:?}"),
            _ => log::debug!("{event:?}"),
        }
    }
}

/// Entry point for the platformer command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let tuning = manifest::load_tuning(args.config.as_deref())?;
    let catalog = manifest::load_catalog(&asset_path(args.manifest, "characters.toml"))?;
    let level_path = asset_path(args.level, "level_1.csv");
    let grid = load_level(&level_path, tuning.columns, tuning.rows)?;

    let viewport = ViewportPresentation::new(tuning.viewport_width, tuning.viewport_height)
        .context("invalid viewport configuration")?;
    let world = World::new(&grid, tuning, catalog)
        .with_context(|| format!("failed to load level {}", level_path.display()))?;
    let mut simulation = Simulation::new(world, Config::new(args.seed));

    let mut pacer = TickPacer::new(simulation.tick_duration());
    let mut latch = InputLatch::default();
    let mut initial = Scene::new(viewport);
    scene::populate(&mut initial, &simulation);

    let presentation = Presentation::new("Platformer", Color::from_rgb_u8(144, 201, 120), initial);

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |frame_dt, input, scene| {
            latch.observe(input.intent);
            for _ in 0..pacer.advance(frame_dt) {
                let report = simulation.step(latch.take(input.intent));
                log_events(report.events());
            }
            scene::populate(scene, &simulation);
        })
}
