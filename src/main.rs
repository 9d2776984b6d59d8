mod animation;
mod app;
mod config;
mod cursor;
mod field;
mod headless;
mod layout;
mod radial;
mod scene;
mod stage;
mod util;

use std::io;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use config::{AmbientConfig, Layers};
use headless::HeadlessRun;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file overriding the built-in animation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    #[arg(long, value_enum, default_value_t = Layers::Both)]
    scene: Layers,
    /// Simulate this many frames without a window and print the last scene as JSON.
    #[arg(long)]
    headless_frames: Option<u64>,
    #[arg(long)]
    no_cursor: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AmbientConfig::load(path)?,
        None => AmbientConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    log::debug!("using seed {seed}");

    if let Some(frames) = args.headless_frames {
        let scene = headless::simulate(
            &config,
            HeadlessRun {
                frames,
                width: args.width,
                height: args.height,
                seed,
                layers: args.scene,
            },
        )?;
        return headless::write_scene(&scene, &mut io::stdout().lock());
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    let with_cursor = !args.no_cursor;
    eframe::run_native(
        "navNote ambient",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::AmbientApp::new(
                cc,
                config,
                args.scene,
                seed,
                with_cursor,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run window: {error}"))
}
