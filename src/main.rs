mod app;
mod color;
mod config;
mod frame;
mod input;
mod model;
mod params;
mod plant;
mod raster;
mod render;
mod scene;
mod state;
mod storage;
mod strategy;
mod surface;
mod timeline;
mod weather;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = config::Cli::parse();
    let paths = config::project_paths()?;
    init_logging(&paths.log_path)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting moodbloom");
    app::run(cli, paths)
}

/// The terminal belongs to the UI, so logs go to a file in the data dir.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("MOODBLOOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
