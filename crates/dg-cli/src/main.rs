//! dungen: generate a dungeon and print it as text
//!
//! The level goes to stdout, a one-line summary to stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dg_core::{GenConfig, Grid, Style};

/// Procedural dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Generate caves and dungeons as ASCII maps", long_about = None)]
struct Args {
    /// Level style (random-walk, dungeon-grid, dungeon)
    #[arg(short = 's', long = "style", default_value = "random-walk")]
    style: Style,

    /// Grid width in tiles
    #[arg(short = 'W', long = "width", default_value_t = 80)]
    width: i32,

    /// Grid height in tiles
    #[arg(short = 'H', long = "height", default_value_t = 50)]
    height: i32,

    /// Floor tiles (random walk) or rooms (dungeons) to generate
    #[arg(short = 'n', long = "count")]
    count: Option<usize>,

    /// Seed for a reproducible level
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// JSON file with generation settings, replacing the style presets
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Do not paint doors and room corners
    #[arg(long = "no-markers")]
    no_markers: bool,

    /// Skip the clean-up passes
    #[arg(long = "raw")]
    raw: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<GenConfig> {
    let Some(path) = &args.config else {
        let mut config = GenConfig::default();
        args.style.tune(&mut config);
        return Ok(config);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let grid = match args.seed {
        Some(seed) => Grid::with_seed(args.width, args.height, seed),
        None => Grid::new(args.width, args.height),
    };
    let mut grid = grid.with_config(config);
    let count = args
        .count
        .unwrap_or_else(|| args.style.default_count(args.width, args.height));

    log::info!(
        "Generating {} {}x{} level (count {count}, seed {})",
        args.style,
        args.width,
        args.height,
        grid.seed()
    );
    let report = if args.raw {
        args.style.run(&mut grid, count)
    } else {
        args.style.generate(&mut grid, count)
    }
    .with_context(|| format!("{} generation failed (seed {})", args.style, grid.seed()))?;

    if !args.no_markers {
        grid.mark_features();
    }
    print!("{grid}");
    eprintln!(
        "{}: {} rooms, {} doors, {} attempt(s) in {:?}, seed {}",
        report.strategy,
        grid.rooms().len(),
        grid.doors().len(),
        report.attempts,
        report.elapsed,
        grid.seed()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
