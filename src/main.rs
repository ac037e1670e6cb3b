//! Slidecrawl - Entry Point
//!
//! Generates one level and prints it to stdout, colored when stdout is a
//! terminal. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;

use slidecrawl::data::{default_config_path, GeneratorConfig};
use slidecrawl::world::TileType;
use slidecrawl::{GeneratedLevel, Session};

/// Generate a sliding-maze level and print it
#[derive(Debug, Parser)]
#[command(name = "slidecrawl", version, about)]
struct Args {
    /// Seed for a reproducible level; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Generator config (RON). Defaults to the user config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the level as JSON instead of rows
    #[arg(long)]
    json: bool,

    /// Write the default config to PATH and exit
    #[arg(long, value_name = "PATH")]
    export_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting Slidecrawl v{}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();

    if let Some(path) = &args.export_config {
        GeneratorConfig::default()
            .save(path)
            .with_context(|| format!("exporting config to {}", path.display()))?;
        log::info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        // An explicit path must load
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::load_or_default(&default_config_path()),
    };

    let session = Session::new(config, args.seed)?;
    let level = session.current();

    if args.json {
        print_json(level, args.seed)?;
    } else {
        print_rows(level)?;
    }
    Ok(())
}

fn print_json(level: &GeneratedLevel, seed: Option<u64>) -> Result<()> {
    let report = serde_json::json!({
        "seed": seed,
        "width": level.map.width,
        "height": level.map.height,
        "rows": level.rows(),
        "spawn": level.spawn,
        "goal": level.goal,
        "goal_steps": level.goal_steps,
        "moves": level.solution.moves,
        "attempts": level.attempts,
        "fallback": format!("{:?}", level.fallback),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_rows(level: &GeneratedLevel) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let colored = io::stdout().is_tty();

    for y in 0..level.map.height {
        for x in 0..level.map.width {
            let tile = level.map.tiles[level.map.xy_to_idx(x, y)];
            if colored {
                let (r, g, b) = tile.fg_color();
                let glyph = tile.glyph().with(Color::Rgb { r, g, b });
                if tile == TileType::PlayerSpawn || tile == TileType::Goal {
                    write!(stdout, "{}", glyph.bold())?;
                } else {
                    write!(stdout, "{}", glyph)?;
                }
            } else {
                write!(stdout, "{}", tile.glyph())?;
            }
        }
        writeln!(stdout)?;
    }

    writeln!(
        stdout,
        "goal {} slides away, {} attempts, solution {:?}",
        level.goal_steps, level.attempts, level.solution.moves
    )?;
    Ok(())
}
