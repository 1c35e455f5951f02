mod export;
mod settings;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::{Dungeon, DungeonGenerator, Polygon, Structure, TextRenderOptions};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use settings::{Overrides, resolve_config};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Box-drawing text map
    Text,
    /// Seed, structures and traced polygons
    Json,
    /// Level-editor map document
    Export,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    room_min: Option<usize>,
    #[arg(long)]
    room_max: Option<usize>,
    /// Number of rooms; each extra room also adds a corridor
    #[arg(short, long)]
    rooms: Option<usize>,
    /// Generation seed; 0 picks a fresh one
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Blank cells around the text map
    #[arg(long, default_value_t = 1)]
    margin: usize,
    /// Leave the seed off the bottom line of the text map
    #[arg(long)]
    no_seed_stamp: bool,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    width: usize,
    height: usize,
    fingerprint: String,
    structures: &'a [Structure],
    polygons: Vec<Polygon>,
}

fn init_tracing() {
    // WARN by default; RUST_LOG adds more specific directives.
    let env_filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let overrides = Overrides {
        width: args.width,
        height: args.height,
        room_min_size: args.room_min,
        room_max_size: args.room_max,
        room_count: args.rooms,
        seed: args.seed,
    };
    let config = resolve_config(args.config.as_deref(), &overrides)?;

    let dungeon = DungeonGenerator::new(config.clone())
        .generate()
        .with_context(|| format!("Failed to generate dungeon from {config:?}"))?;
    info!(seed = dungeon.seed(), fingerprint = dungeon.fingerprint(), "dungeon ready");

    let rendered = render(&dungeon, &args)?;
    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

fn render(dungeon: &Dungeon, args: &Args) -> Result<String> {
    match args.format {
        OutputFormat::Text => Ok(dungeon.render_text_with(&TextRenderOptions {
            margin: args.margin,
            stamp_seed: !args.no_seed_stamp,
        })),
        OutputFormat::Json => {
            let summary = Summary {
                seed: dungeon.seed(),
                width: dungeon.width(),
                height: dungeon.height(),
                fingerprint: format!("{:#018x}", dungeon.fingerprint()),
                structures: dungeon.structures(),
                polygons: trace(dungeon)?,
            };
            let mut json = serde_json::to_string_pretty(&summary)
                .with_context(|| "Failed to serialize dungeon summary")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Export => {
            let map = export::build_editor_map(dungeon, &trace(dungeon)?);
            let mut json = serde_json::to_string_pretty(&map)
                .with_context(|| "Failed to serialize editor map")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn trace(dungeon: &Dungeon) -> Result<Vec<Polygon>> {
    dungeon
        .trace_polygons()
        .with_context(|| format!("Failed to trace wall outlines for seed {}", dungeon.seed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dungeon_core::generate;
    use serde_json::Value;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_map_onto_overrides() {
        let args = Args::try_parse_from([
            "dungeon", "--width", "50", "--room-min", "5", "--rooms", "3", "--seed", "9", "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.width, Some(50));
        assert_eq!(args.room_min, Some(5));
        assert_eq!(args.rooms, Some(3));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.no_seed_stamp);
    }

    #[test]
    fn test_text_render_is_stamped_with_the_seed() {
        let args = Args::try_parse_from(["dungeon", "--rooms", "1", "--seed", "42"]).unwrap();
        let dungeon = generate(43, 43, 4, 8, 1, 42).unwrap();
        let text = render(&dungeon, &args).unwrap();
        assert!(text.lines().last().unwrap().ends_with("42"));
    }

    #[test]
    fn test_json_summary_lists_structures_and_polygons() {
        let args = Args::try_parse_from(["dungeon", "--format", "json"]).unwrap();
        let dungeon = generate(43, 43, 4, 8, 1, 42).unwrap();
        let json: Value = serde_json::from_str(&render(&dungeon, &args).unwrap()).unwrap();
        assert_eq!(json["seed"], Value::from(42));
        assert_eq!(json["structures"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["polygons"][0]["points"].as_array().map(Vec::len), Some(4));
    }
}
