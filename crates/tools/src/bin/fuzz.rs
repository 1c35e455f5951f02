use std::io;

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::mapgen::invariants::{check_layout, check_polygons};
use dungeon_core::{DungeonConfig, DungeonError, DungeonGenerator};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First seed of the sweep
    #[arg(short, long, default_value_t = 1)]
    seed: u64,
    /// Number of consecutive seeds to generate
    #[arg(short, long, default_value_t = 500)]
    count: u64,
    #[arg(long, default_value_t = 43)]
    width: usize,
    #[arg(long, default_value_t = 43)]
    height: usize,
    /// Upper bound on rooms per dungeon; each case draws 1..=max
    #[arg(long, default_value_t = 9)]
    max_rooms: usize,
}

#[derive(Default)]
struct Tally {
    generated: u64,
    placement_exhausted: u64,
    unsettled: u64,
    violations: Vec<String>,
}

fn random_in(rng: &mut ChaCha8Rng, min: usize, max_inclusive: usize) -> usize {
    min + (rng.next_u64() % (max_inclusive - min + 1) as u64) as usize
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).init();
    let args = Args::parse();

    println!(
        "Sweeping {} seeds from {} on a {}x{} grid...",
        args.count, args.seed, args.width, args.height
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut tally = Tally::default();

    for seed in args.seed..args.seed.saturating_add(args.count) {
        let room_min = random_in(&mut rng, 3, 6);
        let room_max = random_in(&mut rng, room_min, room_min + 4);
        let rooms = random_in(&mut rng, 1, args.max_rooms.max(1));
        let config = DungeonConfig::new(args.width, args.height, room_min, room_max, rooms, seed.max(1));

        let dungeon = match DungeonGenerator::new(config).generate() {
            Ok(dungeon) => dungeon,
            Err(DungeonError::PlacementExhausted { .. }) => {
                tally.placement_exhausted += 1;
                continue;
            }
            Err(DungeonError::ClassificationNonTermination { .. }) => {
                tally.unsettled += 1;
                continue;
            }
            Err(error) => bail!("seed {seed}: {error}"),
        };
        tally.generated += 1;

        if let Err(violation) = check_layout(&dungeon) {
            warn!(seed, %violation, "layout check failed");
            tally.violations.push(format!("seed {seed}: {violation}"));
            continue;
        }

        let outcome = dungeon
            .trace_polygons()
            .map_err(|error| error.to_string())
            .and_then(|polygons| check_polygons(&dungeon, &polygons));
        if let Err(violation) = outcome {
            warn!(seed, %violation, "outline check failed");
            tally.violations.push(format!("seed {seed}: {violation}"));
        }
    }

    println!("Generated:            {}", tally.generated);
    println!("Placement exhausted:  {}", tally.placement_exhausted);
    println!("Relaxation unsettled: {}", tally.unsettled);
    println!("Violations:           {}", tally.violations.len());

    if !tally.violations.is_empty() {
        for violation in &tally.violations {
            eprintln!("{violation}");
        }
        bail!("{} generated dungeons broke a layout or outline check", tally.violations.len());
    }

    println!("Sweep completed successfully.");
    Ok(())
}
