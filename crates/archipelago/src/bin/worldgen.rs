//! # Worldgen
//!
//! Headless world generator. Prints generation statistics and an ASCII map.
//!
//! ```bash
//! # Random (clock) seed, default 200x200
//! worldgen
//!
//! # Pinned seed, large map, stats only
//! worldgen --width 700 --depth 700 --seed 42 --no-map
//!
//! # Tuned tables from a file, legacy pipeline
//! worldgen --config config/worldgen.toml --legacy
//! ```

use std::path::Path;
use std::process;
use std::str::FromStr;

use archipelago::procedural::{ConfigFile, GeneratorConfig, Profile, TileType, WorldGenerator};
use archipelago::{clock_seed, WorldGenerationService, WorldService, SPAWN_SENTINEL};

/// Widest map printed cell-for-cell; larger maps are sampled.
const MAX_MAP_COLUMNS: usize = 160;

fn print_usage() {
    println!("Usage: worldgen [options]");
    println!();
    println!("Options:");
    println!("  -w, --width <cells>          Grid width (default 200)");
    println!("  -d, --depth <cells>          Grid depth (default 200)");
    println!("  -s, --seed <n>               World seed (default: wall clock)");
    println!("      --scale <f>              Noise scale (default 0.05)");
    println!("  -e, --max-elevation <n>      Highest elevation level (default 3)");
    println!("  -c, --config <file.toml>     Load params and tables from TOML");
    println!("      --legacy                 Four-band legacy profile");
    println!("      --no-map                 Skip the ASCII map");
    println!("  -h, --help                   Show this help");
}

/// Value following `long` or `short`, if either flag is present.
fn flag_value<'a>(args: &'a [String], long: &str, short: Option<&str>) -> Option<&'a str> {
    args.iter()
        .position(|a| a == long || short.is_some_and(|s| a == s))
        .map(|i| match args.get(i + 1) {
            Some(value) => value.as_str(),
            None => fail(&format!("{long} needs a value")),
        })
}

fn parsed<T: FromStr>(args: &[String], long: &str, short: Option<&str>) -> Option<T> {
    flag_value(args, long, short).map(|raw| {
        raw.parse()
            .unwrap_or_else(|_| fail(&format!("{long}: cannot parse '{raw}'")))
    })
}

fn fail(message: &str) -> ! {
    eprintln!("   ✗ {message}");
    eprintln!("     Run with --help for usage.");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let has = |flag: &str| args.iter().any(|a| a == flag);

    if has("--help") || has("-h") {
        print_usage();
        return;
    }

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    ARCHIPELAGO WORLDGEN v0.1.0");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    // === CONFIGURATION ===
    let config_path = flag_value(&args, "--config", Some("-c"));
    let (mut params, mut config) = match config_path {
        Some(path) => match ConfigFile::load(Path::new(path)) {
            Ok(file) => {
                println!("   ✓ Config loaded from {path}");
                (file.params, file.generator)
            }
            Err(e) => fail(&format!("config {path}: {e}")),
        },
        None => {
            let mut params = ConfigFile::default().params;
            params.seed = clock_seed();
            (params, GeneratorConfig::default())
        }
    };

    if let Some(width) = parsed(&args, "--width", Some("-w")) {
        params.width = width;
    }
    if let Some(depth) = parsed(&args, "--depth", Some("-d")) {
        params.depth = depth;
    }
    if let Some(seed) = parsed(&args, "--seed", Some("-s")) {
        params.seed = seed;
    }
    if let Some(scale) = parsed(&args, "--scale", None) {
        params.scale = scale;
    }
    if let Some(max_elevation) = parsed(&args, "--max-elevation", Some("-e")) {
        params.max_elevation = max_elevation;
    }
    if has("--legacy") {
        config.profile = Profile::Legacy;
        config.erosion = GeneratorConfig::legacy().erosion;
    }

    println!("   Size:     {} x {}", params.width, params.depth);
    println!("   Seed:     {}", params.seed);
    println!("   Scale:    {}", params.scale);
    println!("   Max elev: {}", params.max_elevation);
    println!("   Profile:  {:?}", config.profile);
    println!();

    // === GENERATION ===
    let generator = WorldGenerator::new(config).unwrap_or_else(|e| fail(&e.to_string()));
    let max_passes = generator.config().erosion.passes;
    let service = WorldGenerationService::new(generator);

    let (world, report) = service
        .generate_world_with_report(&params)
        .unwrap_or_else(|e| fail(&e.to_string()));

    // === STATS ===
    let total = world.tiles().len();
    let counts = world.tile_counts();

    println!("┌─ TILES ──────────────────────────────────────────────────────────┐");
    for tile in TileType::ALL.into_iter().filter(|&t| t != TileType::Empty) {
        let count = counts[tile as usize];
        println!(
            "│ {} {:<8} {:>9}  {:>5.1}%",
            tile.symbol(),
            format!("{tile:?}"),
            count,
            count as f64 * 100.0 / total as f64
        );
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let spawn = service.default_spawn_position();
    let passes = &report.erosion.downgraded_per_pass;
    println!(
        "   Erosion passes: {} of {max_passes} ran, downgraded {passes:?}{}",
        passes.len(),
        if report.erosion.converged { ", converged" } else { "" }
    );
    if spawn == SPAWN_SENTINEL && !world.is_walkable(spawn.0, spawn.1) {
        println!("   Spawn:          none walkable, sentinel {spawn:?}");
    } else {
        println!(
            "   Spawn:          ({}, {}) height {}",
            spawn.0,
            spawn.1,
            service.height_at(spawn.0, spawn.1)
        );
    }
    println!("   Elapsed:        {:.2} ms", report.elapsed.as_secs_f64() * 1000.0);
    println!();

    // === MAP ===
    if has("--no-map") {
        return;
    }

    let stride = world.width().max(world.depth()).div_ceil(MAX_MAP_COLUMNS).max(1);
    if stride > 1 {
        println!("   Map sampled every {stride} cells");
    }
    let spawn_cell = (spawn.0.round() as usize, spawn.1.round() as usize);
    for z in (0..world.depth()).step_by(stride) {
        let row: String = (0..world.width())
            .step_by(stride)
            .map(|x| {
                let on_spawn = spawn != SPAWN_SENTINEL
                    && (spawn_cell.0 / stride, spawn_cell.1 / stride) == (x / stride, z / stride);
                if on_spawn {
                    '@'
                } else {
                    world.tile(x as i64, z as i64).symbol()
                }
            })
            .collect();
        println!("{row}");
    }
}
