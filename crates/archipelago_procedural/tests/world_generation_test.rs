//! # World Generation Tests
//!
//! End-to-end properties of generated worlds: determinism, bounds,
//! walkable edges, a solid continent heart and the legacy profile.

use archipelago_procedural::erosion::touches_water;
use archipelago_procedural::{
    generate_world, quantize_height, BiomeClassifier, Connectivity, GenerationParams,
    GeneratorConfig, NoiseField, TileType, WorldGenerator, WorldSeed, BLOCK_SIZE,
};

/// Test: Same inputs give bit-identical worlds.
#[test]
fn test_generation_is_deterministic() {
    let a = generate_world(150, 120, 1234, 0.05, 3).expect("valid params");
    let b = generate_world(150, 120, 1234, 0.05, 3).expect("valid params");
    assert_eq!(a, b);
    assert_eq!(a.height_bytes(), b.height_bytes());

    let other = generate_world(150, 120, 1235, 0.05, 3).expect("valid params");
    assert_ne!(a.tiles(), other.tiles(), "neighboring seeds produced the same map");
}

/// Test: Every cell holds a real tile and an elevation within range.
#[test]
fn test_tiles_and_heights_in_bounds() {
    for max_elevation in [1, 3, 8] {
        let world = generate_world(101, 77, 7, 0.05, max_elevation).expect("valid params");
        assert_eq!(world.tiles().len(), 101 * 77);
        assert!(world.tiles().iter().all(|&t| t != TileType::Empty));
        assert!(world.heights().iter().all(|&h| h <= max_elevation));
    }
}

/// Test: The outermost ring of cells is never walkable.
#[test]
fn test_edges_are_not_walkable() {
    let world = generate_world(80, 80, 99, 0.05, 3).expect("valid params");
    for i in 0..80 {
        assert!(!world.is_cell_walkable(i, 0));
        assert!(!world.is_cell_walkable(i, 79));
        assert!(!world.is_cell_walkable(0, i));
        assert!(!world.is_cell_walkable(79, i));
    }
}

/// Test: After generation no erodible tile touches water.
#[test]
fn test_shoreline_is_closed() {
    for seed in [1, 42, 777] {
        let world = generate_world(200, 200, seed, 0.05, 3).expect("valid params");
        for z in 0..200 {
            for x in 0..200 {
                if world.tile(x, z).is_erodible() {
                    assert!(
                        !touches_water(&world, x, z, Connectivity::Eight),
                        "seed {seed}: {:?} at ({x}, {z}) borders water",
                        world.tile(x, z)
                    );
                }
            }
        }
    }
}

/// Test: The spawn point is walkable, and it is the center when the center is.
#[test]
fn test_spawn_is_walkable() {
    for seed in 0..10 {
        let world = generate_world(120, 120, seed, 0.05, 3).expect("valid params");
        let (x, z) = world.find_spawn().expect("continent always has land");
        assert!(world.is_cell_walkable(x as i64, z as i64), "seed {seed}");
        if world.is_cell_walkable(60, 60) {
            assert_eq!((x, z), (60.0, 60.0));
        }
    }
}

/// Test: On a large map the heart of the continent is never water.
#[test]
fn test_continent_heart_is_dry() {
    let world = generate_world(700, 700, 42, 0.05, 3).expect("valid params");
    let counts = world.tile_counts();
    println!("700x700 tile histogram: {counts:?}");

    for z in 0..700_i64 {
        for x in 0..700_i64 {
            let dx = x as f64 / 700.0 - 0.5;
            let dz = z as f64 / 700.0 - 0.5;
            if dx.hypot(dz) < 0.1 {
                assert_ne!(world.tile(x, z), TileType::Water, "water at ({x}, {z})");
            }
        }
    }
    assert!(counts[TileType::Water as usize] > 0, "no ocean at all");
}

/// Test: The legacy profile follows the four height bands exactly.
#[test]
fn test_legacy_profile_bands() {
    let generator = WorldGenerator::new(GeneratorConfig::legacy()).expect("legacy config is valid");
    let params = GenerationParams::new(30, 30, 42, 5.0, 3);
    let world = generator.generate(&params).expect("valid params");

    let field = NoiseField::new(WorldSeed::new(42));
    let classifier = BiomeClassifier::default();

    for z in 0..30_i64 {
        for x in 0..30_i64 {
            let bx = x - x % BLOCK_SIZE as i64;
            let bz = z - z % BLOCK_SIZE as i64;
            let sample = field.channel(field.offsets().height, bx as f64, bz as f64, 5.0);

            assert_eq!(world.tile(x, z), classifier.classify_legacy(sample), "tile at ({x}, {z})");
            assert_eq!(world.height(x, z), quantize_height(sample, 3), "height at ({x}, {z})");
        }
    }

    let expected = |sample: f64| match sample {
        s if s < 0.2 => TileType::Water,
        s if s < 0.4 => TileType::Dirt,
        s if s < 0.7 => TileType::Grass,
        _ => TileType::Stone,
    };
    let sample = field.channel(field.offsets().height, 0.0, 0.0, 5.0);
    assert_eq!(world.tile(0, 0), expected(sample));
    assert_eq!(world.height(1, 1), (sample * 3.0).floor() as u32);
}

/// Test: Generation time for a full-size world stays reasonable.
#[test]
fn test_generation_time() {
    let generator = WorldGenerator::default();
    let (world, report) = generator
        .generate_with_report(&GenerationParams::new(300, 300, 5, 0.05, 3))
        .expect("valid params");

    println!(
        "300x300 generated in {:?}, eroded {:?}",
        report.elapsed, report.erosion.downgraded_per_pass
    );
    assert_eq!(world.width(), 300);
    assert!(report.elapsed.as_secs() < 10, "generation took {:?}", report.elapsed);
}
