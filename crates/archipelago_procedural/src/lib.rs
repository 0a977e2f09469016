//! # ARCHIPELAGO Procedural Generation
//!
//! Deterministic generation of a tile world: one irregular continent,
//! scattered islands, ocean around both, soft beaches on every coast.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and parameters always produce the same grid
//! 2. **Owned randomness**: every call builds its own RNG, no global state
//! 3. **Two granularities**: classify in 2×2 blocks, erode per cell
//! 4. **Permissive edges**: out-of-range reads return neutral defaults
//!
//! ## Core Components
//!
//! - `NoiseField`: seeded simplex noise plus per-channel offsets
//! - `ShapeEvaluator`: continent and small-island predicates
//! - `BiomeClassifier`: climate samples to tile types
//! - `WorldGenerator`: block synthesis and shoreline erosion
//! - `WorldGrid`: the result, with height / walkability / spawn queries
//!
//! ## Example
//!
//! ```rust
//! use archipelago_procedural::{GenerationParams, WorldGenerator};
//!
//! let generator = WorldGenerator::default();
//! let world = generator
//!     .generate(&GenerationParams::new(64, 64, 42, 0.05, 3))
//!     .expect("valid parameters");
//!
//! if let Some((x, z)) = world.find_spawn() {
//!     assert!(world.is_walkable(x, z));
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod config;
pub mod erosion;
pub mod error;
pub mod generator;
pub mod grid;
pub mod noise;
pub mod shape;

pub use biome::{BiomeClassifier, BiomeTable, ClimateSample, HeightBand, LegacyBands, TileType};
pub use config::{ConfigFile, GenerationParams, GeneratorConfig, Profile};
pub use erosion::{erode_shoreline, Connectivity, ErosionConfig, ErosionReport};
pub use error::{GenerationError, GenerationResult};
pub use generator::{
    generate_world, quantize_height, GenerationReport, SynthesisConfig, WorldGenerator, BLOCK_SIZE,
};
pub use grid::{WorldGrid, FOOTPRINT_RADIUS};
pub use noise::{ChannelOffsets, NoiseField, NoiseOffset, NoiseRng, OctaveParams, SimplexNoise, WorldSeed};
pub use shape::{BiteRule, IsletTier, Landform, ShapeConfig, ShapeEvaluator};
