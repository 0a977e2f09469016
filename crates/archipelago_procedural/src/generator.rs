//! # Grid Synthesis
//!
//! Two phases at two granularities:
//!
//! 1. **Coarse classify**: the grid is walked in 2×2 blocks. Each block is
//!    sampled once at its origin, classified, and stamped onto all four
//!    cells. Chunky, but a quarter of the noise cost.
//! 2. **Fine erode**: the shoreline pass runs per cell over the result.
//!
//! Generation is a pure function of `(GeneratorConfig, GenerationParams)`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biome::{BiomeClassifier, ClimateSample};
use crate::config::{GenerationParams, GeneratorConfig, Profile};
use crate::erosion::{erode_shoreline, ErosionReport};
use crate::error::{GenerationError, GenerationResult};
use crate::grid::WorldGrid;
use crate::noise::{NoiseField, WorldSeed};
use crate::shape::{Landform, ShapeEvaluator};

/// Side length of a classification block, in cells.
pub const BLOCK_SIZE: usize = 2;

/// Sampling frequencies (relative to `GenerationParams::scale`) and blends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Detail channel frequency, as a multiple of the scale.
    pub detail_frequency_factor: f64,
    /// Share of the detail channel in the blended height.
    pub detail_weight: f64,
    /// Temperature channel frequency, as a multiple of the scale.
    pub temperature_frequency_factor: f64,
    /// Moisture channel frequency, as a multiple of the scale.
    pub moisture_frequency_factor: f64,
    /// River channel frequency, as a multiple of the scale.
    pub river_frequency_factor: f64,
    /// Lake channel frequency, as a multiple of the scale.
    pub lake_frequency_factor: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            detail_frequency_factor: 4.0,
            detail_weight: 0.15,
            temperature_frequency_factor: 1.0,
            moisture_frequency_factor: 1.0,
            river_frequency_factor: 0.8,
            lake_frequency_factor: 0.5,
        }
    }
}

impl SynthesisConfig {
    /// Checks weights and frequency factors.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a weight outside [0, 1] or a factor that
    /// is not finite and positive.
    pub fn validate(&self) -> GenerationResult<()> {
        if !(0.0..=1.0).contains(&self.detail_weight) {
            return Err(GenerationError::InvalidConfig(format!(
                "synthesis.detail_weight {} outside [0, 1]",
                self.detail_weight
            )));
        }
        let factors = [
            ("detail", self.detail_frequency_factor),
            ("temperature", self.temperature_frequency_factor),
            ("moisture", self.moisture_frequency_factor),
            ("river", self.river_frequency_factor),
            ("lake", self.lake_frequency_factor),
        ];
        for (name, factor) in factors {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(GenerationError::InvalidConfig(format!(
                    "synthesis.{name}_frequency_factor {factor} must be finite and positive"
                )));
            }
        }
        Ok(())
    }
}

/// Bookkeeping of one generation call.
#[derive(Clone, Debug, Default)]
pub struct GenerationReport {
    /// Shoreline pass outcome.
    pub erosion: ErosionReport,
    /// Wall time spent, both phases.
    pub elapsed: Duration,
}

/// Maps a [0, 1] height sample to an elevation level.
#[inline]
#[must_use]
pub fn quantize_height(sample: f64, max_elevation: u32) -> u32 {
    (sample.clamp(0.0, 1.0) * f64::from(max_elevation)).floor() as u32
}

/// Deterministic world generator.
///
/// Holds only configuration; every call builds its own noise field and RNG,
/// so one generator may serve concurrent callers.
#[derive(Clone, Debug, Default)]
pub struct WorldGenerator {
    config: GeneratorConfig,
    classifier: BiomeClassifier,
}

impl WorldGenerator {
    /// Creates a generator after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any table is inconsistent.
    pub fn new(config: GeneratorConfig) -> GenerationResult<Self> {
        config.validate()?;
        let classifier = BiomeClassifier::new(config.biome.clone(), config.legacy.clone());
        Ok(Self { config, classifier })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a world.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` or `InvalidScale` for bad parameters.
    pub fn generate(&self, params: &GenerationParams) -> GenerationResult<WorldGrid> {
        self.generate_with_report(params).map(|(grid, _)| grid)
    }

    /// Generates a world and reports what the passes did.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` or `InvalidScale` for bad parameters.
    pub fn generate_with_report(
        &self,
        params: &GenerationParams,
    ) -> GenerationResult<(WorldGrid, GenerationReport)> {
        params.validate()?;
        let start = Instant::now();

        let field = NoiseField::new(WorldSeed::new(params.seed));
        let mut grid = WorldGrid::new(params.width as usize, params.depth as usize);

        match self.config.profile {
            Profile::Legacy => self.classify_blocks_legacy(&field, params, &mut grid),
            Profile::Archipelago => self.classify_blocks(&field, params, &mut grid),
        }

        let erosion = erode_shoreline(&mut grid, &self.config.erosion);
        let elapsed = start.elapsed();

        info!(
            width = params.width,
            depth = params.depth,
            seed = params.seed,
            profile = ?self.config.profile,
            eroded = erosion.total(),
            elapsed_ms = elapsed.as_millis() as u64,
            "world generated"
        );

        Ok((grid, GenerationReport { erosion, elapsed }))
    }

    fn classify_blocks(&self, field: &NoiseField, params: &GenerationParams, grid: &mut WorldGrid) {
        let shapes = ShapeEvaluator::new(field, &self.config.shape);
        let width = f64::from(params.width);
        let depth = f64::from(params.depth);

        for z in (0..grid.depth()).step_by(BLOCK_SIZE) {
            for x in (0..grid.width()).step_by(BLOCK_SIZE) {
                let sample = self.sample_block(field, params.scale, x as f64, z as f64);
                let landform = shapes.landform(x as f64 / width, z as f64 / depth, sample.height);
                let tile = self.classifier.classify(&sample, landform);
                let elevation = quantize_height(sample.height, params.max_elevation);
                grid.set_block(x as i64, z as i64, BLOCK_SIZE as i64, tile, elevation);
            }
        }
    }

    fn classify_blocks_legacy(&self, field: &NoiseField, params: &GenerationParams, grid: &mut WorldGrid) {
        let offset = field.offsets().height;

        for z in (0..grid.depth()).step_by(BLOCK_SIZE) {
            for x in (0..grid.width()).step_by(BLOCK_SIZE) {
                let height = field.channel(offset, x as f64, z as f64, params.scale);
                let tile = self.classifier.classify_legacy(height);
                let elevation = quantize_height(height, params.max_elevation);
                grid.set_block(x as i64, z as i64, BLOCK_SIZE as i64, tile, elevation);
            }
        }
    }

    /// Samples every channel at a block origin (cell coordinates).
    #[must_use]
    pub fn sample_block(&self, field: &NoiseField, scale: f64, x: f64, z: f64) -> ClimateSample {
        let syn = &self.config.synthesis;
        let offsets = field.offsets();

        let base = field.channel(offsets.height, x, z, scale);
        let detail = field.channel(offsets.detail, x, z, scale * syn.detail_frequency_factor);

        ClimateSample {
            height: base * (1.0 - syn.detail_weight) + detail * syn.detail_weight,
            temperature: field.channel(offsets.temperature, x, z, scale * syn.temperature_frequency_factor),
            moisture: field.channel(offsets.moisture, x, z, scale * syn.moisture_frequency_factor),
            river: field.channel(offsets.river, x, z, scale * syn.river_frequency_factor),
            lake: field.channel(offsets.lake, x, z, scale * syn.lake_frequency_factor),
        }
    }

    /// Landform the archipelago profile assigns to a block origin.
    #[must_use]
    pub fn landform_at(&self, field: &NoiseField, params: &GenerationParams, x: usize, z: usize) -> Landform {
        let sample = self.sample_block(field, params.scale, x as f64, z as f64);
        ShapeEvaluator::new(field, &self.config.shape).landform(
            x as f64 / f64::from(params.width),
            z as f64 / f64::from(params.depth),
            sample.height,
        )
    }
}

/// Generates a world with the reference configuration.
///
/// # Errors
///
/// Returns `InvalidDimensions` or `InvalidScale` for bad parameters.
pub fn generate_world(width: u32, depth: u32, seed: u64, scale: f64, max_elevation: u32) -> GenerationResult<WorldGrid> {
    WorldGenerator::default().generate(&GenerationParams::new(width, depth, seed, scale, max_elevation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::TileType;

    /// True if erosion or carving could have turned `landform` into `tile`.
    fn tile_matches_landform(tile: TileType, landform: Landform) -> bool {
        match landform {
            Landform::Ocean => tile == TileType::Water,
            Landform::Islet => matches!(tile, TileType::Island | TileType::Stone | TileType::Dirt),
            Landform::Core => tile.is_land(),
            Landform::Continent => tile != TileType::Empty,
        }
    }

    #[test]
    fn test_quantize_height() {
        assert_eq!(quantize_height(0.0, 3), 0);
        assert_eq!(quantize_height(0.34, 3), 1);
        assert_eq!(quantize_height(0.999, 3), 2);
        assert_eq!(quantize_height(1.0, 3), 3);
        assert_eq!(quantize_height(1.5, 3), 3);
        assert_eq!(quantize_height(-0.2, 3), 0);
    }

    #[test]
    fn test_rejects_bad_params() {
        let generator = WorldGenerator::default();
        assert!(matches!(
            generator.generate(&GenerationParams::new(0, 10, 1, 0.05, 3)),
            Err(GenerationError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            generator.generate(&GenerationParams::new(10, 10, 1, 0.0, 3)),
            Err(GenerationError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_huge_scale_generates() {
        // Sample coordinates far beyond the i32 lattice range
        for scale in [1.0e6, 1.0e12, 1.0e200] {
            let grid = generate_world(8, 8, 1, scale, 3).expect("finite positive scale is valid");
            assert_eq!(grid.tile_counts()[TileType::Empty as usize], 0);
            assert!(grid.heights().iter().all(|&h| h <= 3));
        }

        let legacy = WorldGenerator::new(GeneratorConfig::legacy()).expect("legacy config is valid");
        assert!(legacy.generate(&GenerationParams::new(8, 8, 1, 1.0e9, 3)).is_ok());
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut config = GeneratorConfig::default();
        config.synthesis.detail_weight = 2.0;
        assert!(WorldGenerator::new(config).is_err());
    }

    #[test]
    fn test_blocks_are_uniform() {
        let grid = generate_world(64, 64, 9, 0.05, 4).expect("valid params");
        let generator = WorldGenerator::default();
        let field = NoiseField::new(WorldSeed::new(9));
        let params = GenerationParams::new(64, 64, 9, 0.05, 4);

        // Heights are never touched by erosion, so every block stays uniform
        for z in (0..64_i64).step_by(BLOCK_SIZE) {
            for x in (0..64_i64).step_by(BLOCK_SIZE) {
                let expected = quantize_height(
                    generator.sample_block(&field, params.scale, x as f64, z as f64).height,
                    params.max_elevation,
                );
                for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    assert_eq!(grid.height(x + dx, z + dz), expected);
                }
            }
        }
    }

    #[test]
    fn test_odd_dimensions_fill_every_cell() {
        let grid = generate_world(31, 17, 4, 0.05, 3).expect("valid params");
        assert_eq!(grid.tile_counts()[TileType::Empty as usize], 0);
    }

    #[test]
    fn test_tiles_follow_landforms() {
        let generator = WorldGenerator::default();
        let params = GenerationParams::new(120, 120, 21, 0.05, 3);
        let grid = generator.generate(&params).expect("valid params");
        let field = NoiseField::new(WorldSeed::new(21));

        for z in (0..120).step_by(BLOCK_SIZE) {
            for x in (0..120).step_by(BLOCK_SIZE) {
                let landform = generator.landform_at(&field, &params, x, z);
                let tile = grid.tile(x as i64, z as i64);
                assert!(tile_matches_landform(tile, landform), "{tile:?} at ({x}, {z}) on {landform:?}");
            }
        }
    }

    #[test]
    fn test_report_counts_erosion() {
        let generator = WorldGenerator::default();
        let (grid, report) = generator
            .generate_with_report(&GenerationParams::new(96, 96, 5, 0.05, 3))
            .expect("valid params");
        assert!(report.erosion.converged);
        assert!(grid.tile_counts()[TileType::Island as usize] >= report.erosion.total());
    }
}
