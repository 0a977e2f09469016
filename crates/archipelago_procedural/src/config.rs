//! # Generation Configuration
//!
//! Per-call parameters plus the tunable constant tables, loaded from TOML.
//!
//! ```toml
//! profile = "archipelago"
//!
//! [params]
//! width = 700
//! depth = 700
//! scale = 0.05
//!
//! [biome]
//! beach_max_height = 0.40
//!
//! [erosion]
//! passes = 2
//! connectivity = "eight"
//! ```
//!
//! Every section and every field is optional; missing values fall back to
//! the reference constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::biome::{BiomeTable, LegacyBands};
use crate::erosion::{Connectivity, ErosionConfig};
use crate::error::{GenerationError, GenerationResult};
use crate::generator::SynthesisConfig;
use crate::shape::ShapeConfig;

/// Inputs of one generation call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Grid width in cells.
    pub width: u32,
    /// Grid depth in cells.
    pub depth: u32,
    /// World seed.
    pub seed: u64,
    /// Noise frequency multiplier for cell coordinates.
    pub scale: f64,
    /// Highest quantized elevation.
    pub max_elevation: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 200,
            depth: 200,
            seed: 0,
            scale: 0.05,
            max_elevation: 3,
        }
    }
}

impl GenerationParams {
    /// Creates a parameter set.
    #[must_use]
    pub const fn new(width: u32, depth: u32, seed: u64, scale: f64, max_elevation: u32) -> Self {
        Self {
            width,
            depth,
            seed,
            scale,
            max_elevation,
        }
    }

    /// Rejects parameters generation cannot start from.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` for a zero width or depth, `InvalidScale` for a
    /// scale that is not finite and positive.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.width == 0 || self.depth == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                depth: self.depth,
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(GenerationError::InvalidScale(self.scale));
        }
        Ok(())
    }
}

/// Which generation pipeline runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// One height sample per block and the four-band table; no shapes.
    Legacy,
    /// Continent, archipelago, full biome table, shoreline erosion.
    #[default]
    Archipelago,
}

/// All tunable constants of the generator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Pipeline selection.
    pub profile: Profile,
    /// Sampling frequencies and blend weights.
    pub synthesis: SynthesisConfig,
    /// Shape evaluator constants.
    pub shape: ShapeConfig,
    /// Reference biome decision table.
    pub biome: BiomeTable,
    /// Legacy four-band table.
    pub legacy: LegacyBands,
    /// Shoreline pass settings.
    pub erosion: ErosionConfig,
}

impl GeneratorConfig {
    /// Configuration of the single-octave legacy profile.
    ///
    /// The shoreline pass is off so tiles follow the four bands exactly.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            profile: Profile::Legacy,
            erosion: ErosionConfig {
                passes: 0,
                connectivity: Connectivity::Four,
            },
            ..Self::default()
        }
    }

    /// Checks every table.
    ///
    /// # Errors
    ///
    /// Returns the first `InvalidConfig` found.
    pub fn validate(&self) -> GenerationResult<()> {
        self.synthesis.validate()?;
        self.shape.validate()?;
        self.biome.validate()?;
        self.legacy.validate()
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `ConfigParse` on malformed TOML, `InvalidConfig` on bad values.
    pub fn from_toml_str(text: &str) -> GenerationResult<Self> {
        Ok(ConfigFile::from_toml_str(text)?.generator)
    }
}

/// A complete config file: optional `[params]` plus the generator tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Generation parameters.
    pub params: GenerationParams,
    /// Generator tables.
    #[serde(flatten)]
    pub generator: GeneratorConfig,
}

impl ConfigFile {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `ConfigParse` on malformed TOML, `InvalidConfig` on bad values.
    pub fn from_toml_str(text: &str) -> GenerationResult<Self> {
        let file: Self = toml::from_str(text)?;
        file.generator.validate()?;
        Ok(file)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: &Path) -> GenerationResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|err| {
            warn!(path = %path.display(), error = %err, "rejected generator config");
            err
        })
    }
}
