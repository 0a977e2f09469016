//! # Biome Classification
//!
//! Determines the tile type of a cell from its climate samples.
//!
//! Uses a decision table over:
//! - Height (blended terrain noise)
//! - Temperature and moisture (separate noise channels)
//! - River and lake channels (continent only)
//!
//! All thresholds live in [`BiomeTable`] so they can be tuned from a config
//! file without touching the algorithm.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, GenerationError, GenerationResult};
use crate::shape::Landform;

/// Tile types in the world.
///
/// Declaration order is the layering order used by shoreline and underlay
/// logic, most "background" first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TileType {
    /// Never generated.
    #[default]
    Empty = 0,
    /// Ocean, rivers and lakes.
    Water = 1,
    /// Shoreline buffer and beaches.
    Island = 2,
    /// Dry lowland.
    Dirt = 3,
    /// Hot lowland.
    Desert = 4,
    /// Temperate lowland.
    Grass = 5,
    /// Cold lowland.
    Snow = 6,
    /// High terrain and rocky islets.
    Stone = 7,
}

impl TileType {
    /// Every tile type, in layering order.
    pub const ALL: [Self; 8] = [
        Self::Empty,
        Self::Water,
        Self::Island,
        Self::Dirt,
        Self::Desert,
        Self::Grass,
        Self::Snow,
        Self::Stone,
    ];

    /// Returns true for every tile that is solid ground.
    #[inline]
    #[must_use]
    pub const fn is_land(self) -> bool {
        !matches!(self, Self::Empty | Self::Water)
    }

    /// Returns true if a player may stand on this tile.
    #[inline]
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        self.is_land()
    }

    /// Returns true for interior biomes the shoreline pass may downgrade.
    #[inline]
    #[must_use]
    pub const fn is_erodible(self) -> bool {
        !matches!(self, Self::Empty | Self::Water | Self::Island)
    }

    /// One-character symbol for text map dumps.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Water => '~',
            Self::Island => '.',
            Self::Dirt => ':',
            Self::Desert => 'd',
            Self::Grass => '"',
            Self::Snow => '*',
            Self::Stone => '^',
        }
    }

    /// Converts from u8.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Water,
            2 => Self::Island,
            3 => Self::Dirt,
            4 => Self::Desert,
            5 => Self::Grass,
            6 => Self::Snow,
            7 => Self::Stone,
            _ => Self::Empty,
        }
    }
}

/// Noise samples for one block, all in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClimateSample {
    /// Blended terrain height.
    pub height: f64,
    /// Temperature.
    pub temperature: f64,
    /// Moisture.
    pub moisture: f64,
    /// River channel.
    pub river: f64,
    /// Lake channel.
    pub lake: f64,
}

/// An inclusive height band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    /// Lowest height inside the band.
    pub min: f64,
    /// Highest height inside the band.
    pub max: f64,
}

impl HeightBand {
    /// Returns true if `height` lies inside the band.
    #[inline]
    #[must_use]
    pub fn contains(self, height: f64) -> bool {
        height >= self.min && height <= self.max
    }
}

/// Thresholds of the reference decision table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeTable {
    /// River channel value below which a cell is carved.
    pub river_threshold: f64,
    /// Heights where rivers may run.
    pub river_band: HeightBand,
    /// Lake channel value below which a cell is carved.
    pub lake_threshold: f64,
    /// Heights where lakes may sit.
    pub lake_band: HeightBand,
    /// Heights above this are high stone terrain.
    pub stone_min_height: f64,
    /// Heights below this are beach.
    pub beach_max_height: f64,
    /// Temperatures below this are snow.
    pub snow_max_temperature: f64,
    /// Temperatures above this are desert.
    pub desert_min_temperature: f64,
    /// Moisture below this is dirt, otherwise grass.
    pub dirt_max_moisture: f64,
    /// Islet heights below this are beach.
    pub islet_beach_max_height: f64,
    /// Islet moisture below this is stone, otherwise dirt.
    pub islet_stone_max_moisture: f64,
}

impl Default for BiomeTable {
    fn default() -> Self {
        Self {
            river_threshold: 0.20,
            river_band: HeightBand { min: 0.35, max: 0.70 },
            lake_threshold: 0.15,
            lake_band: HeightBand { min: 0.40, max: 0.65 },
            stone_min_height: 0.80,
            beach_max_height: 0.38,
            snow_max_temperature: 0.3,
            desert_min_temperature: 0.7,
            dirt_max_moisture: 0.4,
            islet_beach_max_height: 0.45,
            islet_stone_max_moisture: 0.5,
        }
    }
}

impl BiomeTable {
    /// Checks the table's own ordering constraints.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-finite values, inverted bands or
    /// overlapping climate splits.
    pub fn validate(&self) -> GenerationResult<()> {
        ensure_finite(
            "biome",
            [
                ("river_threshold", self.river_threshold),
                ("river_band.min", self.river_band.min),
                ("river_band.max", self.river_band.max),
                ("lake_threshold", self.lake_threshold),
                ("lake_band.min", self.lake_band.min),
                ("lake_band.max", self.lake_band.max),
                ("stone_min_height", self.stone_min_height),
                ("beach_max_height", self.beach_max_height),
                ("snow_max_temperature", self.snow_max_temperature),
                ("desert_min_temperature", self.desert_min_temperature),
                ("dirt_max_moisture", self.dirt_max_moisture),
                ("islet_beach_max_height", self.islet_beach_max_height),
                ("islet_stone_max_moisture", self.islet_stone_max_moisture),
            ],
        )?;
        for (name, band) in [("river_band", self.river_band), ("lake_band", self.lake_band)] {
            if band.min > band.max {
                return Err(GenerationError::InvalidConfig(format!(
                    "biome.{name} is inverted: {} > {}",
                    band.min, band.max
                )));
            }
        }
        if self.beach_max_height > self.stone_min_height {
            return Err(GenerationError::InvalidConfig(format!(
                "biome.beach_max_height {} exceeds stone_min_height {}",
                self.beach_max_height, self.stone_min_height
            )));
        }
        if self.snow_max_temperature > self.desert_min_temperature {
            return Err(GenerationError::InvalidConfig(format!(
                "biome.snow_max_temperature {} exceeds desert_min_temperature {}",
                self.snow_max_temperature, self.desert_min_temperature
            )));
        }
        Ok(())
    }
}

/// Height bands of the single-octave legacy profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBands {
    /// Below: water.
    pub water_max: f64,
    /// Below: dirt.
    pub dirt_max: f64,
    /// Below: grass. Everything above is stone.
    pub grass_max: f64,
}

impl Default for LegacyBands {
    fn default() -> Self {
        Self {
            water_max: 0.2,
            dirt_max: 0.4,
            grass_max: 0.7,
        }
    }
}

impl LegacyBands {
    /// Checks that the bands ascend.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a band is not finite or the bands are out
    /// of order.
    pub fn validate(&self) -> GenerationResult<()> {
        ensure_finite(
            "legacy",
            [
                ("water_max", self.water_max),
                ("dirt_max", self.dirt_max),
                ("grass_max", self.grass_max),
            ],
        )?;
        if self.water_max <= self.dirt_max && self.dirt_max <= self.grass_max {
            Ok(())
        } else {
            Err(GenerationError::InvalidConfig(format!(
                "legacy bands must ascend: water {} / dirt {} / grass {}",
                self.water_max, self.dirt_max, self.grass_max
            )))
        }
    }
}

/// Biome classifier over the configured tables.
#[derive(Clone, Debug, Default)]
pub struct BiomeClassifier {
    table: BiomeTable,
    legacy: LegacyBands,
}

impl BiomeClassifier {
    /// Creates a classifier from its tables.
    #[must_use]
    pub const fn new(table: BiomeTable, legacy: LegacyBands) -> Self {
        Self { table, legacy }
    }

    /// Classifies a block. First matching rule wins.
    #[must_use]
    pub fn classify(&self, sample: &ClimateSample, landform: Landform) -> TileType {
        match landform {
            Landform::Ocean => TileType::Water,
            Landform::Islet => self.classify_islet(sample),
            Landform::Continent => {
                if self.is_carved(sample) {
                    TileType::Water
                } else {
                    self.classify_continent(sample)
                }
            }
            // The core is never carved
            Landform::Core => self.classify_continent(sample),
        }
    }

    /// River or lake carve on the continent.
    fn is_carved(&self, sample: &ClimateSample) -> bool {
        let t = &self.table;
        let river = sample.river < t.river_threshold && t.river_band.contains(sample.height);
        let lake = sample.lake < t.lake_threshold && t.lake_band.contains(sample.height);
        river || lake
    }

    fn classify_continent(&self, sample: &ClimateSample) -> TileType {
        let t = &self.table;
        match (sample.height, sample.temperature, sample.moisture) {
            (h, _, _) if h > t.stone_min_height => TileType::Stone,
            (h, _, _) if h < t.beach_max_height => TileType::Island,
            (_, temp, _) if temp < t.snow_max_temperature => TileType::Snow,
            (_, temp, _) if temp > t.desert_min_temperature => TileType::Desert,
            (_, _, m) if m < t.dirt_max_moisture => TileType::Dirt,
            _ => TileType::Grass,
        }
    }

    fn classify_islet(&self, sample: &ClimateSample) -> TileType {
        let t = &self.table;
        if sample.height < t.islet_beach_max_height {
            TileType::Island
        } else if sample.moisture < t.islet_stone_max_moisture {
            TileType::Stone
        } else {
            TileType::Dirt
        }
    }

    /// Four-band height classification of the legacy profile.
    #[must_use]
    pub fn classify_legacy(&self, height: f64) -> TileType {
        let bands = &self.legacy;
        if height < bands.water_max {
            TileType::Water
        } else if height < bands.dirt_max {
            TileType::Dirt
        } else if height < bands.grass_max {
            TileType::Grass
        } else {
            TileType::Stone
        }
    }
}
