//! # Island Shapes
//!
//! Decides which cells are land before any biome is chosen.
//!
//! The continent is a disk around the map center whose radius is bent by
//! several independent noise layers at different scales, so the coastline is
//! neither circular nor single-frequency. Small islands are scattered in the
//! ring between the continent and the map border.
//!
//! All inputs are normalized map coordinates in [0, 1]².

use std::f64::consts::FRAC_1_SQRT_2;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, GenerationError, GenerationResult};
use crate::noise::{NoiseField, OctaveParams};

/// Map center in normalized coordinates.
const CENTER: f64 = 0.5;

/// What a cell belongs to, as decided by the shape evaluators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Landform {
    /// Open water.
    Ocean,
    /// The central landmass.
    Continent,
    /// The protected heart of the continent; rivers and lakes stay out.
    Core,
    /// One of the scattered small islands.
    Islet,
}

/// A multiplicative shrink of the continent radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiteRule {
    /// Frequency of the bite channel in normalized space.
    pub frequency: f64,
    /// Channel value above which the bite applies.
    pub threshold: f64,
    /// Bites only apply beyond this fraction of the base radius.
    pub min_distance_factor: f64,
    /// Radius multiplier, in (0, 1].
    pub shrink: f64,
}

/// One archipelago density tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsletTier {
    /// Cluster score the cell must exceed.
    pub min_score: f64,
    /// Height sample the cell must exceed.
    pub min_height: f64,
}

/// Constants of the shape evaluators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Continent radius before any noise, in normalized units.
    pub base_radius: f64,
    /// Lower clamp of the variable radius, as a fraction of `base_radius`.
    pub min_radius_factor: f64,
    /// Upper clamp of the variable radius, as a fraction of `base_radius`.
    pub max_radius_factor: f64,
    /// Frequencies of the three base-shape layers.
    pub base_frequencies: [f64; 3],
    /// Weights of the three base-shape layers (sum to 1).
    pub base_weights: [f64; 3],
    /// Radius multiplier at base shape 0.
    pub radius_floor: f64,
    /// Radius multiplier gained at base shape 1.
    pub radius_span: f64,
    /// Frequency of the first coastline octave.
    pub coastline_frequency: f64,
    /// Number of coastline octaves.
    pub coastline_octaves: u32,
    /// Radius swing contributed by the coastline term.
    pub coastline_amplitude: f64,
    /// Scale of the unit-circle point used for angular noise.
    pub angular_frequency: f64,
    /// How fast the angular noise drifts with distance from the center.
    pub angular_radial_frequency: f64,
    /// Radius swing contributed by the angular term.
    pub angular_amplitude: f64,
    /// The two erosion bites.
    pub bites: [BiteRule; 2],
    /// Radius of the protected core.
    pub core_radius: f64,
    /// No islets inside this distance from the center.
    pub islet_exclusion_radius: f64,
    /// No islets within this distance of a map edge.
    pub islet_border: f64,
    /// Frequencies of the islet score octaves.
    pub islet_frequencies: [f64; 4],
    /// Weights of the islet score octaves.
    pub islet_weights: [f64; 4],
    /// Density tiers, any of which makes a cell an islet.
    pub islet_tiers: [IsletTier; 3],
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            base_radius: 0.30,
            min_radius_factor: 0.35,
            max_radius_factor: 1.8,
            base_frequencies: [2.5, 5.0, 9.0],
            base_weights: [0.5, 0.3, 0.2],
            radius_floor: 0.6,
            radius_span: 0.8,
            coastline_frequency: 8.0,
            coastline_octaves: 5,
            coastline_amplitude: 0.12,
            angular_frequency: 2.0,
            angular_radial_frequency: 4.0,
            angular_amplitude: 0.10,
            bites: [
                BiteRule { frequency: 6.0, threshold: 0.72, min_distance_factor: 0.6, shrink: 0.75 },
                BiteRule { frequency: 14.0, threshold: 0.78, min_distance_factor: 0.8, shrink: 0.85 },
            ],
            core_radius: 0.104,
            islet_exclusion_radius: 0.36,
            islet_border: 0.05,
            islet_frequencies: [12.0, 24.0, 48.0, 96.0],
            islet_weights: [0.4, 0.3, 0.2, 0.1],
            islet_tiers: [
                IsletTier { min_score: 0.62, min_height: 0.35 },
                IsletTier { min_score: 0.68, min_height: 0.25 },
                IsletTier { min_score: 0.74, min_height: 0.15 },
            ],
        }
    }
}

impl ShapeConfig {
    /// Smallest radius the continent can ever have.
    #[inline]
    #[must_use]
    pub fn min_radius(&self) -> f64 {
        self.base_radius * self.min_radius_factor
    }

    /// Checks the invariants the evaluators rely on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first violated constraint.
    pub fn validate(&self) -> GenerationResult<()> {
        let scalars = [
            ("base_radius", self.base_radius),
            ("min_radius_factor", self.min_radius_factor),
            ("max_radius_factor", self.max_radius_factor),
            ("radius_floor", self.radius_floor),
            ("radius_span", self.radius_span),
            ("coastline_frequency", self.coastline_frequency),
            ("coastline_amplitude", self.coastline_amplitude),
            ("angular_frequency", self.angular_frequency),
            ("angular_radial_frequency", self.angular_radial_frequency),
            ("angular_amplitude", self.angular_amplitude),
            ("core_radius", self.core_radius),
            ("islet_exclusion_radius", self.islet_exclusion_radius),
            ("islet_border", self.islet_border),
        ];
        let tables = self
            .base_frequencies
            .iter()
            .map(|&v| ("base_frequencies", v))
            .chain(self.base_weights.iter().map(|&v| ("base_weights", v)))
            .chain(self.islet_frequencies.iter().map(|&v| ("islet_frequencies", v)))
            .chain(self.islet_weights.iter().map(|&v| ("islet_weights", v)))
            .chain(self.bites.iter().flat_map(|b| {
                [
                    ("bites.frequency", b.frequency),
                    ("bites.threshold", b.threshold),
                    ("bites.min_distance_factor", b.min_distance_factor),
                    ("bites.shrink", b.shrink),
                ]
            }))
            .chain(self.islet_tiers.iter().flat_map(|t| {
                [("islet_tiers.min_score", t.min_score), ("islet_tiers.min_height", t.min_height)]
            }));
        ensure_finite("shape", scalars.into_iter().chain(tables))?;

        let weight_sum: f64 = self.base_weights.iter().sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(GenerationError::InvalidConfig(format!(
                "shape.base_weights must sum to 1, got {weight_sum}"
            )));
        }
        if self.base_radius <= 0.0 || self.base_radius > FRAC_1_SQRT_2 {
            return Err(GenerationError::InvalidConfig(format!(
                "shape.base_radius {} outside (0, 0.707]",
                self.base_radius
            )));
        }
        if self.min_radius_factor <= 0.0 || self.min_radius_factor > self.max_radius_factor {
            return Err(GenerationError::InvalidConfig(format!(
                "shape radius clamp [{}, {}] is empty",
                self.min_radius_factor, self.max_radius_factor
            )));
        }
        if !(1..=8).contains(&self.coastline_octaves) {
            return Err(GenerationError::InvalidConfig(format!(
                "shape.coastline_octaves {} outside 1..=8",
                self.coastline_octaves
            )));
        }
        if let Some(bite) = self.bites.iter().find(|b| b.shrink <= 0.0 || b.shrink > 1.0) {
            return Err(GenerationError::InvalidConfig(format!(
                "shape bite shrink {} outside (0, 1]",
                bite.shrink
            )));
        }
        if self.core_radius > self.min_radius() {
            return Err(GenerationError::InvalidConfig(format!(
                "shape.core_radius {} exceeds the guaranteed continent radius {}",
                self.core_radius,
                self.min_radius()
            )));
        }
        if self.islet_border < 0.0 || self.islet_border >= CENTER {
            return Err(GenerationError::InvalidConfig(format!(
                "shape.islet_border {} outside [0, 0.5)",
                self.islet_border
            )));
        }
        Ok(())
    }
}

/// Continent and archipelago predicates over one noise field.
pub struct ShapeEvaluator<'a> {
    field: &'a NoiseField,
    config: &'a ShapeConfig,
}

impl<'a> ShapeEvaluator<'a> {
    /// Binds the evaluator to a field and its constants.
    #[must_use]
    pub const fn new(field: &'a NoiseField, config: &'a ShapeConfig) -> Self {
        Self { field, config }
    }

    /// Distance from the map center in normalized space.
    #[inline]
    #[must_use]
    pub fn center_distance(nx: f64, nz: f64) -> f64 {
        (nx - CENTER).hypot(nz - CENTER)
    }

    /// Radius of the continent along the ray through `(nx, nz)`.
    #[must_use]
    pub fn continent_radius(&self, nx: f64, nz: f64) -> f64 {
        let cfg = self.config;
        let offsets = self.field.offsets();
        let dx = nx - CENTER;
        let dz = nz - CENTER;
        let dist = dx.hypot(dz);

        let base: f64 = offsets
            .base_shape
            .iter()
            .zip(cfg.base_frequencies)
            .zip(cfg.base_weights)
            .map(|((&offset, frequency), weight)| weight * self.field.channel(offset, nx, nz, frequency))
            .sum();

        let coast = self.field.multi_octave_2d(
            nx + offsets.coastline.x,
            nz + offsets.coastline.y,
            cfg.coastline_frequency,
            OctaveParams {
                octaves: cfg.coastline_octaves,
                ..OctaveParams::default()
            },
        );

        // Sample on the unit circle so there is no seam at +-pi
        let angle = dz.atan2(dx);
        let drift = dist * cfg.angular_radial_frequency;
        let angular = self.field.channel(
            offsets.angular,
            angle.cos() * cfg.angular_frequency + drift,
            angle.sin() * cfg.angular_frequency + drift,
            1.0,
        );

        let mut radius = cfg.base_radius * (cfg.radius_floor + cfg.radius_span * base)
            + (coast - 0.5) * cfg.coastline_amplitude
            + (angular - 0.5) * cfg.angular_amplitude;

        for (rule, &offset) in cfg.bites.iter().zip(&offsets.bite) {
            let near_edge = dist > rule.min_distance_factor * cfg.base_radius;
            if near_edge && self.field.channel(offset, nx, nz, rule.frequency) > rule.threshold {
                radius *= rule.shrink;
            }
        }

        radius.clamp(self.config.min_radius(), cfg.base_radius * cfg.max_radius_factor)
    }

    /// Returns true if the cell lies on the central landmass.
    #[must_use]
    pub fn is_central_landmass(&self, nx: f64, nz: f64) -> bool {
        Self::center_distance(nx, nz) < self.continent_radius(nx, nz)
    }

    /// Returns true if the cell belongs to a small island.
    #[must_use]
    pub fn is_small_island(&self, nx: f64, nz: f64, height: f64) -> bool {
        let cfg = self.config;
        if Self::center_distance(nx, nz) < cfg.islet_exclusion_radius {
            return false;
        }
        let border = cfg.islet_border;
        if nx < border || nx > 1.0 - border || nz < border || nz > 1.0 - border {
            return false;
        }

        let offset = self.field.offsets().islet;
        let score: f64 = cfg
            .islet_frequencies
            .iter()
            .zip(cfg.islet_weights)
            .map(|(&frequency, weight)| weight * self.field.channel(offset, nx, nz, frequency))
            .sum();

        cfg.islet_tiers
            .iter()
            .any(|tier| score > tier.min_score && height > tier.min_height)
    }

    /// Classifies a cell's landform.
    #[must_use]
    pub fn landform(&self, nx: f64, nz: f64, height: f64) -> Landform {
        if self.is_central_landmass(nx, nz) {
            if Self::center_distance(nx, nz) < self.config.core_radius {
                Landform::Core
            } else {
                Landform::Continent
            }
        } else if self.is_small_island(nx, nz, height) {
            Landform::Islet
        } else {
            Landform::Ocean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    #[test]
    fn test_center_is_always_continent() {
        let config = ShapeConfig::default();
        for seed in 0..20 {
            let field = NoiseField::new(WorldSeed::new(seed));
            let shapes = ShapeEvaluator::new(&field, &config);
            assert!(shapes.is_central_landmass(0.5, 0.5), "seed {seed}");
            assert_eq!(shapes.landform(0.5, 0.5, 0.5), Landform::Core);
        }
    }

    #[test]
    fn test_radius_stays_clamped() {
        let config = ShapeConfig::default();
        let field = NoiseField::new(WorldSeed::new(42));
        let shapes = ShapeEvaluator::new(&field, &config);

        for i in 0..50 {
            for j in 0..50 {
                let r = shapes.continent_radius(f64::from(i) / 49.0, f64::from(j) / 49.0);
                assert!(r >= 0.35 * 0.30 - 1e-12 && r <= 1.8 * 0.30 + 1e-12, "radius {r}");
            }
        }
    }

    #[test]
    fn test_corners_are_never_continent() {
        // Corner distance 0.707 exceeds the maximum radius 0.54
        let config = ShapeConfig::default();
        let field = NoiseField::new(WorldSeed::new(3));
        let shapes = ShapeEvaluator::new(&field, &config);
        for (x, z) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            assert!(!shapes.is_central_landmass(x, z));
        }
    }

    #[test]
    fn test_islets_respect_exclusion_zones() {
        let config = ShapeConfig::default();
        let field = NoiseField::new(WorldSeed::new(11));
        let shapes = ShapeEvaluator::new(&field, &config);

        for i in 0..100 {
            for j in 0..100 {
                let nx = f64::from(i) / 99.0;
                let nz = f64::from(j) / 99.0;
                if shapes.is_small_island(nx, nz, 1.0) {
                    assert!(ShapeEvaluator::center_distance(nx, nz) >= 0.36);
                    assert!((0.05..=0.95).contains(&nx) && (0.05..=0.95).contains(&nz));
                }
            }
        }
    }

    #[test]
    fn test_islets_need_height() {
        let config = ShapeConfig::default();
        let field = NoiseField::new(WorldSeed::new(5));
        let shapes = ShapeEvaluator::new(&field, &config);

        // Lowest tier requires height above 0.15
        for i in 0..60 {
            let nx = 0.06 + f64::from(i) * 0.01;
            assert!(!shapes.is_small_island(nx, 0.1, 0.1));
        }
    }

    #[test]
    fn test_coastline_is_not_circular() {
        let config = ShapeConfig::default();
        let field = NoiseField::new(WorldSeed::new(42));
        let shapes = ShapeEvaluator::new(&field, &config);

        let radii: Vec<f64> = (0..36)
            .map(|k| {
                let angle = f64::from(k) * std::f64::consts::TAU / 36.0;
                shapes.continent_radius(0.5 + 0.3 * angle.cos(), 0.5 + 0.3 * angle.sin())
            })
            .collect();
        let min = radii.iter().copied().fold(f64::MAX, f64::min);
        let max = radii.iter().copied().fold(f64::MIN, f64::max);
        assert!(max - min > 0.01, "radius barely varies: {min}..{max}");
    }

    #[test]
    fn test_config_validation() {
        assert!(ShapeConfig::default().validate().is_ok());

        let bad_weights = ShapeConfig { base_weights: [0.5, 0.5, 0.5], ..ShapeConfig::default() };
        assert!(bad_weights.validate().is_err());

        let big_core = ShapeConfig { core_radius: 0.2, ..ShapeConfig::default() };
        assert!(big_core.validate().is_err());

        let no_octaves = ShapeConfig { coastline_octaves: 0, ..ShapeConfig::default() };
        assert!(no_octaves.validate().is_err());

        let nan_clamp = ShapeConfig { min_radius_factor: f64::NAN, ..ShapeConfig::default() };
        assert!(matches!(nan_clamp.validate(), Err(GenerationError::InvalidConfig(_))));

        let mut nan_bite = ShapeConfig::default();
        nan_bite.bites[1].threshold = f64::NAN;
        assert!(nan_bite.validate().is_err());

        let infinite_radius = ShapeConfig { base_radius: f64::INFINITY, ..ShapeConfig::default() };
        assert!(infinite_radius.validate().is_err());
    }
}
