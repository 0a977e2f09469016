//! # Noise Field
//!
//! Deterministic coherent noise plus the per-map channel offsets.
//!
//! ## Why Simplex?
//!
//! - Fewer directional artifacts than value or Perlin noise
//! - O(1) per sample, no allocations
//! - Smooth: no value discontinuities for small coordinate deltas
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, every sample and every channel offset is
//! **exactly** the same on any platform, any time. The random stream is an
//! owned `ChaCha8Rng`, never process-global state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Sub-seed purpose for the simplex permutation table.
const PERMUTATION_PURPOSE: u64 = 1;
/// Sub-seed purpose for the channel offset stream.
const OFFSET_PURPOSE: u64 = 2;

/// Upper bound (exclusive) of each channel offset component.
pub const OFFSET_RANGE: f64 = 9999.0;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., offset drawing).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a style mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
    /// Gradient table (12 gradients for 2D simplex).
    grad: [[i8; 2]; 12],
}

impl PermutationTable {
    /// Creates a new permutation table from a seed.
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates shuffle driven by xorshift64; a zero state would never move
        let mut rng_state = seed.value() | 1;
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state as usize) % (i + 1);
            perm.swap(i, j);
        }

        // Double the table to avoid index wrapping
        perm.copy_within(0..256, 256);

        let grad = [
            [1, 0], [1, 1], [0, 1], [-1, 1],
            [-1, 0], [-1, -1], [0, -1], [1, -1],
            [1, 0], [0, 1], [-1, 0], [0, -1],
        ];

        Self { perm, grad }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(&self, hash: u8) -> [i8; 2] {
        self.grad[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Skew input coordinates to simplex grid
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        // Far from the origin the lattice index wraps; only its low byte is used
        let unskew = i.wrapping_add(j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        // Upper or lower triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = self.contribution(x0, y0, gi0);
        let n1 = self.contribution(x1, y1, gi1);
        let n2 = self.contribution(x2, y2, gi2);

        // 70.0 normalizes the sum to [-1, 1]
        70.0 * (n0 + n1 + n2)
    }

    #[inline]
    fn contribution(&self, x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = self.perm_table.gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }
}

/// Fast floor function.
#[inline]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 { xi.wrapping_sub(1) } else { xi }
}

/// Octave parameters for [`NoiseField::multi_octave_2d`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctaveParams {
    /// Number of noise layers.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl Default for OctaveParams {
    fn default() -> Self {
        Self {
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// A 2D translation applied to a noise channel before sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoiseOffset {
    /// X component in [0, 9999).
    pub x: f64,
    /// Y component in [0, 9999).
    pub y: f64,
}

/// Owned deterministic random stream.
///
/// Replaces the "seed once, sample a global generator" pattern: every
/// generation call builds its own instance.
pub struct NoiseRng {
    rng: ChaCha8Rng,
}

impl NoiseRng {
    /// Creates the offset stream for a world seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.derive(OFFSET_PURPOSE).value()),
        }
    }

    /// Draws one offset vector, each component uniform in `[0, OFFSET_RANGE)`.
    pub fn offset(&mut self) -> NoiseOffset {
        NoiseOffset {
            x: self.rng.gen_range(0.0..OFFSET_RANGE),
            y: self.rng.gen_range(0.0..OFFSET_RANGE),
        }
    }
}

/// Per-map offsets for every noise channel.
///
/// Drawn in declaration order from [`NoiseRng`], so the same seed always
/// yields the same table and no two channels alias.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelOffsets {
    /// Terrain height.
    pub height: NoiseOffset,
    /// Temperature.
    pub temperature: NoiseOffset,
    /// Moisture.
    pub moisture: NoiseOffset,
    /// High-frequency detail blended into height.
    pub detail: NoiseOffset,
    /// River carving.
    pub river: NoiseOffset,
    /// Lake carving.
    pub lake: NoiseOffset,
    /// Continent base-shape layers.
    pub base_shape: [NoiseOffset; 3],
    /// Continent coastline complexity.
    pub coastline: NoiseOffset,
    /// Angular perturbation of the continent radius.
    pub angular: NoiseOffset,
    /// The two erosion bite channels.
    pub bite: [NoiseOffset; 2],
    /// Small-island clustering score.
    pub islet: NoiseOffset,
}

impl ChannelOffsets {
    /// Draws the full table from the stream.
    pub fn draw(rng: &mut NoiseRng) -> Self {
        Self {
            height: rng.offset(),
            temperature: rng.offset(),
            moisture: rng.offset(),
            detail: rng.offset(),
            river: rng.offset(),
            lake: rng.offset(),
            base_shape: [rng.offset(), rng.offset(), rng.offset()],
            coastline: rng.offset(),
            angular: rng.offset(),
            bite: [rng.offset(), rng.offset()],
            islet: rng.offset(),
        }
    }
}

/// Seeded noise source shared by every generation stage.
///
/// All samples are mapped to [0, 1].
pub struct NoiseField {
    noise: SimplexNoise,
    offsets: ChannelOffsets,
}

impl NoiseField {
    /// Builds the field for a world seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        let mut rng = NoiseRng::new(seed);
        let offsets = ChannelOffsets::draw(&mut rng);
        debug!(
            seed = seed.value(),
            height_x = offsets.height.x,
            height_y = offsets.height.y,
            "noise channel offsets drawn"
        );
        Self {
            noise: SimplexNoise::new(seed.derive(PERMUTATION_PURPOSE)),
            offsets,
        }
    }

    /// The channel offsets drawn for this field.
    #[inline]
    #[must_use]
    pub const fn offsets(&self) -> &ChannelOffsets {
        &self.offsets
    }

    /// Single-octave coherent noise in [0, 1].
    #[inline]
    #[must_use]
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        ((self.noise.sample(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Normalized fractal noise in [0, 1].
    ///
    /// Octave `i` is sampled at `base_frequency * lacunarity^i` with weight
    /// `persistence^i`; the sum is divided by the total weight.
    #[must_use]
    pub fn multi_octave_2d(&self, x: f64, y: f64, base_frequency: f64, params: OctaveParams) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = base_frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..params.octaves {
            total += self.sample_2d(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        if max_amplitude > 0.0 {
            (total / max_amplitude).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Samples a translated channel: `sample_2d((x + ox) * f, (y + oy) * f)`.
    #[inline]
    #[must_use]
    pub fn channel(&self, offset: NoiseOffset, x: f64, y: f64, frequency: f64) -> f64 {
        self.sample_2d((x + offset.x) * frequency, (y + offset.y) * frequency)
    }
}
