//! # Perlin Noise Implementation
//!
//! Deterministic 2D gradient noise plus the fractal helpers the terrain
//! layers are built from.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation produces exactly the
//! same values on any platform. The generator holds no mutable state once
//! its permutation table is built, so it can be shared freely across
//! worker threads.
//!
//! ## Output ranges
//!
//! - `PerlinNoise::sample` returns values in `[0, 1]`
//! - `PerlinNoise::octave_sample` returns a weighted mean of samples, so
//!   it stays in `[0, 1]` as long as `persistence` is positive

use serde::{Deserialize, Serialize};
use strata_core::{StrataError, StrataResult};

/// World seed for deterministic generation.
///
/// Selects the noise permutation table; the per-world sampling offset is
/// a separate `seed_offset` carried by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
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

    /// Derives a sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x5EED_0F57_A7A5_EED5)
    }
}

/// Parameters of one octave-noise channel.
///
/// Passed by value into every noise call and never mutated by the callee.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Coordinate scale applied before sampling.
    pub zoom: f64,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Fixed sampling offset of this channel.
    pub offset: [f64; 2],
    /// Per-world sampling offset (the map seed offset).
    pub world_offset: [f64; 2],
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Scale applied before redistribution.
    pub redistribution_modifier: f64,
    /// Redistribution power.
    pub exponent: f64,
}

impl Default for NoiseSettings {
    /// Rolling terrain with a mix of lakes and hills at a 50-voxel water line.
    fn default() -> Self {
        Self {
            zoom: 0.01,
            octaves: 5,
            offset: [-700.0, 880.0],
            world_offset: [0.0, 0.0],
            persistence: 0.5,
            redistribution_modifier: 1.25,
            exponent: 2.0,
        }
    }
}

impl NoiseSettings {
    /// Returns a copy with a different per-world offset.
    #[inline]
    #[must_use]
    pub const fn with_world_offset(mut self, world_offset: [f64; 2]) -> Self {
        self.world_offset = world_offset;
        self
    }

    /// Checks that every parameter produces finite noise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-finite values, a non-positive
    /// persistence or a non-positive exponent.
    pub fn validate(&self, name: &str) -> StrataResult<()> {
        let finite = [
            self.zoom,
            self.offset[0],
            self.offset[1],
            self.world_offset[0],
            self.world_offset[1],
            self.persistence,
            self.redistribution_modifier,
            self.exponent,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !finite {
            return Err(StrataError::InvalidConfig(format!(
                "noise `{name}` contains a non-finite value"
            )));
        }
        if self.persistence <= 0.0 {
            return Err(StrataError::InvalidConfig(format!(
                "noise `{name}`: persistence must be positive, got {}",
                self.persistence
            )));
        }
        if self.exponent <= 0.0 {
            return Err(StrataError::InvalidConfig(format!(
                "noise `{name}`: exponent must be positive, got {}",
                self.exponent
            )));
        }
        Ok(())
    }
}

/// Pre-computed permutation table for noise.
///
/// Computed once from the seed and reused.
#[derive(Clone)]
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64; a zero state would never advance.
        let mut rng_state = seed.value().max(1);
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state as usize) % (i + 1);
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }
}

/// 2D Perlin gradient noise generator.
///
/// # Example
///
/// ```rust,ignore
/// let noise = PerlinNoise::new(WorldSeed::new(42));
///
/// let value = noise.sample(100.5, 200.3);
/// assert!((0.0..=1.0).contains(&value));
///
/// let terrain = noise.octave_sample(x, z, NoiseSettings::default());
/// ```
#[derive(Clone)]
pub struct PerlinNoise {
    perm_table: PermutationTable,
    seed: WorldSeed,
}

impl std::fmt::Debug for PerlinNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerlinNoise").field("seed", &self.seed).finish()
    }
}

impl PerlinNoise {
    /// Creates a new noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
            seed,
        }
    }

    /// Seed the permutation table was built from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Samples 2D Perlin noise.
    ///
    /// # Returns
    ///
    /// A value in the range [0, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xi = fast_floor(x);
        let yi = fast_floor(y);

        // Position inside the unit cell
        let xf = x - f64::from(xi);
        let yf = y - f64::from(yi);

        let u = fade(xf);
        let v = fade(yf);

        let xx = (xi & 255) as usize;
        let yy = (yi & 255) as usize;

        let p = &self.perm_table;
        let aa = p.get(p.get(xx) + yy);
        let ab = p.get(p.get(xx) + yy + 1);
        let ba = p.get(p.get(xx + 1) + yy);
        let bb = p.get(p.get(xx + 1) + yy + 1);

        let bottom = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let top = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        let value = lerp(bottom, top, v);

        ((value + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Generates octave (fractal) noise.
    ///
    /// Coordinates are scaled by `zoom`, then each octave samples at
    /// `(offset + world_offset + coord) * frequency` with the frequency
    /// doubling and the amplitude multiplied by `persistence`. The sum is
    /// divided by the total amplitude. Zero octaves yield 0.
    #[must_use]
    pub fn octave_sample(&self, x: f64, z: f64, settings: NoiseSettings) -> f64 {
        let x = x * settings.zoom + settings.zoom;
        let z = z * settings.zoom + settings.zoom;

        let base_x = settings.offset[0] + settings.world_offset[0] + x;
        let base_z = settings.offset[1] + settings.world_offset[1] + z;

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut amplitude_sum = 0.0;

        for _ in 0..settings.octaves {
            total += self.sample(base_x * frequency, base_z * frequency) * amplitude;
            amplitude_sum += amplitude;
            amplitude *= settings.persistence;
            frequency *= 2.0;
        }

        if amplitude_sum == 0.0 {
            0.0
        } else {
            total / amplitude_sum
        }
    }
}

/// Applies `pow(value * modifier, exponent)`.
///
/// Negative bases are clamped to 0 so fractional exponents never yield NaN.
#[inline]
#[must_use]
pub fn redistribute(value: f64, settings: NoiseSettings) -> f64 {
    (value * settings.redistribution_modifier)
        .max(0.0)
        .powf(settings.exponent)
}

/// Linearly maps `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// # Errors
///
/// Returns `DegenerateRange` when `in_min == in_max`.
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> StrataResult<f64> {
    let span = in_max - in_min;
    if span == 0.0 || !span.is_finite() {
        return Err(StrataError::DegenerateRange {
            min: in_min,
            max: in_max,
        });
    }
    Ok(out_min + (value - in_min) * (out_max - out_min) / span)
}

/// Maps a value from `[0, 1]` to `[out_min, out_max]`.
#[inline]
#[must_use]
pub fn remap_unit(value: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + value * (out_max - out_min)
}

/// Quintic smoothstep.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of eight 2D gradients.
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Fast floor function.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}
