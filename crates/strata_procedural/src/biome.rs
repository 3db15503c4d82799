//! # Biome Selection
//!
//! Picks the terrain parameters for a column.
//!
//! A low-frequency temperature channel is sampled per column and compared
//! against each biome's upper bound, coldest first. A world with a single
//! biome never samples temperature at all.

use serde::{Deserialize, Serialize};
use strata_core::{StrataError, StrataResult, VoxelType};

use crate::noise::{NoiseSettings, PerlinNoise};

/// Terrain parameters of one biome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeSettings {
    /// Display name.
    pub name: String,
    /// Voxel written at the surface height.
    pub surface: VoxelType,
    /// Voxel written below the surface.
    pub subsurface: VoxelType,
    /// Highest temperature (in `[0, 1]`) this biome covers.
    pub upper_bound: f64,
    /// Height noise.
    pub noise: NoiseSettings,
    /// Whether height sampling goes through the domain warp.
    pub domain_warping: bool,
    /// Whether the tree layer may plant here.
    pub trees: bool,
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            name: "grassland".to_string(),
            surface: VoxelType::Grass,
            subsurface: VoxelType::Dirt,
            upper_bound: 1.0,
            noise: NoiseSettings::default(),
            domain_warping: true,
            trees: true,
        }
    }
}

/// Temperature-driven biome lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeSelector {
    temperature: NoiseSettings,
    biomes: Vec<BiomeSettings>,
}

impl Default for BiomeSelector {
    fn default() -> Self {
        Self {
            temperature: Self::default_temperature(),
            biomes: vec![BiomeSettings::default()],
        }
    }
}

impl BiomeSelector {
    /// Default temperature channel: very low frequency, single octave pair.
    #[must_use]
    pub const fn default_temperature() -> NoiseSettings {
        NoiseSettings {
            zoom: 0.002,
            octaves: 2,
            offset: [311.0, -97.0],
            world_offset: [0.0, 0.0],
            persistence: 0.5,
            redistribution_modifier: 1.0,
            exponent: 1.0,
        }
    }

    /// Creates a selector.
    ///
    /// Biomes are sorted by upper bound.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when no biome is given, a biome writes the
    /// unloaded marker, or any noise channel is invalid.
    pub fn new(temperature: NoiseSettings, mut biomes: Vec<BiomeSettings>) -> StrataResult<Self> {
        if biomes.is_empty() {
            return Err(StrataError::InvalidConfig("at least one biome is required".to_string()));
        }
        temperature.validate("temperature")?;

        for biome in &biomes {
            if biome.surface.is_nothing() || biome.subsurface.is_nothing() {
                return Err(StrataError::InvalidConfig(format!(
                    "biome `{}` cannot place the unloaded marker",
                    biome.name
                )));
            }
            if !biome.upper_bound.is_finite() {
                return Err(StrataError::InvalidConfig(format!(
                    "biome `{}` has a non-finite upper bound",
                    biome.name
                )));
            }
            biome.noise.validate(&biome.name)?;
        }

        biomes.sort_by(|a, b| a.upper_bound.total_cmp(&b.upper_bound));
        Ok(Self { temperature, biomes })
    }

    /// Biomes, coldest first.
    #[must_use]
    pub fn biomes(&self) -> &[BiomeSettings] {
        &self.biomes
    }

    /// Temperature in `[0, 1]` at a world column.
    #[must_use]
    pub fn temperature(&self, noise: &PerlinNoise, x: f64, z: f64, seed_offset: [f64; 2]) -> f64 {
        noise.octave_sample(x, z, self.temperature.with_world_offset(seed_offset))
    }

    /// Selects the biome for a world column.
    #[must_use]
    pub fn select(&self, noise: &PerlinNoise, x: f64, z: f64, seed_offset: [f64; 2]) -> &BiomeSettings {
        if let [only] = self.biomes.as_slice() {
            return only;
        }

        let t = self.temperature(noise, x, z, seed_offset);
        self.biomes
            .iter()
            .find(|biome| t <= biome.upper_bound)
            .unwrap_or_else(|| &self.biomes[self.biomes.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    fn desert() -> BiomeSettings {
        BiomeSettings {
            name: "desert".to_string(),
            surface: VoxelType::Sand,
            subsurface: VoxelType::Sand,
            upper_bound: 2.0,
            trees: false,
            ..BiomeSettings::default()
        }
    }

    fn tundra() -> BiomeSettings {
        BiomeSettings {
            name: "tundra".to_string(),
            upper_bound: 0.3,
            ..BiomeSettings::default()
        }
    }

    #[test]
    fn test_requires_a_biome() {
        let result = BiomeSelector::new(BiomeSelector::default_temperature(), Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_nothing_surface() {
        let biome = BiomeSettings { surface: VoxelType::Nothing, ..BiomeSettings::default() };
        assert!(BiomeSelector::new(BiomeSelector::default_temperature(), vec![biome]).is_err());
    }

    #[test]
    fn test_single_biome_always_selected() {
        let selector = BiomeSelector::default();
        let noise = PerlinNoise::new(WorldSeed::default());

        for i in 0..50 {
            let x = f64::from(i) * 97.0;
            assert_eq!(selector.select(&noise, x, -x, [0.0, 0.0]).name, "grassland");
        }
    }

    #[test]
    fn test_biomes_sorted_and_bounded() {
        let selector = BiomeSelector::new(
            BiomeSelector::default_temperature(),
            vec![desert(), BiomeSettings::default(), tundra()],
        )
        .unwrap();

        let names: Vec<_> = selector.biomes().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["tundra", "grassland", "desert"]);

        let noise = PerlinNoise::new(WorldSeed::default());
        for i in 0..200 {
            let (x, z) = (f64::from(i) * 41.0, f64::from(i) * 13.0);
            let t = selector.temperature(&noise, x, z, [0.0, 0.0]);
            let biome = selector.select(&noise, x, z, [0.0, 0.0]);
            assert!(t <= biome.upper_bound, "temperature {t} placed in {}", biome.name);
        }
    }
}
