//! # Domain Warping
//!
//! Displaces the coordinates fed into the terrain noise by two further
//! octave-noise channels, breaking up the axis-aligned look of raw
//! gradient noise.
//!
//! The X and Y channels must sample different regions of the noise field;
//! identical offsets would push every point along the diagonal.

use serde::{Deserialize, Serialize};
use strata_core::{StrataError, StrataResult};

use crate::noise::{NoiseSettings, PerlinNoise};

/// Configuration of the two displacement channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpSettings {
    /// Channel displacing the X coordinate.
    pub x: NoiseSettings,
    /// Channel displacing the Z coordinate.
    pub y: NoiseSettings,
    /// Displacement scale on X, in voxels.
    pub amplitude_x: f64,
    /// Displacement scale on Z, in voxels.
    pub amplitude_y: f64,
}

impl Default for WarpSettings {
    fn default() -> Self {
        let channel = NoiseSettings {
            zoom: 0.16,
            octaves: 2,
            offset: [10.0, 50.0],
            world_offset: [0.0, 0.0],
            persistence: 2.3,
            redistribution_modifier: 0.9,
            exponent: 1.0,
        };
        Self {
            x: channel,
            y: NoiseSettings { offset: [-37.0, 123.0], ..channel },
            amplitude_x: 80.0,
            amplitude_y: 80.0,
        }
    }
}

/// Validated domain warp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainWarp {
    settings: WarpSettings,
}

impl Default for DomainWarp {
    fn default() -> Self {
        Self { settings: WarpSettings::default() }
    }
}

impl DomainWarp {
    /// Creates a domain warp.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when both channels share the same offset,
    /// when an amplitude is not finite, or when a channel is invalid.
    pub fn new(settings: WarpSettings) -> StrataResult<Self> {
        settings.x.validate("warp.x")?;
        settings.y.validate("warp.y")?;

        if settings.x.offset == settings.y.offset {
            return Err(StrataError::InvalidConfig(format!(
                "domain warp channels share offset {:?}; X and Y would be correlated",
                settings.x.offset
            )));
        }
        if !settings.amplitude_x.is_finite() || !settings.amplitude_y.is_finite() {
            return Err(StrataError::InvalidConfig(
                "domain warp amplitudes must be finite".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    /// Channel configuration.
    #[must_use]
    pub const fn settings(&self) -> &WarpSettings {
        &self.settings
    }

    /// Displacement `(dx, dz)` at a world column.
    #[must_use]
    pub fn offset(&self, noise: &PerlinNoise, x: f64, z: f64) -> [f64; 2] {
        let s = &self.settings;
        [
            noise.octave_sample(x, z, s.x) * s.amplitude_x,
            noise.octave_sample(x, z, s.y) * s.amplitude_y,
        ]
    }

    /// Warped sampling position.
    #[must_use]
    pub fn warp(&self, noise: &PerlinNoise, x: f64, z: f64) -> [f64; 2] {
        let [dx, dz] = self.offset(noise, x, z);
        [x + dx, z + dz]
    }

    /// Octave sample of `base` at the warped position.
    #[must_use]
    pub fn sample(&self, noise: &PerlinNoise, x: f64, z: f64, base: NoiseSettings) -> f64 {
        let [wx, wz] = self.warp(noise, x, z);
        noise.octave_sample(wx, wz, base)
    }
}
