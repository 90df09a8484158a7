//! Detector configuration: sample rate and an optional manual threshold.
//!
//! Mirrors `KaraZajac-KAT/src/storage.rs`'s `Config` in spirit (load,
//! validate, use) but scoped to the one thing the detection core actually
//! needs configured from outside: the sample rate that governs the
//! millisecond-based gap limits, and an optional manual level-limit
//! override (spec.md §6).

use serde::{Deserialize, Serialize};

use crate::error::{PulseCoreError, Result};

/// Configuration for a single [`crate::ook::OokDetector`] stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Sample rate in Hz of both the envelope and FM streams.
    pub sample_rate: u32,
    /// Manual OOK threshold override. Zero means adaptive (spec.md §4.1).
    #[serde(default)]
    pub level_limit: i16,
}

impl DetectorConfig {
    /// Build a config, rejecting a zero sample rate (the millisecond-based
    /// gap limits would be meaningless).
    pub fn new(sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(PulseCoreError::ZeroSampleRate);
        }
        Ok(Self {
            sample_rate,
            level_limit: 0,
        })
    }

    /// Same as [`Self::new`] but with an explicit manual level-limit override.
    pub fn with_level_limit(sample_rate: u32, level_limit: i16) -> Result<Self> {
        let mut cfg = Self::new(sample_rate)?;
        cfg.level_limit = level_limit;
        Ok(cfg)
    }

    /// Parse a config from a TOML document, e.g.
    /// ```toml
    /// sample_rate = 250000
    /// level_limit = 0
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self =
            toml::from_str(s).map_err(|e| PulseCoreError::InvalidConfig(e.to_string()))?;
        if cfg.sample_rate == 0 {
            return Err(PulseCoreError::ZeroSampleRate);
        }
        Ok(cfg)
    }

    pub(crate) fn samples_per_ms(&self) -> u32 {
        self.sample_rate / 1000
    }
}
