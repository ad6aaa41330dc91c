//! Pond settings and tuning parameters
//!
//! Persisted as JSON next to the binary. Missing fields fall back to their
//! defaults so older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::PondError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Water simulation texels per scene unit
    pub fn water_resolution(&self) -> f32 {
        match self {
            QualityPreset::Low => 8.0,
            QualityPreset::Medium => 12.0,
            QualityPreset::High => 16.0,
        }
    }

    /// Triangles per flare fan
    pub fn flare_precision(&self) -> u32 {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => FLARE_PRECISION,
            QualityPreset::High => 32,
        }
    }

    /// Pattern atlas slot edge in pixels
    pub fn atlas_slot_size(&self) -> u32 {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 32,
            QualityPreset::High => 64,
        }
    }
}

/// Proportions of the pond constellation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pond padding as a fraction of the big pond radius
    pub factor_padding: f32,
    /// Small pond radius relative to the big pond
    pub factor_small: f32,
    /// River width relative to the big pond
    pub factor_river: f32,
    pub fish_per_area: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            factor_padding: FACTOR_PADDING,
            factor_small: FACTOR_SMALL,
            factor_river: FACTOR_RIVER,
            fish_per_area: FISH_PER_AREA,
        }
    }
}

/// Water simulation and shading parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Simulation texels per scene unit
    pub resolution: f32,
    pub damping: f32,
    /// Screen displacement per unit height gradient
    pub displacement: f32,
    /// Highlight strength on slopes facing the light
    pub shininess: f32,
    pub flare_precision: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::for_quality(QualityPreset::default())
    }
}

impl WaveConfig {
    pub fn for_quality(preset: QualityPreset) -> Self {
        Self {
            resolution: preset.water_resolution(),
            damping: WAVE_DAMPING,
            displacement: WAVE_DISPLACEMENT,
            shininess: WAVE_SHININESS,
            flare_precision: preset.flare_precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    pub layout: LayoutConfig,
    pub wave: WaveConfig,
    /// Seed for every random choice in the simulation
    pub seed: u64,
    /// Viewport size in scene units
    pub width: f32,
    pub height: f32,
    /// Fish spawned at startup, capped by capacity
    pub initial_fish: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            layout: LayoutConfig::default(),
            wave: WaveConfig::default(),
            seed: 0x6b6f69,
            width: 16.0,
            height: 9.0,
            initial_fish: 12,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.wave.resolution = preset.water_resolution();
        self.wave.flare_precision = preset.flare_precision();
    }

    /// Reject parameters the simulation cannot work with
    pub fn validate(&self) -> Result<(), PondError> {
        PondError::check_range("wave.damping", self.wave.damping, 0.0, 1.0)?;
        PondError::check_range("wave.resolution", self.wave.resolution, 1.0, 256.0)?;
        PondError::check_range("layout.factor_small", self.layout.factor_small, 0.05, 1.0)?;
        PondError::check_range("layout.factor_river", self.layout.factor_river, 0.05, 1.0)?;
        PondError::check_range("layout.factor_padding", self.layout.factor_padding, 0.0, 0.5)?;
        PondError::check_range("layout.fish_per_area", self.layout.fish_per_area, 0.0, 100.0)?;

        // The padded small pond keeps a positive radius
        if self.layout.factor_padding >= self.layout.factor_small {
            return Err(PondError::RangeViolation {
                field: "layout.factor_padding",
                value: self.layout.factor_padding,
                min: 0.0,
                max: self.layout.factor_small,
            });
        }
        if !(3..=MAX_FLARE_PRECISION).contains(&self.wave.flare_precision) {
            return Err(PondError::RangeViolation {
                field: "wave.flare_precision",
                value: self.wave.flare_precision as f32,
                min: 3.0,
                max: MAX_FLARE_PRECISION as f32,
            });
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(PondError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults if absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PondError> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PondError> {
        let path = path.as_ref();
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
