//! Simulation configuration
//!
//! Every tunable constant of a session with its default, JSON loading and
//! saving, and validation. All structs use `#[serde(default)]`, so a config
//! file only needs the fields it overrides:
//!
//! ```
//! use planet_walk_core::config::{Quality, SimulationConfig};
//!
//! let config = SimulationConfig::from_json_str(r#"{ "quality": "low", "wanderer": { "seed": 7 } }"#).unwrap();
//! assert_eq!(config.quality, Quality::Low);
//! assert_eq!(config.wanderer_speed(), 2.0);
//! assert_eq!(config.planet.radius, 10.0);
//! ```

use crate::camera::CameraConfig;
use crate::controller::RetargetInterval;
use crate::core_types::{Planet, PlanetError, Vec3};
use crate::footsteps::DEFAULT_FOOTSTEP_INTERVAL;
use crate::sphere::HemisphereBand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rendering quality tier. Low quality (mobile) walks everyone slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Normal,
    Low,
}

/// Planet geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 10.0,
        }
    }
}

impl PlanetConfig {
    /// # Errors
    ///
    /// See [`Planet::new`].
    pub fn build(&self) -> Result<Planet, PlanetError> {
        Planet::new(self.center, self.radius)
    }
}

/// Walking speed (units per second) per quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkerSpeed {
    pub normal: f32,
    pub low: f32,
}

impl WalkerSpeed {
    pub fn for_quality(&self, quality: Quality) -> f32 {
        match quality {
            Quality::Normal => self.normal,
            Quality::Low => self.low,
        }
    }

    fn is_valid(&self) -> bool {
        self.normal.is_finite() && self.low.is_finite() && self.normal > 0.0 && self.low > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: WalkerSpeed,
    pub max_footsteps: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: WalkerSpeed {
                normal: 3.5,
                low: 2.5,
            },
            max_footsteps: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WandererConfig {
    pub speed: WalkerSpeed,
    pub max_footsteps: usize,
    pub retarget: RetargetInterval,
    /// Fixed RNG seed for reproducible sessions; OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for WandererConfig {
    fn default() -> Self {
        Self {
            speed: WalkerSpeed {
                normal: 2.75,
                low: 2.0,
            },
            max_footsteps: 6,
            retarget: RetargetInterval::default(),
            seed: None,
        }
    }
}

/// Full session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub planet: PlanetConfig,
    /// Height of walkers above the literal surface.
    pub surface_offset: f32,
    pub quality: Quality,
    /// Latitude band walkers are kept in.
    pub hemisphere: HemisphereBand,
    pub player: PlayerConfig,
    pub wanderer: WandererConfig,
    /// Seconds between footsteps, shared by both trails.
    pub footstep_interval: f32,
    pub camera: CameraConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            planet: PlanetConfig::default(),
            surface_offset: 1.0,
            quality: Quality::Normal,
            hemisphere: HemisphereBand::default(),
            player: PlayerConfig::default(),
            wanderer: WandererConfig::default(),
            footstep_interval: DEFAULT_FOOTSTEP_INTERVAL,
            camera: CameraConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Defaults with the low quality tier selected.
    pub fn low_quality() -> Self {
        Self {
            quality: Quality::Low,
            ..Self::default()
        }
    }

    /// Pin the wanderer's RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.wanderer.seed = Some(seed);
        self
    }

    pub fn player_speed(&self) -> f32 {
        self.player.speed.for_quality(self.quality)
    }

    pub fn wanderer_speed(&self) -> f32 {
        self.wanderer.speed.for_quality(self.quality)
    }

    /// Check every field for values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Planet`] for bad planet geometry and
    /// [`ConfigError::Invalid`] naming the first other offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planet.build()?;

        if !self.surface_offset.is_finite() || self.surface_offset <= -self.planet.radius {
            return Err(ConfigError::Invalid(format!(
                "surface_offset must be finite and above -radius, got {}",
                self.surface_offset
            )));
        }
        if !self.hemisphere.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "hemisphere band must satisfy -1 <= equator_bias < pole_buffer <= 1, got {:?}",
                self.hemisphere
            )));
        }
        if !self.player.speed.is_valid() {
            return Err(ConfigError::Invalid(
                "player speeds must be finite and positive".to_string(),
            ));
        }
        if !self.wanderer.speed.is_valid() {
            return Err(ConfigError::Invalid(
                "wanderer speeds must be finite and positive".to_string(),
            ));
        }
        if self.player.max_footsteps == 0 || self.wanderer.max_footsteps == 0 {
            return Err(ConfigError::Invalid(
                "max_footsteps must be at least 1".to_string(),
            ));
        }
        if !self.wanderer.retarget.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "retarget interval must satisfy 0 < min <= max, got {:?}",
                self.wanderer.retarget
            )));
        }
        if !self.footstep_interval.is_finite() || self.footstep_interval <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "footstep_interval must be finite and positive, got {}",
                self.footstep_interval
            )));
        }
        if !self.camera.is_valid() {
            return Err(ConfigError::Invalid(
                "camera smoothness must be in (0, 1] with finite offsets and a positive reference rate"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for malformed JSON and any
    /// [`SimulationConfig::validate`] error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeFailed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFailed`] if the file cannot be read, then as
    /// [`SimulationConfig::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Write the config as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeFailed`] or [`ConfigError::SaveFailed`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = self.to_json()?;
        fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur while loading or validating a configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to read file
    LoadFailed(String),
    /// Failed to parse file contents
    ParseFailed(String),
    /// Failed to serialize config
    SerializeFailed(String),
    /// Failed to write file
    SaveFailed(String),
    /// Planet geometry rejected
    Planet(PlanetError),
    /// Any other out-of-range field
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadFailed(msg) => write!(f, "Failed to load: {msg}"),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse: {msg}"),
            ConfigError::SerializeFailed(msg) => write!(f, "Failed to serialize: {msg}"),
            ConfigError::SaveFailed(msg) => write!(f, "Failed to save: {msg}"),
            ConfigError::Planet(err) => write!(f, "Invalid planet: {err}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Planet(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlanetError> for ConfigError {
    fn from(err: PlanetError) -> Self {
        ConfigError::Planet(err)
    }
}
