//! Game balance and playfield configuration
//!
//! Loaded from JSON so balance can be tweaked without a rebuild. Missing
//! fields fall back to the reference values in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::DifficultyCurve;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Broad-phase grid cell edge
    pub cell_size: f32,

    // === Player ===
    pub player_size: f32,
    /// Pixels per tick per pressed direction
    pub player_speed: f32,
    pub start_lives: i32,
    pub invulnerability_ticks: u32,

    // === Projectiles ===
    pub projectile_size: f32,
    /// Negative = upward
    pub projectile_speed: f32,

    // === Hostiles ===
    pub hostile_size: f32,

    // === Progression ===
    /// Kills needed per round
    pub quotas: Vec<u32>,
    pub curve: DifficultyCurve,

    // === Presentation ===
    /// Background scroll per tick
    pub scroll_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            cell_size: CELL_SIZE,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            start_lives: START_LIVES,
            invulnerability_ticks: INVULNERABILITY_TICKS,

            projectile_size: PROJECTILE_SIZE,
            projectile_speed: PROJECTILE_SPEED,

            hostile_size: HOSTILE_SIZE,

            quotas: ROUND_QUOTAS.to_vec(),
            curve: DifficultyCurve::default(),

            scroll_speed: SCROLL_SPEED,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&content)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load tuning from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Using default tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.quotas.is_empty() {
            return invalid("at least one round quota is required".into());
        }
        if let Some(i) = self.quotas.iter().position(|&q| q == 0) {
            return invalid(format!("round {} has a zero quota", i));
        }
        if !(self.cell_size > 0.0) {
            return invalid(format!("cell size must be positive, got {}", self.cell_size));
        }
        for (name, size) in [
            ("player", self.player_size),
            ("projectile", self.projectile_size),
            ("hostile", self.hostile_size),
        ] {
            if !(size > 0.0) {
                return invalid(format!("{} size must be positive, got {}", name, size));
            }
            if size > self.width || size > self.height {
                return invalid(format!(
                    "{} size {} does not fit a {}x{} playfield",
                    name, size, self.width, self.height
                ));
            }
        }
        if self.start_lives < 0 {
            return invalid(format!("start lives must be >= 0, got {}", self.start_lives));
        }
        if !(self.projectile_speed < 0.0) {
            return invalid(format!(
                "projectile speed must be negative (upward), got {}",
                self.projectile_speed
            ));
        }
        self.curve.validate()
    }
}
