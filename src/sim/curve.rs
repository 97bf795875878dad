//! Difficulty curve
//!
//! Pure functions of the 0-based round index. Cadences are in ticks and are
//! floored so late rounds never become impossible.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Parameters of the round → difficulty mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurve {
    /// Hostile fall speed in round 0 (pixels/tick)
    pub base_speed: f32,
    /// Added fall speed per round
    pub speed_step: f32,
    /// Ticks between spawns in round 0
    pub base_interval: u32,
    /// Ticks removed from the spawn interval per round
    pub interval_decay: f32,
    pub min_interval: u32,
    /// Ticks between shots in round 0
    pub base_cooldown: u32,
    /// Ticks removed from the fire cooldown per round
    pub cooldown_decay: f32,
    pub min_cooldown: u32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            base_speed: BASE_HOSTILE_SPEED,
            speed_step: HOSTILE_SPEED_STEP,
            base_interval: BASE_SPAWN_INTERVAL,
            interval_decay: SPAWN_INTERVAL_DECAY,
            min_interval: MIN_SPAWN_INTERVAL,
            base_cooldown: BASE_FIRE_COOLDOWN,
            cooldown_decay: FIRE_COOLDOWN_DECAY,
            min_cooldown: MIN_FIRE_COOLDOWN,
        }
    }
}

impl DifficultyCurve {
    /// Hostile fall speed for round `r`
    pub fn hostile_speed(&self, r: u32) -> f32 {
        self.base_speed + self.speed_step * r as f32
    }

    /// Ticks between hostile spawns for round `r`
    pub fn spawn_interval(&self, r: u32) -> u32 {
        decayed(self.base_interval, self.interval_decay, r, self.min_interval)
    }

    /// Ticks between shots for round `r`
    pub fn fire_cooldown(&self, r: u32) -> u32 {
        decayed(self.base_cooldown, self.cooldown_decay, r, self.min_cooldown)
    }

    /// Hostiles must fall, and no round may be easier than the one before it
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "base hostile speed must be positive, got {}",
                self.base_speed
            )));
        }
        for (name, value) in [
            ("speed_step", self.speed_step),
            ("interval_decay", self.interval_decay),
            ("cooldown_decay", self.cooldown_decay),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }
        if self.min_interval == 0 || self.min_cooldown == 0 {
            return Err(ConfigError::Invalid(
                "spawn and fire floors must be at least one tick".into(),
            ));
        }
        Ok(())
    }
}

/// `max(floor, floor(base - decay * r))`, never below one tick
fn decayed(base: u32, decay: f32, r: u32, floor: u32) -> u32 {
    let raw = (base as f32 - decay * r as f32).floor();
    let floor = floor.max(1);
    if raw <= floor as f32 {
        floor
    } else {
        raw as u32
    }
}
