//! Top Scroller - simulation core for a vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (movement, collisions, rounds, outcome)
//! - `tuning`: Data-driven game balance
//! - `clock`: Fixed timestep driver for presentation loops
//! - `error`: Error types

pub mod clock;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use tuning::Tuning;

/// Game configuration constants (reference tuning)
pub mod consts {
    /// Target tick rate of the presentation loop
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (tall window, vertical scroller)
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 640.0;
    /// Broad-phase grid cell edge
    pub const CELL_SIZE: f32 = 32.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 35.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Two hits allowed, the third ends the run
    pub const START_LIVES: i32 = 2;
    /// Brief invulnerability after a hit
    pub const INVULNERABILITY_TICKS: u32 = 60;

    /// Projectile defaults (negative y = upward)
    pub const PROJECTILE_SIZE: f32 = 26.0;
    pub const PROJECTILE_SPEED: f32 = -6.0;

    /// Hostile defaults
    pub const HOSTILE_SIZE: f32 = 38.0;
    pub const BASE_HOSTILE_SPEED: f32 = 1.1;
    pub const HOSTILE_SPEED_STEP: f32 = 0.3;

    /// Spawn cadence in ticks
    pub const BASE_SPAWN_INTERVAL: u32 = 32;
    pub const SPAWN_INTERVAL_DECAY: f32 = 2.0;
    pub const MIN_SPAWN_INTERVAL: u32 = 12;

    /// Fire cadence in ticks
    pub const BASE_FIRE_COOLDOWN: u32 = 10;
    pub const FIRE_COOLDOWN_DECAY: f32 = 0.5;
    pub const MIN_FIRE_COOLDOWN: u32 = 8;

    /// Background scroll (pixels per tick)
    pub const SCROLL_SPEED: f32 = 1.2;

    /// Kills needed per round; clearing the last one wins
    pub const ROUND_QUOTAS: [u32; 6] = [6, 12, 18, 24, 30, 42];
}
