//! Simulation state and snapshot types
//!
//! `SimulationState` is a plain value: everything the run needs, including
//! its RNG, lives here and is threaded through `tick` by the caller.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{EntityStore, Player};
use super::grid::SpatialIndex;
use super::rounds::RoundController;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Run outcome. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Playing
    }
}

/// Discrete things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A projectile was fired from `at`
    Fired { at: Vec2 },
    /// A projectile destroyed the hostile at `at`
    Hit { at: Vec2 },
    /// The player lost a life; `lives` is what remains
    Damage { lives: i32 },
    /// A new round started
    RoundAdvanced { round: u32 },
    Won,
    Lost,
}

/// Player as seen by a presenter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub invulnerable: bool,
    pub invulnerability_ticks: u32,
}

/// Read-only view of the simulation after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub player: PlayerView,
    /// Top-left corners, oldest first
    pub projectiles: Vec<Vec2>,
    /// Top-left corners, oldest first
    pub hostiles: Vec<Vec2>,
    pub round_index: u32,
    pub round_count: u32,
    pub kills_this_round: u32,
    /// `None` once every round is cleared
    pub quota_this_round: Option<u32>,
    pub total_kills: u32,
    pub lives: i32,
    pub outcome: Outcome,
    /// Fire cooldown in effect for the current round
    pub fire_cooldown: u32,
    /// Fall speed of hostiles spawned this round
    pub hostile_speed: f32,
    /// Background scroll accumulator
    pub scroll_offset: f32,
}

impl Snapshot {
    /// Whether the player sprite is in its highlight phase.
    ///
    /// Alternates every 4 ticks of remaining invulnerability.
    pub fn player_blinking(&self) -> bool {
        self.player.invulnerable && (self.player.invulnerability_ticks / 4) % 2 == 0
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) tuning: Tuning,
    /// Source for hostile spawn columns
    pub(crate) rng: Pcg32,
    pub(crate) index: SpatialIndex,
    pub(crate) entities: EntityStore,
    pub(crate) player: Player,
    pub(crate) rounds: RoundController,
    /// Ticks until the player may fire again
    pub(crate) fire_cooldown: u32,
    pub(crate) outcome: Outcome,
    pub(crate) tick_count: u64,
    pub(crate) scroll_offset: f32,
    /// Events raised by the most recent tick
    pub(crate) events: Vec<SimEvent>,
}

impl SimulationState {
    /// Create a new run with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }

    /// Create a new run drawing spawn positions from `rng`
    pub fn with_rng(tuning: Tuning, rng: Pcg32) -> Result<Self, SimError> {
        tuning.validate()?;

        let mut index = SpatialIndex::new(tuning.cell_size);
        // Bottom center, one ship-height above the edge
        let start = Vec2::new(
            tuning.width / 2.0 - tuning.player_size / 2.0,
            (tuning.height - 2.0 * tuning.player_size).max(0.0),
        );
        let player = Player::spawn(&mut index, start, tuning.player_size, tuning.start_lives);
        let rounds = RoundController::new(tuning.quotas.clone(), &tuning.curve);

        Ok(Self {
            tuning,
            rng,
            index,
            entities: EntityStore::new(),
            player,
            rounds,
            fire_cooldown: 0,
            outcome: Outcome::Playing,
            tick_count: 0,
            scroll_offset: 0.0,
            events: Vec::new(),
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Events raised by the most recent tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Ticks simulated while playing
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn lives(&self) -> i32 {
        self.player.lives
    }

    pub fn round_index(&self) -> u32 {
        self.rounds.round_index()
    }

    pub fn snapshot(&self) -> Snapshot {
        let round = self.rounds.round_index();
        let curve = &self.tuning.curve;
        Snapshot {
            tick: self.tick_count,
            player: PlayerView {
                pos: self.player.pos,
                invulnerable: self.player.is_invulnerable(),
                invulnerability_ticks: self.player.invulnerability,
            },
            projectiles: self.entities.projectiles.iter().map(|p| p.pos).collect(),
            hostiles: self.entities.hostiles.iter().map(|h| h.pos).collect(),
            round_index: round,
            round_count: self.rounds.round_count(),
            kills_this_round: self.rounds.kills_this_round(),
            quota_this_round: self.rounds.quota(),
            total_kills: self.rounds.total_kills(),
            lives: self.player.lives,
            outcome: self.outcome,
            fire_cooldown: curve.fire_cooldown(round),
            hostile_speed: curve.hostile_speed(round),
            scroll_offset: self.scroll_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SimulationState::new(Tuning::default(), 7).unwrap();
        let snap = state.snapshot();

        assert_eq!(snap.outcome, Outcome::Playing);
        assert_eq!(snap.lives, 2);
        assert_eq!(snap.round_index, 0);
        assert_eq!(snap.round_count, 6);
        assert_eq!(snap.quota_this_round, Some(6));
        assert_eq!(snap.player.pos, Vec2::new(222.5, 570.0));
        assert!(!snap.player.invulnerable);
        assert!(snap.projectiles.is_empty() && snap.hostiles.is_empty());
        // Only the player is indexed
        assert_eq!(state.index.len(), 1);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let no_rounds = Tuning {
            quotas: Vec::new(),
            ..Default::default()
        };
        // Projectiles falling down would never leave the playfield
        let downward_shots = Tuning {
            projectile_speed: 6.0,
            ..Default::default()
        };
        let mut easing = Tuning::default();
        easing.curve.interval_decay = -5.0;

        for tuning in [no_rounds, downward_shots, easing] {
            assert!(matches!(
                SimulationState::new(tuning, 1),
                Err(SimError::InvalidTuning(_))
            ));
        }
    }

    #[test]
    fn test_player_blinks_on_even_phase() {
        let mut snap = SimulationState::new(Tuning::default(), 1).unwrap().snapshot();
        assert!(!snap.player_blinking());

        snap.player.invulnerable = true;
        snap.player.invulnerability_ticks = 3;
        assert!(snap.player_blinking());
        snap.player.invulnerability_ticks = 5;
        assert!(!snap.player_blinking());
        snap.player.invulnerability_ticks = 8;
        assert!(snap.player_blinking());
    }

    #[test]
    fn test_outcome_terminal() {
        assert!(!Outcome::Playing.is_terminal());
        assert!(Outcome::Won.is_terminal());
        assert!(Outcome::Lost.is_terminal());
    }
}
