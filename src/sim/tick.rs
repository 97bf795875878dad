//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat;
use super::rounds::RoundEvent;
use super::state::{Outcome, SimEvent, SimulationState};
use crate::error::SimError;

/// Input commands for a single tick, sampled once by the presenter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Fire button held
    pub fire: bool,
}

impl TickInput {
    /// Unit steps per axis; opposite keys cancel, diagonals are not normalized
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }
}

/// Advance the simulation by one tick and return the events it raised.
///
/// Once the run is won or lost this does nothing and returns no events.
pub fn tick<'a>(
    state: &'a mut SimulationState,
    input: &TickInput,
) -> Result<&'a [SimEvent], SimError> {
    state.events.clear();
    if state.outcome.is_terminal() {
        return Ok(state.events.as_slice());
    }

    state.tick_count += 1;
    state.scroll_offset += state.tuning.scroll_speed;

    combat::move_player(state, input)?;
    combat::tick_invulnerability(state);
    combat::fire(state, input);
    combat::spawn_hostiles(state);

    let hit = combat::resolve_projectiles(state)?;
    let kills = combat::resolve_hostiles(state, &hit)?;

    for _ in 0..kills {
        state.rounds.on_kill();
    }

    // A run lost this tick stays lost even if the same tick met the quota
    if state.outcome == Outcome::Playing {
        match state.rounds.maybe_advance(&state.tuning.curve) {
            RoundEvent::Continue => {}
            RoundEvent::Advanced(round) => {
                log::info!(
                    "Round {} cleared, starting round {} of {}",
                    round,
                    round + 1,
                    state.rounds.round_count()
                );
                state.events.push(SimEvent::RoundAdvanced { round });
            }
            RoundEvent::Won => {
                log::info!(
                    "All {} rounds cleared at tick {}",
                    state.rounds.round_count(),
                    state.tick_count
                );
                state.outcome = Outcome::Won;
                state.events.push(SimEvent::Won);
            }
        }
    }

    debug_assert_eq!(state.index.len(), state.entities.len() + 1);
    debug_assert!(state.index.contains(state.player.handle));
    Ok(state.events.as_slice())
}
