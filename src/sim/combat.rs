//! Movement, collision resolution and damage
//!
//! Each step operates on the whole `SimulationState` and is called in order by
//! `tick`. Projectiles are resolved against hostiles before hostiles are
//! resolved against the player, and every hostile gets exactly one
//! kill-or-survive decision per tick.

use glam::Vec2;
use rand::Rng;

use super::grid::Category;
use super::state::{Outcome, SimEvent, SimulationState};
use super::tick::TickInput;
use crate::error::SimError;

/// Apply movement input, clamp to the playfield, sync the player's shape
pub fn move_player(state: &mut SimulationState, input: &TickInput) -> Result<(), SimError> {
    let tuning = &state.tuning;
    let player = &mut state.player;

    player.pos += input.direction() * tuning.player_speed;
    player.pos = player.pos.clamp(
        Vec2::ZERO,
        Vec2::new(tuning.width - player.size, tuning.height - player.size),
    );
    state.index.update_position(player.handle, player.rect())
}

pub fn tick_invulnerability(state: &mut SimulationState) {
    state.player.invulnerability = state.player.invulnerability.saturating_sub(1);
}

/// Count down the fire cooldown and spawn a projectile if allowed
pub fn fire(state: &mut SimulationState, input: &TickInput) {
    state.fire_cooldown = state.fire_cooldown.saturating_sub(1);
    if !input.fire || state.fire_cooldown > 0 {
        return;
    }

    let tuning = &state.tuning;
    let at = state.player.muzzle(tuning.projectile_size);
    state.entities.spawn_projectile(
        &mut state.index,
        at,
        tuning.projectile_speed,
        tuning.projectile_size,
    );
    state.fire_cooldown = tuning.curve.fire_cooldown(state.rounds.round_index());
    state.events.push(SimEvent::Fired { at });
}

/// Let the round controller pace spawns; place requested hostiles at a random column
pub fn spawn_hostiles(state: &mut SimulationState) {
    let tuning = &state.tuning;
    if !state.rounds.tick(&tuning.curve) {
        return;
    }

    let span = (tuning.width - tuning.hostile_size).max(0.0);
    let x = state.rng.random::<f32>() * span;
    let vy = tuning.curve.hostile_speed(state.rounds.round_index());
    state.entities.spawn_hostile(
        &mut state.index,
        Vec2::new(x, -tuning.hostile_size),
        vy,
        tuning.hostile_size,
    );
}

/// Move projectiles and test them against hostiles.
///
/// Returns one flag per hostile: true if it was hit this tick. A projectile
/// stops at the first hostile not already claimed by an earlier projectile.
pub fn resolve_projectiles(state: &mut SimulationState) -> Result<Vec<bool>, SimError> {
    let mut hit_hostiles = vec![false; state.entities.hostiles.len()];
    let mut keep = Vec::with_capacity(state.entities.projectiles.len());
    let lookup = state.entities.hostile_lookup();

    for i in 0..state.entities.projectiles.len() {
        let projectile = &mut state.entities.projectiles[i];
        projectile.pos.y += projectile.vy;
        let handle = projectile.handle;
        let in_bounds = projectile.in_bounds();
        state.index.update_position(handle, projectile.rect())?;

        let target = state
            .index
            .query_handle(handle, Category::Hostile)?
            .into_iter()
            .filter_map(|h| lookup.get(&h).copied())
            .find(|&j| !hit_hostiles[j]);

        match target {
            Some(j) => {
                hit_hostiles[j] = true;
                keep.push(false);
                state.events.push(SimEvent::Hit {
                    at: state.entities.hostiles[j].pos,
                });
            }
            None => keep.push(in_bounds),
        }
    }

    state.entities.compact_projectiles(&mut state.index, &keep);
    Ok(hit_hostiles)
}

/// Move hostiles, apply contact and escape damage, drop the dead.
///
/// Returns the number of hostiles killed by projectiles.
pub fn resolve_hostiles(state: &mut SimulationState, hit: &[bool]) -> Result<u32, SimError> {
    let height = state.tuning.height;
    let mut keep = Vec::with_capacity(state.entities.hostiles.len());
    let mut kills = 0;

    for i in 0..state.entities.hostiles.len() {
        let hostile = &mut state.entities.hostiles[i];
        hostile.pos.y += hostile.vy;
        let handle = hostile.handle;
        let escaped = hostile.escaped(height);
        state.index.update_position(handle, hostile.rect())?;

        // Contact damage applies even if a projectile got this hostile too
        if !state.player.is_invulnerable()
            && !state.index.query_handle(handle, Category::Player)?.is_empty()
        {
            lose_life(state);
        }

        if hit.get(i).copied().unwrap_or(false) {
            kills += 1;
            keep.push(false);
        } else if escaped {
            log::debug!("Hostile {} escaped", state.entities.hostiles[i].id);
            keep.push(false);
            lose_life(state);
        } else {
            keep.push(true);
        }
    }

    state.entities.compact_hostiles(&mut state.index, &keep);
    Ok(kills)
}

/// Take one life unless invulnerable or the run is over.
///
/// The invulnerability window starts immediately, so at most one life is
/// lost per tick no matter how many hostiles touch the player.
pub fn lose_life(state: &mut SimulationState) {
    if state.player.is_invulnerable() || state.outcome.is_terminal() {
        return;
    }

    let player = &mut state.player;
    player.lives -= 1;
    player.invulnerability = state.tuning.invulnerability_ticks;
    state.events.push(SimEvent::Damage {
        lives: player.lives,
    });
    log::debug!("Player hit, {} lives left", player.lives);

    if player.lives < 0 {
        log::info!("Run lost at tick {}", state.tick_count);
        state.outcome = Outcome::Lost;
        state.events.push(SimEvent::Lost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Tuning where the round controller never spawns on its own
    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.curve.base_interval = 100_000;
        tuning.curve.interval_decay = 0.0;
        tuning
    }

    fn state() -> SimulationState {
        SimulationState::new(quiet_tuning(), 42).unwrap()
    }

    fn place_hostile(state: &mut SimulationState, pos: Vec2, vy: f32) {
        let size = state.tuning.hostile_size;
        state
            .entities
            .spawn_hostile(&mut state.index, pos, vy, size);
    }

    fn place_projectile(state: &mut SimulationState, pos: Vec2) {
        let (vy, size) = (state.tuning.projectile_speed, state.tuning.projectile_size);
        state
            .entities
            .spawn_projectile(&mut state.index, pos, vy, size);
    }

    #[test]
    fn test_move_player_clamps() {
        let mut state = state();
        let left_up = TickInput {
            move_left: true,
            move_up: true,
            ..Default::default()
        };
        for _ in 0..500 {
            move_player(&mut state, &left_up).unwrap();
        }
        assert_eq!(state.player.pos, Vec2::ZERO);

        let right_down = TickInput {
            move_right: true,
            move_down: true,
            ..Default::default()
        };
        for _ in 0..500 {
            move_player(&mut state, &right_down).unwrap();
        }
        assert_eq!(state.player.pos, Vec2::new(480.0 - 35.0, 640.0 - 35.0));
        assert_eq!(state.index.rect(state.player.handle), Ok(state.player.rect()));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = state();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut shots = 0;
        for _ in 0..25 {
            fire(&mut state, &input);
            shots += state
                .events
                .drain(..)
                .filter(|e| matches!(e, SimEvent::Fired { .. }))
                .count();
        }
        // Ticks 1, 11 and 21 in round 0
        assert_eq!(shots, 3);
        assert_eq!(state.entities.projectiles.len(), 3);
    }

    #[test]
    fn test_projectile_hits_first_hostile_only() {
        let mut state = state();
        place_hostile(&mut state, Vec2::new(100.0, 100.0), 0.0);
        place_hostile(&mut state, Vec2::new(110.0, 100.0), 0.0);
        place_projectile(&mut state, Vec2::new(105.0, 130.0));

        let hit = resolve_projectiles(&mut state).unwrap();
        assert_eq!(hit, vec![true, false]);
        assert!(state.entities.projectiles.is_empty());
        assert_eq!(state.events, vec![SimEvent::Hit { at: Vec2::new(100.0, 100.0) }]);
    }

    #[test]
    fn test_second_projectile_skips_claimed_hostile() {
        let mut state = state();
        place_hostile(&mut state, Vec2::new(100.0, 100.0), 0.0);
        place_projectile(&mut state, Vec2::new(105.0, 130.0));
        place_projectile(&mut state, Vec2::new(108.0, 130.0));

        let hit = resolve_projectiles(&mut state).unwrap();
        assert_eq!(hit, vec![true]);
        // The second shot flies on
        assert_eq!(state.entities.projectiles.len(), 1);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_projectile_leaving_top_is_silent() {
        let mut state = state();
        place_projectile(&mut state, Vec2::new(100.0, -20.0));

        let hit = resolve_projectiles(&mut state).unwrap();
        assert!(hit.is_empty());
        assert!(state.entities.projectiles.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.index.len(), 1);
    }

    #[test]
    fn test_hit_hostile_removed_without_damage_even_when_escaping() {
        let mut state = state();
        place_hostile(&mut state, Vec2::new(0.0, 639.0), 5.0);

        let kills = resolve_hostiles(&mut state, &[true]).unwrap();
        assert_eq!(kills, 1);
        assert!(state.entities.hostiles.is_empty());
        assert_eq!(state.player.lives, 2);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_escape_costs_a_life() {
        let mut state = state();
        place_hostile(&mut state, Vec2::new(0.0, 639.0), 5.0);

        let kills = resolve_hostiles(&mut state, &[false]).unwrap();
        assert_eq!(kills, 0);
        assert!(state.entities.hostiles.is_empty());
        assert_eq!(state.player.lives, 1);
        assert_eq!(state.player.invulnerability, 60);
        assert_eq!(state.events, vec![SimEvent::Damage { lives: 1 }]);
    }

    #[test]
    fn test_many_contacts_one_life() {
        let mut state = state();
        let at = state.player.pos;
        for dx in [0.0, 5.0, 10.0] {
            place_hostile(&mut state, at + Vec2::new(dx, 0.0), 0.0);
        }

        resolve_hostiles(&mut state, &[false, false, false]).unwrap();
        assert_eq!(state.player.lives, 1);
        assert_eq!(
            state
                .events
                .iter()
                .filter(|e| matches!(e, SimEvent::Damage { .. }))
                .count(),
            1
        );
        // Touching hostiles survive the contact
        assert_eq!(state.entities.hostiles.len(), 3);
    }

    #[test]
    fn test_lose_life_to_lost() {
        let mut state = state();
        for _ in 0..3 {
            state.player.invulnerability = 0;
            lose_life(&mut state);
        }
        assert_eq!(state.player.lives, -1);
        assert_eq!(state.outcome, Outcome::Lost);
        assert_eq!(state.events.last(), Some(&SimEvent::Lost));

        // Terminal: no more damage
        state.player.invulnerability = 0;
        lose_life(&mut state);
        assert_eq!(state.player.lives, -1);
    }

    #[test]
    fn test_spawn_uses_random_column_in_bounds() {
        let mut tuning = Tuning::default();
        tuning.curve.base_interval = 1;
        tuning.curve.min_interval = 1;
        let mut state = SimulationState::new(tuning, 3).unwrap();

        for _ in 0..6 {
            spawn_hostiles(&mut state);
        }
        assert_eq!(state.entities.hostiles.len(), 6);
        for h in &state.entities.hostiles {
            assert!(h.pos.x >= 0.0 && h.pos.x <= 480.0 - 38.0);
            assert_eq!(h.pos.y, -38.0);
        }
        // Quota for round 0 is six
        spawn_hostiles(&mut state);
        assert_eq!(state.entities.hostiles.len(), 6);
    }
}
