//! Round (wave) progression
//!
//! Each round has a kill quota. The controller paces hostile spawns for the
//! current round and advances once the quota is met; clearing the last
//! round wins the run.

use serde::{Deserialize, Serialize};

use super::curve::DifficultyCurve;

/// Result of checking the round for completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Quota not met yet
    Continue,
    /// Moved on to the given round index
    Advanced(u32),
    /// The last quota was met
    Won,
}

/// Round index, quota counters and spawn pacing
#[derive(Debug, Clone)]
pub struct RoundController {
    quotas: Vec<u32>,
    round_index: u32,
    spawned_this_round: u32,
    kills_this_round: u32,
    total_kills: u32,
    /// Ticks until the next spawn attempt
    spawn_timer: u32,
}

impl RoundController {
    pub fn new(quotas: Vec<u32>, curve: &DifficultyCurve) -> Self {
        Self {
            quotas,
            round_index: 0,
            spawned_this_round: 0,
            kills_this_round: 0,
            total_kills: 0,
            spawn_timer: curve.spawn_interval(0),
        }
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn round_count(&self) -> u32 {
        self.quotas.len() as u32
    }

    /// Kill quota of the current round, `None` once every round is cleared
    pub fn quota(&self) -> Option<u32> {
        self.quotas.get(self.round_index as usize).copied()
    }

    pub fn kills_this_round(&self) -> u32 {
        self.kills_this_round
    }

    pub fn spawned_this_round(&self) -> u32 {
        self.spawned_this_round
    }

    pub fn total_kills(&self) -> u32 {
        self.total_kills
    }

    #[cfg(test)]
    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    pub fn is_cleared(&self) -> bool {
        self.quota().is_none()
    }

    /// Count down the spawn timer. Returns true when a hostile should spawn.
    ///
    /// The timer restarts whenever it expires, even if the round's spawn
    /// quota is already used up; such requests are dropped.
    pub fn tick(&mut self, curve: &DifficultyCurve) -> bool {
        let Some(quota) = self.quota() else {
            return false;
        };

        self.spawn_timer = self.spawn_timer.saturating_sub(1);
        if self.spawn_timer > 0 {
            return false;
        }
        self.spawn_timer = curve.spawn_interval(self.round_index);

        if self.spawned_this_round < quota {
            self.spawned_this_round += 1;
            true
        } else {
            false
        }
    }

    pub fn on_kill(&mut self) {
        self.kills_this_round += 1;
        self.total_kills += 1;
    }

    /// Advance when the current quota is met. Kills beyond the quota are not carried over.
    pub fn maybe_advance(&mut self, curve: &DifficultyCurve) -> RoundEvent {
        let Some(quota) = self.quota() else {
            return RoundEvent::Won;
        };
        if self.kills_this_round < quota {
            return RoundEvent::Continue;
        }

        self.round_index += 1;
        self.kills_this_round = 0;
        self.spawned_this_round = 0;
        self.spawn_timer = curve.spawn_interval(self.round_index);

        if self.is_cleared() {
            RoundEvent::Won
        } else {
            RoundEvent::Advanced(self.round_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(quotas: &[u32]) -> (RoundController, DifficultyCurve) {
        let curve = DifficultyCurve::default();
        (RoundController::new(quotas.to_vec(), &curve), curve)
    }

    #[test]
    fn test_spawns_on_interval() {
        let (mut rounds, curve) = controller(&[6]);
        let interval = curve.spawn_interval(0);

        let spawn_ticks: Vec<u32> = (1..=interval * 3)
            .filter(|_| rounds.tick(&curve))
            .collect();
        assert_eq!(spawn_ticks, vec![interval, interval * 2, interval * 3]);
        assert_eq!(rounds.spawned_this_round(), 3);
    }

    #[test]
    fn test_spawn_quota_suppresses_extra_requests() {
        let (mut rounds, curve) = controller(&[2]);
        let spawns = (0..1000).filter(|_| rounds.tick(&curve)).count();
        assert_eq!(spawns, 2);
        assert_eq!(rounds.spawned_this_round(), 2);
        // Timer keeps cycling
        assert!(rounds.spawn_timer() >= 1);
    }

    #[test]
    fn test_advance_exactly_at_quota() {
        let (mut rounds, curve) = controller(&[3, 5]);

        for expected in 1..3 {
            rounds.on_kill();
            assert_eq!(rounds.kills_this_round(), expected);
            assert_eq!(rounds.maybe_advance(&curve), RoundEvent::Continue);
        }
        rounds.on_kill();
        assert_eq!(rounds.maybe_advance(&curve), RoundEvent::Advanced(1));
        assert_eq!(rounds.round_index(), 1);
        assert_eq!(rounds.kills_this_round(), 0);
        assert_eq!(rounds.spawned_this_round(), 0);
        assert_eq!(rounds.total_kills(), 3);
        assert_eq!(rounds.quota(), Some(5));
        assert_eq!(rounds.spawn_timer(), curve.spawn_interval(1));
    }

    #[test]
    fn test_last_quota_wins_and_stays_won() {
        let (mut rounds, curve) = controller(&[1]);
        rounds.on_kill();
        assert_eq!(rounds.maybe_advance(&curve), RoundEvent::Won);
        assert!(rounds.is_cleared());
        assert_eq!(rounds.quota(), None);
        assert_eq!(rounds.maybe_advance(&curve), RoundEvent::Won);
        assert!(!rounds.tick(&curve));
        assert_eq!(rounds.round_index(), 1);
    }

    #[test]
    fn test_round_index_never_decreases() {
        let (mut rounds, curve) = controller(&[1, 1, 1, 1]);
        let mut last = rounds.round_index();
        for _ in 0..10 {
            rounds.on_kill();
            rounds.maybe_advance(&curve);
            assert!(rounds.round_index() >= last);
            last = rounds.round_index();
        }
        assert_eq!(rounds.round_index(), rounds.round_count());
        assert_eq!(rounds.total_kills(), 10);
    }
}
