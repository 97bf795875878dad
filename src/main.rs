//! Top Scroller headless runner
//!
//! Drives the simulation with a simple autopilot through the fixed timestep
//! clock, logging events as a presenter would react to them.
//!
//! Usage: `top-scroller [seed] [tuning.json]`

use std::path::Path;

use top_scroller::Tuning;
use top_scroller::clock::FixedStep;
use top_scroller::sim::{Outcome, SimEvent, SimulationState, Snapshot, TickInput, tick};

/// Simulated display refresh (deliberately not the tick rate)
const FRAME_DT: f32 = 1.0 / 144.0;
/// Give up after this many simulated seconds
const MAX_SECONDS: f32 = 600.0;

/// Chase the lowest hostile horizontally and keep firing
fn autopilot(snap: &Snapshot, tuning: &Tuning) -> TickInput {
    let player_center = snap.player.pos.x + tuning.player_size / 2.0;
    let target = snap
        .hostiles
        .iter()
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|h| h.x + tuning.hostile_size / 2.0);

    let (move_left, move_right) = match target {
        Some(x) if x < player_center - tuning.player_speed => (true, false),
        Some(x) if x > player_center + tuning.player_speed => (false, true),
        _ => (false, false),
    };

    TickInput {
        move_left,
        move_right,
        fire: true,
        ..Default::default()
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let tuning_path = args.next();
    let tuning = Tuning::load_or_default(tuning_path.as_deref().map(Path::new));

    log::info!("Top Scroller (headless) starting with seed {}", seed);

    let mut state = match SimulationState::new(tuning, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Can't start simulation: {}", e);
            std::process::exit(1);
        }
    };

    let mut clock = FixedStep::default();
    let mut elapsed = 0.0;
    let mut shots = 0u32;

    while state.outcome() == Outcome::Playing && elapsed < MAX_SECONDS {
        elapsed += FRAME_DT;
        for _ in 0..clock.advance(FRAME_DT) {
            let input = autopilot(&state.snapshot(), state.tuning());
            let events = match tick(&mut state, &input) {
                Ok(events) => events,
                Err(e) => {
                    log::error!("Simulation fault: {}", e);
                    std::process::exit(2);
                }
            };

            for event in events {
                match event {
                    SimEvent::Fired { .. } => shots += 1,
                    SimEvent::Hit { at } => log::debug!("Hit at ({:.0}, {:.0})", at.x, at.y),
                    SimEvent::Damage { lives } => log::info!("Ouch! {} lives left", lives),
                    SimEvent::RoundAdvanced { round } => log::info!("Round {}", round + 1),
                    SimEvent::Won => log::info!("YOU WIN!"),
                    SimEvent::Lost => log::info!("GAME OVER"),
                }
            }
        }
    }

    log::debug!("Stopped {:.2} ticks into the next step", clock.alpha());

    let snap = state.snapshot();
    println!(
        "{:?} after {} ticks | Round: {}/{} | Kills: {} | Lives: {} | Shots: {}",
        snap.outcome,
        snap.tick,
        (snap.round_index + 1).min(snap.round_count),
        snap.round_count,
        snap.total_kills,
        snap.lives,
        shots,
    );
}
