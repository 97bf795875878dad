//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per fixed step, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (entities in spawn order, queries by slot)
//! - No rendering, audio or platform dependencies

pub mod combat;
pub mod curve;
pub mod entities;
pub mod grid;
pub mod rect;
pub mod rounds;
pub mod state;
pub mod tick;

pub use curve::DifficultyCurve;
pub use entities::{EntityStore, Hostile, Player, Projectile};
pub use grid::{Category, ShapeHandle, SpatialIndex};
pub use rect::Rect;
pub use rounds::{RoundController, RoundEvent};
pub use state::{Outcome, PlayerView, SimEvent, SimulationState, Snapshot};
pub use tick::{TickInput, tick};
