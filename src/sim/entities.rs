//! Entity records and their store
//!
//! The store owns every projectile and hostile in dense vectors, ordered by
//! spawn. Each record holds the handle of its shape in the spatial index; the
//! store is the only place that creates or drops those handles, so a record
//! and its shape always live and die together.

use std::collections::HashMap;

use glam::Vec2;

use super::grid::{Category, ShapeHandle, SpatialIndex};
use super::rect::Rect;

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub handle: ShapeHandle,
    /// Terminal once below zero
    pub lives: i32,
    /// Ticks of damage immunity left
    pub invulnerability: u32,
}

impl Player {
    pub fn spawn(index: &mut SpatialIndex, pos: Vec2, size: f32, lives: i32) -> Self {
        let handle = index.insert(Rect::square(pos, size), Category::Player);
        Self {
            pos,
            size,
            handle,
            lives,
            invulnerability: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0
    }

    /// Spawn point of a projectile of edge `projectile_size`: centered, just above the ship
    pub fn muzzle(&self, projectile_size: f32) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size / 2.0 - projectile_size / 2.0,
            self.pos.y - projectile_size,
        )
    }
}

/// A shot travelling up the playfield
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Vertical velocity, negative = upward
    pub vy: f32,
    pub size: f32,
    pub handle: ShapeHandle,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Still (partly) below the top edge
    pub fn in_bounds(&self) -> bool {
        self.pos.y + self.size > 0.0
    }
}

/// An enemy falling down the playfield
#[derive(Debug, Clone)]
pub struct Hostile {
    pub id: u32,
    pub pos: Vec2,
    /// Vertical velocity, positive = downward
    pub vy: f32,
    pub size: f32,
    pub handle: ShapeHandle,
}

impl Hostile {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Fell past the bottom edge of a playfield of the given height
    pub fn escaped(&self, height: f32) -> bool {
        self.pos.y > height
    }
}

/// Owner of all projectile and hostile records
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub projectiles: Vec<Projectile>,
    pub hostiles: Vec<Hostile>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            hostiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_projectile(
        &mut self,
        index: &mut SpatialIndex,
        pos: Vec2,
        vy: f32,
        size: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        let handle = index.insert(Rect::square(pos, size), Category::Projectile);
        self.projectiles.push(Projectile {
            id,
            pos,
            vy,
            size,
            handle,
        });
        id
    }

    pub fn spawn_hostile(&mut self, index: &mut SpatialIndex, pos: Vec2, vy: f32, size: f32) -> u32 {
        let id = self.next_entity_id();
        let handle = index.insert(Rect::square(pos, size), Category::Hostile);
        log::debug!("Spawned hostile {} at ({:.1}, {:.1})", id, pos.x, pos.y);
        self.hostiles.push(Hostile {
            id,
            pos,
            vy,
            size,
            handle,
        });
        id
    }

    /// Map from shape handle to position in `hostiles`.
    ///
    /// Valid until the next spawn or compaction.
    pub fn hostile_lookup(&self) -> HashMap<ShapeHandle, usize> {
        self.hostiles
            .iter()
            .enumerate()
            .map(|(i, h)| (h.handle, i))
            .collect()
    }

    /// Drop every projectile whose `keep` flag is false, removing its shape in the same step
    pub fn compact_projectiles(&mut self, index: &mut SpatialIndex, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.projectiles.len());
        self.projectiles = compact(std::mem::take(&mut self.projectiles), keep, |p| {
            index.remove(p.handle)
        });
    }

    /// Drop every hostile whose `keep` flag is false, removing its shape in the same step
    pub fn compact_hostiles(&mut self, index: &mut SpatialIndex, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.hostiles.len());
        self.hostiles = compact(std::mem::take(&mut self.hostiles), keep, |h| {
            index.remove(h.handle)
        });
    }

    pub fn len(&self) -> usize {
        self.projectiles.len() + self.hostiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rebuild `items` from the entries flagged in `keep`, handing dropped ones to `on_drop`
fn compact<T>(items: Vec<T>, keep: &[bool], mut on_drop: impl FnMut(&T)) -> Vec<T> {
    items
        .into_iter()
        .zip(keep.iter().copied())
        .filter_map(|(item, kept)| {
            if kept {
                Some(item)
            } else {
                on_drop(&item);
                None
            }
        })
        .collect()
}
