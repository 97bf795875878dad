//! Uniform-grid broad phase
//!
//! Shapes are stored in an arena of slots; buckets hold `ShapeHandle`s, never
//! references to entity data. A handle carries the generation of its slot, so
//! once a shape is removed every copy of its handle goes stale even if the
//! slot is recycled.
//!
//! Cells are keyed by integer coordinates in a hash map, which keeps shapes
//! indexable above the top edge (fresh spawns) and below the bottom edge
//! (escaping hostiles).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::error::SimError;

/// What a shape belongs to. Fixed for the lifetime of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Hostile,
    Projectile,
    Player,
}

/// Opaque reference to a shape in a `SpatialIndex`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeHandle {
    slot: u32,
    generation: u32,
}

type Cell = (i32, i32);

/// Inclusive range of cells covered by a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    min: Cell,
    max: Cell,
}

impl CellSpan {
    fn of(rect: &Rect, cell_size: f32) -> Self {
        let min_x = (rect.x / cell_size).floor() as i32;
        let min_y = (rect.y / cell_size).floor() as i32;
        // An edge that lands exactly on a cell boundary doesn't reach into
        // the next cell (overlap is strict).
        let max_x = (((rect.x + rect.width) / cell_size).ceil() as i32 - 1).max(min_x);
        let max_y = (((rect.y + rect.height) / cell_size).ceil() as i32 - 1).max(min_y);
        Self {
            min: (min_x, min_y),
            max: (max_x, max_y),
        }
    }

    fn cells(self) -> impl Iterator<Item = Cell> {
        (self.min.1..=self.max.1)
            .flat_map(move |cy| (self.min.0..=self.max.0).map(move |cx| (cx, cy)))
    }
}

#[derive(Debug, Clone)]
struct Shape {
    rect: Rect,
    category: Category,
    span: CellSpan,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    shape: Option<Shape>,
}

/// Broad-phase index mapping rectangles to grid cells
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<Cell, Vec<ShapeHandle>>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live shapes
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a shape, registering it in every cell it intersects
    pub fn insert(&mut self, rect: Rect, category: Category) -> ShapeHandle {
        let span = CellSpan::of(&rect, self.cell_size);
        let shape = Shape {
            rect,
            category,
            span,
        };

        let handle = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.shape = Some(shape);
                ShapeHandle {
                    slot,
                    generation: entry.generation,
                }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    shape: Some(shape),
                });
                ShapeHandle {
                    slot,
                    generation: 0,
                }
            }
        };

        self.link(handle, span);
        self.live += 1;
        handle
    }

    /// Move a shape. Buckets are only touched when the covered cells change.
    pub fn update_position(&mut self, handle: ShapeHandle, rect: Rect) -> Result<(), SimError> {
        let cell_size = self.cell_size;
        let shape = self.shape_mut(handle)?;
        let old_span = shape.span;
        let new_span = CellSpan::of(&rect, cell_size);
        shape.rect = rect;

        if old_span != new_span {
            shape.span = new_span;
            self.unlink(handle, old_span);
            self.link(handle, new_span);
        }
        Ok(())
    }

    /// Remove a shape from every bucket. Removing a stale handle does nothing.
    pub fn remove(&mut self, handle: ShapeHandle) {
        let Some(slot) = self.slots.get_mut(handle.slot as usize) else {
            return;
        };
        if slot.generation != handle.generation {
            return;
        }
        let Some(shape) = slot.shape.take() else {
            return;
        };

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);
        self.live -= 1;
        self.unlink(handle, shape.span);
    }

    /// Whether the handle still refers to a live shape
    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.shape(handle).is_ok()
    }

    /// Current rectangle of a live shape
    pub fn rect(&self, handle: ShapeHandle) -> Result<Rect, SimError> {
        self.shape(handle).map(|s| s.rect)
    }

    #[cfg(test)]
    pub fn category(&self, handle: ShapeHandle) -> Result<Category, SimError> {
        self.shape(handle).map(|s| s.category)
    }

    /// Every live shape of `category` strictly overlapping `rect`, ordered by slot
    pub fn query_overlaps(&self, rect: &Rect, category: Category) -> Vec<ShapeHandle> {
        let span = CellSpan::of(rect, self.cell_size);

        let mut candidates: Vec<ShapeHandle> = span
            .cells()
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        candidates.retain(|&h| match self.shape(h) {
            Ok(shape) => shape.category == category && shape.rect.overlaps(rect),
            Err(_) => false,
        });
        candidates
    }

    /// Overlap query using a live shape's own rectangle, excluding the shape itself
    pub fn query_handle(
        &self,
        handle: ShapeHandle,
        category: Category,
    ) -> Result<Vec<ShapeHandle>, SimError> {
        let rect = self.rect(handle)?;
        let mut hits = self.query_overlaps(&rect, category);
        hits.retain(|&h| h != handle);
        Ok(hits)
    }

    fn shape(&self, handle: ShapeHandle) -> Result<&Shape, SimError> {
        self.slots
            .get(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.shape.as_ref())
            .ok_or(SimError::StaleHandle(handle))
    }

    fn shape_mut(&mut self, handle: ShapeHandle) -> Result<&mut Shape, SimError> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.shape.as_mut())
            .ok_or(SimError::StaleHandle(handle))
    }

    fn link(&mut self, handle: ShapeHandle, span: CellSpan) {
        for cell in span.cells() {
            self.cells.entry(cell).or_default().push(handle);
        }
    }

    fn unlink(&mut self, handle: ShapeHandle, span: CellSpan) {
        for cell in span.cells() {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.retain(|&h| h != handle);
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }
}
