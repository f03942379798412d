//! Body registry: which tier is this circle?
//!
//! The physics world owns bodies; the game keeps tier identity here, keyed by
//! [`BodyId`]. Food bodies enter and leave the world only through
//! [`spawn_food`] and [`despawn_food`] so the two never drift apart.

use std::collections::HashMap;

use glam::Vec2;

use super::food::{Ordinal, Taxonomy};
use super::physics::{BodyId, BodyLabel, Material, PhysicsWorld};

/// Mapping from body identity to tier ordinal
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    tiers: HashMap<BodyId, Ordinal>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: BodyId, ordinal: Ordinal) {
        self.tiers.insert(id, ordinal);
    }

    pub fn lookup(&self, id: BodyId) -> Option<Ordinal> {
        self.tiers.get(&id).copied()
    }

    /// Forget a body; returns the tier it had
    pub fn unregister(&mut self, id: BodyId) -> Option<Ordinal> {
        self.tiers.remove(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.tiers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiers.clear();
    }

    /// Registered ids sorted for deterministic iteration
    pub fn ids(&self) -> Vec<BodyId> {
        let mut ids: Vec<BodyId> = self.tiers.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Every `(id, ordinal)` entry, ordered by id
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, Ordinal)> + '_ {
        self.ids().into_iter().filter_map(|id| self.lookup(id).map(|ordinal| (id, ordinal)))
    }
}

/// Create a food body and register it in one step
pub fn spawn_food<W: PhysicsWorld>(
    world: &mut W,
    registry: &mut BodyRegistry,
    taxonomy: &Taxonomy,
    pos: Vec2,
    ordinal: Ordinal,
    material: Material,
) -> BodyId {
    let radius = taxonomy.radius(ordinal);
    let id = world.add_circle(pos, radius, material, BodyLabel::Food);
    registry.register(id, ordinal);
    id
}

/// Remove a food body from the world and the registry in one step
pub fn despawn_food<W: PhysicsWorld>(world: &mut W, registry: &mut BodyRegistry, id: BodyId) -> Option<Ordinal> {
    world.remove_body(id);
    registry.unregister(id)
}
