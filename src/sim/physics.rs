//! Physics engine boundary
//!
//! The game never owns rigid bodies. It talks to a physics world through
//! [`PhysicsWorld`] and only keeps opaque [`BodyId`]s on its side.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque engine-assigned body identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a body is, from the game's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLabel {
    Food,
    Wall,
    Floor,
}

/// Surface and mass properties of a dynamic body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Bounciness (0 = dead, 1 = perfectly elastic)
    pub restitution: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Fraction of velocity lost per step to air drag
    pub friction_air: f32,
    /// Mass per unit area
    pub density: f32,
}

impl Material {
    /// Standard food material: a little bounce, moderate grip, light drag
    pub const FOOD: Material = Material {
        restitution: 0.3,
        friction: 0.5,
        friction_air: 0.01,
        density: 0.001,
    };

    /// Material for a static body with the given friction
    pub fn fixed(friction: f32) -> Self {
        Self {
            restitution: 0.0,
            friction,
            friction_air: 0.0,
            density: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::FOOD
    }
}

/// Read-only snapshot of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub id: BodyId,
    pub label: BodyLabel,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
}

/// The operations the game needs from a 2D rigid-body engine
pub trait PhysicsWorld {
    /// Add a dynamic circle and return its identity
    fn add_circle(&mut self, pos: Vec2, radius: f32, material: Material, label: BodyLabel) -> BodyId;

    /// Add an immovable axis-aligned rectangle centred at `center`
    fn add_static_rect(&mut self, center: Vec2, size: Vec2, friction: f32, label: BodyLabel) -> BodyId;

    /// Remove a body; returns false if it was not present
    fn remove_body(&mut self, id: BodyId) -> bool;

    /// Look up a single body
    fn body(&self, id: BodyId) -> Option<BodyView>;

    /// All bodies in stable (id) order
    fn bodies(&self) -> impl Iterator<Item = BodyView> + '_;

    /// Set the world gravity (pixels/s², +y is down)
    fn set_gravity(&mut self, gravity: Vec2);

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Pairs whose contact began during the last step(s), oldest first.
    /// Draining clears the batch.
    fn drain_collision_starts(&mut self) -> Vec<(BodyId, BodyId)>;
}
