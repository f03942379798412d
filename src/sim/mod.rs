//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod collision;
pub mod engine;
pub mod food;
pub mod game_over;
pub mod merge;
pub mod physics;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autoplay::Autoplay;
pub use collision::{CollisionResult, circle_circle_collision, rect_circle_collision};
pub use engine::CircleWorld;
pub use food::{FoodTier, Ordinal, Taxonomy, next_spawn_ordinal};
pub use game_over::{DangerState, DangerTransition, GameOverDetector, any_dangerous};
pub use merge::{MergeOutcome, MergeQueue, PendingMerge, enqueue_collisions, resolve_next};
pub use physics::{BodyId, BodyLabel, BodyView, Material, PhysicsWorld};
pub use registry::{BodyRegistry, despawn_food, spawn_food};
pub use spawn::{CurrentFood, SpawnController};
pub use state::{FoodView, Game, GameEvent, GamePhase};
pub use tick::{TickInput, tick};
