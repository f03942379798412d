//! Spawn controller: the piece in the player's hand
//!
//! Holds the current piece, the preview of the next one and the drop
//! cooldown. It never touches the physics world; [`crate::sim::Game`] turns a
//! successful [`SpawnController::take_drop`] into a body.

use glam::Vec2;
use rand::Rng;

use super::food::{Ordinal, Taxonomy};
use crate::config::Arena;

/// The piece being positioned above the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentFood {
    pub ordinal: Ordinal,
    pub x: f32,
    pub y: f32,
    pub dropped: bool,
}

impl CurrentFood {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct SpawnController {
    current: Option<CurrentFood>,
    next: Ordinal,
    /// Ticks until the next spawn; zero when idle
    cooldown: u32,
    cooldown_ticks: u32,
}

impl SpawnController {
    /// Create a controller with the first preview already drawn
    pub fn new<R: Rng + ?Sized>(taxonomy: &Taxonomy, rng: &mut R, cooldown_ticks: u32) -> Self {
        Self {
            current: None,
            next: taxonomy.next_spawn_ordinal(rng),
            cooldown: 0,
            cooldown_ticks: cooldown_ticks.max(1),
        }
    }

    pub fn current(&self) -> Option<&CurrentFood> {
        self.current.as_ref()
    }

    /// Ordinal shown in the "next" preview
    pub fn next_ordinal(&self) -> Ordinal {
        self.next
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown > 0
    }

    /// Promote the preview to the current piece and draw a new preview
    pub fn spawn<R: Rng + ?Sized>(&mut self, taxonomy: &Taxonomy, arena: &Arena, rng: &mut R) -> &CurrentFood {
        let ordinal = self.next;
        self.next = taxonomy.next_spawn_ordinal(rng);

        let radius = taxonomy.radius(ordinal);
        self.current.insert(CurrentFood {
            ordinal,
            x: arena.center_x(),
            y: arena.top + radius,
            dropped: false,
        })
    }

    /// Slide the held piece, keeping it inside the walls.
    /// Returns false when there is nothing to move.
    pub fn reposition(&mut self, x: f32, taxonomy: &Taxonomy, arena: &Arena) -> bool {
        if self.is_cooling_down() {
            return false;
        }
        let Some(food) = self.current.as_mut().filter(|f| !f.dropped) else {
            return false;
        };
        let radius = taxonomy.radius(food.ordinal);
        let (min, max) = (arena.left() + radius, arena.right() - radius);
        // A tier wider than the container would invert the range
        food.x = if min <= max { x.clamp(min, max) } else { arena.center_x() };
        true
    }

    /// Release the held piece and start the cooldown.
    /// Returns the released piece, or `None` if a drop isn't allowed now.
    pub fn take_drop(&mut self) -> Option<CurrentFood> {
        if self.is_cooling_down() {
            return None;
        }
        let food = self.current.as_mut().filter(|f| !f.dropped)?;
        food.dropped = true;
        self.cooldown = self.cooldown_ticks;
        Some(*food)
    }

    /// Advance the cooldown by one tick. Returns true on the tick it expires,
    /// which is when the next piece should spawn.
    pub fn advance(&mut self) -> bool {
        if self.cooldown == 0 {
            return false;
        }
        self.cooldown -= 1;
        self.cooldown == 0
    }

    /// Forget the held piece and any cooldown, and redraw the preview
    pub fn reset<R: Rng + ?Sized>(&mut self, taxonomy: &Taxonomy, rng: &mut R) {
        self.current = None;
        self.cooldown = 0;
        self.next = taxonomy.next_spawn_ordinal(rng);
    }
}
