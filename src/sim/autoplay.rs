//! Idle/demo mode - a simple bot plays the game
//!
//! Aims the held piece over the highest body of the same tier so it lands
//! on a merge partner; otherwise drops somewhere random. It keeps its own
//! RNG so watching the bot never perturbs the game's piece sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::physics::PhysicsWorld;
use super::state::Game;
use super::tick::TickInput;

#[derive(Debug, Clone)]
pub struct Autoplay {
    rng: Pcg32,
}

impl Autoplay {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Pick where the held piece should go, if there is one to place
    pub fn choose_x<W: PhysicsWorld>(&mut self, game: &Game<W>) -> Option<f32> {
        let current = game.current_food().filter(|f| !f.dropped)?;

        // Smallest y is the top of the pile
        let partner = game
            .food_bodies()
            .filter(|f| f.ordinal == current.ordinal)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let x = match partner {
            Some(food) => food.pos.x,
            None => {
                let arena = game.arena();
                self.rng.random_range(arena.left()..arena.right())
            }
        };
        Some(x)
    }

    /// Input for the next tick: aim and drop whenever a drop is allowed
    pub fn next_input<W: PhysicsWorld>(&mut self, game: &Game<W>) -> TickInput {
        if !game.can_drop() {
            return TickInput::default();
        }
        TickInput {
            target_x: self.choose_x(game),
            drop: true,
            ..Default::default()
        }
    }
}
