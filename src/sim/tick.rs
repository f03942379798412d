//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Per tick:
//! input, physics step, collision batch into the merge queue, one merge,
//! game-over scan, spawn cooldown.

use super::game_over::{DangerTransition, any_dangerous};
use super::merge::{MergeOutcome, enqueue_collisions, resolve_next};
use super::physics::PhysicsWorld;
use super::state::{Game, GameEvent};
use crate::consts::SIM_DT;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired x of the held piece (from pointer/touch position)
    pub target_x: Option<f32>,
    /// Release the held piece (pointer up / tap end)
    pub drop: bool,
    /// Start a fresh game
    pub restart: bool,
}

/// Advance the game by one fixed timestep
pub fn tick<W: PhysicsWorld>(game: &mut Game<W>, input: &TickInput) {
    game.events.clear();

    if input.restart {
        game.restart();
        return;
    }

    // Frozen once the game has ended
    if game.is_over() {
        return;
    }

    game.time_ticks += 1;

    if let Some(x) = input.target_x {
        game.reposition(x);
    }
    // The cooldown starts counting on the tick after the release
    let released = if input.drop { game.drop_food() } else { None };

    game.world.step(SIM_DT);

    // Whole collision batch is queued before any merge runs
    let pairs = game.world.drain_collision_starts();
    enqueue_collisions(&mut game.merges, &game.registry, &game.world, &pairs);

    let outcome = resolve_next(
        &mut game.merges,
        &mut game.registry,
        &mut game.world,
        &game.config.taxonomy,
        game.config.food_material,
    );
    if let MergeOutcome::Merged {
        ordinal,
        pos,
        points,
        spawned,
    } = outcome
    {
        game.score += points;
        game.events.push(GameEvent::Merged {
            ordinal,
            into: spawned.map(|(_, next)| next),
            pos,
            points,
        });
    }

    let dangerous = any_dangerous(
        &game.world,
        &game.registry,
        &game.config.taxonomy,
        game.config.arena.death_line_y(),
        game.config.rest_speed,
        released,
    );
    match game.detector.update(dangerous) {
        DangerTransition::None => {}
        DangerTransition::CountdownStarted => {
            log::debug!("Danger: settled food above the line at tick {}", game.time_ticks);
            game.events.push(GameEvent::DangerStarted);
        }
        DangerTransition::CountdownCancelled => {
            log::debug!("Danger cleared at tick {}", game.time_ticks);
            game.events.push(GameEvent::DangerCleared);
        }
        DangerTransition::Fired => {
            game.end();
            return;
        }
    }

    if released.is_none() && game.spawner.advance() {
        game.spawn();
    }
}
