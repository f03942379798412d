//! Feast Drop - a physics merge puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (food tiers, merges, game-over detection)
//! - `config`: Data-driven game balance and arena geometry
//!
//! Physics is reached through the [`sim::PhysicsWorld`] trait; the bundled
//! [`sim::CircleWorld`] is a small circle solver good enough to drive the game.

pub mod config;
pub mod sim;

pub use config::{Arena, ConfigError, GameConfig};
pub use sim::{Game, GamePhase, TickInput, tick};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default canvas size (portrait phone layout)
    pub const CANVAS_WIDTH: f32 = 420.0;
    pub const CANVAS_HEIGHT: f32 = 760.0;

    /// Container geometry
    pub const CONTAINER_PADDING: f32 = 20.0;
    pub const CONTAINER_TOP: f32 = 175.0;
    pub const CONTAINER_BOTTOM_MARGIN: f32 = 80.0;
    pub const WALL_THICKNESS: f32 = 60.0;
    /// Death line sits this far below the container top
    pub const DEATH_LINE_OFFSET: f32 = 50.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1500.0;

    /// A body slower than this on both axes counts as settled (pixels/s)
    pub const REST_SPEED: f32 = 30.0;

    /// Milliseconds between a drop and the next piece appearing
    pub const DROP_COOLDOWN_MS: u32 = 500;
    /// Milliseconds a settled body may sit above the death line
    pub const GAME_OVER_DELAY_MS: u32 = 2000;
}

/// Midpoint of two points
#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Convert a millisecond duration to whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as f32 / 1000.0 / consts::SIM_DT).round() as u32;
    ticks.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(2000), 120);
        assert_eq!(ms_to_ticks(0), 1);
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(Vec2::new(10.0, 20.0), Vec2::new(30.0, 60.0));
        assert_eq!(m, Vec2::new(20.0, 40.0));
    }
}
