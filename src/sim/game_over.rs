//! Game-over detection
//!
//! A settled piece poking above the death line arms a single countdown.
//! Clearing the line disarms it; letting it run out ends the game once.

use super::food::Taxonomy;
use super::physics::{BodyId, BodyLabel, PhysicsWorld};
use super::registry::BodyRegistry;

/// Detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerState {
    Safe,
    /// Countdown running; ticks left before the game ends
    Countdown { remaining: u32 },
    Ended,
}

/// Transition produced by one [`GameOverDetector::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerTransition {
    None,
    CountdownStarted,
    CountdownCancelled,
    Fired,
}

/// True if any registered food body is above the line and at rest.
///
/// y grows downward, so "above" means the top of the circle has a smaller y
/// than the death line. `skip` leaves one body out of the scan: a piece
/// released this tick hasn't picked up speed yet and always reads as settled.
pub fn any_dangerous<W: PhysicsWorld>(
    world: &W,
    registry: &BodyRegistry,
    taxonomy: &Taxonomy,
    death_line_y: f32,
    rest_speed: f32,
    skip: Option<BodyId>,
) -> bool {
    world
        .bodies()
        .filter(|b| b.label == BodyLabel::Food && Some(b.id) != skip)
        .any(|body| {
            let Some(ordinal) = registry.lookup(body.id) else {
                return false;
            };
            let top = body.pos.y - taxonomy.radius(ordinal);
            let settled = body.vel.x.abs() < rest_speed && body.vel.y.abs() < rest_speed;
            top < death_line_y && settled
        })
}

/// Single-witness debounce over the danger signal
#[derive(Debug, Clone)]
pub struct GameOverDetector {
    state: DangerState,
    delay_ticks: u32,
}

impl GameOverDetector {
    pub fn new(delay_ticks: u32) -> Self {
        Self {
            state: DangerState::Safe,
            delay_ticks: delay_ticks.max(1),
        }
    }

    pub fn state(&self) -> DangerState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == DangerState::Ended
    }

    /// Ticks left on the countdown, if one is running
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            DangerState::Countdown { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Feed one scan result. The countdown is armed on the first dangerous
    /// scan and fires `delay_ticks` ticks later if every scan in between was
    /// still dangerous.
    pub fn update(&mut self, dangerous: bool) -> DangerTransition {
        match (self.state, dangerous) {
            (DangerState::Ended, _) => DangerTransition::None,
            (DangerState::Safe, false) => DangerTransition::None,
            (DangerState::Safe, true) => {
                self.state = DangerState::Countdown {
                    remaining: self.delay_ticks,
                };
                DangerTransition::CountdownStarted
            }
            (DangerState::Countdown { .. }, false) => {
                self.cancel();
                DangerTransition::CountdownCancelled
            }
            (DangerState::Countdown { remaining }, true) => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.state = DangerState::Ended;
                    DangerTransition::Fired
                } else {
                    self.state = DangerState::Countdown { remaining };
                    DangerTransition::None
                }
            }
        }
    }

    /// Disarm a running countdown. Safe to call at any time.
    pub fn cancel(&mut self) {
        if let DangerState::Countdown { .. } = self.state {
            self.state = DangerState::Safe;
        }
    }

    /// Back to Safe, including from Ended
    pub fn reset(&mut self) {
        self.state = DangerState::Safe;
    }
}
