//! Game configuration
//!
//! Arena geometry, physics tuning, timings and the food table. Everything has
//! a sensible default; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::food::Taxonomy;
use crate::sim::physics::Material;

/// Reasons a configuration is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("food table is empty")]
    EmptyTaxonomy,
    #[error("food table has more than {max} tiers ({count})")]
    TooManyTiers { count: usize, max: usize },
    #[error("spawn weights cover {weights} tiers but the food table has {tiers}")]
    WeightMismatch { tiers: usize, weights: usize },
    #[error("no tier has a non-zero spawn weight")]
    NothingSpawnable,
    #[error("tier {ordinal} ({name}) has non-positive radius {radius}")]
    BadRadius { ordinal: usize, name: String, radius: f32 },
    #[error("tier {ordinal} ({name}) is wider than the container ({diameter} > {inner_width})")]
    TierTooWide {
        ordinal: usize,
        name: String,
        diameter: f32,
        inner_width: f32,
    },
    #[error("arena is degenerate: {0}")]
    BadArena(&'static str),
}

/// Container geometry in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Gap between the canvas edge and each side wall
    pub padding: f32,
    /// Top edge of the container
    pub top: f32,
    /// Gap between the floor and the canvas bottom
    pub bottom_margin: f32,
    pub wall_thickness: f32,
    /// Death line distance below `top`
    pub death_line_offset: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            padding: CONTAINER_PADDING,
            top: CONTAINER_TOP,
            bottom_margin: CONTAINER_BOTTOM_MARGIN,
            wall_thickness: WALL_THICKNESS,
            death_line_offset: DEATH_LINE_OFFSET,
        }
    }
}

impl Arena {
    /// Inner face of the left wall
    #[inline]
    pub fn left(&self) -> f32 {
        self.padding
    }

    /// Inner face of the right wall
    #[inline]
    pub fn right(&self) -> f32 {
        self.width - self.padding
    }

    /// Top face of the floor
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.height - self.bottom_margin
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn inner_width(&self) -> f32 {
        self.right() - self.left()
    }

    #[inline]
    pub fn death_line_y(&self) -> f32 {
        self.top + self.death_line_offset
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.inner_width() <= 0.0 {
            return Err(ConfigError::BadArena("walls overlap"));
        }
        if self.bottom() <= self.top {
            return Err(ConfigError::BadArena("floor is above the container top"));
        }
        if self.wall_thickness <= 0.0 {
            return Err(ConfigError::BadArena("wall thickness must be positive"));
        }
        Ok(())
    }
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: Arena,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Material for every food body
    pub food_material: Material,
    pub wall_friction: f32,
    pub floor_friction: f32,
    pub drop_cooldown_ms: u32,
    pub game_over_delay_ms: u32,
    /// Speed below which a body counts as settled (pixels/s, per axis)
    pub rest_speed: f32,
    pub taxonomy: Taxonomy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            gravity: GRAVITY,
            food_material: Material::FOOD,
            wall_friction: 0.5,
            floor_friction: 0.8,
            drop_cooldown_ms: DROP_COOLDOWN_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            rest_speed: REST_SPEED,
            taxonomy: Taxonomy::standard(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        self.taxonomy.validate()?;

        let inner_width = self.arena.inner_width();
        for (ordinal, tier) in self.taxonomy.tiers.iter().enumerate() {
            if tier.radius * 2.0 > inner_width {
                return Err(ConfigError::TierTooWide {
                    ordinal,
                    name: tier.name.clone(),
                    diameter: tier.radius * 2.0,
                    inner_width,
                });
            }
        }
        Ok(())
    }

    /// Drop cooldown in simulation ticks
    pub fn drop_cooldown_ticks(&self) -> u32 {
        crate::ms_to_ticks(self.drop_cooldown_ms)
    }

    /// Game-over countdown in simulation ticks
    pub fn game_over_delay_ticks(&self) -> u32 {
        crate::ms_to_ticks(self.game_over_delay_ms)
    }
}
