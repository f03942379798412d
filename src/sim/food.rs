//! Food tiers and weighted spawn selection
//!
//! Tiers are ordered smallest to largest. Only a prefix carries spawn weight;
//! everything bigger has to be earned by merging.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Index of a tier in the taxonomy
pub type Ordinal = u8;

/// One rank in the food progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTier {
    pub name: String,
    /// Physical radius (pixels)
    pub radius: f32,
    /// Points per consumed body when two of this tier merge
    pub score: u32,
}

impl FoodTier {
    pub fn new(name: &str, radius: f32, score: u32) -> Self {
        Self {
            name: name.to_string(),
            radius,
            score,
        }
    }
}

/// Ordered tier table plus parallel spawn weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub tiers: Vec<FoodTier>,
    pub spawn_weights: Vec<u32>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

impl Taxonomy {
    /// The festive dinner table: cranberry up to Christmas pudding
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                FoodTier::new("cranberry", 25.0, 1),
                FoodTier::new("sprout", 30.0, 2),
                FoodTier::new("carrot", 35.0, 4),
                FoodTier::new("cabbage", 40.0, 8),
                FoodTier::new("potato", 45.0, 16),
                FoodTier::new("broccoli", 50.0, 32),
                FoodTier::new("yorkshire", 55.0, 64),
                FoodTier::new("sausage", 60.0, 128),
                FoodTier::new("stuffing", 68.0, 256),
                FoodTier::new("turkey", 75.0, 512),
                FoodTier::new("pudding", 85.0, 1024),
            ],
            spawn_weights: vec![30, 25, 20, 15, 10, 0, 0, 0, 0, 0, 0],
        }
    }

    /// Largest table an [`Ordinal`] can index
    pub const MAX_TIERS: usize = Ordinal::MAX as usize + 1;

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn tier(&self, ordinal: Ordinal) -> Option<&FoodTier> {
        self.tiers.get(ordinal as usize)
    }

    /// Radius of a tier, zero for an unknown ordinal
    pub fn radius(&self, ordinal: Ordinal) -> f32 {
        self.tier(ordinal).map(|t| t.radius).unwrap_or(0.0)
    }

    /// Highest ordinal; merging two of these leaves nothing behind
    pub fn terminal_ordinal(&self) -> Ordinal {
        self.tiers.len().saturating_sub(1) as Ordinal
    }

    pub fn is_terminal(&self, ordinal: Ordinal) -> bool {
        ordinal >= self.terminal_ordinal()
    }

    /// Tier produced by merging two of `ordinal`, if any
    pub fn successor(&self, ordinal: Ordinal) -> Option<Ordinal> {
        if self.is_terminal(ordinal) {
            None
        } else {
            Some(ordinal + 1)
        }
    }

    /// Points awarded for merging two bodies of `ordinal`
    pub fn merge_score(&self, ordinal: Ordinal) -> u64 {
        self.tier(ordinal).map(|t| t.score as u64 * 2).unwrap_or(0)
    }

    /// Check the table on its own: size, weights and radii.
    /// Fitting tiers into an arena is [`crate::GameConfig::validate`]'s job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::EmptyTaxonomy);
        }
        if self.len() > Self::MAX_TIERS {
            return Err(ConfigError::TooManyTiers {
                count: self.len(),
                max: Self::MAX_TIERS,
            });
        }
        if self.spawn_weights.len() != self.len() {
            return Err(ConfigError::WeightMismatch {
                tiers: self.len(),
                weights: self.spawn_weights.len(),
            });
        }
        if self.spawn_weights.iter().all(|&w| w == 0) {
            return Err(ConfigError::NothingSpawnable);
        }
        for (ordinal, tier) in self.tiers.iter().enumerate() {
            if tier.radius <= 0.0 {
                return Err(ConfigError::BadRadius {
                    ordinal,
                    name: tier.name.clone(),
                    radius: tier.radius,
                });
            }
        }
        Ok(())
    }

    /// Draw the next spawnable ordinal
    pub fn next_spawn_ordinal<R: Rng + ?Sized>(&self, rng: &mut R) -> Ordinal {
        next_spawn_ordinal(&self.spawn_weights, rng)
    }
}

/// Weighted draw using cumulative subtraction.
///
/// `r` is uniform in `[0, total)`; each weight is subtracted in turn and the
/// first tier that takes `r` to zero or below wins. Zero-weight tiers are
/// skipped so they can never win. If rounding leaves `r` positive after the
/// walk, the first spawnable tier is returned.
pub fn next_spawn_ordinal<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Ordinal {
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    let fallback = weights.iter().position(|&w| w > 0).unwrap_or(0) as Ordinal;
    if total == 0 {
        return fallback;
    }

    let mut remaining = rng.random::<f64>() * total as f64;
    for (i, &weight) in weights.iter().enumerate() {
        if weight == 0 {
            continue;
        }
        remaining -= weight as f64;
        if remaining <= 0.0 {
            return i as Ordinal;
        }
    }
    fallback
}
