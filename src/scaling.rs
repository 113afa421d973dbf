//! Shared scaling formulas.
//!
//! Difficulty tiers, rarity weights and the boss challenge-rating
//! curve live here so every generator scales content the same way.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Difficulty tiers
// ============================================================================

/// Coarse campaign-progress bucket driving stat scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Early,
    Mid,
    Late,
}

impl DifficultyTier {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            DifficultyTier::Early => "early",
            DifficultyTier::Mid => "mid",
            DifficultyTier::Late => "late",
        }
    }

    pub fn all() -> [DifficultyTier; 3] {
        [
            DifficultyTier::Early,
            DifficultyTier::Mid,
            DifficultyTier::Late,
        ]
    }

    /// Tier for a planet's position in the campaign: first third early,
    /// middle third mid, final third late. Integer division leaves the
    /// remainder in the latest tier reached.
    pub fn for_position(index: usize, total: usize) -> DifficultyTier {
        if index < total / 3 {
            DifficultyTier::Early
        } else if index < 2 * total / 3 {
            DifficultyTier::Mid
        } else {
            DifficultyTier::Late
        }
    }

    /// CR and hit-point multiplier applied when scaling enemies.
    /// Non-decreasing across tiers.
    pub fn stat_multiplier(&self) -> f64 {
        match self {
            DifficultyTier::Early => 0.8,
            DifficultyTier::Mid => 1.0,
            DifficultyTier::Late => 1.3,
        }
    }

    /// Item level range for loot generated at this tier.
    pub fn level_range(&self) -> (u32, u32) {
        match self {
            DifficultyTier::Early => (1, 10),
            DifficultyTier::Mid => (8, 20),
            DifficultyTier::Late => (15, 30),
        }
    }

    /// Target challenge-rating range for encounters at this tier.
    pub fn encounter_cr_range(&self) -> (f64, f64) {
        match self {
            DifficultyTier::Early => (0.25, 2.0),
            DifficultyTier::Mid => (1.0, 5.0),
            DifficultyTier::Late => (3.0, 10.0),
        }
    }

    /// Quest difficulty label handed to NPC quest generation.
    pub fn quest_difficulty(&self) -> &'static str {
        match self {
            DifficultyTier::Early => "easy",
            DifficultyTier::Mid => "medium",
            DifficultyTier::Late => "hard",
        }
    }

    /// Base traversal time per planet area, in hours.
    pub fn base_area_hours(&self) -> f64 {
        match self {
            DifficultyTier::Early => 1.5,
            DifficultyTier::Mid => 2.0,
            DifficultyTier::Late => 2.5,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Rarity
// ============================================================================

/// Discrete item-quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    /// Title-cased name for item labels.
    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn all() -> [Rarity; 5] {
        [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// Ordinal rank, 0 (common) through 4 (legendary).
    pub fn rank(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Drop weight at level 1, before level adjustment.
    pub fn base_weight(&self) -> f64 {
        match self {
            Rarity::Common => 0.50,
            Rarity::Uncommon => 0.30,
            Rarity::Rare => 0.15,
            Rarity::Epic => 0.04,
            Rarity::Legendary => 0.01,
        }
    }

    /// Stat and value multiplier for items of this rarity.
    pub fn stat_multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.5,
            Rarity::Rare => 2.5,
            Rarity::Epic => 4.0,
            Rarity::Legendary => 7.0,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rarity drop weights adjusted for an item level.
///
/// Higher levels shift weight from common toward rare, epic and
/// legendary. The table is normalized at construction so the weights
/// always sum to 1.0.
#[derive(Debug, Clone)]
pub struct RarityTable {
    weights: [(Rarity, f64); 5],
}

impl RarityTable {
    /// Build the weight table for an item level.
    pub fn for_level(level: u32) -> Self {
        let factor = (level as f64 / 30.0).min(1.0);

        let raw = [
            (Rarity::Common, (0.50 - 0.30 * factor).max(0.10)),
            (Rarity::Uncommon, 0.30),
            (Rarity::Rare, (0.15 + 0.20 * factor).min(0.35)),
            (Rarity::Epic, (0.04 + 0.11 * factor).min(0.15)),
            (Rarity::Legendary, (0.01 + 0.09 * factor).min(0.10)),
        ];

        let total: f64 = raw.iter().map(|(_, w)| w).sum();
        Self {
            weights: raw.map(|(rarity, w)| (rarity, w / total)),
        }
    }

    /// Normalized weight for one rarity.
    pub fn weight(&self, rarity: Rarity) -> f64 {
        self.weights
            .iter()
            .find(|(r, _)| *r == rarity)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Cumulative-weight sample.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Rarity {
        let roll: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (rarity, weight) in self.weights {
            cumulative += weight;
            if roll <= cumulative {
                return rarity;
            }
        }
        Rarity::Common
    }
}

// ============================================================================
// Boss scaling
// ============================================================================

/// Boss challenge rating grows with campaign length: 8.0 at 10 hours or
/// less, +0.2 per hour beyond that, capped at 15.0.
pub fn boss_challenge_rating(length_hours: u32) -> f64 {
    (8.0 + (length_hours as f64 - 10.0) * 0.2).clamp(8.0, 15.0)
}
