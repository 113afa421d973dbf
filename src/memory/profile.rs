//! Player profile derivation.
//!
//! The profile is an incremental aggregate over the entry log: moral
//! choices feed three alignment counters, every entry feeds a
//! decision-type histogram, and involved characters accumulate
//! relationship scores.

use super::entry::{EntryType, MemoryEntry};
use crate::seed::Alignment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Moral flexibility before enough decisions exist to compute it.
const DEFAULT_FLEXIBILITY: f64 = 0.5;

/// Minimum recorded decisions before flexibility is derived.
const FLEXIBILITY_SAMPLE_THRESHOLD: u32 = 5;

/// Alignment-counter band: weights above it count light, below its
/// negation dark, between them neutral.
const MORAL_WEIGHT_BAND: f64 = 0.3;

/// Relationship delta applied per involved character per entry, scaled
/// by emotional weight.
const RELATIONSHIP_STEP: f64 = 0.1;

/// A player's accumulated moral and social tendencies. One live record
/// per player, updated on every entry insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub light_side_points: u32,
    pub dark_side_points: u32,
    pub neutral_points: u32,
    /// How often each entry type has been recorded.
    pub decision_patterns: BTreeMap<String, u32>,
    pub preferred_solutions: Vec<String>,
    /// Per-character relationship scores, each in -1.0..=1.0.
    pub relationship_tendencies: BTreeMap<String, f64>,
    /// How evenly choices spread across alignments, 0.0..=1.0. Stays
    /// at the default until enough decisions are recorded.
    pub moral_flexibility: f64,
}

impl PlayerProfile {
    /// Fresh default profile for a player.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            light_side_points: 0,
            dark_side_points: 0,
            neutral_points: 0,
            decision_patterns: BTreeMap::new(),
            preferred_solutions: Vec::new(),
            relationship_tendencies: BTreeMap::new(),
            moral_flexibility: DEFAULT_FLEXIBILITY,
        }
    }

    /// Derive the player's current alignment: light or dark once that
    /// side holds more than 60% of the points, neutral otherwise.
    pub fn alignment(&self) -> Alignment {
        let total = self.light_side_points + self.dark_side_points + self.neutral_points;
        if total == 0 {
            return Alignment::Neutral;
        }

        let light_ratio = self.light_side_points as f64 / total as f64;
        let dark_ratio = self.dark_side_points as f64 / total as f64;

        if light_ratio > 0.6 {
            Alignment::Light
        } else if dark_ratio > 0.6 {
            Alignment::Dark
        } else {
            Alignment::Neutral
        }
    }

    /// Total decisions recorded across every entry type.
    pub fn total_decisions(&self) -> u32 {
        self.decision_patterns.values().sum()
    }

    /// Relationship score for one character, zero when unknown.
    pub fn relationship_with(&self, character: &str) -> f64 {
        self.relationship_tendencies
            .get(character)
            .copied()
            .unwrap_or(0.0)
    }

    /// Fold one entry into the profile. Run synchronously after every
    /// insertion; not safe for concurrent writers on the same player.
    pub fn record(&mut self, entry: &MemoryEntry) {
        if entry.entry_type == EntryType::MoralChoice {
            if entry.emotional_weight > MORAL_WEIGHT_BAND {
                self.light_side_points += 1;
            } else if entry.emotional_weight < -MORAL_WEIGHT_BAND {
                self.dark_side_points += 1;
            } else {
                self.neutral_points += 1;
            }
        }

        *self
            .decision_patterns
            .entry(entry.entry_type.name().to_string())
            .or_insert(0) += 1;

        for character in &entry.characters_involved {
            let score = self
                .relationship_tendencies
                .entry(character.clone())
                .or_insert(0.0);
            *score = (*score + entry.emotional_weight * RELATIONSHIP_STEP).clamp(-1.0, 1.0);
        }

        if self.total_decisions() > FLEXIBILITY_SAMPLE_THRESHOLD {
            self.moral_flexibility = 1.0 - self.alignment_consistency();
        }
    }

    /// How dominant the strongest alignment counter is. A single
    /// dominant counter means high consistency and low flexibility.
    fn alignment_consistency(&self) -> f64 {
        let total = self.light_side_points + self.dark_side_points + self.neutral_points;
        if total == 0 {
            return DEFAULT_FLEXIBILITY;
        }

        let total = total as f64;
        let light = self.light_side_points as f64 / total;
        let dark = self.dark_side_points as f64 / total;
        let neutral = self.neutral_points as f64 / total;

        light.max(dark).max(neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::entry::EntryId;
    use crate::memory::store::CampaignId;
    use chrono::Utc;

    fn entry(entry_type: EntryType, weight: f64, characters: &[&str]) -> MemoryEntry {
        MemoryEntry {
            id: EntryId::new(),
            timestamp: Utc::now(),
            entry_type,
            context: "test".to_string(),
            content: "test event".to_string(),
            emotional_weight: weight,
            characters_involved: characters.iter().map(|c| c.to_string()).collect(),
            consequences: Vec::new(),
            tags: Vec::new(),
            campaign_id: CampaignId::new(),
        }
    }

    #[test]
    fn test_default_profile() {
        let profile = PlayerProfile::new("player");
        assert_eq!(profile.alignment(), Alignment::Neutral);
        assert_eq!(profile.moral_flexibility, 0.5);
        assert_eq!(profile.total_decisions(), 0);
    }

    #[test]
    fn test_moral_choice_counters() {
        let mut profile = PlayerProfile::new("player");

        profile.record(&entry(EntryType::MoralChoice, 0.8, &[]));
        profile.record(&entry(EntryType::MoralChoice, -0.8, &[]));
        profile.record(&entry(EntryType::MoralChoice, 0.1, &[]));

        assert_eq!(profile.light_side_points, 1);
        assert_eq!(profile.dark_side_points, 1);
        assert_eq!(profile.neutral_points, 1);
    }

    #[test]
    fn test_non_moral_entries_only_feed_histogram() {
        let mut profile = PlayerProfile::new("player");

        profile.record(&entry(EntryType::Dialogue, 0.9, &[]));
        profile.record(&entry(EntryType::QuestCompletion, -0.9, &[]));

        assert_eq!(profile.light_side_points, 0);
        assert_eq!(profile.dark_side_points, 0);
        assert_eq!(profile.decision_patterns["dialogue"], 1);
        assert_eq!(profile.decision_patterns["quest_completion"], 1);
    }

    #[test]
    fn test_six_consistent_choices_zero_flexibility() {
        let mut profile = PlayerProfile::new("player");

        for _ in 0..6 {
            profile.record(&entry(EntryType::MoralChoice, 0.8, &["X"]));
        }

        assert_eq!(profile.light_side_points, 6);
        assert_eq!(profile.dark_side_points, 0);
        // Six identical choices: fully consistent, zero flexibility.
        assert!(profile.moral_flexibility.abs() < 1e-9);
    }

    #[test]
    fn test_flexibility_waits_for_samples() {
        let mut profile = PlayerProfile::new("player");

        for _ in 0..5 {
            profile.record(&entry(EntryType::MoralChoice, 0.8, &[]));
        }
        // Only five decisions recorded, so the default holds.
        assert_eq!(profile.moral_flexibility, 0.5);

        profile.record(&entry(EntryType::MoralChoice, 0.8, &[]));
        assert!(profile.moral_flexibility.abs() < 1e-9);
    }

    #[test]
    fn test_mixed_choices_raise_flexibility() {
        let mut profile = PlayerProfile::new("player");

        for _ in 0..3 {
            profile.record(&entry(EntryType::MoralChoice, 0.8, &[]));
        }
        for _ in 0..3 {
            profile.record(&entry(EntryType::MoralChoice, -0.8, &[]));
        }

        // Even split between light and dark: consistency 0.5.
        assert!((profile.moral_flexibility - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_relationship_updates_and_clamps() {
        let mut profile = PlayerProfile::new("player");

        profile.record(&entry(EntryType::NpcInteraction, 0.5, &["Carth"]));
        assert!((profile.relationship_with("Carth") - 0.05).abs() < 1e-9);

        // Push far past the cap in both directions.
        for _ in 0..30 {
            profile.record(&entry(EntryType::NpcInteraction, 1.0, &["Carth"]));
        }
        assert_eq!(profile.relationship_with("Carth"), 1.0);

        for _ in 0..60 {
            profile.record(&entry(EntryType::NpcInteraction, -1.0, &["Carth"]));
        }
        assert_eq!(profile.relationship_with("Carth"), -1.0);

        for score in profile.relationship_tendencies.values() {
            assert!((-1.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_alignment_thresholds() {
        let mut profile = PlayerProfile::new("player");
        profile.light_side_points = 7;
        profile.dark_side_points = 2;
        profile.neutral_points = 1;
        assert_eq!(profile.alignment(), Alignment::Light);

        profile.light_side_points = 5;
        profile.dark_side_points = 5;
        assert_eq!(profile.alignment(), Alignment::Neutral);
    }

    #[test]
    fn test_profile_serialization_round_trip() {
        let mut profile = PlayerProfile::new("player");
        profile.record(&entry(EntryType::MoralChoice, 0.8, &["Bastila"]));

        let json = serde_json::to_string(&profile).unwrap();
        let back: PlayerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
