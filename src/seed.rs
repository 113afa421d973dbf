//! Story seed interpretation.
//!
//! Turns a free-text campaign description like "I want a 20-hour story
//! about a Jedi exile hunting a Sith relic" into a structured
//! [`CampaignConfig`]. Parsing is a total function: anything the text
//! does not specify falls back to a documented default.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default campaign length when the seed does not name one.
const DEFAULT_LENGTH_HOURS: u32 = 20;

/// Keywords suggesting a light-side campaign.
const LIGHT_KEYWORDS: &[&str] = &[
    "jedi", "republic", "light", "hero", "save", "protect", "peace",
];

/// Keywords suggesting a dark-side campaign.
const DARK_KEYWORDS: &[&str] = &[
    "sith", "empire", "dark", "revenge", "power", "dominate", "destroy",
];

/// Secondary phrases checked only when no primary keyword matched.
const LIGHT_PHRASES: &[&str] = &["vs empire", "rebel", "rescue", "help"];

lazy_static! {
    /// Hour-count patterns, tried in order ("20 hour", "15-hr", "10h").
    static ref HOUR_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d+)[-\s]*hours?").expect("valid hour pattern"),
        Regex::new(r"(\d+)[-\s]*hr").expect("valid hour pattern"),
        Regex::new(r"(\d+)h\b").expect("valid hour pattern"),
    ];
}

// ============================================================================
// Era
// ============================================================================

/// The galactic era a campaign is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Era {
    #[default]
    #[serde(rename = "old republic")]
    OldRepublic,
    #[serde(rename = "clone wars")]
    CloneWars,
    #[serde(rename = "galactic civil war")]
    GalacticCivilWar,
    #[serde(rename = "new republic")]
    NewRepublic,
}

impl Era {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Era::OldRepublic => "old republic",
            Era::CloneWars => "clone wars",
            Era::GalacticCivilWar => "galactic civil war",
            Era::NewRepublic => "new republic",
        }
    }

    pub fn all() -> [Era; 4] {
        [
            Era::OldRepublic,
            Era::CloneWars,
            Era::GalacticCivilWar,
            Era::NewRepublic,
        ]
    }

    /// Vocabulary that places a seed in this era.
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Era::OldRepublic => &["old republic", "kotor", "revan", "malak"],
            Era::CloneWars => &["clone wars", "anakin", "obi-wan", "separatist"],
            Era::GalacticCivilWar => &["empire", "rebel", "luke", "vader", "death star"],
            Era::NewRepublic => &["new republic", "first order", "resistance", "kylo"],
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Alignment
// ============================================================================

/// The light/dark/neutral moral axis, shared by configs, NPCs, bosses
/// and player profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Light,
    Dark,
    #[default]
    Neutral,
}

impl Alignment {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Light => "light",
            Alignment::Dark => "dark",
            Alignment::Neutral => "neutral",
        }
    }

    pub fn all() -> [Alignment; 3] {
        [Alignment::Light, Alignment::Dark, Alignment::Neutral]
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// CampaignConfig
// ============================================================================

/// Structured configuration every generator consumes.
///
/// Immutable once created; build one with [`parse_story_seed`] or
/// [`CampaignConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Target play length in hours (at least 1).
    pub length_hours: u32,
    /// Number of worlds to generate, always within 3..=15.
    pub planet_count: usize,
    /// The lowercased seed text the config was parsed from.
    pub seed_text: String,
    /// Galactic era the campaign is set in.
    pub era: Era,
    /// Moral slant of the campaign.
    pub alignment_focus: Alignment,
}

impl CampaignConfig {
    /// Create a config, clamping the derived planet count into range.
    pub fn new(
        length_hours: u32,
        seed_text: impl Into<String>,
        era: Era,
        alignment_focus: Alignment,
    ) -> Self {
        let length_hours = length_hours.max(1);
        Self {
            length_hours,
            planet_count: planet_count_for(length_hours),
            seed_text: seed_text.into(),
            era,
            alignment_focus,
        }
    }
}

/// Roughly one planet per three hours of play, clamped to 3..=15.
pub fn planet_count_for(length_hours: u32) -> usize {
    (length_hours as usize / 3).clamp(3, 15)
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a natural-language story seed into a [`CampaignConfig`].
///
/// Never fails: every extractor has a default (20 hours, the Old
/// Republic era, neutral alignment).
pub fn parse_story_seed(text: &str) -> CampaignConfig {
    let seed = text.to_lowercase().trim().to_string();

    let length_hours = extract_length(&seed);
    let era = detect_era(&seed);
    let alignment_focus = detect_alignment(&seed);

    CampaignConfig::new(length_hours, seed, era, alignment_focus)
}

/// Extract the requested play length in hours.
fn extract_length(seed: &str) -> u32 {
    for pattern in HOUR_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(seed) {
            if let Ok(hours) = caps[1].parse::<u32>() {
                if hours > 0 {
                    return hours;
                }
            }
        }
    }
    DEFAULT_LENGTH_HOURS
}

/// First era whose vocabulary appears in the seed wins.
fn detect_era(seed: &str) -> Era {
    for era in Era::all() {
        if era.keywords().iter().any(|kw| seed.contains(kw)) {
            return era;
        }
    }
    Era::OldRepublic
}

/// Decide the moral slant of the seed.
///
/// Each keyword counts once no matter how often it appears, so long
/// seeds are not biased toward whichever side they repeat. Ties where
/// both sides scored break toward light; a double zero falls back to a
/// secondary phrase check before settling on neutral.
fn detect_alignment(seed: &str) -> Alignment {
    let light = LIGHT_KEYWORDS.iter().filter(|kw| seed.contains(*kw)).count();
    let dark = DARK_KEYWORDS.iter().filter(|kw| seed.contains(*kw)).count();

    if dark > light {
        Alignment::Dark
    } else if light > dark {
        Alignment::Light
    } else if light > 0 && dark > 0 {
        Alignment::Light
    } else if LIGHT_PHRASES.iter().any(|p| seed.contains(p)) {
        Alignment::Light
    } else {
        Alignment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_seed() {
        let config =
            parse_story_seed("I want a 20-hour story about a Jedi exile hunting a Sith relic");

        assert_eq!(config.length_hours, 20);
        assert_eq!(config.planet_count, 6);
        assert_eq!(config.era, Era::OldRepublic);
        assert_eq!(config.alignment_focus, Alignment::Light);
    }

    #[test]
    fn test_extract_length_formats() {
        let cases = [
            ("30 hour adventure", 30),
            ("15-hour campaign", 15),
            ("25 hours of gameplay", 25),
            ("10h story", 10),
            ("no time specified", 20),
        ];
        for (seed, expected) in cases {
            assert_eq!(extract_length(seed), expected, "seed: {seed}");
        }
    }

    #[test]
    fn test_extract_length_ignores_huge_numbers() {
        // An unparseable digit run falls back to the default.
        assert_eq!(extract_length("99999999999999999999 hours"), 20);
    }

    #[test]
    fn test_detect_era() {
        let cases = [
            ("kotor style adventure", Era::OldRepublic),
            ("clone wars era story", Era::CloneWars),
            ("empire vs rebels", Era::GalacticCivilWar),
            ("first order threat", Era::NewRepublic),
            ("generic star wars", Era::OldRepublic),
        ];
        for (seed, expected) in cases {
            assert_eq!(detect_era(seed), expected, "seed: {seed}");
        }
    }

    #[test]
    fn test_detect_alignment() {
        let cases = [
            ("jedi hero saves the galaxy", Alignment::Light),
            ("sith lord seeks power", Alignment::Dark),
            ("smuggler makes deals", Alignment::Neutral),
            ("dark jedi vs sith", Alignment::Dark),
            ("republic vs empire", Alignment::Light),
        ];
        for (seed, expected) in cases {
            assert_eq!(detect_alignment(seed), expected, "seed: {seed}");
        }
    }

    #[test]
    fn test_alignment_tie_breaks_light() {
        // One light keyword, one dark keyword.
        assert_eq!(detect_alignment("a jedi duels a sith"), Alignment::Light);
    }

    #[test]
    fn test_alignment_keyword_presence_not_frequency() {
        // "sith" repeated three times still counts once.
        assert_eq!(
            detect_alignment("sith sith sith against jedi and republic heroes"),
            Alignment::Light
        );
    }

    #[test]
    fn test_alignment_secondary_phrases() {
        assert_eq!(detect_alignment("rescue the prisoners"), Alignment::Light);
        assert_eq!(detect_alignment("haul spice for profit"), Alignment::Neutral);
    }

    #[test]
    fn test_planet_count_clamps() {
        assert_eq!(planet_count_for(3), 3);
        assert_eq!(planet_count_for(9), 3);
        assert_eq!(planet_count_for(20), 6);
        assert_eq!(planet_count_for(45), 15);
        assert_eq!(planet_count_for(120), 15);
    }

    #[test]
    fn test_config_serialization() {
        let config = CampaignConfig::new(25, "test seed", Era::OldRepublic, Alignment::Neutral);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["length_hours"], 25);
        assert_eq!(json["planet_count"], 8);
        assert_eq!(json["era"], "old republic");
        assert_eq!(json["alignment_focus"], "neutral");

        let back: CampaignConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
