//! Planet and area generation.
//!
//! Each campaign world gets a biome, basic civics, a set of explorable
//! areas sized to the campaign length, a main quest and a handful of
//! side quests.

use crate::scaling::DifficultyTier;
use crate::seed::CampaignConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical world names used before falling back to generated ones.
pub const CANONICAL_WORLDS: &[&str] = &[
    "Tatooine", "Coruscant", "Naboo", "Hoth", "Endor", "Dagobah", "Alderaan", "Kashyyyk",
    "Kamino", "Geonosis", "Mustafar", "Yavin 4", "Bespin", "Jakku", "Scarif", "Jedha", "Ryloth",
    "Mon Cala", "Mandalore", "Dathomir", "Korriban", "Tython",
];

const GOVERNMENTS: &[&str] = &[
    "Republic Democracy",
    "Imperial Autocracy",
    "Corporate Oligarchy",
    "Tribal Council",
    "Military Junta",
    "Theocracy",
    "Anarchist Collective",
    "Feudal System",
    "Trade Federation",
    "Rebel Alliance",
];

const POPULATIONS: &[&str] = &[
    "Uninhabited",
    "Sparse (Thousands)",
    "Small (Hundreds of Thousands)",
    "Medium (Millions)",
    "Large (Billions)",
    "Massive (Trillions)",
];

const NAME_PREFIXES: &[&str] = &[
    "Kor", "Nal", "Zar", "Vel", "Kesh", "Ord", "Dxun", "Mek", "Telos",
];
const NAME_SUFFIXES: &[&str] = &[
    "iban", "ador", "oth", "aan", "esh", "aris", "ion", "us", "or",
];

const SIDE_QUEST_TEMPLATES: &[&str] = &[
    "Help local merchants deal with smuggler problems",
    "Investigate strange creature sightings",
    "Recover stolen goods from bandits",
    "Mediate a dispute between rival factions",
    "Explore abandoned facilities for valuable technology",
    "Rescue missing persons from dangerous areas",
    "Uncover corruption in the local government",
    "Defend settlements from hostile forces",
];

// ============================================================================
// Biomes
// ============================================================================

/// Planetary biome, driving climate, area types and enemy affinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Desert,
    Forest,
    Ice,
    Urban,
    Ocean,
    Volcanic,
}

impl Biome {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Biome::Desert => "desert",
            Biome::Forest => "forest",
            Biome::Ice => "ice",
            Biome::Urban => "urban",
            Biome::Ocean => "ocean",
            Biome::Volcanic => "volcanic",
        }
    }

    pub fn climates(&self) -> &'static [&'static str] {
        match self {
            Biome::Desert => &["arid", "hot", "dry"],
            Biome::Forest => &["temperate", "humid", "mild"],
            Biome::Ice => &["frozen", "cold", "harsh"],
            Biome::Urban => &["controlled", "artificial", "varied"],
            Biome::Ocean => &["tropical", "humid", "stormy"],
            Biome::Volcanic => &["hot", "dangerous", "unstable"],
        }
    }

    pub fn features(&self) -> &'static [&'static str] {
        match self {
            Biome::Desert => &["sand dunes", "canyons", "oases", "ancient ruins"],
            Biome::Forest => &["dense forests", "rivers", "wildlife", "hidden temples"],
            Biome::Ice => &["glaciers", "ice caves", "frozen lakes", "blizzards"],
            Biome::Urban => &["skyscrapers", "undercity", "traffic", "technology"],
            Biome::Ocean => &["islands", "underwater cities", "coral reefs", "storms"],
            Biome::Volcanic => &["lava flows", "geysers", "mining operations", "crystals"],
        }
    }

    pub fn area_types(&self) -> &'static [&'static str] {
        match self {
            Biome::Desert => &["spaceport", "settlement", "caves", "ruins"],
            Biome::Forest => &["village", "temple", "wilderness", "canopy city"],
            Biome::Ice => &["research station", "ice caves", "frozen city", "bunker"],
            Biome::Urban => &["upper city", "lower city", "industrial", "government"],
            Biome::Ocean => &["floating city", "underwater base", "island", "platform"],
            Biome::Volcanic => &["mining facility", "lava tubes", "crystal caves", "observatory"],
        }
    }

    /// Biomes suitable for a difficulty tier: hospitable worlds first,
    /// hostile ones late.
    pub fn pool_for_tier(tier: DifficultyTier) -> &'static [Biome] {
        match tier {
            DifficultyTier::Early => &[Biome::Urban, Biome::Forest, Biome::Desert],
            DifficultyTier::Mid => &[Biome::Ocean, Biome::Forest, Biome::Desert, Biome::Urban],
            DifficultyTier::Late => &[Biome::Volcanic, Biome::Ice, Biome::Desert, Biome::Urban],
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One explorable area on a planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaLayout {
    pub name: String,
    pub area_type: String,
    pub description: String,
    /// Expected traversal time in hours.
    pub expected_hours: f64,
    pub features: Vec<String>,
}

/// Complete data for one campaign world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub name: String,
    pub biome: Biome,
    pub climate: String,
    pub population: String,
    pub government: String,
    /// Ordered list of areas; NPCs back-reference these by name.
    pub areas: Vec<AreaLayout>,
    pub main_quest: String,
    pub side_quests: Vec<String>,
    pub difficulty_tier: DifficultyTier,
    /// Position of this planet in the campaign, 0-based.
    pub index: usize,
    pub lore: String,
}

// ============================================================================
// Generation
// ============================================================================

/// Generate one planet for the campaign.
///
/// Names come from `roster` by index; once the roster runs out, a
/// syllable-built name is used instead.
pub fn generate<R: Rng>(
    config: &CampaignConfig,
    index: usize,
    tier: DifficultyTier,
    roster: &[&str],
    rng: &mut R,
) -> PlanetRecord {
    let name = match roster.get(index) {
        Some(world) => (*world).to_string(),
        None => generate_name(rng),
    };

    let pool = Biome::pool_for_tier(tier);
    let biome = pool[rng.gen_range(0..pool.len())];

    let climate = pick(biome.climates(), rng).to_string();
    let population = pick(POPULATIONS, rng).to_string();
    let government = pick(GOVERNMENTS, rng).to_string();

    // Three to six areas, sized by hours available per planet.
    let per_planet = config.length_hours as usize / config.planet_count.max(1);
    let area_count = per_planet.clamp(3, 6);
    let areas = generate_areas(biome, area_count, tier, rng);

    let main_quest = generate_main_quest(&name, tier, rng);
    let side_quests = generate_side_quests(areas.len(), rng);
    let lore = lore_description(&name, biome, &climate, &population, &government);

    PlanetRecord {
        name,
        biome,
        climate,
        population,
        government,
        areas,
        main_quest,
        side_quests,
        difficulty_tier: tier,
        index,
        lore,
    }
}

/// Build a syllable name like "Koriban" or "Velesh".
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", pick(NAME_PREFIXES, rng), pick(NAME_SUFFIXES, rng))
}

fn generate_areas<R: Rng>(
    biome: Biome,
    count: usize,
    tier: DifficultyTier,
    rng: &mut R,
) -> Vec<AreaLayout> {
    let mut areas = Vec::with_capacity(count);

    for _ in 0..count {
        let area_type = pick(biome.area_types(), rng).to_string();
        let name = area_name(&area_type, rng);

        let features: Vec<String> = biome
            .features()
            .choose_multiple(rng, 3)
            .map(|f| f.to_string())
            .collect();

        let description = format!(
            "A {} area featuring {}",
            area_type,
            features
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );

        let multiplier = match area_type.as_str() {
            "spaceport" => 0.8,
            "city" => 1.2,
            "wilderness" => 1.5,
            "dungeon" => 1.3,
            "temple" => 1.1,
            _ => 1.0,
        };

        areas.push(AreaLayout {
            name,
            area_type,
            description,
            expected_hours: tier.base_area_hours() * multiplier,
            features,
        });
    }

    areas
}

fn area_name<R: Rng>(area_type: &str, rng: &mut R) -> String {
    match area_type {
        "spaceport" => format!("{} Spaceport", pick(&["Central", "Main", "Orbital"], rng)),
        "city" | "settlement" => format!(
            "{} {}",
            pick(&["New", "Old", "Central"], rng),
            pick(&["City", "Settlement", "District"], rng)
        ),
        "temple" => format!("{} Temple", pick(&["Ancient", "Forgotten", "Sacred"], rng)),
        "ruins" => format!("{} Ruins", pick(&["Lost", "Ancient", "Buried"], rng)),
        other => format!(
            "{} {}",
            title_case(other),
            pick(&["Alpha", "Beta", "Gamma", "Prime"], rng)
        ),
    }
}

fn generate_main_quest<R: Rng>(planet: &str, tier: DifficultyTier, rng: &mut R) -> String {
    let templates: [String; 3] = match tier {
        DifficultyTier::Early => [
            format!("Investigate mysterious signals coming from {planet}"),
            format!("Establish contact with the local government on {planet}"),
            format!("Rescue stranded allies from {planet}'s hostile environment"),
        ],
        DifficultyTier::Mid => [
            format!("Uncover ancient secrets hidden beneath {planet}"),
            format!("Prevent a civil war from erupting on {planet}"),
            format!("Retrieve a powerful artifact from {planet}'s ruins"),
        ],
        DifficultyTier::Late => [
            format!("Confront the dark presence corrupting {planet}"),
            format!("Rally the forces of {planet} for the final battle"),
            format!("Unlock the ultimate power hidden within {planet}"),
        ],
    };
    templates[rng.gen_range(0..templates.len())].clone()
}

fn generate_side_quests<R: Rng>(area_count: usize, rng: &mut R) -> Vec<String> {
    // Roughly one side quest per two areas.
    let count = (area_count / 2 + 1).min(SIDE_QUEST_TEMPLATES.len());
    SIDE_QUEST_TEMPLATES
        .choose_multiple(rng, count)
        .map(|q| q.to_string())
        .collect()
}

fn lore_description(
    name: &str,
    biome: Biome,
    climate: &str,
    population: &str,
    government: &str,
) -> String {
    format!(
        "{name} is a {biome} world with a {climate} climate, home to a {} population \
governed by a {}. The planet's unique characteristics have shaped both its inhabitants \
and their culture over millennia.\n\n\
The world's {biome} environment has created distinct challenges and opportunities for \
those who call it home. Ancient ruins and mysterious phenomena suggest a rich history \
that predates current civilization, hinting at secrets waiting to be uncovered by those \
brave enough to explore its depths.",
        population.to_lowercase(),
        government.to_lowercase(),
    )
}

fn pick<R: Rng>(options: &[&'static str], rng: &mut R) -> &'static str {
    options[rng.gen_range(0..options.len())]
}

/// Title-case a possibly multi-word label ("research station" becomes
/// "Research Station").
pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::parse_story_seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_planet() {
        let config = parse_story_seed("Test 15-hour Jedi adventure");
        let mut rng = StdRng::seed_from_u64(1);

        let planet = generate(&config, 0, DifficultyTier::Early, CANONICAL_WORLDS, &mut rng);

        assert_eq!(planet.name, "Tatooine");
        assert_eq!(planet.index, 0);
        assert_eq!(planet.difficulty_tier, DifficultyTier::Early);
        assert!((3..=6).contains(&planet.areas.len()));
        assert!(!planet.side_quests.is_empty());
        assert!(planet.main_quest.contains("Tatooine"));
        assert!(planet.lore.contains("Tatooine"));
    }

    #[test]
    fn test_generated_name_past_roster() {
        let config = parse_story_seed("Test 60-hour saga");
        let mut rng = StdRng::seed_from_u64(2);

        let planet = generate(&config, 40, DifficultyTier::Late, CANONICAL_WORLDS, &mut rng);

        assert!(!planet.name.is_empty());
        assert!(!CANONICAL_WORLDS.contains(&planet.name.as_str()));
    }

    #[test]
    fn test_biome_pools_match_tier() {
        assert!(Biome::pool_for_tier(DifficultyTier::Early).contains(&Biome::Urban));
        assert!(!Biome::pool_for_tier(DifficultyTier::Early).contains(&Biome::Volcanic));
        assert!(Biome::pool_for_tier(DifficultyTier::Late).contains(&Biome::Volcanic));
    }

    #[test]
    fn test_area_features_come_from_biome() {
        let config = parse_story_seed("Test 12-hour run");
        let mut rng = StdRng::seed_from_u64(3);
        let planet = generate(&config, 1, DifficultyTier::Mid, CANONICAL_WORLDS, &mut rng);

        for area in &planet.areas {
            assert!(!area.features.is_empty());
            for feature in &area.features {
                assert!(planet.biome.features().contains(&feature.as_str()));
            }
            assert!(area.expected_hours > 0.0);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("research station"), "Research Station");
        assert_eq!(title_case("caves"), "Caves");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_planet_serialization_round_trip() {
        let config = parse_story_seed("Test 20-hour adventure");
        let mut rng = StdRng::seed_from_u64(4);
        let planet = generate(&config, 2, DifficultyTier::Mid, CANONICAL_WORLDS, &mut rng);

        let json = serde_json::to_string(&planet).unwrap();
        let back: PlanetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, planet);
    }
}
