//! NPC and quest generation.
//!
//! Populates each planet area with named characters: vendors, quest
//! givers, guards, civilians and the occasional hostile operative.

use crate::planet::{AreaLayout, PlanetRecord};
use crate::scaling::DifficultyTier;
use crate::seed::{Alignment, CampaignConfig, Era};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const SPECIES: &[&str] = &[
    "Human", "Twi'lek", "Rodian", "Wookiee", "Zabrak", "Togruta", "Nautolan", "Miraluka",
    "Cathar", "Mandalorian", "Chiss", "Bothan", "Mon Calamari", "Sullustan", "Duros", "Ithorian",
];

const FACTIONS: &[&str] = &[
    "Republic",
    "Sith Empire",
    "Jedi Order",
    "Mandalorians",
    "Exchange",
    "Czerka Corporation",
    "Local Government",
    "Rebels",
    "Pirates",
    "Merchants Guild",
    "Independent",
    "Criminals",
];

const PERSONALITY_TRAITS: &[&str] = &[
    "Brave", "Cowardly", "Greedy", "Generous", "Suspicious", "Trusting", "Aggressive",
    "Peaceful", "Ambitious", "Content", "Wise", "Foolish", "Loyal", "Treacherous", "Honest",
    "Deceptive", "Proud", "Humble",
];

const DIALOGUE_STYLES: &[&str] = &[
    "Formal",
    "Casual",
    "Aggressive",
    "Friendly",
    "Mysterious",
    "Sarcastic",
    "Nervous",
    "Confident",
    "Wise",
    "Childlike",
];

const NAME_PREFIXES: &[&str] = &[
    "Kor", "Vel", "Zar", "Mal", "Dar", "Jek", "Nex", "Kira", "Mira", "Bastila", "Jolee",
    "Canderous", "Mission", "Carth",
];

const NAME_SUFFIXES: &[&str] = &[
    "an", "ek", "us", "ia", "or", "ar", "el", "on", "ak", "shan",
];

const DROID_SERIES: &[&str] = &["HK", "T3", "R2", "C3", "BB"];

// ============================================================================
// Quests
// ============================================================================

/// What kind of task a quest asks of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Fetch,
    Kill,
    Escort,
    Investigate,
    Diplomacy,
}

impl QuestKind {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            QuestKind::Fetch => "fetch",
            QuestKind::Kill => "kill",
            QuestKind::Escort => "escort",
            QuestKind::Investigate => "investigate",
            QuestKind::Diplomacy => "diplomacy",
        }
    }

    pub fn all() -> [QuestKind; 5] {
        [
            QuestKind::Fetch,
            QuestKind::Kill,
            QuestKind::Escort,
            QuestKind::Investigate,
            QuestKind::Diplomacy,
        ]
    }

    fn titles(&self) -> &'static [&'static str] {
        match self {
            QuestKind::Fetch => &[
                "Retrieve stolen supplies from bandits",
                "Collect rare materials from dangerous areas",
                "Recover lost family heirloom",
            ],
            QuestKind::Kill => &[
                "Eliminate dangerous creatures threatening the area",
                "Stop criminal leader causing trouble",
                "Defeat corrupted droids",
            ],
            QuestKind::Escort => &[
                "Safely escort merchant caravan",
                "Protect VIP during dangerous journey",
                "Guide refugees to safety",
            ],
            QuestKind::Investigate => &[
                "Investigate mysterious disappearances",
                "Uncover corruption in local government",
                "Discover source of strange signals",
            ],
            QuestKind::Diplomacy => &[
                "Negotiate peace between rival factions",
                "Convince leader to change policy",
                "Mediate trade dispute",
            ],
        }
    }
}

impl fmt::Display for QuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What completing a quest pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Credits,
    Item,
    Information,
    Reputation,
}

impl RewardKind {
    pub fn all() -> [RewardKind; 4] {
        [
            RewardKind::Credits,
            RewardKind::Item,
            RewardKind::Information,
            RewardKind::Reputation,
        ]
    }
}

/// A quest an NPC can hand out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub title: String,
    pub description: String,
    pub quest_type: QuestKind,
    pub reward_type: RewardKind,
    pub difficulty: String,
    pub estimated_minutes: i32,
}

// ============================================================================
// NPCs
// ============================================================================

/// The function an NPC serves in its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcRole {
    Vendor,
    QuestGiver,
    Follower,
    Guard,
    Civilian,
    Enemy,
}

impl NpcRole {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            NpcRole::Vendor => "vendor",
            NpcRole::QuestGiver => "questgiver",
            NpcRole::Follower => "follower",
            NpcRole::Guard => "guard",
            NpcRole::Civilian => "civilian",
            NpcRole::Enemy => "enemy",
        }
    }

    /// Plausible roles for an area type.
    fn pool_for_area(area_type: &str) -> &'static [NpcRole] {
        match area_type {
            "spaceport" => &[
                NpcRole::Vendor,
                NpcRole::Guard,
                NpcRole::Civilian,
                NpcRole::QuestGiver,
            ],
            "city" | "upper city" | "lower city" | "floating city" | "frozen city"
            | "canopy city" => &[
                NpcRole::Vendor,
                NpcRole::Civilian,
                NpcRole::QuestGiver,
                NpcRole::Guard,
            ],
            "settlement" | "village" => &[NpcRole::Civilian, NpcRole::QuestGiver, NpcRole::Vendor],
            "temple" => &[NpcRole::Guard, NpcRole::QuestGiver, NpcRole::Civilian],
            "ruins" => &[NpcRole::Enemy, NpcRole::QuestGiver],
            "wilderness" => &[NpcRole::Enemy, NpcRole::Civilian],
            "caves" | "ice caves" | "lava tubes" | "crystal caves" => {
                &[NpcRole::Enemy, NpcRole::QuestGiver]
            }
            _ => &[NpcRole::Civilian, NpcRole::Vendor, NpcRole::QuestGiver],
        }
    }
}

impl fmt::Display for NpcRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named non-player character placed in a planet area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NPCRecord {
    pub name: String,
    pub species: String,
    pub faction: String,
    pub alignment: Alignment,
    pub likes_player: bool,
    pub role: NpcRole,
    pub backstory: String,
    pub personality_traits: Vec<String>,
    /// Name of the area this NPC lives in (a back-reference, not an
    /// ownership link).
    pub location: String,
    pub quest: Option<QuestRecord>,
    pub dialogue_style: String,
    /// Initial reputation standing toward the player, -100..=100.
    pub reputation_standing: i32,
}

// ============================================================================
// Generation
// ============================================================================

/// Generate NPCs for every area of a planet, two to four per area.
///
/// Guarantees at least one quest giver per planet by converting a
/// random NPC when none rolled the role naturally.
pub fn generate_for_planet<R: Rng>(
    planet: &PlanetRecord,
    config: &CampaignConfig,
    rng: &mut R,
) -> Vec<NPCRecord> {
    let mut npcs = Vec::new();

    for area in &planet.areas {
        let count = rng.gen_range(2..=4);
        for _ in 0..count {
            npcs.push(generate_single(area, planet, config, rng));
        }
    }

    let has_quest_giver = npcs.iter().any(|npc| npc.role == NpcRole::QuestGiver);
    if !has_quest_giver && !npcs.is_empty() {
        let chosen = rng.gen_range(0..npcs.len());
        let location = npcs[chosen].location.clone();
        let area = planet
            .areas
            .iter()
            .find(|a| a.name == location)
            .unwrap_or(&planet.areas[0]);
        npcs[chosen].role = NpcRole::QuestGiver;
        npcs[chosen].quest = Some(generate_quest(area, planet.difficulty_tier, rng));
    }

    npcs
}

fn generate_single<R: Rng>(
    area: &AreaLayout,
    planet: &PlanetRecord,
    config: &CampaignConfig,
    rng: &mut R,
) -> NPCRecord {
    let name = generate_name(rng);
    let species = SPECIES[rng.gen_range(0..SPECIES.len())].to_string();
    let faction = select_faction(config, rng);
    let alignment = select_alignment(config, &faction, rng);

    let pool = NpcRole::pool_for_area(&area.area_type);
    let role = pool[rng.gen_range(0..pool.len())];

    let personality_traits: Vec<String> = PERSONALITY_TRAITS
        .choose_multiple(rng, 2)
        .map(|t| t.to_string())
        .collect();
    let dialogue_style = DIALOGUE_STYLES[rng.gen_range(0..DIALOGUE_STYLES.len())].to_string();

    let likes_player = initial_relationship(alignment, config.alignment_focus, rng);
    let reputation_standing =
        initial_reputation(likes_player, alignment, config.alignment_focus, rng);

    let backstory = backstory(&name, &species, &faction, role, &planet.name);

    let quest = if role == NpcRole::QuestGiver
        || (matches!(role, NpcRole::Vendor | NpcRole::Civilian) && rng.gen_bool(0.3))
    {
        Some(generate_quest(area, planet.difficulty_tier, rng))
    } else {
        None
    };

    NPCRecord {
        name,
        species,
        faction,
        alignment,
        likes_player,
        role,
        backstory,
        personality_traits,
        location: area.name.clone(),
        quest,
        dialogue_style,
        reputation_standing,
    }
}

/// Generate a name; roughly a third of NPCs are droids with serial
/// designations.
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    if rng.gen_bool(0.3) {
        format!(
            "{}-{}",
            DROID_SERIES[rng.gen_range(0..DROID_SERIES.len())],
            rng.gen_range(10..100)
        )
    } else {
        format!(
            "{}{}",
            NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())],
            NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())]
        )
    }
}

fn select_faction<R: Rng>(config: &CampaignConfig, rng: &mut R) -> String {
    let weighted: &[&str] = match config.era {
        Era::OldRepublic => &[
            "Republic",
            "Sith Empire",
            "Jedi Order",
            "Exchange",
            "Independent",
        ],
        Era::GalacticCivilWar => &["Rebel Alliance", "Galactic Empire", "Independent", "Criminals"],
        _ => FACTIONS,
    };
    weighted[rng.gen_range(0..weighted.len())].to_string()
}

fn faction_alignment(faction: &str) -> Option<Alignment> {
    match faction {
        "Jedi Order" | "Republic" | "Rebels" | "Rebel Alliance" => Some(Alignment::Light),
        "Sith Empire" | "Galactic Empire" | "Pirates" | "Criminals" => Some(Alignment::Dark),
        _ => None,
    }
}

fn select_alignment<R: Rng>(config: &CampaignConfig, faction: &str, rng: &mut R) -> Alignment {
    if let Some(aligned) = faction_alignment(faction) {
        // Most members follow their faction's leanings.
        if rng.gen_bool(0.7) {
            return aligned;
        }
    }

    let mut options = vec![Alignment::Light, Alignment::Neutral, Alignment::Dark];
    if config.alignment_focus != Alignment::Neutral {
        // Extra weight toward the campaign's slant.
        options.push(config.alignment_focus);
    }
    options[rng.gen_range(0..options.len())]
}

fn initial_relationship<R: Rng>(
    alignment: Alignment,
    player_focus: Alignment,
    rng: &mut R,
) -> bool {
    let chance = if alignment == player_focus {
        0.7
    } else if alignment == Alignment::Neutral {
        0.5
    } else {
        0.2
    };
    rng.gen_bool(chance)
}

fn initial_reputation<R: Rng>(
    likes_player: bool,
    alignment: Alignment,
    player_focus: Alignment,
    rng: &mut R,
) -> i32 {
    let mut base = if likes_player {
        rng.gen_range(20..=60)
    } else {
        rng.gen_range(-60..=20)
    };

    if alignment == player_focus {
        base += rng.gen_range(0..=20);
    } else if alignment != Alignment::Neutral {
        base -= rng.gen_range(0..=30);
    }

    base.clamp(-100, 100)
}

fn backstory(name: &str, species: &str, faction: &str, role: NpcRole, planet: &str) -> String {
    match role {
        NpcRole::Vendor => format!(
            "{name} is a {species} merchant who has been trading on {planet} for years. \
As a member of the {faction}, they have built a reputation for fair deals."
        ),
        NpcRole::QuestGiver => format!(
            "{name} is a {species} who has lived on {planet} their entire life. \
Their connection to the {faction} has given them insight into local problems."
        ),
        NpcRole::Guard => format!(
            "{name} is a {species} security officer working for the {faction}. \
They take their duty to protect {planet} very seriously."
        ),
        NpcRole::Civilian => format!(
            "{name} is a {species} resident of {planet}. \
Though not officially part of the {faction}, they support their cause."
        ),
        NpcRole::Enemy => format!(
            "{name} is a {species} operative working against local interests. \
Their allegiance to the {faction} puts them at odds with most inhabitants."
        ),
        NpcRole::Follower => format!(
            "{name} is a {species} who has been searching for purpose. \
Their past with the {faction} has prepared them for adventure."
        ),
    }
}

/// Generate a quest scaled to the planet's difficulty tier.
pub fn generate_quest<R: Rng>(
    area: &AreaLayout,
    tier: DifficultyTier,
    rng: &mut R,
) -> QuestRecord {
    let kinds = QuestKind::all();
    let kind = kinds[rng.gen_range(0..kinds.len())];
    let titles = kind.titles();
    let title = titles[rng.gen_range(0..titles.len())].to_string();

    let difficulty = tier.quest_difficulty().to_string();
    let base_minutes = match difficulty.as_str() {
        "easy" => 30,
        "hard" => 60,
        _ => 45,
    };
    let estimated_minutes = base_minutes + rng.gen_range(-10..=20);

    let description = format!(
        "A {difficulty} {kind} quest in the {} area. {title}.",
        area.name
    );

    let rewards = RewardKind::all();
    let reward_type = rewards[rng.gen_range(0..rewards.len())];

    QuestRecord {
        title,
        description,
        quest_type: kind,
        reward_type,
        difficulty,
        estimated_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::{self, CANONICAL_WORLDS};
    use crate::seed::parse_story_seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_planet(seed: u64) -> (CampaignConfig, PlanetRecord) {
        let config = parse_story_seed("Test 15-hour Jedi adventure");
        let mut rng = StdRng::seed_from_u64(seed);
        let planet = planet::generate(&config, 0, DifficultyTier::Early, CANONICAL_WORLDS, &mut rng);
        (config, planet)
    }

    #[test]
    fn test_generate_npcs_for_planet() {
        let (config, planet) = sample_planet(5);
        let mut rng = StdRng::seed_from_u64(6);

        let npcs = generate_for_planet(&planet, &config, &mut rng);

        // Two to four NPCs per area.
        assert!(npcs.len() >= planet.areas.len() * 2);
        assert!(npcs.len() <= planet.areas.len() * 4);

        let area_names: Vec<&str> = planet.areas.iter().map(|a| a.name.as_str()).collect();
        for npc in &npcs {
            assert!(area_names.contains(&npc.location.as_str()));
            assert!((-100..=100).contains(&npc.reputation_standing));
            assert_eq!(npc.personality_traits.len(), 2);
        }
    }

    #[test]
    fn test_planet_always_has_quest_giver() {
        let (config, planet) = sample_planet(7);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let npcs = generate_for_planet(&planet, &config, &mut rng);
            assert!(
                npcs.iter().any(|npc| npc.role == NpcRole::QuestGiver),
                "no quest giver with seed {seed}"
            );
        }
    }

    #[test]
    fn test_quest_givers_carry_quests() {
        let (config, planet) = sample_planet(8);
        let mut rng = StdRng::seed_from_u64(9);
        let npcs = generate_for_planet(&planet, &config, &mut rng);

        for npc in npcs.iter().filter(|n| n.role == NpcRole::QuestGiver) {
            let quest = npc.quest.as_ref().expect("quest giver without a quest");
            assert!(!quest.title.is_empty());
            assert!(quest.estimated_minutes > 0);
        }
    }

    #[test]
    fn test_quest_difficulty_follows_tier() {
        let (_, planet) = sample_planet(10);
        let mut rng = StdRng::seed_from_u64(11);

        let easy = generate_quest(&planet.areas[0], DifficultyTier::Early, &mut rng);
        let hard = generate_quest(&planet.areas[0], DifficultyTier::Late, &mut rng);

        assert_eq!(easy.difficulty, "easy");
        assert_eq!(hard.difficulty, "hard");
    }

    #[test]
    fn test_npc_serialization_round_trip() {
        let (config, planet) = sample_planet(12);
        let mut rng = StdRng::seed_from_u64(13);
        let npcs = generate_for_planet(&planet, &config, &mut rng);

        let json = serde_json::to_string(&npcs).unwrap();
        let back: Vec<NPCRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, npcs);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(NpcRole::QuestGiver).unwrap();
        assert_eq!(json, "questgiver");
    }
}
