//! Final boss generation.
//!
//! Builds the campaign's ultimate adversary: identity, motivation,
//! battle mechanics, a fixed four-phase escalation table, an arena and
//! a legendary loot drop.

use crate::loot::{ItemKind, LootItem};
use crate::planet::{Biome, PlanetRecord};
use crate::scaling::{boss_challenge_rating, Rarity};
use crate::seed::{Alignment, CampaignConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NAME_PREFIXES: &[&str] = &[
    "Darth", "Lord", "Master", "Admiral", "General", "Emperor", "Overlord",
];
const NAME_SYLLABLES: &[&str] = &[
    "Mal", "Dar", "Vel", "Kor", "Zar", "Nex", "Vex", "Keth", "Mor", "Sav",
];
const NAME_ENDINGS: &[&str] = &[
    "ak", "us", "an", "or", "el", "ix", "on", "ar", "ek", "oth",
];

/// Battle mechanic catalog: short key plus player-facing description.
const MECHANICS: &[(&str, &str)] = &[
    (
        "phase_transition",
        "Boss gains new abilities and changes tactics at 75%, 50%, and 25% health",
    ),
    (
        "environmental_hazard",
        "Arena features dangerous environmental elements that activate periodically",
    ),
    (
        "minion_summoning",
        "Boss summons waves of minions throughout the fight",
    ),
    (
        "force_powers",
        "Boss uses powerful Force abilities that affect the entire battlefield",
    ),
    (
        "weapon_mastery",
        "Boss demonstrates mastery of multiple weapon types during combat",
    ),
    (
        "defensive_stance",
        "Boss alternates between aggressive and defensive phases",
    ),
    (
        "area_denial",
        "Boss creates zones of danger that players must avoid",
    ),
    ("mind_games", "Boss uses psychological warfare and illusions"),
    (
        "power_absorption",
        "Boss can absorb and redirect player abilities",
    ),
    (
        "berserker_rage",
        "Boss becomes more dangerous as health decreases",
    ),
];

/// Arena catalog: key, base description, environmental feature.
const ARENAS: &[(&str, &str, &str)] = &[
    (
        "sith temple",
        "A dark temple filled with Sith artifacts and dangerous energy",
        "Dark energy pulses through the walls, and ancient Sith statues watch the battle",
    ),
    (
        "jedi ruins",
        "Ancient Jedi ruins with crumbling architecture and Force echoes",
        "Broken lightsaber crystals litter the ground, still glowing faintly with residual energy",
    ),
    (
        "space station",
        "A massive space station with artificial gravity and energy barriers",
        "Stars wheel past the massive viewports as the station slowly rotates",
    ),
    (
        "volcanic chamber",
        "A chamber within an active volcano with lava flows and unstable ground",
        "Lava bubbles and flows create natural barriers and hazards",
    ),
    (
        "crystal cave",
        "A cave filled with Force-sensitive crystals that amplify abilities",
        "Force-sensitive crystals resonate with the combatants' emotions",
    ),
    (
        "throne room",
        "An elaborate throne room with multiple levels and hidden passages",
        "Elaborate architecture provides multiple levels and tactical advantages",
    ),
    (
        "starship bridge",
        "The bridge of a massive starship with control panels and viewports",
        "Control panels spark and systems fail as the battle intensifies",
    ),
    (
        "ancient arena",
        "A gladiatorial arena with mechanical traps and obstacles",
        "Mechanical traps activate randomly, adding chaos to the fight",
    ),
    (
        "force nexus",
        "A location where the Force is unusually strong and unpredictable",
        "The Force itself seems alive here, amplifying all abilities",
    ),
    (
        "orbital platform",
        "A platform in space with artificial atmosphere and gravity",
        "The artificial gravity can be manipulated during the battle",
    ),
];

// ============================================================================
// Archetypes
// ============================================================================

struct Archetype {
    titles: &'static [&'static str],
    motivations: &'static [&'static str],
    species: &'static [&'static str],
    abilities: &'static [&'static str],
}

static DARK_ARCHETYPE: Archetype = Archetype {
    titles: &[
        "Dark Lord",
        "Sith Master",
        "Shadow Emperor",
        "Fallen One",
        "Destroyer",
    ],
    motivations: &[
        "seeks ultimate power through ancient Sith artifacts",
        "wants to corrupt the galaxy with dark side energy",
        "plans to rule through fear and domination",
        "desires revenge against those who wronged them",
        "aims to unlock forbidden Sith knowledge",
    ],
    species: &["Human", "Zabrak", "Chiss", "Miraluka", "Sith Pureblood"],
    abilities: &[
        "Force Lightning",
        "Force Choke",
        "Dark Rage",
        "Sith Sorcery",
        "Mind Control",
    ],
};

static LIGHT_ARCHETYPE: Archetype = Archetype {
    titles: &[
        "Fallen Jedi",
        "Corrupted Master",
        "Lost Guardian",
        "Broken Knight",
        "Twisted Sage",
    ],
    motivations: &[
        "believes the galaxy must be saved through extreme measures",
        "thinks they alone can bring true peace",
        "was corrupted while trying to do good",
        "seeks to prevent a greater evil through lesser evils",
        "wants to reshape the Force itself",
    ],
    species: &["Human", "Twi'lek", "Togruta", "Miraluka", "Cathar"],
    abilities: &[
        "Force Push",
        "Healing Corruption",
        "Light Bind",
        "Purifying Fire",
        "Mind Shield",
    ],
};

static NEUTRAL_ARCHETYPE: Archetype = Archetype {
    titles: &[
        "Gray Master",
        "Balance Keeper",
        "Void Walker",
        "Neutral Lord",
        "Equilibrium",
    ],
    motivations: &[
        "seeks to maintain balance between light and dark",
        "wants to eliminate both Jedi and Sith",
        "plans to create a new Force philosophy",
        "aims to transcend traditional Force limitations",
        "desires to reset galactic civilization",
    ],
    species: &["Human", "Zabrak", "Nautolan", "Chiss", "Miraluka"],
    abilities: &[
        "Force Balance",
        "Void Touch",
        "Neutral Ground",
        "Phase Shift",
        "Reality Warp",
    ],
};

fn archetype(alignment: Alignment) -> &'static Archetype {
    match alignment {
        Alignment::Dark => &DARK_ARCHETYPE,
        Alignment::Light => &LIGHT_ARCHETYPE,
        Alignment::Neutral => &NEUTRAL_ARCHETYPE,
    }
}

// ============================================================================
// Records
// ============================================================================

/// One band of the boss fight, emitted in fixed 100-75 / 75-50 / 50-25
/// / 25-0 order. This is a data table for the encounter designer, not a
/// runtime state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    pub name: String,
    pub health_band: String,
    pub abilities: Vec<String>,
    pub tactics: String,
    pub special_effects: String,
}

/// Complete data for a campaign's final boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossRecord {
    pub name: String,
    pub title: String,
    pub species: String,
    pub alignment: Alignment,
    pub motivation: String,
    pub backstory: String,
    pub mechanics: Vec<String>,
    pub phases: Vec<BossPhase>,
    pub arena_description: String,
    pub loot_drop: LootItem,
    pub challenge_rating: f64,
    pub hit_points: i32,
    pub armor: i32,
    pub special_abilities: Vec<String>,
    pub weaknesses: Vec<String>,
    pub minions: Vec<String>,
}

// ============================================================================
// Generation
// ============================================================================

/// Generate the campaign's final boss against the last planet's
/// context.
pub fn generate<R: Rng>(
    config: &CampaignConfig,
    final_planet: Option<&PlanetRecord>,
    rng: &mut R,
) -> BossRecord {
    let alignment = boss_alignment(config.alignment_focus, rng);
    let arch = archetype(alignment);

    let name = generate_name(rng);
    let title = arch.titles[rng.gen_range(0..arch.titles.len())].to_string();
    let species = arch.species[rng.gen_range(0..arch.species.len())].to_string();
    let motivation = arch.motivations[rng.gen_range(0..arch.motivations.len())].to_string();

    let backstory = backstory(&name, &title, &species, &motivation, config);

    let mechanic_keys: Vec<&'static str> = MECHANICS
        .choose_multiple(rng, 3)
        .map(|(key, _)| *key)
        .collect();
    let mechanics: Vec<String> = mechanic_keys
        .iter()
        .filter_map(|key| {
            MECHANICS
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, desc)| desc.to_string())
        })
        .collect();

    let phases = battle_phases(arch, rng);

    let arena = &ARENAS[rng.gen_range(0..ARENAS.len())];
    let arena_description = arena_description(arena, final_planet);

    let challenge_rating = boss_challenge_rating(config.length_hours);
    let hit_points = (100.0 + challenge_rating * 50.0) as i32;
    let armor = (18.0 + challenge_rating * 0.5) as i32;

    let special_abilities = special_abilities(arch, challenge_rating);
    let weaknesses = weaknesses(alignment, &mechanic_keys);
    let minions = minion_types(alignment, final_planet);

    let loot_drop = legendary_loot(&name, &title, alignment, config);

    BossRecord {
        name,
        title,
        species,
        alignment,
        motivation,
        backstory,
        mechanics,
        phases,
        arena_description,
        loot_drop,
        challenge_rating,
        hit_points,
        armor,
        special_abilities,
        weaknesses,
        minions,
    }
}

/// The boss opposes the player's moral slant. Dark-side players face
/// light or neutral adversaries, light-side players always face the
/// dark, and neutral players can face anyone.
fn boss_alignment<R: Rng>(player_focus: Alignment, rng: &mut R) -> Alignment {
    match player_focus {
        Alignment::Dark => {
            let options = [Alignment::Light, Alignment::Neutral];
            options[rng.gen_range(0..options.len())]
        }
        Alignment::Light => Alignment::Dark,
        Alignment::Neutral => {
            let options = Alignment::all();
            options[rng.gen_range(0..options.len())]
        }
    }
}

/// Syllable name with a 70% chance of an honorific prefix.
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    let base = format!(
        "{}{}",
        NAME_SYLLABLES[rng.gen_range(0..NAME_SYLLABLES.len())],
        NAME_ENDINGS[rng.gen_range(0..NAME_ENDINGS.len())]
    );

    if rng.gen_bool(0.7) {
        format!(
            "{} {base}",
            NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())]
        )
    } else {
        base
    }
}

fn backstory(
    name: &str,
    title: &str,
    species: &str,
    motivation: &str,
    config: &CampaignConfig,
) -> String {
    format!(
        "{name}, known as {title}, is a {species} who {motivation}.\n\n\
Born during the {} era, {name} was once a promising individual who showed great \
potential in the Force. However, their path took a dark turn when they discovered \
ancient secrets that changed their perspective on the galaxy.\n\n\
Their current plan involves {}, which directly threatens the stability of the galaxy. \
The events described in \"{}\" are merely the beginning of their grand design.\n\n\
{name} has spent years gathering followers and resources, preparing for this moment \
when they can finally implement their vision for the galaxy's future. They see \
themselves not as a villain, but as a necessary force for change in a corrupt and \
stagnant galaxy.",
        config.era,
        motivation.to_lowercase(),
        config.seed_text,
    )
}

/// Four fixed health bands with escalating ability counts: two
/// abilities, then three, then four, then the full set.
fn battle_phases<R: Rng>(arch: &Archetype, rng: &mut R) -> Vec<BossPhase> {
    let sample = |rng: &mut R, n: usize| -> Vec<String> {
        arch.abilities
            .choose_multiple(rng, n)
            .map(|a| a.to_string())
            .collect()
    };

    vec![
        BossPhase {
            name: "Opening Assault".to_string(),
            health_band: "100-75%".to_string(),
            abilities: sample(rng, 2),
            tactics: "Aggressive attacks to test the player's strength".to_string(),
            special_effects: "None".to_string(),
        },
        BossPhase {
            name: "Escalation".to_string(),
            health_band: "75-50%".to_string(),
            abilities: sample(rng, 3),
            tactics: "Introduces environmental hazards and summons minions".to_string(),
            special_effects: "Arena becomes more dangerous".to_string(),
        },
        BossPhase {
            name: "Desperation".to_string(),
            health_band: "50-25%".to_string(),
            abilities: arch.abilities.iter().take(4).map(|a| a.to_string()).collect(),
            tactics: "Uses most powerful abilities and becomes more unpredictable".to_string(),
            special_effects: "All mechanics active simultaneously".to_string(),
        },
        BossPhase {
            name: "Final Stand".to_string(),
            health_band: "25-0%".to_string(),
            abilities: arch.abilities.iter().map(|a| a.to_string()).collect(),
            tactics: "Unleashes full power in a last desperate attempt".to_string(),
            special_effects: "Boss gains new ultimate abilities".to_string(),
        },
    ]
}

fn arena_description(
    arena: &(&str, &str, &str),
    final_planet: Option<&PlanetRecord>,
) -> String {
    let (kind, base, feature) = arena;

    let location_detail = match final_planet {
        Some(planet) => format!(
            " Located on {}, this {kind} reflects the planet's {} environment.",
            planet.name, planet.biome
        ),
        None => format!(" This {kind} serves as the perfect backdrop for an epic confrontation."),
    };

    format!("{base}{location_detail} {feature}.")
}

fn special_abilities(arch: &Archetype, cr: f64) -> Vec<String> {
    let mut abilities: Vec<String> = arch.abilities.iter().map(|a| a.to_string()).collect();

    if cr >= 10.0 {
        abilities.push("Legendary Actions".to_string());
        abilities.push("Legendary Resistance".to_string());
    }
    if cr >= 12.0 {
        abilities.push("Lair Actions".to_string());
        abilities.push("Regional Effects".to_string());
    }
    if cr >= 14.0 {
        abilities.push("Reality Manipulation".to_string());
    }

    abilities
}

fn weaknesses(alignment: Alignment, mechanic_keys: &[&str]) -> Vec<String> {
    let base: &[&str] = match alignment {
        Alignment::Dark => &[
            "Light side Force powers",
            "Emotional connections",
            "Overconfidence",
        ],
        Alignment::Light => &[
            "Dark side corruption",
            "Moral dilemmas",
            "Protecting innocents",
        ],
        Alignment::Neutral => &[
            "Extreme emotions",
            "Unbalanced tactics",
            "Commitment to ideals",
        ],
    };

    let mut weaknesses: Vec<String> = base.iter().map(|w| w.to_string()).collect();

    for key in mechanic_keys {
        let extra = match *key {
            "environmental_hazard" => Some("Can be turned against the boss"),
            "minion_summoning" => Some("Vulnerable while summoning"),
            "force_powers" => Some("Force exhaustion after major abilities"),
            "phase_transition" => Some("Brief vulnerability during transitions"),
            _ => None,
        };
        if let Some(weakness) = extra {
            weaknesses.push(weakness.to_string());
        }
    }

    weaknesses
}

fn minion_types(alignment: Alignment, final_planet: Option<&PlanetRecord>) -> Vec<String> {
    let base: &[&str] = match alignment {
        Alignment::Dark => &[
            "Sith Assassins",
            "Dark Jedi",
            "Corrupted Beasts",
            "Shadow Troopers",
        ],
        Alignment::Light => &[
            "Fallen Jedi",
            "Corrupted Guardians",
            "Light Spirits",
            "Purified Droids",
        ],
        Alignment::Neutral => &[
            "Gray Guards",
            "Balanced Constructs",
            "Void Wraiths",
            "Neutral Sentinels",
        ],
    };

    let mut minions: Vec<String> = base.iter().map(|m| m.to_string()).collect();

    if let Some(planet) = final_planet {
        let extra = match planet.biome {
            Biome::Volcanic => Some("Lava Elementals"),
            Biome::Ice => Some("Ice Wraiths"),
            Biome::Forest => Some("Corrupted Wildlife"),
            Biome::Urban => Some("Security Droids"),
            _ => None,
        };
        if let Some(minion) = extra {
            minions.push(minion.to_string());
        }
    }

    minions
}

/// The boss drops a single legendary item named for its former owner.
/// The item type follows the boss alignment: weapons for the dark,
/// armor for the light, modifications for the gray.
fn legendary_loot(
    name: &str,
    title: &str,
    alignment: Alignment,
    config: &CampaignConfig,
) -> LootItem {
    let (item_type, base_bonuses): (ItemKind, &[(&str, i64)]) = match alignment {
        Alignment::Dark => (
            ItemKind::Weapon,
            &[("attack", 15), ("force_power", 10), ("dark_side", 5)],
        ),
        Alignment::Light => (
            ItemKind::Armor,
            &[("defense", 12), ("force_power", 8), ("light_side", 5)],
        ),
        Alignment::Neutral => (
            ItemKind::Mod,
            &[("balance", 10), ("force_power", 12), ("versatility", 8)],
        ),
    };

    let bonuses: BTreeMap<String, i64> = base_bonuses
        .iter()
        .map(|(stat, value)| (stat.to_string(), *value))
        .collect();

    LootItem {
        name: format!("{name}'s Legacy"),
        rarity: Rarity::Legendary,
        item_type,
        bonuses,
        flavor_text: format!(
            "The final remnant of {title} {name}'s power. This legendary {item_type} pulses \
with the Force energy of its former owner, granting incredible abilities to those worthy \
enough to wield it."
        ),
        value_credits: 50_000 + config.length_hours as i64 * 1_000,
        level_requirement: config.length_hours,
        faction_theme: Some(alignment.name().to_string()),
    }
}
