//! Loot generation.
//!
//! Builds scalable loot tables: weapons, armor, modifications, stims,
//! curios and raw credits, with rarity odds and stat bonuses that grow
//! with item level.

use crate::planet::Biome;
use crate::scaling::{DifficultyTier, Rarity, RarityTable};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Item kinds
// ============================================================================

/// Category of a loot item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Mod,
    Stim,
    Misc,
    Credits,
}

impl ItemKind {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Mod => "mod",
            ItemKind::Stim => "stim",
            ItemKind::Misc => "misc",
            ItemKind::Credits => "credits",
        }
    }

    /// Per-level stat growth rate for this kind of gear.
    fn level_scaling(&self) -> f64 {
        match self {
            ItemKind::Weapon => 0.10,
            ItemKind::Armor => 0.08,
            ItemKind::Mod => 0.05,
            ItemKind::Stim => 0.10,
            ItemKind::Misc | ItemKind::Credits => 0.0,
        }
    }

    /// Per-level base credit value before the rarity multiplier.
    fn base_value(&self) -> i64 {
        match self {
            ItemKind::Weapon => 100,
            ItemKind::Armor => 80,
            ItemKind::Mod => 50,
            ItemKind::Stim => 20,
            ItemKind::Misc => 30,
            ItemKind::Credits => 0,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Drop weights per item kind.
const KIND_WEIGHTS: &[(ItemKind, f64)] = &[
    (ItemKind::Weapon, 0.25),
    (ItemKind::Armor, 0.20),
    (ItemKind::Mod, 0.15),
    (ItemKind::Stim, 0.15),
    (ItemKind::Misc, 0.15),
    (ItemKind::Credits, 0.10),
];

// ============================================================================
// Loot items
// ============================================================================

/// A generated loot item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub name: String,
    pub rarity: Rarity,
    pub item_type: ItemKind,
    /// Stat bonuses such as "attack" or "defense".
    pub bonuses: BTreeMap<String, i64>,
    pub flavor_text: String,
    pub value_credits: i64,
    pub level_requirement: u32,
    pub faction_theme: Option<String>,
}

// ============================================================================
// Gear templates
// ============================================================================

struct GearTemplate {
    kind: &'static str,
    base_stats: &'static [(&'static str, i64)],
    prefixes: &'static [&'static str],
    suffixes: &'static [&'static str],
}

const WEAPON_TEMPLATES: &[GearTemplate] = &[
    GearTemplate {
        kind: "lightsaber",
        base_stats: &[("attack", 8), ("force_power", 2)],
        prefixes: &["Ancient", "Elegant", "Corrupted", "Master's", "Apprentice"],
        suffixes: &["of Power", "of Balance", "of Fury", "of Wisdom", "of Darkness"],
    },
    GearTemplate {
        kind: "blaster",
        base_stats: &[("attack", 5), ("accuracy", 1)],
        prefixes: &["Heavy", "Precision", "Rapid-Fire", "Military", "Custom"],
        suffixes: &["Rifle", "Pistol", "Carbine", "Cannon", "Repeater"],
    },
    GearTemplate {
        kind: "vibroblade",
        base_stats: &[("attack", 6), ("critical", 1)],
        prefixes: &["Vibrating", "Cortosis", "Durasteel", "Mandalorian", "Echani"],
        suffixes: &["Sword", "Dagger", "Blade", "Knife", "Rapier"],
    },
];

const ARMOR_TEMPLATES: &[GearTemplate] = &[
    GearTemplate {
        kind: "robes",
        base_stats: &[("defense", 3), ("force_power", 3)],
        prefixes: &["Jedi", "Sith", "Master", "Padawan", "Dark"],
        suffixes: &["Robes", "Vestments", "Garments", "Attire", "Mantle"],
    },
    GearTemplate {
        kind: "armor",
        base_stats: &[("defense", 6), ("health", 10)],
        prefixes: &["Combat", "Battle", "Assault", "Heavy", "Reinforced"],
        suffixes: &["Armor", "Suit", "Plating", "Vest", "Gear"],
    },
    GearTemplate {
        kind: "clothing",
        base_stats: &[("defense", 1), ("charisma", 2)],
        prefixes: &["Formal", "Casual", "Diplomatic", "Noble", "Merchant"],
        suffixes: &["Outfit", "Attire", "Garb", "Clothing", "Wear"],
    },
];

const MOD_TEMPLATES: &[GearTemplate] = &[
    GearTemplate {
        kind: "weapon mod",
        base_stats: &[("attack", 2)],
        prefixes: &["Targeting", "Power", "Precision", "Rapid", "Devastating"],
        suffixes: &["Scope", "Cell", "Barrel", "Trigger", "Amplifier"],
    },
    GearTemplate {
        kind: "armor mod",
        base_stats: &[("defense", 2)],
        prefixes: &["Reinforced", "Energy", "Kinetic", "Adaptive", "Reactive"],
        suffixes: &["Plating", "Shield", "Mesh", "Layer", "Coating"],
    },
    GearTemplate {
        kind: "utility mod",
        base_stats: &[("utility", 1)],
        prefixes: &["Advanced", "Military", "Stealth", "Medical", "Technical"],
        suffixes: &["Interface", "Scanner", "Generator", "Processor", "Module"],
    },
];

const STIM_TYPES: &[(&str, &[(&str, i64)])] = &[
    ("Medpac", &[("health", 25)]),
    ("Adrenal Strength", &[("attack", 5)]),
    ("Adrenal Stamina", &[("defense", 5)]),
    ("Force Stim", &[("force_power", 10)]),
    ("Battle Stim", &[("critical", 3)]),
];

const MISC_ITEMS: &[&str] = &[
    "Datapad", "Holocron", "Crystal", "Artifact", "Component", "Scanner", "Translator",
    "Beacon", "Recorder", "Tool",
];

// ============================================================================
// Faction themes
// ============================================================================

struct FactionTheme {
    colors: &'static [&'static str],
    materials: &'static [&'static str],
    descriptors: &'static [&'static str],
}

static NEUTRAL_THEME: FactionTheme = FactionTheme {
    colors: &["gray", "brown", "silver"],
    materials: &["metal", "plastic", "composite"],
    descriptors: &["standard", "basic", "functional"],
};

/// Match a faction name against the known visual themes. Unrecognized
/// factions use a neutral palette.
fn faction_theme(faction: &str) -> &'static FactionTheme {
    static THEMES: &[(&str, FactionTheme)] = &[
        (
            "jedi",
            FactionTheme {
                colors: &["blue", "green", "silver", "white"],
                materials: &["crystal", "metal", "energy"],
                descriptors: &["peaceful", "balanced", "harmonious", "pure"],
            },
        ),
        (
            "sith",
            FactionTheme {
                colors: &["red", "black", "crimson", "dark"],
                materials: &["obsidian", "dark metal", "corrupted crystal"],
                descriptors: &["corrupted", "powerful", "menacing", "dark"],
            },
        ),
        (
            "republic",
            FactionTheme {
                colors: &["blue", "gold", "white", "silver"],
                materials: &["durasteel", "plasteel", "composite"],
                descriptors: &["military", "standard", "regulation", "official"],
            },
        ),
        (
            "imperial",
            FactionTheme {
                colors: &["gray", "black", "white", "red"],
                materials: &["imperial steel", "plasteel", "composite"],
                descriptors: &["imperial", "authoritarian", "efficient", "intimidating"],
            },
        ),
    ];

    let lowered = faction.to_lowercase();
    THEMES
        .iter()
        .find(|(name, _)| lowered.contains(name))
        .map(|(_, theme)| theme)
        .unwrap_or(&NEUTRAL_THEME)
}

// ============================================================================
// Generation
// ============================================================================

/// Generate a loot table for one planet context.
pub fn generate_table<R: Rng>(
    biome: Biome,
    faction: &str,
    tier: DifficultyTier,
    count: usize,
    rng: &mut R,
) -> Vec<LootItem> {
    let (min_level, max_level) = tier.level_range();

    (0..count)
        .map(|_| match select_kind(rng) {
            ItemKind::Weapon => generate_gear(
                ItemKind::Weapon,
                WEAPON_TEMPLATES,
                faction,
                min_level,
                max_level,
                rng,
            ),
            ItemKind::Armor => generate_gear(
                ItemKind::Armor,
                ARMOR_TEMPLATES,
                faction,
                min_level,
                max_level,
                rng,
            ),
            ItemKind::Mod => generate_gear(
                ItemKind::Mod,
                MOD_TEMPLATES,
                faction,
                min_level,
                max_level,
                rng,
            ),
            ItemKind::Stim => generate_stim(min_level, max_level, rng),
            ItemKind::Credits => generate_credits(min_level, max_level, rng),
            ItemKind::Misc => generate_misc(biome, faction, min_level, max_level, rng),
        })
        .collect()
}

fn select_kind<R: Rng>(rng: &mut R) -> ItemKind {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (kind, weight) in KIND_WEIGHTS {
        cumulative += weight;
        if roll <= cumulative {
            return *kind;
        }
    }
    ItemKind::Misc
}

/// Stat bonus formula shared by every gear kind.
fn scaled_bonus(base: i64, rarity: Rarity, level: u32, kind: ItemKind) -> i64 {
    let multiplier = rarity.stat_multiplier() * (1.0 + level as f64 * kind.level_scaling());
    (base as f64 * multiplier).round() as i64
}

fn item_value(kind: ItemKind, level: u32, rarity: Rarity) -> i64 {
    ((kind.base_value() * level as i64) as f64 * rarity.stat_multiplier()) as i64
}

fn generate_gear<R: Rng>(
    kind: ItemKind,
    templates: &'static [GearTemplate],
    faction: &str,
    min_level: u32,
    max_level: u32,
    rng: &mut R,
) -> LootItem {
    let level = rng.gen_range(min_level..=max_level);
    let rarity = RarityTable::for_level(level).sample(rng);

    let template = &templates[rng.gen_range(0..templates.len())];
    let prefix = template.prefixes[rng.gen_range(0..template.prefixes.len())];
    let suffix = template.suffixes[rng.gen_range(0..template.suffixes.len())];
    let name = format!("{prefix} {suffix}");

    let mut bonuses: BTreeMap<String, i64> = template
        .base_stats
        .iter()
        .map(|(stat, base)| (stat.to_string(), scaled_bonus(*base, rarity, level, kind)))
        .collect();

    match kind {
        ItemKind::Weapon if rarity >= Rarity::Rare => {
            let extras = ["critical", "accuracy", "damage", "force_power"];
            let extra = extras[rng.gen_range(0..extras.len())];
            bonuses
                .entry(extra.to_string())
                .or_insert_with(|| rng.gen_range(1..=3));
        }
        ItemKind::Armor if rarity >= Rarity::Epic => {
            let resistances = ["energy_resist", "kinetic_resist", "force_resist"];
            let resist = resistances[rng.gen_range(0..resistances.len())];
            bonuses.insert(resist.to_string(), rng.gen_range(5..=15));
        }
        _ => {}
    }

    let flavor_text = match kind {
        ItemKind::Mod => format!("A {rarity} modification that enhances equipment performance."),
        _ => gear_flavor(kind, template.kind, faction, rarity, rng),
    };

    LootItem {
        name,
        rarity,
        item_type: kind,
        bonuses,
        flavor_text,
        value_credits: item_value(kind, level, rarity),
        level_requirement: level,
        faction_theme: Some(faction.to_string()),
    }
}

fn gear_flavor<R: Rng>(
    kind: ItemKind,
    gear_name: &str,
    faction: &str,
    rarity: Rarity,
    rng: &mut R,
) -> String {
    let theme = faction_theme(faction);
    let color = theme.colors[rng.gen_range(0..theme.colors.len())];
    let material = theme.materials[rng.gen_range(0..theme.materials.len())];
    let descriptor = theme.descriptors[rng.gen_range(0..theme.descriptors.len())];

    let templates: [String; 3] = if kind == ItemKind::Weapon {
        [
            format!("This {descriptor} {gear_name} gleams with {color} {material}."),
            format!("A {rarity} {gear_name} crafted from {color} {material}."),
            format!("The {color} {material} of this {gear_name} marks it as {descriptor}."),
        ]
    } else {
        [
            format!("This {descriptor} {gear_name} is reinforced with {color} {material}."),
            format!("A {rarity} set of {gear_name} featuring {color} {material} plating."),
            format!(
                "The {color} {material} construction makes this {gear_name} both {descriptor} \
and protective."
            ),
        ]
    };
    templates[rng.gen_range(0..templates.len())].clone()
}

fn generate_stim<R: Rng>(min_level: u32, max_level: u32, rng: &mut R) -> LootItem {
    let level = rng.gen_range(min_level..=max_level);
    let rarity = RarityTable::for_level(level).sample(rng);

    let (stim_name, base_bonuses) = STIM_TYPES[rng.gen_range(0..STIM_TYPES.len())];

    let bonuses: BTreeMap<String, i64> = base_bonuses
        .iter()
        .map(|(stat, base)| {
            (
                stat.to_string(),
                scaled_bonus(*base, rarity, level, ItemKind::Stim),
            )
        })
        .collect();

    LootItem {
        name: format!("{} {stim_name}", rarity.label()),
        rarity,
        item_type: ItemKind::Stim,
        bonuses,
        flavor_text: format!("A {rarity} stimulant that provides temporary enhancement."),
        value_credits: item_value(ItemKind::Stim, level, rarity),
        level_requirement: level,
        faction_theme: None,
    }
}

fn generate_credits<R: Rng>(min_level: u32, max_level: u32, rng: &mut R) -> LootItem {
    let level = rng.gen_range(min_level..=max_level);

    let base = (50 + 25 * level as i64) as f64;
    let variance: f64 = rng.gen_range(0.5..=2.0);
    let amount = (base * variance).round() as i64;

    let mut bonuses = BTreeMap::new();
    bonuses.insert("credits".to_string(), amount);

    LootItem {
        name: format!("{amount} Credits"),
        rarity: Rarity::Common,
        item_type: ItemKind::Credits,
        bonuses,
        flavor_text: "Standard galactic currency.".to_string(),
        value_credits: amount,
        level_requirement: 1,
        faction_theme: None,
    }
}

fn generate_misc<R: Rng>(
    biome: Biome,
    faction: &str,
    min_level: u32,
    max_level: u32,
    rng: &mut R,
) -> LootItem {
    let level = rng.gen_range(min_level..=max_level);
    let rarity = RarityTable::for_level(level).sample(rng);

    let item_name = MISC_ITEMS[rng.gen_range(0..MISC_ITEMS.len())];

    let mut bonuses = BTreeMap::new();
    bonuses.insert("utility".to_string(), rng.gen_range(1..=5));

    LootItem {
        name: format!("{} {item_name}", rarity.label()),
        rarity,
        item_type: ItemKind::Misc,
        bonuses,
        flavor_text: format!(
            "A {rarity} {} recovered from a {biome} world, its properties unknown.",
            item_name.to_lowercase()
        ),
        value_credits: item_value(ItemKind::Misc, level, rarity),
        level_requirement: level,
        faction_theme: Some(faction.to_string()),
    }
}
