//! Enemy catalog and encounter assembly.
//!
//! Enemies carry D&D-style challenge ratings. Encounter groups are
//! assembled with a greedy bin-fill against a target CR, then scaled
//! for the destination difficulty tier.

use crate::planet::{Biome, PlanetRecord};
use crate::scaling::DifficultyTier;
use lazy_static::lazy_static;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Encounters stop growing past this many enemy picks.
const MAX_GROUP_SIZE: usize = 8;

/// Assembly stops once the CR remainder drops to this.
const MIN_REMAINING_CR: f64 = 0.25;

/// A single enemy can overshoot the remaining CR by this factor.
const OVERSHOOT_TOLERANCE: f64 = 1.2;

// ============================================================================
// Enemy records
// ============================================================================

/// One enemy type. Catalog templates are immutable; scaled copies made
/// per encounter are independent of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub name: String,
    pub species: String,
    /// Challenge rating, never negative.
    pub challenge_rating: f64,
    pub hit_points: i32,
    pub armor: i32,
    pub abilities: Vec<String>,
    /// Names of loot drops this enemy can carry.
    pub loot_table: Vec<String>,
    /// Biomes this enemy appears in.
    pub biomes: Vec<Biome>,
    pub faction: String,
    pub description: String,
}

impl EnemyRecord {
    /// Create an enemy; the challenge rating is floored at zero.
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        challenge_rating: f64,
        hit_points: i32,
        armor: i32,
    ) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            challenge_rating: challenge_rating.max(0.0),
            hit_points,
            armor,
            abilities: Vec::new(),
            loot_table: Vec::new(),
            biomes: Vec::new(),
            faction: String::new(),
            description: String::new(),
        }
    }

    pub fn with_abilities(mut self, abilities: Vec<String>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_loot(mut self, loot: Vec<String>) -> Self {
        self.loot_table = loot;
        self
    }

    pub fn with_biomes(mut self, biomes: Vec<Biome>) -> Self {
        self.biomes = biomes;
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = faction.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An enemy plus how many of it appear in an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyGroup {
    pub enemy: EnemyRecord,
    pub count: u32,
}

// ============================================================================
// Encounter records
// ============================================================================

/// How an encounter is meant to play out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterKind {
    Combat,
    Stealth,
    Social,
    Puzzle,
}

impl EncounterKind {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            EncounterKind::Combat => "combat",
            EncounterKind::Stealth => "stealth",
            EncounterKind::Social => "social",
            EncounterKind::Puzzle => "puzzle",
        }
    }
}

impl fmt::Display for EncounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const KIND_WEIGHTS: &[(EncounterKind, f64)] = &[
    (EncounterKind::Combat, 0.6),
    (EncounterKind::Stealth, 0.2),
    (EncounterKind::Social, 0.1),
    (EncounterKind::Puzzle, 0.1),
];

/// A generated encounter. Stateless and disposable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRecord {
    pub id: String,
    pub enemies: Vec<EnemyGroup>,
    /// Aggregate CR of the scaled group.
    pub total_cr: f64,
    pub kind: EncounterKind,
    pub location: String,
    pub description: String,
    /// Environmental conditions like "Limited visibility".
    pub conditions: Vec<String>,
}

// ============================================================================
// Enemy catalog
// ============================================================================

lazy_static! {
    static ref TEMPLATES: Vec<EnemyRecord> = build_templates();
}

/// The full immutable enemy catalog.
pub fn templates() -> &'static [EnemyRecord] {
    &TEMPLATES
}

fn build_templates() -> Vec<EnemyRecord> {
    let mut enemies = Vec::new();

    // Humanoid soldiers of fortune, one per species and role.
    let species = ["Human", "Twi'lek", "Rodian", "Zabrak", "Weequay"];
    let roles: [(&str, f64); 5] = [
        ("Scout", 0.5),
        ("Soldier", 1.0),
        ("Mercenary", 1.5),
        ("Assassin", 2.0),
        ("Officer", 2.5),
    ];

    for sp in species {
        for (role, cr) in roles {
            let hp = (10.0 + cr * 15.0) as i32;
            let ac = (12.0 + cr * 2.0) as i32;
            enemies.push(
                EnemyRecord::new(format!("{sp} {role}"), sp, cr, hp, ac)
                    .with_abilities(role_abilities(role, cr))
                    .with_loot(role_loot(role, cr))
                    .with_biomes(vec![Biome::Urban, Biome::Desert, Biome::Forest])
                    .with_faction("Various")
                    .with_description(format!(
                        "A {} serving as a {}",
                        sp.to_lowercase(),
                        role.to_lowercase()
                    )),
            );
        }
    }

    // Wild creatures with strong biome ties.
    let creatures: [(&str, Biome, f64, &[&str]); 8] = [
        ("Krayt Dragon", Biome::Desert, 8.0, &["Acid Breath", "Tail Sweep"]),
        ("Rancor", Biome::Forest, 6.0, &["Grab", "Bite", "Rage"]),
        ("Wampa", Biome::Ice, 4.0, &["Ice Claws", "Camouflage"]),
        ("Nexu", Biome::Forest, 3.0, &["Pounce", "Night Vision"]),
        ("Dewback", Biome::Desert, 1.0, &["Charge", "Thick Hide"]),
        ("Bantha", Biome::Desert, 2.0, &["Trample", "Thick Hide"]),
        ("Kinrath", Biome::Forest, 2.5, &["Web", "Poison Bite"]),
        ("Tuk'ata", Biome::Volcanic, 5.0, &["Force Resistance", "Pack Hunter"]),
    ];

    for (name, biome, cr, abilities) in creatures {
        let hp = (20.0 + cr * 20.0) as i32;
        let ac = (10.0 + cr * 1.5) as i32;
        enemies.push(
            EnemyRecord::new(name, "Beast", cr, hp, ac)
                .with_abilities(abilities.iter().map(|a| a.to_string()).collect())
                .with_loot(vec![
                    "Beast Hide".to_string(),
                    "Claws".to_string(),
                    "Teeth".to_string(),
                ])
                .with_biomes(vec![biome])
                .with_faction("Wildlife")
                .with_description(format!(
                    "A dangerous {} native to {biome} worlds",
                    name.to_lowercase()
                )),
        );
    }

    // Automated opposition.
    let droids: [(&str, f64, &[&str]); 5] = [
        ("Security Droid", 1.5, &["Stun Blast", "Alarm"]),
        ("War Droid", 4.0, &["Heavy Blaster", "Armor Plating"]),
        ("Assassin Droid", 6.0, &["Stealth Mode", "Poison Dart"]),
        ("Mining Droid", 2.0, &["Drill Arm", "Explosive Charge"]),
        ("Protocol Droid", 0.25, &["Translation", "Distraction"]),
    ];

    for (name, cr, abilities) in droids {
        let hp = (15.0 + cr * 12.0) as i32;
        let ac = (14.0 + cr * 1.5) as i32;
        enemies.push(
            EnemyRecord::new(name, "Droid", cr, hp, ac)
                .with_abilities(abilities.iter().map(|a| a.to_string()).collect())
                .with_loot(vec![
                    "Scrap Metal".to_string(),
                    "Power Cell".to_string(),
                    "Circuit Board".to_string(),
                ])
                .with_biomes(vec![Biome::Urban, Biome::Volcanic, Biome::Ice])
                .with_faction("Various")
                .with_description(format!(
                    "An automated {} with combat capabilities",
                    name.to_lowercase()
                )),
        );
    }

    // Dark side adversaries.
    let sith: [(&str, f64, &[&str]); 5] = [
        ("Sith Apprentice", 5.0, &["Force Lightning", "Lightsaber Combat"]),
        ("Dark Jedi", 4.0, &["Force Push", "Lightsaber Throw"]),
        ("Sith Assassin", 6.0, &["Force Stealth", "Dual Sabers"]),
        ("Sith Marauder", 7.0, &["Force Rage", "Saber Fury"]),
        ("Sith Lord", 10.0, &["Force Storm", "Master Duelist"]),
    ];

    for (name, cr, abilities) in sith {
        let hp = (25.0 + cr * 18.0) as i32;
        let ac = (15.0 + cr * 1.2) as i32;
        let mut all_abilities: Vec<String> = abilities.iter().map(|a| a.to_string()).collect();
        all_abilities.push("Force Sensitive".to_string());
        enemies.push(
            EnemyRecord::new(name, "Human", cr, hp, ac)
                .with_abilities(all_abilities)
                .with_loot(vec![
                    "Lightsaber Crystal".to_string(),
                    "Sith Holocron".to_string(),
                    "Dark Robes".to_string(),
                ])
                .with_biomes(vec![Biome::Urban, Biome::Volcanic, Biome::Desert])
                .with_faction("Sith Empire")
                .with_description(format!(
                    "A powerful {} wielding the dark side",
                    name.to_lowercase()
                )),
        );
    }

    enemies
}

fn role_abilities(role: &str, cr: f64) -> Vec<String> {
    let base: &[&str] = match role {
        "Soldier" => &["Blaster Rifle", "Tactical Training"],
        "Scout" => &["Stealth", "Tracking"],
        "Mercenary" => &["Dual Weapons", "Combat Experience"],
        "Assassin" => &["Sneak Attack", "Poison"],
        "Officer" => &["Command", "Inspire Troops"],
        _ => &["Basic Attack"],
    };

    let mut abilities: Vec<String> = base.iter().map(|a| a.to_string()).collect();
    if cr >= 2.0 {
        abilities.push("Veteran Training".to_string());
    }
    if cr >= 4.0 {
        abilities.push("Elite Equipment".to_string());
    }
    if cr >= 6.0 {
        abilities.push("Master Combatant".to_string());
    }
    abilities
}

fn role_loot(role: &str, cr: f64) -> Vec<String> {
    let base: &[&str] = match role {
        "Soldier" => &["Blaster Rifle", "Combat Armor", "Credits"],
        "Scout" => &["Stealth Generator", "Binoculars", "Credits"],
        "Mercenary" => &["Heavy Blaster", "Medpacs", "Credits"],
        "Assassin" => &["Vibroblade", "Poison", "Credits"],
        "Officer" => &["Command Codes", "Datapad", "Credits"],
        _ => &["Credits"],
    };

    let mut loot: Vec<String> = base.iter().map(|l| l.to_string()).collect();
    if cr >= 3.0 {
        loot.push("Rare Equipment".to_string());
    }
    if cr >= 5.0 {
        loot.push("Epic Item".to_string());
    }
    loot
}

/// Garrison troops tied to a planet's government.
fn faction_enemies(planet: &PlanetRecord) -> Vec<EnemyRecord> {
    let tier = planet.difficulty_tier;
    let mut troops = Vec::new();

    if planet.government.contains("Imperial") {
        let cr = match tier {
            DifficultyTier::Early => 1.0,
            DifficultyTier::Mid => 2.5,
            DifficultyTier::Late => 4.0,
        };
        troops.push(
            EnemyRecord::new(
                "Imperial Trooper",
                "Human",
                cr,
                (20.0 + cr * 10.0) as i32,
                (14.0 + cr) as i32,
            )
            .with_abilities(vec![
                "Blaster Rifle".to_string(),
                "Imperial Training".to_string(),
            ])
            .with_loot(vec![
                "Imperial Credits".to_string(),
                "Blaster Rifle".to_string(),
                "Armor".to_string(),
            ])
            .with_biomes(vec![Biome::Urban, Biome::Desert, Biome::Ice])
            .with_faction("Galactic Empire")
            .with_description("A loyal soldier of the Galactic Empire"),
        );
    } else if planet.government.contains("Republic") {
        let cr = match tier {
            DifficultyTier::Early => 0.8,
            DifficultyTier::Mid => 2.0,
            DifficultyTier::Late => 3.5,
        };
        troops.push(
            EnemyRecord::new(
                "Corrupted Republic Guard",
                "Human",
                cr,
                (18.0 + cr * 12.0) as i32,
                (13.0 + cr) as i32,
            )
            .with_abilities(vec![
                "Republic Training".to_string(),
                "Defensive Stance".to_string(),
            ])
            .with_loot(vec![
                "Republic Credits".to_string(),
                "Security Codes".to_string(),
                "Armor".to_string(),
            ])
            .with_biomes(vec![Biome::Urban, Biome::Forest])
            .with_faction("Corrupted Republic")
            .with_description("A Republic guard turned to corruption"),
        );
    } else if planet.government.contains("Corporate") {
        let cr = match tier {
            DifficultyTier::Early => 1.2,
            DifficultyTier::Mid => 2.8,
            DifficultyTier::Late => 4.5,
        };
        troops.push(
            EnemyRecord::new(
                "Corporate Security",
                "Human",
                cr,
                (22.0 + cr * 8.0) as i32,
                (15.0 + cr * 0.8) as i32,
            )
            .with_abilities(vec![
                "Corporate Equipment".to_string(),
                "Non-Lethal Options".to_string(),
            ])
            .with_loot(vec![
                "Corporate Scrip".to_string(),
                "Security Badge".to_string(),
                "Stun Weapons".to_string(),
            ])
            .with_biomes(vec![Biome::Urban, Biome::Volcanic])
            .with_faction("Corporate")
            .with_description("Well-equipped corporate security personnel"),
        );
    }

    troops
}

/// Enemies that can appear on a planet: catalog entries matching the
/// biome plus government garrison troops. A biome with no matching
/// catalog entries falls back to the unfiltered catalog rather than
/// producing an empty pool.
pub fn enemies_for_planet(planet: &PlanetRecord) -> Vec<EnemyRecord> {
    let mut pool: Vec<EnemyRecord> = templates()
        .iter()
        .filter(|enemy| enemy.biomes.contains(&planet.biome))
        .cloned()
        .collect();

    if pool.is_empty() {
        pool = templates().to_vec();
    }

    pool.extend(faction_enemies(planet));
    pool
}

// ============================================================================
// Scaling and assembly
// ============================================================================

/// Scale an enemy copy for a difficulty tier. CR and hit points take
/// the full tier multiplier; armor widens by half the multiplier's
/// delta. Late-tier enemies are promoted to "Elite" exactly once.
pub fn scale_for_tier(enemy: &EnemyRecord, tier: DifficultyTier) -> EnemyRecord {
    let multiplier = tier.stat_multiplier();

    let mut scaled = enemy.clone();
    scaled.challenge_rating = enemy.challenge_rating * multiplier;
    scaled.hit_points = (enemy.hit_points as f64 * multiplier) as i32;
    scaled.armor = (enemy.armor as f64 * (1.0 + (multiplier - 1.0) * 0.5)) as i32;

    if tier == DifficultyTier::Late && !scaled.name.starts_with("Elite ") {
        scaled.name = format!("Elite {}", scaled.name);
        scaled.abilities.push("Elite Training".to_string());
    }

    scaled
}

/// Assemble an enemy group against a target CR.
///
/// Greedy, randomized and bounded: candidates are filtered to those
/// within a 20% overshoot of the remaining budget, one is picked
/// uniformly, and its count is capped at three or whatever the budget
/// allows. An exhausted candidate filter ends assembly early with an
/// undershooting group, which is accepted. Selected copies are scaled
/// for the destination tier before being returned.
pub fn build_group<R: Rng>(
    pool: &[EnemyRecord],
    target_cr: f64,
    tier: DifficultyTier,
    rng: &mut R,
) -> Vec<EnemyGroup> {
    let mut sorted: Vec<&EnemyRecord> = pool.iter().collect();
    sorted.sort_by(|a, b| {
        a.challenge_rating
            .partial_cmp(&b.challenge_rating)
            .unwrap_or(Ordering::Equal)
    });

    let mut group: Vec<(EnemyRecord, u32)> = Vec::new();
    let mut remaining = target_cr;

    while remaining > MIN_REMAINING_CR && group.len() < MAX_GROUP_SIZE {
        let suitable: Vec<&&EnemyRecord> = sorted
            .iter()
            .filter(|e| e.challenge_rating <= remaining * OVERSHOOT_TOLERANCE)
            .collect();

        if suitable.is_empty() {
            break;
        }

        let selected = suitable[rng.gen_range(0..suitable.len())];
        let cap = (remaining / selected.challenge_rating + 1.0)
            .floor()
            .clamp(1.0, 3.0) as u32;
        let count = rng.gen_range(1..=cap);

        remaining -= selected.challenge_rating * count as f64;
        group.push(((**selected).clone(), count));
    }

    group
        .into_iter()
        .map(|(enemy, count)| EnemyGroup {
            enemy: scale_for_tier(&enemy, tier),
            count,
        })
        .collect()
}

/// Generate a full encounter at a location.
pub fn generate_encounter<R: Rng>(
    pool: &[EnemyRecord],
    target_cr: f64,
    tier: DifficultyTier,
    location: &str,
    rng: &mut R,
) -> EncounterRecord {
    let kind = select_kind(rng);
    let enemies = build_group(pool, target_cr, tier, rng);

    let total_cr = enemies
        .iter()
        .map(|g| g.enemy.challenge_rating * g.count as f64)
        .sum();

    let description = describe(&enemies, location, kind);
    let conditions = special_conditions(location, kind);
    let id = format!("enc-{}", rng.gen_range(1000..10000));

    EncounterRecord {
        id,
        enemies,
        total_cr,
        kind,
        location: location.to_string(),
        description,
        conditions,
    }
}

fn select_kind<R: Rng>(rng: &mut R) -> EncounterKind {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (kind, weight) in KIND_WEIGHTS {
        cumulative += weight;
        if roll <= cumulative {
            return *kind;
        }
    }
    EncounterKind::Combat
}

fn describe(enemies: &[EnemyGroup], location: &str, kind: EncounterKind) -> String {
    let names: Vec<String> = enemies
        .iter()
        .map(|g| {
            if g.count > 1 {
                format!("{} {}s", g.count, g.enemy.name)
            } else {
                format!("a {}", g.enemy.name)
            }
        })
        .collect();
    let roster = names.join(", ");

    match kind {
        EncounterKind::Combat => {
            format!("You encounter {roster} in {location}. They appear hostile!")
        }
        EncounterKind::Stealth => format!(
            "You spot {roster} patrolling {location}. You might be able to sneak past."
        ),
        EncounterKind::Social => {
            format!("You meet {roster} in {location}. They seem willing to talk.")
        }
        EncounterKind::Puzzle => format!(
            "You find {roster} trapped in {location}. There might be a way to help them."
        ),
    }
}

fn special_conditions(location: &str, kind: EncounterKind) -> Vec<String> {
    let lowered = location.to_lowercase();
    let mut conditions = Vec::new();

    if lowered.contains("cave") {
        conditions.push("Limited visibility".to_string());
    }
    if lowered.contains("lava") || lowered.contains("volcanic") {
        conditions.push("Heat damage".to_string());
    }
    if lowered.contains("ice") || lowered.contains("frozen") {
        conditions.push("Slippery terrain".to_string());
    }
    if lowered.contains("city") {
        conditions.push("Civilian bystanders".to_string());
    }

    match kind {
        EncounterKind::Stealth => conditions.push("Stealth advantage available".to_string()),
        EncounterKind::Social => conditions.push("Diplomacy possible".to_string()),
        _ => {}
    }

    conditions
}
