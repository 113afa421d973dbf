//! Campaign orchestration.
//!
//! Fans a [`CampaignConfig`] out into a complete [`CampaignPlan`]:
//! planets with difficulty progression, NPCs, loot tables, encounters,
//! a final boss and a three-act narrative outline.

use crate::boss::{self, BossRecord};
use crate::encounter::{self, EncounterRecord};
use crate::loot::{self, LootItem};
use crate::npc::{self, NPCRecord};
use crate::planet::{self, title_case, PlanetRecord, CANONICAL_WORLDS};
use crate::scaling::DifficultyTier;
use crate::seed::{Alignment, CampaignConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Loot items generated per planet.
const LOOT_TABLE_SIZE: usize = 20;

/// A loot table bound to the planet it was rolled for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub planet: String,
    pub tier: DifficultyTier,
    pub items: Vec<LootItem>,
}

/// The complete generated campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPlan {
    pub config: CampaignConfig,
    pub planets: Vec<PlanetRecord>,
    /// All NPCs, each locating itself by area name.
    pub npcs: Vec<NPCRecord>,
    pub loot_tables: Vec<LootTable>,
    pub encounters: Vec<EncounterRecord>,
    pub final_boss: BossRecord,
    pub main_quest_outline: String,
    pub campaign_summary: String,
}

/// Generate a campaign plan using the process-wide RNG.
pub fn generate(config: &CampaignConfig) -> CampaignPlan {
    generate_with_rng(config, &mut rand::thread_rng())
}

/// Generate a campaign plan with a caller-supplied RNG. A seeded RNG
/// makes the whole plan reproducible.
pub fn generate_with_rng<R: Rng>(config: &CampaignConfig, rng: &mut R) -> CampaignPlan {
    log::info!(
        "generating campaign: {} planets over {} hours",
        config.planet_count,
        config.length_hours
    );

    let planet_count = config.planet_count.clamp(3, 15);

    let planets: Vec<PlanetRecord> = (0..planet_count)
        .map(|index| {
            let tier = DifficultyTier::for_position(index, planet_count);
            planet::generate(config, index, tier, CANONICAL_WORLDS, rng)
        })
        .collect();

    // The last world hosts the final confrontation.
    let final_planet = &planets[planets.len() - 1];
    let final_boss = boss::generate(config, Some(final_planet), rng);

    let mut npcs = Vec::new();
    let mut loot_tables = Vec::new();
    let mut encounters = Vec::new();

    for planet in &planets {
        npcs.extend(npc::generate_for_planet(planet, config, rng));

        loot_tables.push(LootTable {
            planet: planet.name.clone(),
            tier: planet.difficulty_tier,
            items: loot::generate_table(
                planet.biome,
                &planet.government,
                planet.difficulty_tier,
                LOOT_TABLE_SIZE,
                rng,
            ),
        });

        let pool = encounter::enemies_for_planet(planet);
        let (min_cr, max_cr) = planet.difficulty_tier.encounter_cr_range();
        for area in &planet.areas {
            let target_cr = rng.gen_range(min_cr..=max_cr);
            encounters.push(encounter::generate_encounter(
                &pool,
                target_cr,
                planet.difficulty_tier,
                &area.name,
                rng,
            ));
        }
    }

    let main_quest_outline = main_quest_outline(config, &planets, &final_boss);
    let campaign_summary = campaign_summary(config, &planets, &final_boss);

    CampaignPlan {
        config: config.clone(),
        planets,
        npcs,
        loot_tables,
        encounters,
        final_boss,
        main_quest_outline,
        campaign_summary,
    }
}

/// Three-act outline built by literal substitution so the text is
/// reproducible for a given plan.
fn main_quest_outline(
    config: &CampaignConfig,
    planets: &[PlanetRecord],
    final_boss: &BossRecord,
) -> String {
    let seed_title = title_case(&config.seed_text);
    let first = &planets[0].name;
    let last = &planets[planets.len() - 1].name;
    let middle = planets.len().saturating_sub(3);
    let boss = &final_boss.name;
    let arena = &final_boss.arena_description;

    match config.alignment_focus {
        Alignment::Dark => format!(
            "MAIN QUEST: {seed_title}\n\
\n\
ACT I - The Dark Path Begins\n\
- Start on {first}: Discover your dark potential\n\
- Learn of {boss}'s influence across the galaxy\n\
- Begin gathering power and followers\n\
\n\
ACT II - Rise to Power\n\
- Visit {middle} worlds to build your dark empire\n\
- Eliminate rivals and claim ancient Sith artifacts\n\
- Uncover the location of {boss}\n\
\n\
ACT III - The Final Confrontation\n\
- Arrive at {last} for the ultimate showdown\n\
- Face {boss} in {arena}\n\
- Claim your destiny as the new Dark Lord of the Sith"
        ),
        Alignment::Light => format!(
            "MAIN QUEST: {seed_title}\n\
\n\
ACT I - The Call to Adventure\n\
- Begin on {first}: Discover the threat to the galaxy\n\
- Learn of {boss}'s dark plans\n\
- Gather allies and begin your heroic journey\n\
\n\
ACT II - The Hero's Journey\n\
- Travel to {middle} worlds to stop the darkness\n\
- Save civilizations and gain powerful allies\n\
- Uncover {boss}'s weakness\n\
\n\
ACT III - The Light Triumphant\n\
- Confront {boss} on {last}\n\
- Rally your allies for the final battle in {arena}\n\
- Restore peace and balance to the galaxy"
        ),
        Alignment::Neutral => format!(
            "MAIN QUEST: {seed_title}\n\
\n\
ACT I - The Gray Path\n\
- Start on {first}: Navigate complex moral choices\n\
- Discover {boss}'s true motivations\n\
- Choose your own path between light and dark\n\
\n\
ACT II - Walking the Line\n\
- Visit {middle} worlds making difficult decisions\n\
- Build relationships across all factions\n\
- Prepare for the confrontation with {boss}\n\
\n\
ACT III - Your Destiny\n\
- Face {boss} on {last}\n\
- Make the ultimate choice in {arena}\n\
- Shape the galaxy's future according to your vision"
        ),
    }
}

fn campaign_summary(
    config: &CampaignConfig,
    planets: &[PlanetRecord],
    final_boss: &BossRecord,
) -> String {
    let mut names: Vec<String> = planets.iter().take(3).map(|p| p.name.clone()).collect();
    if planets.len() > 3 {
        names.push(format!("and {} other worlds", planets.len() - 3));
    }

    format!(
        "Campaign: {}\n\
Duration: {} hours\n\
Era: {}\n\
Alignment: {} Side focus\n\
\n\
Your journey will take you across {} worlds including {}.\n\
The ultimate confrontation awaits with {}, {}.\n\
\n\
This campaign emphasizes {} side choices and is set during the {} era.",
        title_case(&config.seed_text),
        config.length_hours,
        title_case(config.era.name()),
        title_case(config.alignment_focus.name()),
        planets.len(),
        names.join(", "),
        final_boss.name,
        final_boss.motivation,
        config.alignment_focus,
        config.era,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::parse_story_seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_campaign() {
        let config = parse_story_seed("Test 20-hour Jedi adventure");
        let mut rng = StdRng::seed_from_u64(50);

        let plan = generate_with_rng(&config, &mut rng);

        assert_eq!(plan.planets.len(), 6);
        assert_eq!(plan.loot_tables.len(), 6);
        assert!(!plan.npcs.is_empty());
        assert!(!plan.encounters.is_empty());
        assert_eq!(plan.config, config);
    }

    #[test]
    fn test_difficulty_progression() {
        let config = parse_story_seed("Test 20-hour Jedi adventure");
        let mut rng = StdRng::seed_from_u64(51);
        let plan = generate_with_rng(&config, &mut rng);

        let tiers: Vec<DifficultyTier> =
            plan.planets.iter().map(|p| p.difficulty_tier).collect();

        assert_eq!(tiers[0], DifficultyTier::Early);
        assert_eq!(*tiers.last().unwrap(), DifficultyTier::Late);
        assert!(tiers.contains(&DifficultyTier::Mid));
    }

    #[test]
    fn test_outline_has_three_acts() {
        for alignment in ["jedi hero", "sith apprentice", "smuggler"] {
            let config = parse_story_seed(&format!("a 15-hour {alignment} story"));
            let mut rng = StdRng::seed_from_u64(52);
            let plan = generate_with_rng(&config, &mut rng);

            let outline = &plan.main_quest_outline;
            assert!(outline.contains("ACT I"), "{alignment}");
            assert!(outline.contains("ACT II"), "{alignment}");
            assert!(outline.contains("ACT III"), "{alignment}");
            assert!(outline.contains(&plan.planets[0].name), "{alignment}");
            assert!(outline.contains(&plan.final_boss.name), "{alignment}");
        }
    }

    #[test]
    fn test_generation_deterministic_under_seed() {
        let config = parse_story_seed("Test 20-hour Jedi adventure");

        let mut rng_a = StdRng::seed_from_u64(53);
        let mut rng_b = StdRng::seed_from_u64(53);

        let plan_a = generate_with_rng(&config, &mut rng_a);
        let plan_b = generate_with_rng(&config, &mut rng_b);

        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn test_encounters_cover_every_area() {
        let config = parse_story_seed("Test 18-hour Jedi adventure");
        let mut rng = StdRng::seed_from_u64(54);
        let plan = generate_with_rng(&config, &mut rng);

        let area_total: usize = plan.planets.iter().map(|p| p.areas.len()).sum();
        assert_eq!(plan.encounters.len(), area_total);
    }

    #[test]
    fn test_summary_mentions_boss() {
        let config = parse_story_seed("Test 20-hour Jedi adventure");
        let mut rng = StdRng::seed_from_u64(55);
        let plan = generate_with_rng(&config, &mut rng);

        assert!(plan.campaign_summary.contains(&plan.final_boss.name));
        assert!(plan.campaign_summary.contains("20 hours"));
    }

    #[test]
    fn test_plan_serialization_round_trip() {
        let config = parse_story_seed("Test 12-hour smuggler story");
        let mut rng = StdRng::seed_from_u64(56);
        let plan = generate_with_rng(&config, &mut rng);

        let json = serde_json::to_string(&plan).unwrap();
        let back: CampaignPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
