//! Procedural RPG campaign generation with persistent player memory.
//!
//! This crate provides:
//! - A story seed interpreter that turns free text into a campaign
//!   configuration
//! - Generators for planets, NPCs, loot tables, encounters and a
//!   final boss, with difficulty progression across the campaign
//! - A SQLite-backed memory store that records narrative events and
//!   derives a per-player moral profile
//!
//! # Quick Start
//!
//! ```no_run
//! use starforge::{campaign, memory::MemoryStore, seed};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config =
//!         seed::parse_story_seed("I want a 20-hour story about a Jedi exile hunting a Sith relic");
//!     let plan = campaign::generate(&config);
//!     println!("{}", plan.campaign_summary);
//!
//!     let mut store = MemoryStore::open("memory.db")?;
//!     let ctx = store.start_campaign("player-1", "The Hunt", &config.seed_text)?;
//!     println!("campaign id: {}", ctx.campaign_id);
//!     Ok(())
//! }
//! ```
//!
//! Every generator takes a caller-supplied [`rand::Rng`]; seed one for
//! reproducible plans, or use the `generate` convenience wrappers that
//! draw from the process-wide generator.

pub mod boss;
pub mod campaign;
pub mod encounter;
pub mod loot;
pub mod memory;
pub mod npc;
pub mod planet;
pub mod scaling;
pub mod seed;

// Primary public API
pub use boss::BossRecord;
pub use campaign::{CampaignPlan, LootTable};
pub use encounter::{EncounterRecord, EnemyRecord};
pub use loot::{ItemKind, LootItem};
pub use memory::{
    EntryFilter, EntryType, MemoryEntry, MemoryError, MemoryStore, NewEntry, PlayerProfile,
    SessionContext,
};
pub use npc::NPCRecord;
pub use planet::{Biome, PlanetRecord};
pub use scaling::{DifficultyTier, Rarity};
pub use seed::{parse_story_seed, Alignment, CampaignConfig, Era};
