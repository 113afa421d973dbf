//! SQLite-backed memory store.
//!
//! Three tables: `memories` (the append-only event log), the
//! `player_profiles` aggregate, and `campaigns` session metadata.
//! List- and map-valued fields are serialized as JSON text columns.
//! All access is synchronous with one implicit transaction per logical
//! operation.

use super::entry::{EntryFilter, EntryId, EntryType, MemoryEntry, NewEntry};
use super::profile::PlayerProfile;
use super::{MemoryError, MemoryRepository};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS memories (
  entry_id TEXT PRIMARY KEY,
  timestamp TEXT NOT NULL,
  entry_type TEXT NOT NULL,
  context TEXT NOT NULL,
  content TEXT NOT NULL,
  emotional_weight REAL NOT NULL,
  characters_involved TEXT NOT NULL,
  consequences TEXT NOT NULL,
  tags TEXT NOT NULL,
  campaign_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS player_profiles (
  player_id TEXT PRIMARY KEY,
  light_side_points INTEGER NOT NULL DEFAULT 0,
  dark_side_points INTEGER NOT NULL DEFAULT 0,
  neutral_points INTEGER NOT NULL DEFAULT 0,
  decision_patterns TEXT NOT NULL DEFAULT '{}',
  preferred_solutions TEXT NOT NULL DEFAULT '[]',
  relationship_tendencies TEXT NOT NULL DEFAULT '{}',
  moral_flexibility REAL NOT NULL DEFAULT 0.5
);

CREATE TABLE IF NOT EXISTS campaigns (
  campaign_id TEXT PRIMARY KEY,
  player_id TEXT NOT NULL,
  campaign_name TEXT NOT NULL,
  created_date TEXT NOT NULL,
  last_played TEXT NOT NULL,
  story_seed TEXT NOT NULL,
  current_status TEXT NOT NULL DEFAULT 'active'
);
"#;

// ============================================================================
// Session types
// ============================================================================

/// Unique identifier for a campaign session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub Uuid);

impl CampaignId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its stored text form.
    pub fn parse(text: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(text)?))
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an active campaign session.
///
/// Obtained from [`MemoryStore::start_campaign`] or
/// [`MemoryStore::load_campaign`] and passed explicitly into every
/// per-campaign operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub campaign_id: CampaignId,
    pub player_id: String,
}

/// Stored campaign metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignInfo {
    pub campaign_id: CampaignId,
    pub player_id: String,
    pub campaign_name: String,
    pub created_date: DateTime<Utc>,
    pub last_played: DateTime<Utc>,
    pub story_seed: String,
    pub status: String,
}

// ============================================================================
// Store
// ============================================================================

/// The SQLite-backed memory store.
pub struct MemoryStore {
    conn: Connection,
}

impl MemoryStore {
    /// Open (or create) the store at a path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        log::info!("memory store opened at {}", path.as_ref().display());
        Ok(Self { conn })
    }

    /// Start a new campaign for a player and hand back its session
    /// context. Ensures the player has a profile row.
    pub fn start_campaign(
        &mut self,
        player_id: &str,
        campaign_name: &str,
        story_seed: &str,
    ) -> Result<SessionContext, MemoryError> {
        let campaign_id = CampaignId::new();
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO campaigns \
             (campaign_id, player_id, campaign_name, created_date, last_played, story_seed, current_status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active')",
            params![
                campaign_id.to_string(),
                player_id,
                campaign_name,
                now,
                now,
                story_seed
            ],
        )?;

        self.ensure_profile(player_id)?;
        log::info!("started campaign {campaign_id} for player {player_id}");

        Ok(SessionContext {
            campaign_id,
            player_id: player_id.to_string(),
        })
    }

    /// Resume an existing campaign, refreshing its last-played stamp.
    /// An unknown id is a loud error, not a silent no-op.
    pub fn load_campaign(&mut self, campaign_id: &CampaignId) -> Result<SessionContext, MemoryError> {
        let player_id: Option<String> = self
            .conn
            .query_row(
                "SELECT player_id FROM campaigns WHERE campaign_id = ?1",
                params![campaign_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let player_id = player_id
            .ok_or_else(|| MemoryError::UnknownCampaign(campaign_id.to_string()))?;

        self.conn.execute(
            "UPDATE campaigns SET last_played = ?1 WHERE campaign_id = ?2",
            params![Utc::now().to_rfc3339(), campaign_id.to_string()],
        )?;

        Ok(SessionContext {
            campaign_id: *campaign_id,
            player_id,
        })
    }

    /// Fetch stored metadata for a campaign.
    pub fn campaign_info(&self, campaign_id: &CampaignId) -> Result<CampaignInfo, MemoryError> {
        let row = self
            .conn
            .query_row(
                "SELECT campaign_id, player_id, campaign_name, created_date, last_played, \
                 story_seed, current_status FROM campaigns WHERE campaign_id = ?1",
                params![campaign_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?
            .ok_or_else(|| MemoryError::UnknownCampaign(campaign_id.to_string()))?;

        Ok(CampaignInfo {
            campaign_id: parse_campaign_id(&row.0)?,
            player_id: row.1,
            campaign_name: row.2,
            created_date: parse_timestamp(&row.3)?,
            last_played: parse_timestamp(&row.4)?,
            story_seed: row.5,
            status: row.6,
        })
    }

    /// Append a narrative event and synchronously fold it into the
    /// player's profile. Fails with [`MemoryError::UnknownCampaign`]
    /// when the context does not refer to a started campaign.
    pub fn add_entry(
        &mut self,
        ctx: &SessionContext,
        new: NewEntry,
    ) -> Result<EntryId, MemoryError> {
        let known: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM campaigns WHERE campaign_id = ?1",
                params![ctx.campaign_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if known.is_none() {
            return Err(MemoryError::UnknownCampaign(ctx.campaign_id.to_string()));
        }

        let entry = MemoryEntry {
            id: EntryId::new(),
            timestamp: Utc::now(),
            entry_type: new.entry_type,
            context: new.context,
            content: new.content,
            emotional_weight: new.emotional_weight.clamp(-1.0, 1.0),
            characters_involved: new.characters_involved,
            consequences: new.consequences,
            tags: new.tags,
            campaign_id: ctx.campaign_id,
        };

        self.put_entry(&entry)?;

        let mut profile = MemoryStore::profile(self, &ctx.player_id)?;
        profile.record(&entry);
        MemoryStore::save_profile(self, &profile)?;

        Ok(entry.id)
    }

    /// Fetch entries for the session, newest first.
    pub fn entries(
        &self,
        ctx: &SessionContext,
        filter: &EntryFilter,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        self.entries_for(&ctx.campaign_id, filter)
    }

    /// Fetch a player's profile, returning a fresh default when none
    /// has been stored yet.
    pub fn profile(&self, player_id: &str) -> Result<PlayerProfile, MemoryError> {
        let row = self
            .conn
            .query_row(
                "SELECT light_side_points, dark_side_points, neutral_points, \
                 decision_patterns, preferred_solutions, relationship_tendencies, \
                 moral_flexibility FROM player_profiles WHERE player_id = ?1",
                params![player_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, f64>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(PlayerProfile::new(player_id));
        };

        Ok(PlayerProfile {
            player_id: player_id.to_string(),
            light_side_points: row.0 as u32,
            dark_side_points: row.1 as u32,
            neutral_points: row.2 as u32,
            decision_patterns: decode_json(&row.3)?,
            preferred_solutions: decode_json(&row.4)?,
            relationship_tendencies: decode_json(&row.5)?,
            moral_flexibility: row.6,
        })
    }

    /// Persist a profile, inserting or replacing its row.
    pub fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), MemoryError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO player_profiles \
             (player_id, light_side_points, dark_side_points, neutral_points, \
              decision_patterns, preferred_solutions, relationship_tendencies, moral_flexibility) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                profile.player_id,
                profile.light_side_points as i64,
                profile.dark_side_points as i64,
                profile.neutral_points as i64,
                encode_json(&profile.decision_patterns)?,
                encode_json(&profile.preferred_solutions)?,
                encode_json(&profile.relationship_tendencies)?,
                profile.moral_flexibility,
            ],
        )?;
        Ok(())
    }

    /// Human-readable digest of recent events for conditioning a
    /// follow-up session, optionally focused on one character.
    pub fn context_summary(
        &self,
        ctx: &SessionContext,
        character: Option<&str>,
        recent: usize,
    ) -> Result<String, MemoryError> {
        let mut filter = EntryFilter::new().with_limit(recent);
        if let Some(name) = character {
            filter = filter.with_character(name);
        }

        let memories = self.entries(ctx, &filter)?;
        if memories.is_empty() {
            return Ok("No previous interactions recorded.".to_string());
        }

        let mut lines = vec!["Recent campaign events:".to_string()];
        for memory in &memories {
            lines.push(format!("- {} (in {})", memory.content, memory.context));
            if !memory.consequences.is_empty() {
                lines.push(format!(
                    "  Consequences: {}",
                    memory.consequences.join(", ")
                ));
            }
        }

        let profile = MemoryStore::profile(self, &ctx.player_id)?;
        lines.push(format!(
            "\nPlayer alignment tendency: {}",
            profile.alignment()
        ));

        if let Some(name) = character {
            let relationship = profile.relationship_with(name);
            if relationship > 0.3 {
                lines.push(format!("Player has a positive relationship with {name}"));
            } else if relationship < -0.3 {
                lines.push(format!("Player has a negative relationship with {name}"));
            }
        }

        Ok(lines.join("\n"))
    }

    fn ensure_profile(&mut self, player_id: &str) -> Result<(), MemoryError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM player_profiles WHERE player_id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .optional()?;

        if exists.is_none() {
            self.conn.execute(
                "INSERT INTO player_profiles (player_id) VALUES (?1)",
                params![player_id],
            )?;
        }
        Ok(())
    }
}

impl MemoryRepository for MemoryStore {
    fn put_entry(&mut self, entry: &MemoryEntry) -> Result<(), MemoryError> {
        self.conn.execute(
            "INSERT INTO memories \
             (entry_id, timestamp, entry_type, context, content, emotional_weight, \
              characters_involved, consequences, tags, campaign_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                entry.id.to_string(),
                entry.timestamp.to_rfc3339(),
                entry.entry_type.name(),
                entry.context,
                entry.content,
                entry.emotional_weight,
                encode_json(&entry.characters_involved)?,
                encode_json(&entry.consequences)?,
                encode_json(&entry.tags)?,
                entry.campaign_id.to_string(),
            ],
        )?;
        Ok(())
    }

    fn entries_for(
        &self,
        campaign_id: &CampaignId,
        filter: &EntryFilter,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        let mut sql = String::from(
            "SELECT entry_id, timestamp, entry_type, context, content, emotional_weight, \
             characters_involved, consequences, tags, campaign_id \
             FROM memories WHERE campaign_id = ?1",
        );
        let mut args: Vec<String> = vec![campaign_id.to_string()];

        if let Some(entry_type) = filter.entry_type {
            args.push(entry_type.name().to_string());
            sql.push_str(&format!(" AND entry_type = ?{}", args.len()));
        }
        if let Some(character) = &filter.character {
            // Character lists are stored as JSON arrays of strings.
            args.push(format!("%\"{character}\"%"));
            sql.push_str(&format!(" AND characters_involved LIKE ?{}", args.len()));
        }

        sql.push_str(&format!(
            " ORDER BY timestamp DESC, rowid DESC LIMIT {}",
            filter.effective_limit()
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let row = row?;
            entries.push(MemoryEntry {
                id: EntryId::parse(&row.0)
                    .map_err(|e| MemoryError::InvalidData(format!("entry id: {e}")))?,
                timestamp: parse_timestamp(&row.1)?,
                entry_type: EntryType::parse(&row.2).ok_or_else(|| {
                    MemoryError::InvalidData(format!("unknown entry type {}", row.2))
                })?,
                context: row.3,
                content: row.4,
                emotional_weight: row.5,
                characters_involved: decode_json(&row.6)?,
                consequences: decode_json(&row.7)?,
                tags: decode_json(&row.8)?,
                campaign_id: parse_campaign_id(&row.9)?,
            });
        }
        Ok(entries)
    }

    fn profile(&self, player_id: &str) -> Result<PlayerProfile, MemoryError> {
        MemoryStore::profile(self, player_id)
    }

    fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), MemoryError> {
        MemoryStore::save_profile(self, profile)
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, MemoryError> {
    serde_json::to_string(value).map_err(|e| MemoryError::InvalidData(e.to_string()))
}

fn decode_json<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T, MemoryError> {
    serde_json::from_str(text).map_err(|e| MemoryError::InvalidData(e.to_string()))
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, MemoryError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| MemoryError::InvalidData(format!("timestamp: {e}")))
}

fn parse_campaign_id(text: &str) -> Result<CampaignId, MemoryError> {
    CampaignId::parse(text).map_err(|e| MemoryError::InvalidData(format!("campaign id: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> MemoryStore {
        MemoryStore::open(dir.path().join("memory.db")).expect("store should open")
    }

    #[test]
    fn test_start_campaign_creates_profile() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let ctx = store
            .start_campaign("revan", "The Hunt", "a 20-hour jedi story")
            .unwrap();
        assert_eq!(ctx.player_id, "revan");

        let profile = store.profile("revan").unwrap();
        assert_eq!(profile.light_side_points, 0);
        assert_eq!(profile.moral_flexibility, 0.5);
    }

    #[test]
    fn test_load_unknown_campaign_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let missing = CampaignId::new();
        let result = store.load_campaign(&missing);
        assert!(matches!(result, Err(MemoryError::UnknownCampaign(_))));
    }

    #[test]
    fn test_add_entry_requires_known_campaign() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let forged = SessionContext {
            campaign_id: CampaignId::new(),
            player_id: "ghost".to_string(),
        };
        let result = store.add_entry(
            &forged,
            NewEntry::new(EntryType::Dialogue, "nowhere", "spoke to no one"),
        );
        assert!(matches!(result, Err(MemoryError::UnknownCampaign(_))));
    }

    #[test]
    fn test_entries_round_trip_and_order() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let ctx = store.start_campaign("revan", "Test", "seed").unwrap();

        for i in 0..4 {
            store
                .add_entry(
                    &ctx,
                    NewEntry::new(EntryType::Dialogue, "cantina", format!("line {i}"))
                        .with_tags(vec!["talk".to_string()]),
                )
                .unwrap();
        }

        let entries = store.entries(&ctx, &EntryFilter::new()).unwrap();
        assert_eq!(entries.len(), 4);
        // Newest first.
        assert_eq!(entries[0].content, "line 3");
        assert_eq!(entries[3].content, "line 0");
        assert_eq!(entries[0].tags, vec!["talk".to_string()]);
    }

    #[test]
    fn test_entry_filters() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let ctx = store.start_campaign("revan", "Test", "seed").unwrap();

        store
            .add_entry(
                &ctx,
                NewEntry::new(EntryType::MoralChoice, "cave", "spared the guardian")
                    .with_weight(0.8)
                    .with_characters(vec!["Guardian".to_string()]),
            )
            .unwrap();
        store
            .add_entry(
                &ctx,
                NewEntry::new(EntryType::Dialogue, "cantina", "chatted with the barkeep")
                    .with_characters(vec!["Barkeep".to_string()]),
            )
            .unwrap();

        let moral = store
            .entries(&ctx, &EntryFilter::new().with_type(EntryType::MoralChoice))
            .unwrap();
        assert_eq!(moral.len(), 1);
        assert_eq!(moral[0].content, "spared the guardian");

        let with_barkeep = store
            .entries(&ctx, &EntryFilter::new().with_character("Barkeep"))
            .unwrap();
        assert_eq!(with_barkeep.len(), 1);
        assert_eq!(with_barkeep[0].entry_type, EntryType::Dialogue);
    }

    #[test]
    fn test_profile_updates_on_insert() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let ctx = store.start_campaign("revan", "Test", "seed").unwrap();

        for _ in 0..6 {
            store
                .add_entry(
                    &ctx,
                    NewEntry::new(EntryType::MoralChoice, "field", "helped the refugees")
                        .with_weight(0.8)
                        .with_characters(vec!["X".to_string()]),
                )
                .unwrap();
        }

        let profile = store.profile("revan").unwrap();
        assert_eq!(profile.light_side_points, 6);
        assert_eq!(profile.dark_side_points, 0);
        assert!(profile.moral_flexibility.abs() < 1e-9);
        assert!((profile.relationship_with("X") - 0.48).abs() < 1e-9);
    }

    #[test]
    fn test_profile_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let campaign_id;
        {
            let mut store = open_store(&dir);
            let ctx = store.start_campaign("revan", "Test", "seed").unwrap();
            campaign_id = ctx.campaign_id;
            store
                .add_entry(
                    &ctx,
                    NewEntry::new(EntryType::MoralChoice, "bridge", "showed mercy")
                        .with_weight(0.9),
                )
                .unwrap();
        }

        let mut store = open_store(&dir);
        let ctx = store.load_campaign(&campaign_id).unwrap();
        assert_eq!(ctx.player_id, "revan");

        let profile = store.profile("revan").unwrap();
        assert_eq!(profile.light_side_points, 1);

        let entries = store.entries(&ctx, &EntryFilter::new()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unknown_player_gets_default_profile() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let profile = store.profile("nobody").unwrap();
        assert_eq!(profile.player_id, "nobody");
        assert_eq!(profile.total_decisions(), 0);
    }

    #[test]
    fn test_context_summary() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let ctx = store.start_campaign("revan", "Test", "seed").unwrap();

        assert_eq!(
            store.context_summary(&ctx, None, 10).unwrap(),
            "No previous interactions recorded."
        );

        for _ in 0..4 {
            store
                .add_entry(
                    &ctx,
                    NewEntry::new(EntryType::NpcInteraction, "market", "traded kindly")
                        .with_weight(0.9)
                        .with_characters(vec!["Mira".to_string()])
                        .with_consequences(vec!["Mira trusts you".to_string()]),
                )
                .unwrap();
        }

        let summary = store.context_summary(&ctx, Some("Mira"), 10).unwrap();
        assert!(summary.contains("Recent campaign events:"));
        assert!(summary.contains("traded kindly"));
        assert!(summary.contains("Consequences: Mira trusts you"));
        assert!(summary.contains("positive relationship with Mira"));
    }

    #[test]
    fn test_campaign_info() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let ctx = store
            .start_campaign("revan", "The Hunt", "a 20-hour jedi story")
            .unwrap();

        let info = store.campaign_info(&ctx.campaign_id).unwrap();
        assert_eq!(info.campaign_name, "The Hunt");
        assert_eq!(info.player_id, "revan");
        assert_eq!(info.status, "active");
        assert_eq!(info.story_seed, "a 20-hour jedi story");
    }
}
