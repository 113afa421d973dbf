//! Memory entry types.

use super::store::CampaignId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a memory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its stored text form.
    pub fn parse(text: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(text)?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of narrative event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    NpcInteraction,
    MoralChoice,
    QuestCompletion,
    Dialogue,
}

impl EntryType {
    /// Get the stored name.
    pub fn name(&self) -> &'static str {
        match self {
            EntryType::NpcInteraction => "npc_interaction",
            EntryType::MoralChoice => "moral_choice",
            EntryType::QuestCompletion => "quest_completion",
            EntryType::Dialogue => "dialogue",
        }
    }

    /// Parse a stored name back into a type.
    pub fn parse(text: &str) -> Option<EntryType> {
        match text {
            "npc_interaction" => Some(EntryType::NpcInteraction),
            "moral_choice" => Some(EntryType::MoralChoice),
            "quest_completion" => Some(EntryType::QuestCompletion),
            "dialogue" => Some(EntryType::Dialogue),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One recorded narrative event. Append-only: entries are never
/// mutated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    pub entry_type: EntryType,
    /// Location or situation context.
    pub context: String,
    /// What actually happened.
    pub content: String,
    /// How positive or negative the event was, -1.0..=1.0.
    pub emotional_weight: f64,
    pub characters_involved: Vec<String>,
    pub consequences: Vec<String>,
    pub tags: Vec<String>,
    pub campaign_id: CampaignId,
}

/// Builder for a new memory entry, before the store assigns identity
/// and timestamp.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry_type: EntryType,
    pub context: String,
    pub content: String,
    pub emotional_weight: f64,
    pub characters_involved: Vec<String>,
    pub consequences: Vec<String>,
    pub tags: Vec<String>,
}

impl NewEntry {
    pub fn new(
        entry_type: EntryType,
        context: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            entry_type,
            context: context.into(),
            content: content.into(),
            emotional_weight: 0.0,
            characters_involved: Vec::new(),
            consequences: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the emotional weight, clamped to -1.0..=1.0.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.emotional_weight = weight.clamp(-1.0, 1.0);
        self
    }

    pub fn with_characters(mut self, characters: Vec<String>) -> Self {
        self.characters_involved = characters;
        self
    }

    pub fn with_consequences(mut self, consequences: Vec<String>) -> Self {
        self.consequences = consequences;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Filters for querying the entry log.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub entry_type: Option<EntryType>,
    pub character: Option<String>,
    pub limit: Option<usize>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.character = Some(character.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Effective row limit; 50 when unset.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_names_round_trip() {
        for entry_type in [
            EntryType::NpcInteraction,
            EntryType::MoralChoice,
            EntryType::QuestCompletion,
            EntryType::Dialogue,
        ] {
            assert_eq!(EntryType::parse(entry_type.name()), Some(entry_type));
        }
        assert_eq!(EntryType::parse("nonsense"), None);
    }

    #[test]
    fn test_entry_type_serde_matches_name() {
        let json = serde_json::to_value(EntryType::MoralChoice).unwrap();
        assert_eq!(json, "moral_choice");
    }

    #[test]
    fn test_new_entry_clamps_weight() {
        let entry = NewEntry::new(EntryType::MoralChoice, "cantina", "spared the guard")
            .with_weight(3.5);
        assert_eq!(entry.emotional_weight, 1.0);

        let entry = NewEntry::new(EntryType::MoralChoice, "cantina", "shot first")
            .with_weight(-2.0);
        assert_eq!(entry.emotional_weight, -1.0);
    }

    #[test]
    fn test_filter_defaults() {
        let filter = EntryFilter::new();
        assert!(filter.entry_type.is_none());
        assert!(filter.character.is_none());
        assert_eq!(filter.effective_limit(), 50);
    }

    #[test]
    fn test_memory_entry_serialization_round_trip() {
        let entry = MemoryEntry {
            id: EntryId::new(),
            timestamp: Utc::now(),
            entry_type: EntryType::NpcInteraction,
            context: "Tatooine Cantina".to_string(),
            content: "Spoke with a merchant about rare crystals".to_string(),
            emotional_weight: 0.5,
            characters_involved: vec!["Bib'ala".to_string()],
            consequences: vec!["Learned location of crystal cave".to_string()],
            tags: vec!["merchant".to_string(), "crystals".to_string()],
            campaign_id: CampaignId::new(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: MemoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
