//! Persistent player memory.
//!
//! Records discrete narrative events per campaign and derives a
//! per-player moral profile from them. Backed by a local SQLite store;
//! every operation takes an explicit [`SessionContext`] rather than
//! relying on ambient "current campaign" state.

pub mod entry;
pub mod profile;
pub mod store;

pub use entry::{EntryFilter, EntryId, EntryType, MemoryEntry, NewEntry};
pub use profile::PlayerProfile;
pub use store::{CampaignId, CampaignInfo, MemoryStore, SessionContext};

use thiserror::Error;

/// Errors from memory operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The underlying store failed (disk unavailable, corrupt file).
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// An operation referenced a campaign that was never started.
    #[error("unknown campaign: {0}")]
    UnknownCampaign(String),

    /// A stored row could not be decoded.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

/// Storage interface for memory entries and profiles.
///
/// Generation code talks to this trait so the engine behind it stays
/// swappable.
pub trait MemoryRepository {
    /// Append an entry to the log.
    fn put_entry(&mut self, entry: &MemoryEntry) -> Result<(), MemoryError>;

    /// Fetch entries for a campaign, newest first.
    fn entries_for(
        &self,
        campaign_id: &CampaignId,
        filter: &EntryFilter,
    ) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// Fetch a player profile, defaulting when absent.
    fn profile(&self, player_id: &str) -> Result<PlayerProfile, MemoryError>;

    /// Persist a player profile.
    fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), MemoryError>;
}
