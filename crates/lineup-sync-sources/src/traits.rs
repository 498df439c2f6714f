use async_trait::async_trait;
use lineup_sync_models::{
    CatalogRecord, ChannelDescriptor, ChannelPatch, ChannelProgramming, LineupRequest, PersistedProgram, WantedEntry,
};
use std::collections::HashMap;
use crate::error::SourceError;

/// Searchable media catalog (the Plex server).
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Source type used in external ids, e.g. "plex"
    fn source_type(&self) -> &str;

    /// Friendly server name; the lineup store registers media sources under it
    fn server_name(&self) -> &str;

    /// Ranked search results for a title, best first
    async fn search_candidates(&self, title: &str) -> Result<Vec<CatalogRecord>, SourceError>;

    /// First-best match for a title, preferring an exact year match when a year is given
    async fn search(&self, title: &str, year: Option<u32>) -> Result<Option<CatalogRecord>, SourceError> {
        let candidates = self.search_candidates(title).await?;
        Ok(best_match(candidates, year))
    }

    /// Ordered items of a named playlist
    async fn list_items_of(&self, playlist_name: &str) -> Result<Vec<CatalogRecord>, SourceError>;

    async fn list_playlists(&self) -> Result<Vec<String>, SourceError>;
}

/// Pick the candidate whose year matches exactly, else the first-ranked one.
///
/// Falling back to the first result can attach a different film that shares
/// the search query; that ambiguity is accepted.
pub fn best_match(candidates: Vec<CatalogRecord>, year: Option<u32>) -> Option<CatalogRecord> {
    if let Some(year) = year {
        if let Some(exact) = candidates.iter().position(|c| c.year == Some(year)) {
            return candidates.into_iter().nth(exact);
        }
    }
    candidates.into_iter().next()
}

/// What a list source produced for a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceItems {
    /// Records that came straight from the catalog (playlists); no resolution needed
    Resolved(Vec<CatalogRecord>),
    /// Titles that still have to be resolved against the catalog
    Wanted(Vec<WantedEntry>),
}

impl SourceItems {
    pub fn len(&self) -> usize {
        match self {
            SourceItems::Resolved(records) => records.len(),
            SourceItems::Wanted(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A channel's list source. Entries are already deduplicated.
#[async_trait]
pub trait ListSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<SourceItems, SourceError>;
}

/// Remote channel/lineup store (Tunarr).
///
/// Used from a single task only; implementations need not be safe for
/// concurrent callers.
#[async_trait]
pub trait LineupStore: Send + Sync {
    async fn list_channels(&self) -> Result<Vec<ChannelDescriptor>, SourceError>;

    /// Create a channel with provider defaults for every other attribute
    async fn create_channel(&self, name: &str, number: u32) -> Result<ChannelDescriptor, SourceError>;

    async fn update_channel(&self, channel_id: &str, patch: &ChannelPatch) -> Result<ChannelDescriptor, SourceError>;

    async fn get_channel_programming(&self, channel_id: &str) -> Result<ChannelProgramming, SourceError>;

    /// Remove all programming. Absence of programming is success.
    async fn delete_channel_programming(&self, channel_id: &str) -> Result<(), SourceError>;

    /// Batch lookup by serialized external ids; keyed by persisted program id
    async fn lookup_programs(&self, external_ids: &[String]) -> Result<HashMap<String, PersistedProgram>, SourceError>;

    /// Replace a channel's lineup atomically
    async fn replace_lineup(&self, channel_id: &str, request: &LineupRequest) -> Result<(), SourceError>;

    /// Id of the media source registered for a catalog server, if any
    async fn find_media_source(&self, source_type: &str, server_name: &str) -> Result<Option<String>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord::new("1", "Heat").with_year(1986),
            CatalogRecord::new("2", "Heat").with_year(1995),
            CatalogRecord::new("3", "Heat").with_year(2013),
        ]
    }

    #[test]
    fn test_best_match_prefers_exact_year() {
        let hit = best_match(candidates(), Some(1995)).unwrap();
        assert_eq!(hit.source_key, "2");
    }

    #[test]
    fn test_best_match_falls_back_to_first_result() {
        assert_eq!(best_match(candidates(), Some(1970)).unwrap().source_key, "1");
        assert_eq!(best_match(candidates(), None).unwrap().source_key, "1");
    }

    #[test]
    fn test_best_match_without_results() {
        assert!(best_match(Vec::new(), Some(1995)).is_none());
    }
}
