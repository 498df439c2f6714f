use async_trait::async_trait;
use lineup_sync_models::{CatalogRecord, MediaKind};
use tracing::{debug, info, warn};
use crate::error::SourceError;
use crate::plex::api::{PlexHttpClient, PlexMetadata};
use crate::traits::CatalogProvider;

pub const PLEX_SOURCE_TYPE: &str = "plex";

/// Connected Plex server acting as the catalog provider.
pub struct PlexClient {
    api: PlexHttpClient,
    server_name: String,
}

impl PlexClient {
    /// Connect and read the server identity.
    pub async fn connect(server_url: &str, token: &str) -> Result<Self, SourceError> {
        let api = PlexHttpClient::new(server_url, token)?;
        let identity = api.identity().await?;
        info!(
            operation = "plex_connect",
            server = %identity.friendly_name,
            "Connected to Plex server: {}",
            identity.friendly_name
        );
        Ok(Self {
            api,
            server_name: identity.friendly_name,
        })
    }

    fn to_catalog_record(item: PlexMetadata) -> CatalogRecord {
        CatalogRecord {
            source_key: item.rating_key,
            title: item.title,
            kind: MediaKind::from_raw(item.type_.as_deref()),
            duration_ms: item.duration.unwrap_or(0),
            year: item.year,
            summary: item.summary.filter(|s| !s.is_empty()),
        }
    }
}

#[async_trait]
impl CatalogProvider for PlexClient {
    fn source_type(&self) -> &str {
        PLEX_SOURCE_TYPE
    }

    fn server_name(&self) -> &str {
        &self.server_name
    }

    async fn search_candidates(&self, title: &str) -> Result<Vec<CatalogRecord>, SourceError> {
        let items = self.api.search(title).await?;
        Ok(items.into_iter().map(Self::to_catalog_record).collect())
    }

    async fn list_items_of(&self, playlist_name: &str) -> Result<Vec<CatalogRecord>, SourceError> {
        let playlists = self.api.playlists().await?;
        let Some(playlist) = playlists.into_iter().find(|p| p.title == playlist_name) else {
            warn!("Playlist not found: {}", playlist_name);
            return Err(SourceError::NotFound(format!("playlist '{}'", playlist_name)));
        };

        let items = self.api.playlist_items(&playlist.rating_key).await?;
        info!(
            operation = "plex_playlist",
            playlist = playlist_name,
            items = items.len(),
            "Retrieved {} items from playlist: {}",
            items.len(),
            playlist_name
        );
        let records: Vec<CatalogRecord> = items.into_iter().map(Self::to_catalog_record).collect();
        for record in records.iter().take(3) {
            debug!(
                "Plex playlist item: rating_key={}, title={}, kind={}, duration={}",
                record.source_key,
                record.title,
                record.kind.as_str(),
                record.duration_ms
            );
        }
        Ok(records)
    }

    async fn list_playlists(&self) -> Result<Vec<String>, SourceError> {
        let playlists = self.api.playlists().await?;
        Ok(playlists.into_iter().map(|p| p.title).collect())
    }
}
