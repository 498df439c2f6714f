use async_trait::async_trait;
use lineup_sync_config::ChannelSource;
use std::sync::Arc;
use crate::error::SourceError;
use crate::file::MovieFileSource;
use crate::letterboxd::LetterboxdClient;
use crate::traits::{CatalogProvider, ListSource, SourceItems};

/// Builds the list source for a channel's configured source.
pub trait ListSourceFactory: Send + Sync {
    fn create(&self, source: &ChannelSource) -> Result<Box<dyn ListSource>, SourceError>;
}

/// Playlist on the catalog server. Items come back already resolved.
pub struct PlaylistSource {
    catalog: Arc<dyn CatalogProvider>,
    playlist_name: String,
}

impl PlaylistSource {
    pub fn new(catalog: Arc<dyn CatalogProvider>, playlist_name: impl Into<String>) -> Self {
        Self {
            catalog,
            playlist_name: playlist_name.into(),
        }
    }
}

#[async_trait]
impl ListSource for PlaylistSource {
    fn describe(&self) -> String {
        format!("playlist '{}'", self.playlist_name)
    }

    async fn fetch(&self) -> Result<SourceItems, SourceError> {
        let records = self.catalog.list_items_of(&self.playlist_name).await?;
        Ok(SourceItems::Resolved(records))
    }
}

/// Default factory backed by the live catalog and HTTP clients.
pub struct SourceFactory {
    catalog: Arc<dyn CatalogProvider>,
}

impl SourceFactory {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }
}

impl ListSourceFactory for SourceFactory {
    fn create(&self, source: &ChannelSource) -> Result<Box<dyn ListSource>, SourceError> {
        match source {
            ChannelSource::CatalogPlaylist { playlist_name } => {
                Ok(Box::new(PlaylistSource::new(self.catalog.clone(), playlist_name.clone())))
            }
            ChannelSource::ListUrl { url } => Ok(Box::new(LetterboxdClient::new(url)?)),
            ChannelSource::MovieFile { path } => Ok(Box::new(MovieFileSource::new(path.clone()))),
        }
    }
}
