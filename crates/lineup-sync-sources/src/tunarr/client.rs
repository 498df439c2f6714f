use async_trait::async_trait;
use lineup_sync_models::{
    ChannelDescriptor, ChannelPatch, ChannelProgramming, LineupRequest, PersistedProgram,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info, trace, warn};
use crate::error::SourceError;
use crate::traits::LineupStore;
use crate::tunarr::api::{
    BatchLookupRequest, CreateChannelRequest, MediaSource, NewChannel, ProgrammingResponse, TunarrChannel,
};

/// Tunarr REST client. One connection pool per run, driven from a single task.
pub struct TunarrClient {
    client: Client,
    base_url: String,
}

impl TunarrClient {
    pub fn new(url: &str, api_key: Option<&str>) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            headers.insert(
                HeaderName::from_static("x-api-key"),
                HeaderValue::from_str(key)
                    .map_err(|_| SourceError::InvalidConfig("Tunarr API key contains invalid characters".to_string()))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::http("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    async fn execute(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<String, SourceError> {
        let url = format!("{}/api{}", self.base_url, endpoint);
        trace!("Tunarr: {} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::http(format!("Tunarr request {} {} failed", method, endpoint), e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SourceError::http(format!("Failed to read Tunarr response for {}", endpoint), e))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SourceError> {
        let text = self.execute(Method::GET, endpoint, None).await?;
        parse(endpoint, &text)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, SourceError> {
        let text = self.execute(method, endpoint, Some(encode(endpoint, body)?)).await?;
        parse(endpoint, &text)
    }

    /// Raw channel list, including fields the descriptors leave out
    pub async fn channels(&self) -> Result<Vec<TunarrChannel>, SourceError> {
        let channels: Vec<TunarrChannel> = self.get_json("/channels").await?;
        info!("Retrieved {} channels", channels.len());
        Ok(channels)
    }

    pub async fn channel(&self, channel_id: &str) -> Result<TunarrChannel, SourceError> {
        self.get_json(&format!("/channels/{}", channel_id)).await
    }

    pub async fn media_sources(&self) -> Result<Vec<MediaSource>, SourceError> {
        self.get_json("/media-sources").await
    }
}

fn encode<B: Serialize>(endpoint: &str, body: &B) -> Result<Value, SourceError> {
    serde_json::to_value(body).map_err(|e| SourceError::decode(format!("request body for {}", endpoint), e))
}

fn parse<T: DeserializeOwned>(endpoint: &str, text: &str) -> Result<T, SourceError> {
    serde_json::from_str(text).map_err(|e| SourceError::decode(format!("Tunarr response for {}", endpoint), e))
}

#[async_trait]
impl LineupStore for TunarrClient {
    async fn list_channels(&self) -> Result<Vec<ChannelDescriptor>, SourceError> {
        Ok(self.channels().await?.iter().map(TunarrChannel::descriptor).collect())
    }

    async fn create_channel(&self, name: &str, number: u32) -> Result<ChannelDescriptor, SourceError> {
        // New channels borrow the transcode profile of the first existing one
        let transcode_config_id = match self.channels().await {
            Ok(channels) => channels.into_iter().next().and_then(|c| c.transcode_config_id),
            Err(e) => {
                warn!("Could not read existing channels for a transcode profile: {}", e);
                None
            }
        };

        let channel = NewChannel::with_defaults(name, number, transcode_config_id);
        let body = CreateChannelRequest {
            request_type: "new",
            channel: &channel,
        };
        let created: TunarrChannel = self.send_json(Method::POST, "/channels", &body).await?;
        info!(
            operation = "tunarr_create_channel",
            channel = name,
            number,
            "Created channel: {} (ID: {})",
            name,
            created.id
        );
        Ok(created.descriptor())
    }

    async fn update_channel(&self, channel_id: &str, patch: &ChannelPatch) -> Result<ChannelDescriptor, SourceError> {
        let mut channel = self.channel(channel_id).await?;
        if let Some(name) = &patch.name {
            channel.name = name.clone();
        }

        let endpoint = format!("/channels/{}", channel_id);
        self.execute(Method::PUT, &endpoint, Some(encode(&endpoint, &channel)?))
            .await?;
        info!("Updated channel ID: {}", channel_id);
        Ok(channel.descriptor())
    }

    async fn get_channel_programming(&self, channel_id: &str) -> Result<ChannelProgramming, SourceError> {
        let response: ProgrammingResponse = self
            .get_json(&format!("/channels/{}/programming", channel_id))
            .await?;
        let programming = ChannelProgramming::from(response);
        debug!(
            "Retrieved {} programs from channel {}",
            programming.program_count, channel_id
        );
        Ok(programming)
    }

    async fn delete_channel_programming(&self, channel_id: &str) -> Result<(), SourceError> {
        let endpoint = format!("/channels/{}/programming", channel_id);
        match self.execute(Method::DELETE, &endpoint, None).await {
            Ok(_) => {
                info!("Deleted all programming from channel {}", channel_id);
                Ok(())
            }
            Err(e) if e.status() == Some(404) => {
                info!("No programming to delete from channel {}", channel_id);
                Ok(())
            }
            Err(e) => {
                error!("Error deleting channel programming: {}", e);
                Err(e)
            }
        }
    }

    async fn lookup_programs(&self, external_ids: &[String]) -> Result<HashMap<String, PersistedProgram>, SourceError> {
        let body = BatchLookupRequest { external_ids };
        let found: HashMap<String, PersistedProgram> = self
            .send_json(Method::POST, "/programming/batch/lookup", &body)
            .await?;
        info!(
            operation = "tunarr_batch_lookup",
            requested = external_ids.len(),
            found = found.len(),
            "Batch lookup found {} programs",
            found.len()
        );
        Ok(found)
    }

    async fn replace_lineup(&self, channel_id: &str, request: &LineupRequest) -> Result<(), SourceError> {
        let endpoint = format!("/channels/{}/programming", channel_id);
        self.execute(Method::POST, &endpoint, Some(encode(&endpoint, request)?))
            .await?;
        info!(
            operation = "tunarr_replace_lineup",
            channel_id,
            lineup = request.lineup.len(),
            new_programs = request.programs.len(),
            "Submitted {} lineup entries to channel {}",
            request.lineup.len(),
            channel_id
        );
        Ok(())
    }

    async fn find_media_source(&self, source_type: &str, server_name: &str) -> Result<Option<String>, SourceError> {
        let sources = self.media_sources().await?;
        match sources
            .into_iter()
            .find(|s| s.source_type == source_type && s.name == server_name)
        {
            Some(source) => {
                info!(
                    "Found Tunarr media source for {} server '{}': {}",
                    source_type, server_name, source.id
                );
                Ok(Some(source.id))
            }
            None => {
                warn!("{} media source not found for server name: {}", source_type, server_name);
                Ok(None)
            }
        }
    }
}
