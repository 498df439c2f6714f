use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use tracing::{debug, trace};
use crate::error::SourceError;

const CLIENT_IDENTIFIER: &str = "lineup-sync";

#[derive(Debug, Deserialize)]
struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

/// `GET /` on a Plex server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerIdentity {
    #[serde(rename = "friendlyName")]
    pub friendly_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    #[serde(rename = "ratingKey", deserialize_with = "string_or_number")]
    pub rating_key: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexMetadata {
    #[serde(rename = "ratingKey", deserialize_with = "string_or_number")]
    pub rating_key: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<PlaylistSummary>,
}

#[derive(Debug, Deserialize)]
struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<PlexMetadata>,
    #[serde(rename = "Video", default)]
    video: Vec<PlexMetadata>,
    #[serde(rename = "SearchResult", default)]
    search_results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "Metadata", default)]
    metadata: Option<PlexMetadata>,
}

impl MetadataContainer {
    /// Items can arrive under "Metadata", "Video" or wrapped in "SearchResult"
    fn into_items(self) -> Vec<PlexMetadata> {
        let mut items = self.metadata;
        items.extend(self.video);
        items.extend(self.search_results.into_iter().filter_map(|hit| hit.metadata));
        items
    }
}

/// Plex sends rating keys as strings, a few endpoints as numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Number(u64),
    }

    match Key::deserialize(deserializer) {
        Ok(Key::Text(s)) if !s.is_empty() => Ok(s),
        Ok(Key::Text(_)) => Err(de::Error::custom("empty ratingKey")),
        Ok(Key::Number(n)) => Ok(n.to_string()),
        Err(e) => Err(e),
    }
}

pub struct PlexHttpClient {
    client: Client,
    server_url: String,
}

impl PlexHttpClient {
    pub fn new(server_url: &str, token: &str) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-plex-token"),
            HeaderValue::from_str(token)
                .map_err(|_| SourceError::InvalidConfig("Plex token contains invalid characters".to_string()))?,
        );
        headers.insert(
            HeaderName::from_static("x-plex-client-identifier"),
            HeaderValue::from_static(CLIENT_IDENTIFIER),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::http("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.server_url, path);
        trace!("Plex: GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::http(format!("Failed to reach Plex at {}", path), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::http(format!("Failed to read Plex response for {}", path), e))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                method: "GET".to_string(),
                endpoint: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PlexResponse<T> =
            serde_json::from_str(&body).map_err(|e| SourceError::decode(format!("Plex response for {}", path), e))?;
        Ok(parsed.media_container)
    }

    pub async fn identity(&self) -> Result<ServerIdentity, SourceError> {
        self.get_json("/").await
    }

    pub async fn playlists(&self) -> Result<Vec<PlaylistSummary>, SourceError> {
        let container: PlaylistContainer = self.get_json("/playlists").await?;
        debug!("Plex: Found {} playlists", container.metadata.len());
        Ok(container.metadata)
    }

    pub async fn playlist_items(&self, rating_key: &str) -> Result<Vec<PlexMetadata>, SourceError> {
        let path = format!("/playlists/{}/items", urlencoding::encode(rating_key));
        let container: MetadataContainer = self.get_json(&path).await?;
        Ok(container.into_items())
    }

    /// Library search for movies matching a title, in Plex's ranking order
    pub async fn search(&self, title: &str) -> Result<Vec<PlexMetadata>, SourceError> {
        let path = format!(
            "/library/search?query={}&type=1&includeGuids=1",
            urlencoding::encode(title)
        );
        let container: MetadataContainer = self.get_json(&path).await?;
        let items = container.into_items();
        debug!("Plex search: Found {} results for '{}'", items.len(), title);
        Ok(items)
    }
}
