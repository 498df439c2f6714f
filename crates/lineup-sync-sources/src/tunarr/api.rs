use lineup_sync_models::{ChannelDescriptor, ChannelProgramming};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel as stored by Tunarr. Fields this crate does not model are kept
/// in `extra` so a read-modify-write round trip does not drop them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunarrChannel {
    pub id: String,
    pub name: String,
    pub number: u32,
    #[serde(rename = "transcodeConfigId", default, skip_serializing_if = "Option::is_none")]
    pub transcode_config_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TunarrChannel {
    pub fn descriptor(&self) -> ChannelDescriptor {
        ChannelDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            number: self.number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelIcon {
    pub path: String,
    pub width: u32,
    pub duration: u32,
    pub position: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflineSettings {
    pub mode: String,
    pub picture: String,
    pub soundtrack: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnDemandSettings {
    pub enabled: bool,
}

/// Body of a channel creation; everything except name and number takes
/// Tunarr's usual defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewChannel {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub duration: u64,
    pub disable_filler_overlay: bool,
    pub start_time: i64,
    pub stealth: bool,
    pub group_title: String,
    pub guide_minimum_duration: u64,
    pub icon: ChannelIcon,
    pub offline: OfflineSettings,
    pub on_demand: OnDemandSettings,
    pub stream_mode: String,
    pub transcode_config_id: String,
    pub subtitles_enabled: bool,
}

impl NewChannel {
    pub fn with_defaults(name: &str, number: u32, transcode_config_id: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            number,
            duration: 0,
            disable_filler_overlay: false,
            start_time: chrono::Utc::now().timestamp_millis(),
            stealth: false,
            group_title: "tunarr".to_string(),
            guide_minimum_duration: 30_000,
            icon: ChannelIcon {
                path: String::new(),
                width: 0,
                duration: 0,
                position: "bottom-right".to_string(),
            },
            offline: OfflineSettings {
                mode: "pic".to_string(),
                picture: String::new(),
                soundtrack: String::new(),
            },
            on_demand: OnDemandSettings { enabled: false },
            stream_mode: "hls".to_string(),
            transcode_config_id: transcode_config_id.unwrap_or_default(),
            subtitles_enabled: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateChannelRequest<'a> {
    #[serde(rename = "type")]
    pub request_type: &'static str,
    pub channel: &'a NewChannel,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchLookupRequest<'a> {
    #[serde(rename = "externalIds")]
    pub external_ids: &'a [String],
}

/// Media source registered in Tunarr (a Plex or Jellyfin server).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSource {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgrammingItem {
    #[serde(default)]
    pub duration: u64,
}

/// `GET /channels/{id}/programming` answers with the condensed lineup
/// object on current servers and a bare program list on older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProgrammingResponse {
    Condensed {
        #[serde(default)]
        lineup: Vec<ProgrammingItem>,
    },
    Flat(Vec<ProgrammingItem>),
}

impl From<ProgrammingResponse> for ChannelProgramming {
    fn from(response: ProgrammingResponse) -> Self {
        let items = match response {
            ProgrammingResponse::Condensed { lineup } => lineup,
            ProgrammingResponse::Flat(items) => items,
        };
        ChannelProgramming {
            program_count: items.len(),
            total_duration_ms: items.iter().map(|i| i.duration).sum(),
        }
    }
}
