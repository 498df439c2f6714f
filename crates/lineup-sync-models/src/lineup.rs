use serde::{Deserialize, Serialize};

/// Program subtype understood by the lineup store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProgramSubtype {
    Movie,
    Episode,
    Track,
}

/// External id reference attached to a program definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalIdRef {
    #[serde(rename = "type")]
    pub id_type: String,
    pub source: String,
    #[serde(rename = "sourceId")]
    pub source_id: String,
    pub id: String,
}

/// Full definition of a program that the lineup store has not persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDefinition {
    #[serde(rename = "type")]
    pub program_type: String,
    pub persisted: bool,
    pub id: String,
    pub unique_id: String,
    pub title: String,
    pub duration: u64,
    pub subtype: ProgramSubtype,
    pub external_source_type: String,
    pub external_source_name: String,
    pub external_source_id: String,
    pub external_key: String,
    pub external_ids: Vec<ExternalIdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One slot in a submitted lineup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum LineupEntry {
    /// Reference to a program the store already knows about
    #[serde(rename = "persisted")]
    Persisted {
        #[serde(rename = "programId")]
        program_id: String,
        #[serde(rename = "duration")]
        duration_ms: u64,
    },
    /// Index into the `programs` list of the same request
    #[serde(rename = "index")]
    New { index: usize },
}

/// Atomic lineup replacement request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineupRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub append: bool,
    pub programs: Vec<ProgramDefinition>,
    pub lineup: Vec<LineupEntry>,
}

impl LineupRequest {
    pub fn manual(programs: Vec<ProgramDefinition>, lineup: Vec<LineupEntry>) -> Self {
        Self {
            request_type: "manual".to_string(),
            append: false,
            programs,
            lineup,
        }
    }
}

/// Program record returned by the store's batch lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedProgram {
    #[serde(default)]
    pub external_source_id: Option<String>,
    #[serde(default)]
    pub external_key: Option<String>,
    pub duration: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Serialized external id, when the store echoes it back
    #[serde(default)]
    pub unique_id: Option<String>,
}
