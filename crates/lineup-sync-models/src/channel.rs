use serde::{Deserialize, Serialize};

/// A channel as known by the lineup store, identified by its number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub id: String,
    pub name: String,
    pub number: u32,
}

/// Partial channel metadata update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ChannelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Summary of a channel's current programming.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ChannelProgramming {
    pub program_count: usize,
    pub total_duration_ms: u64,
}
