use serde::{Deserialize, Serialize};
use std::fmt;

const SEPARATOR: char = '|';

/// Composite join key between catalog records and persisted programs.
///
/// Serialized as `sourceType|sourceInstanceId|sourceKey`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExternalId {
    pub source_type: String,
    pub source_instance_id: String,
    pub source_key: String,
}

impl ExternalId {
    pub fn new(
        source_type: impl Into<String>,
        source_instance_id: impl Into<String>,
        source_key: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            source_instance_id: source_instance_id.into(),
            source_key: source_key.into(),
        }
    }

    /// Split a serialized id back into its parts.
    /// The source key is everything after the second separator.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.splitn(3, SEPARATOR);
        let source_type = parts.next().filter(|s| !s.is_empty())?;
        let source_instance_id = parts.next().filter(|s| !s.is_empty())?;
        let source_key = parts.next().filter(|s| !s.is_empty())?;
        Some(Self::new(source_type, source_instance_id, source_key))
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.source_type, SEPARATOR, self.source_instance_id, SEPARATOR, self.source_key
        )
    }
}
