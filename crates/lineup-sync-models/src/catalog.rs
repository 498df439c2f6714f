use serde::{Deserialize, Serialize};

/// Media kind as reported by the catalog provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Episode,
    Track,
    Other,
}

impl MediaKind {
    /// Map a raw provider type string (e.g. Plex `type`) onto a kind.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("movie") => MediaKind::Movie,
            Some("episode") => MediaKind::Episode,
            Some("track") => MediaKind::Track,
            _ => MediaKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Episode => "episode",
            MediaKind::Track => "track",
            MediaKind::Other => "other",
        }
    }
}

/// One resolved hit from the catalog provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    /// Provider-internal identifier (Plex `ratingKey`)
    pub source_key: String,
    pub title: String,
    pub kind: MediaKind,
    /// Duration in milliseconds, 0 when unknown
    pub duration_ms: u64,
    pub year: Option<u32>,
    pub summary: Option<String>,
}

impl CatalogRecord {
    pub fn new(source_key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            title: title.into(),
            kind: MediaKind::Movie,
            duration_ms: 0,
            year: None,
            summary: None,
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_kind(mut self, kind: MediaKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}
