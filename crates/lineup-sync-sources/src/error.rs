use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to an external collaborator (catalog server, list site,
/// title file or lineup store).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {endpoint} returned {status}: {body}")]
    Status {
        method: String,
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {0}")]
    Parse(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl SourceError {
    pub(crate) fn http(context: impl Into<String>, source: reqwest::Error) -> Self {
        SourceError::Http {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        SourceError::Decode {
            context: context.into(),
            source,
        }
    }

    /// HTTP status when the remote side answered with a non-success code
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
