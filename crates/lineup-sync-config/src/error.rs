use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems. Raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no channels defined in configuration file")]
    NoChannels,

    #[error("invalid channel configuration at index {index} ({name}): {reason}")]
    InvalidChannel {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("channel number {number} is used by both '{first}' and '{second}'")]
    DuplicateNumber {
        number: u32,
        first: String,
        second: String,
    },

    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("could not determine config directory")]
    NoConfigDir,
}
