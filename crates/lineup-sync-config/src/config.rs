use crate::error::ConfigError;
use crate::paths::resolve_relative;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelConfig {
    pub name: String,
    pub number: u32,
    pub source: ChannelSource,
    #[serde(default = "default_true")]
    pub replace_existing: bool,
    #[serde(default = "default_true")]
    pub randomize: bool,
}

/// Where a channel's wanted titles come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelSource {
    /// Named playlist on the catalog server, already resolved
    #[serde(alias = "plex_playlist")]
    CatalogPlaylist { playlist_name: String },
    /// Public list page (Letterboxd), paginated
    #[serde(alias = "letterboxd")]
    ListUrl { url: String },
    /// Newline-delimited titles; relative paths resolve against the config file
    MovieFile { path: PathBuf },
}

fn default_true() -> bool {
    true
}

impl ChannelSource {
    pub fn type_name(&self) -> &'static str {
        match self {
            ChannelSource::CatalogPlaylist { .. } => "catalog_playlist",
            ChannelSource::ListUrl { .. } => "list_url",
            ChannelSource::MovieFile { .. } => "movie_file",
        }
    }

    /// Short human description used in logs and reports
    pub fn describe(&self) -> String {
        match self {
            ChannelSource::CatalogPlaylist { playlist_name } => format!("playlist '{}'", playlist_name),
            ChannelSource::ListUrl { url } => format!("list {}", url),
            ChannelSource::MovieFile { path } => format!("file {}", path.display()),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            ChannelSource::CatalogPlaylist { playlist_name } => {
                if playlist_name.trim().is_empty() {
                    return Err("'playlist_name' is required for catalog_playlist source type".to_string());
                }
            }
            ChannelSource::ListUrl { url } => {
                let url = url.trim();
                if url.is_empty() {
                    return Err("'url' is required for list_url source type".to_string());
                }
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("'url' must be an http(s) URL, got '{}'", url));
                }
            }
            ChannelSource::MovieFile { path } => {
                if path.as_os_str().is_empty() {
                    return Err("'path' is required for movie_file source type".to_string());
                }
            }
        }
        Ok(())
    }
}

impl ChannelConfig {
    /// Match a `--channel` selector against the channel name (case-insensitive) or number.
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if let Ok(number) = selector.parse::<u32>() {
            if number == self.number {
                return true;
            }
        }
        self.name.eq_ignore_ascii_case(selector)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("channel 'name' is required".to_string());
        }
        if self.number == 0 {
            return Err("channel 'number' must be at least 1".to_string());
        }
        self.source.validate()
    }
}

impl Config {
    /// Load, resolve and validate a channels file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config = Self::from_toml_str(&content, base_dir).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            operation = "config_load",
            channels = config.channels.len(),
            path = %path.display(),
            "Loaded {} channel configurations",
            config.channels.len()
        );
        Ok(config)
    }

    /// Parse a channels document. Relative file sources are resolved against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        for channel in &mut config.channels {
            if let ChannelSource::MovieFile { path } = &mut channel.source {
                if !path.as_os_str().is_empty() {
                    *path = resolve_relative(base_dir, path);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }

        let mut numbers: HashMap<u32, &str> = HashMap::new();
        for (index, channel) in self.channels.iter().enumerate() {
            channel.validate().map_err(|reason| ConfigError::InvalidChannel {
                index,
                name: channel.name.clone(),
                reason,
            })?;

            if let Some(first) = numbers.insert(channel.number, &channel.name) {
                return Err(ConfigError::DuplicateNumber {
                    number: channel.number,
                    first: first.to_string(),
                    second: channel.name.clone(),
                });
            }
            debug!(
                channel = %channel.name,
                number = channel.number,
                source = channel.source.type_name(),
                "Validated channel configuration"
            );
        }
        Ok(())
    }

    /// Channels selected by the given selectors; all channels when empty.
    pub fn select_channels(&self, selectors: &[String]) -> Vec<&ChannelConfig> {
        if selectors.is_empty() {
            return self.channels.iter().collect();
        }
        self.channels
            .iter()
            .filter(|c| selectors.iter().any(|s| c.matches(s)))
            .collect()
    }
}
