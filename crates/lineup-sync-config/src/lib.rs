pub mod config;
pub mod connection;
pub mod error;
pub mod paths;

pub use config::{ChannelConfig, ChannelSource, Config};
pub use connection::ConnectionSettings;
pub use error::ConfigError;
pub use paths::{resolve_config_path, PathManager, CONFIG_ENV_VAR};
