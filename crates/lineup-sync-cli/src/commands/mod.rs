use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use lineup_sync_config::{resolve_config_path, Config, ConnectionSettings};
use lineup_sync_sources::{PlexClient, TunarrClient};
use std::path::{Path, PathBuf};

pub mod channels;
pub mod playlists;
pub mod sync;
pub mod validate;

/// Resolve the channels file location and load it. Any problem here aborts
/// the command before a single request is made.
pub fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, Config)> {
    let path = resolve_config_path(explicit).wrap_err("Could not determine the channels file location")?;
    let config = Config::load_from_file(&path)
        .wrap_err_with(|| format!("Invalid channels file {}", path.display()))?;
    Ok((path, config))
}

pub fn connection_settings() -> Result<ConnectionSettings> {
    ConnectionSettings::from_env().wrap_err("Missing or invalid connection settings (check your environment or .env)")
}

pub async fn connect_plex(settings: &ConnectionSettings) -> Result<PlexClient> {
    PlexClient::connect(&settings.plex_url, &settings.plex_token)
        .await
        .wrap_err_with(|| format!("Failed to connect to Plex at {}", settings.plex_url))
}

pub fn connect_tunarr(settings: &ConnectionSettings) -> Result<TunarrClient> {
    TunarrClient::new(&settings.tunarr_url, settings.tunarr_api_key.as_deref())
        .wrap_err_with(|| format!("Failed to set up Tunarr client for {}", settings.tunarr_url))
}

/// `1h 05m` style duration for tables
pub fn format_duration_ms(ms: u64) -> String {
    let minutes = ms / 60_000;
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}
