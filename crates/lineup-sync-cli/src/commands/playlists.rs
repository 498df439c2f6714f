use super::{connect_plex, connection_settings};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::Table;
use lineup_sync_sources::CatalogProvider;
use serde_json::json;

pub async fn run_playlists(output: &Output) -> Result<bool> {
    let settings = connection_settings()?;
    let plex = connect_plex(&settings).await?;
    let playlists = plex.list_playlists().await.wrap_err("Failed to list Plex playlists")?;

    let mut table = Table::new();
    table.set_header(vec![format!("Playlists on {}", plex.server_name())]);
    for name in &playlists {
        table.add_row(vec![name.as_str()]);
    }
    output.table(table);

    output.json(&json!({
        "server": plex.server_name(),
        "playlists": playlists,
    }));
    output.success(format!("Found {} playlists", playlists.len()));
    Ok(true)
}
