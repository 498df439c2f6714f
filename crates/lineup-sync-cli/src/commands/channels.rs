use super::{connect_tunarr, connection_settings, format_duration_ms};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::Table;
use lineup_sync_sources::LineupStore;
use serde_json::json;
use tracing::warn;

pub async fn run_channels(output: &Output) -> Result<bool> {
    let settings = connection_settings()?;
    let tunarr = connect_tunarr(&settings)?;

    let mut channels = tunarr.list_channels().await.wrap_err("Failed to list Tunarr channels")?;
    channels.sort_by_key(|c| c.number);

    let mut table = Table::new();
    table.set_header(vec!["#", "Channel", "Programs", "Length"]);
    let mut rows = Vec::new();
    for channel in &channels {
        let programming = match tunarr.get_channel_programming(&channel.id).await {
            Ok(programming) => Some(programming),
            Err(e) => {
                warn!("Could not read programming for channel {}: {}", channel.number, e);
                None
            }
        };
        table.add_row(vec![
            channel.number.to_string(),
            channel.name.clone(),
            programming
                .as_ref()
                .map(|p| p.program_count.to_string())
                .unwrap_or_else(|| "?".to_string()),
            programming
                .as_ref()
                .map(|p| format_duration_ms(p.total_duration_ms))
                .unwrap_or_else(|| "?".to_string()),
        ]);
        rows.push(json!({
            "id": channel.id,
            "number": channel.number,
            "name": channel.name,
            "programming": programming,
        }));
    }
    output.table(table);

    output.json(&json!({ "channels": rows }));
    output.success(format!("Found {} channels", channels.len()));
    Ok(true)
}
