use super::load_config;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::Table;
use lineup_sync_config::ConnectionSettings;
use serde_json::json;
use std::path::PathBuf;

pub fn run_validate(config_path: Option<PathBuf>, output: &Output) -> Result<bool> {
    let (path, config) = load_config(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Channel", "Type", "Source", "Replace", "Shuffle"]);
    for channel in &config.channels {
        table.add_row(vec![
            channel.number.to_string(),
            channel.name.clone(),
            channel.source.type_name().to_string(),
            channel.source.describe(),
            yes_no(channel.replace_existing),
            yes_no(channel.randomize),
        ]);
    }
    output.table(table);

    // Connection settings are not needed to validate, but a sync would fail without them
    let connection = ConnectionSettings::from_env();
    if let Err(e) = &connection {
        output.warn(format!("Connection settings incomplete: {}", e));
    }

    output.json(&json!({
        "valid": true,
        "path": path.display().to_string(),
        "channels": config.channels,
        "connection_ready": connection.is_ok(),
    }));
    output.success(format!(
        "{} is valid ({} channels)",
        path.display(),
        config.channels.len()
    ));
    Ok(true)
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
