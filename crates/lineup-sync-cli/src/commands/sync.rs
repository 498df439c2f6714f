use super::{connect_plex, connect_tunarr, connection_settings, load_config};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use lineup_sync_core::{ChannelOutcome, NotFoundReport, SyncOptions, SyncOrchestrator, SyncSummary};
use lineup_sync_sources::{CatalogProvider, SourceFactory};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Returns whether every selected channel synced.
pub async fn run_sync(
    config_path: Option<PathBuf>,
    selectors: Vec<String>,
    options: SyncOptions,
    output: &Output,
) -> Result<bool> {
    tracing::debug!("Sync command started");

    let (path, config) = load_config(config_path.as_deref())?;
    let channels = config.select_channels(&selectors);
    if channels.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "No channel in {} matches {}",
            path.display(),
            selectors.join(", ")
        ));
    }

    let settings = connection_settings()?;
    let plex = connect_plex(&settings).await?;
    let tunarr = connect_tunarr(&settings)?;

    if options.dry_run {
        output.warn("Dry run: no changes will be made in Tunarr");
    }

    let catalog: Arc<dyn CatalogProvider> = Arc::new(plex);
    let factory = Arc::new(SourceFactory::new(catalog.clone()));
    let orchestrator = SyncOrchestrator::new(catalog, Arc::new(tunarr), factory).with_options(options);

    let summary = orchestrator.sync(channels).await;
    report(&summary, output);
    Ok(summary.is_success())
}

fn report(summary: &SyncSummary, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "success": summary.is_success(),
            "succeeded": summary.succeeded(),
            "failed": summary.failed(),
            "duration_seconds": summary.duration.as_secs_f64(),
            "channels": summary.outcomes,
        }));
        return;
    }

    output.table(outcome_table(&summary.outcomes));

    for outcome in &summary.outcomes {
        if let Some(report) = &outcome.report {
            if !report.not_found.is_empty() {
                output.warn(format!(
                    "{}: {} titles not found in Plex\n{}",
                    outcome.name,
                    report.not_found.len(),
                    NotFoundReport::new(&report.not_found)
                ));
            }
        }
        if let Some(error) = &outcome.error {
            output.error(format!("{} (#{}): {}", outcome.name, outcome.number, error));
        }
    }

    if summary.is_success() {
        output.success(summary.summary_line());
    } else {
        output.error(summary.summary_line());
    }
}

fn outcome_table(outcomes: &[ChannelOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Channel", "Source", "Status", "Programs", "New", "Not found", "Notes"]);

    for outcome in outcomes {
        let status = if outcome.is_success() {
            Cell::new("✓ ok").fg(Color::Green)
        } else {
            Cell::new("✗ failed").fg(Color::Red)
        };

        let (programs, new, not_found, notes) = match &outcome.report {
            Some(report) => {
                let mut notes = Vec::new();
                if report.created {
                    notes.push("created".to_string());
                }
                if let Some(old) = &report.renamed_from {
                    notes.push(format!("renamed from '{}'", old));
                }
                if report.cleared {
                    match report.previous_programs {
                        Some(n) => notes.push(format!("cleared {} programs", n)),
                        None => notes.push("cleared".to_string()),
                    }
                }
                if report.dry_run {
                    notes.push("dry run".to_string());
                }
                (
                    report.resolved.to_string(),
                    report.new_programs.to_string(),
                    report.not_found.len().to_string(),
                    notes.join(", "),
                )
            }
            None => (
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                outcome.stage.map(|s| format!("failed while {}", s)).unwrap_or_default(),
            ),
        };

        table.add_row(vec![
            Cell::new(outcome.number),
            Cell::new(&outcome.name),
            Cell::new(&outcome.source),
            status,
            Cell::new(programs),
            Cell::new(new),
            Cell::new(not_found),
            Cell::new(notes),
        ]);
    }
    table
}
