use async_trait::async_trait;
use lineup_sync_models::WantedEntry;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};
use crate::error::SourceError;
use crate::title::split_title_year;
use crate::traits::{ListSource, SourceItems};

/// Flat text file with one title per line.
pub struct MovieFileSource {
    path: PathBuf,
}

impl MovieFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse newline-delimited titles: blank lines are skipped and exact
/// duplicates dropped, keeping the first occurrence.
pub fn parse_title_lines(content: &str) -> Vec<WantedEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !seen.insert(line.to_string()) {
            debug!(title = line, "Skipping duplicate title");
            continue;
        }
        let (title, year) = split_title_year(line);
        entries.push(WantedEntry::new(title, year));
    }
    entries
}

#[async_trait]
impl ListSource for MovieFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<SourceItems, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let entries = parse_title_lines(&content);
        info!(
            operation = "file_source",
            path = %self.path.display(),
            titles = entries.len(),
            "Read {} titles from file",
            entries.len()
        );
        Ok(SourceItems::Wanted(entries))
    }
}
