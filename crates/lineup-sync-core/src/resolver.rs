use futures::stream::{self, StreamExt};
use lineup_sync_models::{CatalogRecord, WantedEntry};
use lineup_sync_sources::CatalogProvider;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Simultaneous catalog lookups per channel
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Not-found titles listed verbatim before the remainder is summarised
pub const NOT_FOUND_REPORT_LIMIT: usize = 10;

/// Outcome of resolving wanted entries against the catalog.
///
/// `found` is in completion order, not input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub found: Vec<CatalogRecord>,
    pub not_found: Vec<WantedEntry>,
}

impl Resolution {
    pub fn not_found_report(&self) -> NotFoundReport<'_> {
        NotFoundReport::new(&self.not_found)
    }
}

/// Human-facing list of unresolved titles, capped at [`NOT_FOUND_REPORT_LIMIT`].
/// Only the rendering is truncated.
pub struct NotFoundReport<'a> {
    entries: &'a [WantedEntry],
}

impl<'a> NotFoundReport<'a> {
    pub fn new(entries: &'a [WantedEntry]) -> Self {
        Self { entries }
    }

    pub fn shown(&self) -> &'a [WantedEntry] {
        &self.entries[..self.entries.len().min(NOT_FOUND_REPORT_LIMIT)]
    }

    pub fn remaining(&self) -> usize {
        self.entries.len().saturating_sub(NOT_FOUND_REPORT_LIMIT)
    }
}

impl fmt::Display for NotFoundReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.shown().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", entry)?;
        }
        if self.remaining() > 0 {
            write!(f, "\n  ... and {} more", self.remaining())?;
        }
        Ok(())
    }
}

/// Resolves wanted titles with a bounded number of lookups in flight.
pub struct CatalogResolver<'a> {
    catalog: &'a dyn CatalogProvider,
    concurrency: usize,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(catalog: &'a dyn CatalogProvider) -> Self {
        Self {
            catalog,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Look every entry up independently. A failed lookup counts as not
    /// found for that entry only and is not retried.
    pub async fn resolve(&self, entries: Vec<WantedEntry>) -> Resolution {
        let total = entries.len();
        info!(
            operation = "resolve",
            entries = total,
            concurrency = self.concurrency,
            "Searching catalog for {} titles",
            total
        );

        let outcomes: Vec<(WantedEntry, Option<CatalogRecord>)> = stream::iter(entries)
            .map(|entry| async move {
                let hit = match self.catalog.search(&entry.title, entry.year).await {
                    Ok(hit) => hit,
                    Err(e) => {
                        warn!("Catalog search failed for '{}': {}", entry, e);
                        None
                    }
                };
                (entry, hit)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut resolution = Resolution::default();
        for (entry, hit) in outcomes {
            match hit {
                Some(record) => {
                    debug!("Found: {} -> {} ({})", entry, record.title, record.source_key);
                    resolution.found.push(record);
                }
                None => {
                    debug!("Not found: {}", entry);
                    resolution.not_found.push(entry);
                }
            }
        }

        info!(
            operation = "resolve",
            found = resolution.found.len(),
            not_found = resolution.not_found.len(),
            "Found {}/{} titles in catalog",
            resolution.found.len(),
            total
        );
        if !resolution.not_found.is_empty() {
            warn!(
                "{} titles not found:\n{}",
                resolution.not_found.len(),
                resolution.not_found_report()
            );
        }
        resolution
    }
}
