use lineup_sync_config::ChannelConfig;
use lineup_sync_models::{CatalogRecord, ChannelPatch, WantedEntry};
use lineup_sync_sources::{CatalogProvider, LineupStore, ListSourceFactory, SourceItems};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use crate::diff::{build_plan, lookup_ids, PersistedIndex};
use crate::error::{ChannelStage, ReconcileError, SyncError};
use crate::identity::ProgramIdentity;
use crate::resolver::CatalogResolver;
use crate::sync::SyncOptions;

/// What happened to one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelReport {
    /// Store id; `None` when a dry run would have created the channel
    pub channel_id: Option<String>,
    pub created: bool,
    pub renamed_from: Option<String>,
    pub cleared: bool,
    /// Program count before this run, when the channel already existed
    pub previous_programs: Option<usize>,
    pub resolved: usize,
    pub not_found: Vec<WantedEntry>,
    pub persisted: usize,
    pub new_programs: usize,
    pub dry_run: bool,
    pub submitted: bool,
}

/// Brings one channel's lineup in line with its source.
///
/// Resolving -> Locating -> Creating | Updating -> Clearing -> Submitting.
/// Nothing is written to the store until the source has produced at least
/// one resolved record and the catalog server is known to the store.
pub struct ChannelReconciler<'a> {
    catalog: &'a dyn CatalogProvider,
    store: &'a dyn LineupStore,
    factory: &'a dyn ListSourceFactory,
    options: &'a SyncOptions,
}

impl<'a> ChannelReconciler<'a> {
    pub fn new(
        catalog: &'a dyn CatalogProvider,
        store: &'a dyn LineupStore,
        factory: &'a dyn ListSourceFactory,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            catalog,
            store,
            factory,
            options,
        }
    }

    #[instrument(skip(self, channel), fields(channel = %channel.name, number = channel.number))]
    pub async fn reconcile(&self, channel: &ChannelConfig) -> Result<ChannelReport, ReconcileError> {
        let mut report = ChannelReport {
            dry_run: self.options.dry_run,
            ..ChannelReport::default()
        };

        // Resolving
        let mut records = self.resolve_source(channel, &mut report).await?;
        report.resolved = records.len();

        let identity = self.program_identity().await?;

        // Locating
        let channels = self
            .store
            .list_channels()
            .await
            .map_err(ReconcileError::target(ChannelStage::Locating))?;
        let existing = channels.into_iter().find(|c| c.number == channel.number);

        let channel_id = match existing {
            None => {
                report.created = true;
                if self.options.dry_run {
                    info!("Would create channel: {} (#{})", channel.name, channel.number);
                    None
                } else {
                    info!("Creating new channel: {} (#{})", channel.name, channel.number);
                    let created = self
                        .store
                        .create_channel(&channel.name, channel.number)
                        .await
                        .map_err(ReconcileError::target(ChannelStage::Creating))?;
                    Some(created.id)
                }
            }
            Some(found) => {
                info!("Channel already exists: {} (ID: {})", found.name, found.id);
                if found.name != channel.name {
                    info!("Renaming channel #{}: '{}' -> '{}'", channel.number, found.name, channel.name);
                    if !self.options.dry_run {
                        self.store
                            .update_channel(&found.id, &ChannelPatch::rename(channel.name.as_str()))
                            .await
                            .map_err(ReconcileError::target(ChannelStage::Updating))?;
                    }
                    report.renamed_from = Some(found.name.clone());
                }

                match self.store.get_channel_programming(&found.id).await {
                    Ok(programming) => report.previous_programs = Some(programming.program_count),
                    Err(e) => warn!("Could not read current programming: {}", e),
                }

                // Clearing
                if channel.replace_existing {
                    if self.options.dry_run {
                        info!("Would clear existing programming");
                    } else {
                        info!("Clearing existing programming");
                        self.store
                            .delete_channel_programming(&found.id)
                            .await
                            .map_err(ReconcileError::target(ChannelStage::Clearing))?;
                    }
                    report.cleared = true;
                }
                Some(found.id)
            }
        };
        report.channel_id = channel_id.clone();

        // Submitting
        if channel.randomize {
            let seed = self.options.shuffle_seed.map(|s| s.wrapping_add(u64::from(channel.number)));
            shuffle_records(&mut records, seed);
            debug!("Shuffled {} records", records.len());
        }

        let ids = lookup_ids(&records, &identity);
        let found = self
            .store
            .lookup_programs(&ids)
            .await
            .map_err(ReconcileError::target(ChannelStage::Submitting))?;
        let index = PersistedIndex::from_lookup(found);
        if index.is_empty() {
            debug!("None of the {} programs are stored yet", ids.len());
        } else {
            debug!("{} of {} programs already stored", index.len(), ids.len());
        }
        let plan = build_plan(&records, &identity, &index);
        report.persisted = plan.persisted_count();
        report.new_programs = plan.new_count();

        match channel_id {
            Some(id) if !self.options.dry_run => {
                info!(
                    operation = "submit_lineup",
                    persisted = report.persisted,
                    new_programs = report.new_programs,
                    "Adding {} programs to channel",
                    plan.lineup.len()
                );
                self.store
                    .replace_lineup(&id, &plan.into_request())
                    .await
                    .map_err(ReconcileError::target(ChannelStage::Submitting))?;
                report.submitted = true;
            }
            _ => info!(
                "Would submit {} programs ({} persisted, {} new)",
                plan.lineup.len(),
                report.persisted,
                report.new_programs
            ),
        }

        Ok(report)
    }

    async fn resolve_source(
        &self,
        channel: &ChannelConfig,
        report: &mut ChannelReport,
    ) -> Result<Vec<CatalogRecord>, ReconcileError> {
        let unavailable = |error| {
            ReconcileError::new(
                ChannelStage::Resolving,
                SyncError::SourceUnavailable {
                    source_desc: channel.source.describe(),
                    error,
                },
            )
        };

        let source = self.factory.create(&channel.source).map_err(unavailable)?;
        info!("Fetching {}", source.describe());
        let items = source.fetch().await.map_err(unavailable)?;
        let wanted = items.len();

        let records = match items {
            SourceItems::Resolved(records) => records,
            SourceItems::Wanted(entries) => {
                let resolution = CatalogResolver::new(self.catalog)
                    .with_concurrency(self.options.concurrency)
                    .resolve(entries)
                    .await;
                report.not_found = resolution.not_found;
                resolution.found
            }
        };

        if records.is_empty() {
            return Err(ReconcileError::new(
                ChannelStage::Resolving,
                SyncError::NothingResolved {
                    source_desc: channel.source.describe(),
                    wanted,
                },
            ));
        }
        Ok(records)
    }

    /// The store's media source id for the catalog server
    async fn program_identity(&self) -> Result<ProgramIdentity, ReconcileError> {
        let source_type = self.catalog.source_type();
        let server_name = self.catalog.server_name();
        let media_source_id = self
            .store
            .find_media_source(source_type, server_name)
            .await
            .map_err(ReconcileError::target(ChannelStage::Locating))?
            .ok_or_else(|| {
                ReconcileError::new(
                    ChannelStage::Locating,
                    SyncError::Consistency(format!(
                        "{} server '{}' is not configured as a media source in Tunarr",
                        source_type, server_name
                    )),
                )
            })?;
        Ok(ProgramIdentity::new(source_type, media_source_id))
    }
}

/// Uniform shuffle; a seed makes the order reproducible.
pub fn shuffle_records(records: &mut [CatalogRecord], seed: Option<u64>) {
    match seed {
        Some(seed) => records.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => records.shuffle(&mut rand::rng()),
    }
}
