use lineup_sync_config::ChannelConfig;
use lineup_sync_sources::{CatalogProvider, LineupStore, ListSourceFactory};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};
use crate::error::ChannelStage;
use crate::reconcile::{ChannelReconciler, ChannelReport};
use crate::resolver::DEFAULT_CONCURRENCY;

#[derive(Debug, Clone, Serialize)]
pub struct SyncOptions {
    /// Resolve and diff only; no create, rename, clear or submit calls
    pub dry_run: bool,
    /// Catalog lookups in flight per channel
    pub concurrency: usize,
    /// Makes shuffling reproducible
    pub shuffle_seed: Option<u64>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: DEFAULT_CONCURRENCY,
            shuffle_seed: None,
        }
    }
}

/// Result for one configured channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelOutcome {
    pub name: String,
    pub number: u32,
    pub source: String,
    pub report: Option<ChannelReport>,
    pub stage: Option<ChannelStage>,
    pub error: Option<String>,
}

impl ChannelOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub outcomes: Vec<ChannelOutcome>,
    pub duration: Duration,
}

impl SyncSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when every channel succeeded
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Synced {}/{} channels ({} failed) in {:.1}s",
            self.succeeded(),
            self.outcomes.len(),
            self.failed(),
            self.duration.as_secs_f64()
        )
    }
}

/// Runs channel reconciliation one channel at a time. A failing channel is
/// recorded and the run moves on to the next one.
pub struct SyncOrchestrator {
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn LineupStore>,
    factory: Arc<dyn ListSourceFactory>,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        store: Arc<dyn LineupStore>,
        factory: Arc<dyn ListSourceFactory>,
    ) -> Self {
        Self {
            catalog,
            store,
            factory,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    #[instrument(skip(self, channels), fields(dry_run = self.options.dry_run))]
    pub async fn sync<'c, I>(&self, channels: I) -> SyncSummary
    where
        I: IntoIterator<Item = &'c ChannelConfig>,
    {
        let start = Instant::now();
        let reconciler = ChannelReconciler::new(
            self.catalog.as_ref(),
            self.store.as_ref(),
            self.factory.as_ref(),
            &self.options,
        );

        let mut outcomes = Vec::new();
        for channel in channels {
            info!(
                operation = "sync_channel",
                channel = %channel.name,
                number = channel.number,
                "Starting sync: {} -> '{}' (#{})",
                channel.source.describe(),
                channel.name,
                channel.number
            );

            let mut outcome = ChannelOutcome {
                name: channel.name.clone(),
                number: channel.number,
                source: channel.source.describe(),
                report: None,
                stage: None,
                error: None,
            };
            match reconciler.reconcile(channel).await {
                Ok(report) => {
                    info!(
                        "✓ Sync completed: {} (#{}) with {} programs",
                        channel.name, channel.number, report.resolved
                    );
                    outcome.report = Some(report);
                }
                Err(e) => {
                    error!(
                        operation = "sync_channel",
                        channel = %channel.name,
                        stage = %e.stage,
                        "✗ Sync failed for {}: {}",
                        channel.name,
                        e
                    );
                    outcome.stage = Some(e.stage);
                    outcome.error = Some(e.error.to_string());
                }
            }
            outcomes.push(outcome);
        }

        let summary = SyncSummary {
            outcomes,
            duration: start.elapsed(),
        };
        info!(
            operation = "sync",
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "{}",
            summary.summary_line()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::shuffle_records;
    use async_trait::async_trait;
    use lineup_sync_config::ChannelSource;
    use lineup_sync_models::{
        CatalogRecord, ChannelDescriptor, ChannelPatch, ChannelProgramming, LineupEntry, LineupRequest,
        PersistedProgram, WantedEntry,
    };
    use lineup_sync_sources::factory::PlaylistSource;
    use lineup_sync_sources::{ListSource, SourceError, SourceItems};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeCatalog;

    #[async_trait]
    impl CatalogProvider for FakeCatalog {
        fn source_type(&self) -> &str {
            "plex"
        }

        fn server_name(&self) -> &str {
            "Basement"
        }

        async fn search_candidates(&self, title: &str) -> Result<Vec<CatalogRecord>, SourceError> {
            if title.starts_with("Missing") {
                return Ok(Vec::new());
            }
            let key = title.to_lowercase().replace(' ', "-");
            Ok(vec![CatalogRecord::new(key, title).with_duration_ms(6_000_000)])
        }

        async fn list_items_of(&self, playlist_name: &str) -> Result<Vec<CatalogRecord>, SourceError> {
            match playlist_name {
                "Criterion" => Ok(vec![
                    CatalogRecord::new("p1", "Seven Samurai"),
                    CatalogRecord::new("p2", "Ikiru"),
                ]),
                "Festival" => Ok(festival()),
                _ => Err(SourceError::NotFound(format!("playlist '{}'", playlist_name))),
            }
        }

        async fn list_playlists(&self) -> Result<Vec<String>, SourceError> {
            Ok(vec!["Criterion".to_string()])
        }
    }

    fn festival() -> Vec<CatalogRecord> {
        (0..8)
            .map(|i| CatalogRecord::new(format!("f{}", i), format!("Festival {}", i)).with_duration_ms(1_000))
            .collect()
    }

    struct StaticList(Vec<WantedEntry>);

    #[async_trait]
    impl ListSource for StaticList {
        fn describe(&self) -> String {
            "static list".to_string()
        }

        async fn fetch(&self) -> Result<SourceItems, SourceError> {
            Ok(SourceItems::Wanted(self.0.clone()))
        }
    }

    /// List URLs name their titles: `https://lists/Alien,Heat`
    struct FakeFactory {
        catalog: Arc<dyn CatalogProvider>,
    }

    impl ListSourceFactory for FakeFactory {
        fn create(&self, source: &ChannelSource) -> Result<Box<dyn ListSource>, SourceError> {
            match source {
                ChannelSource::CatalogPlaylist { playlist_name } => {
                    Ok(Box::new(PlaylistSource::new(self.catalog.clone(), playlist_name.clone())))
                }
                ChannelSource::ListUrl { url } => {
                    let titles = url.trim_start_matches("https://lists/");
                    let entries = titles
                        .split(',')
                        .filter(|t| !t.is_empty())
                        .map(|t| WantedEntry::new(t, None))
                        .collect();
                    Ok(Box::new(StaticList(entries)))
                }
                ChannelSource::MovieFile { path } => Err(SourceError::Io {
                    path: path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                }),
            }
        }
    }

    #[derive(Default)]
    struct StoreState {
        channels: Vec<ChannelDescriptor>,
        /// program id -> (external id, program)
        programs: HashMap<String, (String, PersistedProgram)>,
        lineups: HashMap<String, LineupRequest>,
        program_counts: HashMap<String, usize>,
        calls: Vec<String>,
        fail_submit_for: Option<String>,
        has_media_source: bool,
    }

    struct FakeStore {
        state: Mutex<StoreState>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                state: Mutex::new(StoreState {
                    has_media_source: true,
                    ..StoreState::default()
                }),
            }
        }

        fn with_channel(self, id: &str, name: &str, number: u32, programs: usize) -> Self {
            {
                let mut state = self.state.lock().unwrap();
                state.channels.push(ChannelDescriptor {
                    id: id.to_string(),
                    name: name.to_string(),
                    number,
                });
                state.program_counts.insert(id.to_string(), programs);
            }
            self
        }

        fn with_program(self, program_id: &str, source_key: &str, duration: u64) -> Self {
            {
                let mut state = self.state.lock().unwrap();
                let persisted = PersistedProgram {
                    external_source_id: Some("src-1".to_string()),
                    external_key: Some(source_key.to_string()),
                    duration,
                    title: None,
                    unique_id: None,
                };
                state
                    .programs
                    .insert(program_id.to_string(), (format!("plex|src-1|{}", source_key), persisted));
            }
            self
        }

        fn calls(&self) -> Vec<String> {
            self.state.lock().unwrap().calls.clone()
        }

        fn mutating_calls(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| !c.starts_with("list") && !c.starts_with("get") && !c.starts_with("lookup") && !c.starts_with("find"))
                .collect()
        }

        fn lineup(&self, channel_id: &str) -> Option<LineupRequest> {
            self.state.lock().unwrap().lineups.get(channel_id).cloned()
        }
    }

    #[async_trait]
    impl LineupStore for FakeStore {
        async fn list_channels(&self) -> Result<Vec<ChannelDescriptor>, SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("list_channels".to_string());
            Ok(state.channels.clone())
        }

        async fn create_channel(&self, name: &str, number: u32) -> Result<ChannelDescriptor, SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("create:{}", number));
            let channel = ChannelDescriptor {
                id: format!("ch-{}", number),
                name: name.to_string(),
                number,
            };
            state.channels.push(channel.clone());
            Ok(channel)
        }

        async fn update_channel(&self, channel_id: &str, patch: &ChannelPatch) -> Result<ChannelDescriptor, SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("update:{}", channel_id));
            let channel = state
                .channels
                .iter_mut()
                .find(|c| c.id == channel_id)
                .ok_or_else(|| SourceError::NotFound(channel_id.to_string()))?;
            if let Some(name) = &patch.name {
                channel.name = name.clone();
            }
            Ok(channel.clone())
        }

        async fn get_channel_programming(&self, channel_id: &str) -> Result<ChannelProgramming, SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("get_programming:{}", channel_id));
            Ok(ChannelProgramming {
                program_count: state.program_counts.get(channel_id).copied().unwrap_or(0),
                total_duration_ms: 0,
            })
        }

        async fn delete_channel_programming(&self, channel_id: &str) -> Result<(), SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("delete:{}", channel_id));
            state.program_counts.insert(channel_id.to_string(), 0);
            Ok(())
        }

        async fn lookup_programs(&self, external_ids: &[String]) -> Result<HashMap<String, PersistedProgram>, SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("lookup".to_string());
            Ok(state
                .programs
                .iter()
                .filter(|(_, (external_id, _))| external_ids.contains(external_id))
                .map(|(id, (_, program))| (id.clone(), program.clone()))
                .collect())
        }

        async fn replace_lineup(&self, channel_id: &str, request: &LineupRequest) -> Result<(), SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("submit:{}", channel_id));
            if state.fail_submit_for.as_deref() == Some(channel_id) {
                return Err(SourceError::Status {
                    method: "POST".to_string(),
                    endpoint: format!("/channels/{}/programming", channel_id),
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            for program in &request.programs {
                let id = format!("uuid-{}", state.programs.len());
                let persisted = PersistedProgram {
                    external_source_id: Some(program.external_source_id.clone()),
                    external_key: Some(program.external_key.clone()),
                    duration: program.duration,
                    title: Some(program.title.clone()),
                    unique_id: None,
                };
                state.programs.insert(id, (program.unique_id.clone(), persisted));
            }
            state.program_counts.insert(channel_id.to_string(), request.lineup.len());
            state.lineups.insert(channel_id.to_string(), request.clone());
            Ok(())
        }

        async fn find_media_source(&self, source_type: &str, server_name: &str) -> Result<Option<String>, SourceError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("find_media_source".to_string());
            let known = state.has_media_source && source_type == "plex" && server_name == "Basement";
            Ok(known.then(|| "src-1".to_string()))
        }
    }

    fn orchestrator(store: Arc<FakeStore>, options: SyncOptions) -> SyncOrchestrator {
        let catalog: Arc<dyn CatalogProvider> = Arc::new(FakeCatalog);
        let factory = Arc::new(FakeFactory {
            catalog: catalog.clone(),
        });
        SyncOrchestrator::new(catalog, store, factory).with_options(options)
    }

    fn list_channel(name: &str, number: u32, titles: &str) -> ChannelConfig {
        ChannelConfig {
            name: name.to_string(),
            number,
            source: ChannelSource::ListUrl {
                url: format!("https://lists/{}", titles),
            },
            replace_existing: true,
            randomize: false,
        }
    }

    #[tokio::test]
    async fn test_failed_channel_does_not_affect_siblings() {
        let store = Arc::new(FakeStore::new());
        store.state.lock().unwrap().fail_submit_for = Some("ch-2".to_string());
        let channels = vec![
            list_channel("A", 1, "Alien,Heat"),
            list_channel("B", 2, "Ran"),
            list_channel("C", 3, "Ikiru"),
        ];

        let summary = orchestrator(store.clone(), SyncOptions::default()).sync(&channels).await;

        assert!(!summary.is_success());
        assert_eq!(summary.succeeded(), 2);
        assert!(summary.outcomes[0].is_success());
        assert_eq!(summary.outcomes[1].stage, Some(ChannelStage::Submitting));
        assert!(summary.outcomes[2].is_success());
        assert_eq!(store.lineup("ch-1").unwrap().lineup.len(), 2);
        assert_eq!(store.lineup("ch-3").unwrap().lineup.len(), 1);
        assert!(store.lineup("ch-2").is_none());
        assert!(summary.summary_line().starts_with("Synced 2/3 channels (1 failed)"));
    }

    #[tokio::test]
    async fn test_keep_existing_programming_submits_new_indices() {
        let store = Arc::new(FakeStore::new().with_channel("ch-9", "Westerns", 9, 5));
        let mut channel = list_channel("Westerns", 9, "Rio Bravo,Red River,Stagecoach");
        channel.replace_existing = false;

        let summary = orchestrator(store.clone(), SyncOptions::default()).sync([&channel]).await;
        assert!(summary.is_success());

        let request = store.lineup("ch-9").unwrap();
        assert_eq!(request.programs.len(), 3);
        assert_eq!(
            request.lineup,
            vec![
                LineupEntry::New { index: 0 },
                LineupEntry::New { index: 1 },
                LineupEntry::New { index: 2 },
            ]
        );
        assert!(!store.calls().iter().any(|c| c.starts_with("delete")));

        let report = summary.outcomes[0].report.as_ref().unwrap();
        assert_eq!(report.previous_programs, Some(5));
        assert!(!report.cleared);
        assert!(!report.created);
    }

    #[tokio::test]
    async fn test_nothing_resolved_makes_no_calls() {
        let store = Arc::new(FakeStore::new());
        let channel = list_channel("Empty", 4, "Missing One,Missing Two");

        let summary = orchestrator(store.clone(), SyncOptions::default()).sync([&channel]).await;

        assert!(!summary.is_success());
        assert_eq!(summary.outcomes[0].stage, Some(ChannelStage::Resolving));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_source_fails_channel() {
        let store = Arc::new(FakeStore::new());
        let channel = ChannelConfig {
            name: "File".to_string(),
            number: 5,
            source: ChannelSource::MovieFile {
                path: "/nowhere.txt".into(),
            },
            replace_existing: true,
            randomize: true,
        };

        let summary = orchestrator(store.clone(), SyncOptions::default()).sync([&channel]).await;
        let error = summary.outcomes[0].error.as_deref().unwrap();
        assert!(error.contains("unavailable"), "{}", error);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rerun_reuses_persisted_programs() {
        let store = Arc::new(FakeStore::new());
        let channel = list_channel("Noir", 7, "Laura,Gilda,Out of the Past");
        let sync = orchestrator(store.clone(), SyncOptions::default());

        let first = sync.sync([&channel]).await;
        assert_eq!(first.outcomes[0].report.as_ref().unwrap().new_programs, 3);
        assert!(first.outcomes[0].report.as_ref().unwrap().created);

        let second = sync.sync([&channel]).await;
        let report = second.outcomes[0].report.as_ref().unwrap();
        assert_eq!(report.new_programs, 0);
        assert_eq!(report.persisted, 3);
        assert!(report.cleared);
        assert!(store.lineup("ch-7").unwrap().programs.is_empty());
        assert_eq!(store.calls().iter().filter(|c| c.starts_with("create")).count(), 1);
    }

    #[tokio::test]
    async fn test_playlist_channel_renames_drifted_channel() {
        let store = Arc::new(FakeStore::new().with_channel("ch-12", "Old Name", 12, 0));
        let channel = ChannelConfig {
            name: "Criterion".to_string(),
            number: 12,
            source: ChannelSource::CatalogPlaylist {
                playlist_name: "Criterion".to_string(),
            },
            replace_existing: true,
            randomize: true,
        };
        let options = SyncOptions {
            shuffle_seed: Some(3),
            ..SyncOptions::default()
        };

        let summary = orchestrator(store.clone(), options).sync([&channel]).await;
        let report = summary.outcomes[0].report.as_ref().unwrap();

        assert_eq!(report.renamed_from.as_deref(), Some("Old Name"));
        assert_eq!(report.resolved, 2);
        assert!(report.not_found.is_empty());
        assert!(store.calls().contains(&"update:ch-12".to_string()));
        assert_eq!(store.state.lock().unwrap().channels[0].name, "Criterion");
    }

    #[tokio::test]
    async fn test_randomized_lineup_follows_shuffled_order() {
        let store = Arc::new(
            FakeStore::new()
                .with_channel("ch-20", "Festival", 20, 0)
                .with_program("stored-1", "f1", 11)
                .with_program("stored-4", "f4", 44)
                .with_program("stored-6", "f6", 66),
        );
        let channel = ChannelConfig {
            name: "Festival".to_string(),
            number: 20,
            source: ChannelSource::CatalogPlaylist {
                playlist_name: "Festival".to_string(),
            },
            replace_existing: true,
            randomize: true,
        };
        let options = SyncOptions {
            shuffle_seed: Some(41),
            ..SyncOptions::default()
        };

        let summary = orchestrator(store.clone(), options).sync([&channel]).await;
        assert!(summary.is_success());

        let mut shuffled = festival();
        shuffle_records(&mut shuffled, Some(41 + 20));
        assert_ne!(shuffled, festival());

        let mut next_index = 0;
        let expected: Vec<LineupEntry> = shuffled
            .iter()
            .map(|record| match record.source_key.as_str() {
                "f1" => LineupEntry::Persisted {
                    program_id: "stored-1".to_string(),
                    duration_ms: 11,
                },
                "f4" => LineupEntry::Persisted {
                    program_id: "stored-4".to_string(),
                    duration_ms: 44,
                },
                "f6" => LineupEntry::Persisted {
                    program_id: "stored-6".to_string(),
                    duration_ms: 66,
                },
                _ => {
                    next_index += 1;
                    LineupEntry::New { index: next_index - 1 }
                }
            })
            .collect();

        let request = store.lineup("ch-20").unwrap();
        assert_eq!(request.lineup, expected);

        // Definitions are laid out in shuffled order too
        let new_keys: Vec<&str> = request.programs.iter().map(|p| p.external_key.as_str()).collect();
        let shuffled_new: Vec<&str> = shuffled
            .iter()
            .map(|r| r.source_key.as_str())
            .filter(|k| !matches!(*k, "f1" | "f4" | "f6"))
            .collect();
        assert_eq!(new_keys, shuffled_new);
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_mutations() {
        let store = Arc::new(FakeStore::new().with_channel("ch-1", "Old", 1, 4));
        let channels = vec![list_channel("New Name", 1, "Alien"), list_channel("Fresh", 2, "Heat,Missing X")];
        let options = SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        };

        let summary = orchestrator(store.clone(), options).sync(&channels).await;

        assert!(summary.is_success());
        assert!(store.mutating_calls().is_empty(), "{:?}", store.mutating_calls());
        let existing = summary.outcomes[0].report.as_ref().unwrap();
        assert!(existing.cleared && existing.dry_run && !existing.submitted);
        assert_eq!(existing.renamed_from.as_deref(), Some("Old"));
        let fresh = summary.outcomes[1].report.as_ref().unwrap();
        assert!(fresh.created);
        assert_eq!(fresh.channel_id, None);
        assert_eq!(fresh.new_programs, 1);
        assert_eq!(fresh.not_found, vec![WantedEntry::new("Missing X", None)]);
    }

    #[tokio::test]
    async fn test_missing_media_source_is_consistency_failure() {
        let store = Arc::new(FakeStore::new());
        store.state.lock().unwrap().has_media_source = false;
        let channel = list_channel("A", 1, "Alien");

        let summary = orchestrator(store.clone(), SyncOptions::default()).sync([&channel]).await;

        assert_eq!(summary.outcomes[0].stage, Some(ChannelStage::Locating));
        assert!(summary.outcomes[0].error.as_deref().unwrap().contains("not configured"));
        assert!(store.mutating_calls().is_empty());
    }
}
