pub mod identity;
pub mod resolver;
pub mod diff;
pub mod error;
pub mod reconcile;
pub mod sync;

pub use identity::{classify_kind, external_id, ProgramIdentity};
pub use resolver::{CatalogResolver, NotFoundReport, Resolution, DEFAULT_CONCURRENCY, NOT_FOUND_REPORT_LIMIT};
pub use diff::{build_plan, lookup_ids, LineupPlan, PersistedIndex, PersistedRef};
pub use error::{ChannelStage, ReconcileError, SyncError};
pub use reconcile::{shuffle_records, ChannelReconciler, ChannelReport};
pub use sync::{ChannelOutcome, SyncOptions, SyncOrchestrator, SyncSummary};
