use lineup_sync_sources::SourceError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a single channel could not be reconciled.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source {source_desc} unavailable: {error}")]
    SourceUnavailable {
        source_desc: String,
        #[source]
        error: SourceError,
    },

    #[error("no titles from {source_desc} could be resolved ({wanted} wanted)")]
    NothingResolved { source_desc: String, wanted: usize },

    #[error("lineup store rejected request: {0}")]
    TargetSystem(#[source] SourceError),

    #[error("{0}")]
    Consistency(String),
}

/// Step of a channel reconciliation, for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStage {
    Resolving,
    Locating,
    Creating,
    Updating,
    Clearing,
    Submitting,
}

impl fmt::Display for ChannelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelStage::Resolving => "resolving",
            ChannelStage::Locating => "locating",
            ChannelStage::Creating => "creating",
            ChannelStage::Updating => "updating",
            ChannelStage::Clearing => "clearing",
            ChannelStage::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

/// A channel failure with the step it happened in.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct ReconcileError {
    pub stage: ChannelStage,
    #[source]
    pub error: SyncError,
}

impl ReconcileError {
    pub fn new(stage: ChannelStage, error: SyncError) -> Self {
        Self { stage, error }
    }

    pub(crate) fn target(stage: ChannelStage) -> impl FnOnce(SourceError) -> Self {
        move |e| Self::new(stage, SyncError::TargetSystem(e))
    }
}
