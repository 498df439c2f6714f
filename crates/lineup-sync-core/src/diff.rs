// Lineup planning against the store's persisted programs

use lineup_sync_models::{CatalogRecord, ExternalId, LineupEntry, LineupRequest, PersistedProgram, ProgramDefinition};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use crate::identity::ProgramIdentity;


/// A program the store already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRef {
    pub program_id: String,
    pub duration_ms: u64,
}

/// Batch lookup result keyed by `(sourceInstanceId, sourceKey)`.
#[derive(Debug, Clone, Default)]
pub struct PersistedIndex {
    by_source: HashMap<(String, String), PersistedRef>,
}

impl PersistedIndex {
    /// Index a batch lookup response (program id -> program). Programs
    /// without external fields fall back to their serialized unique id;
    /// with neither they cannot be matched and are skipped. When two
    /// programs claim the same key the smallest program id wins, so the
    /// choice does not depend on map iteration order.
    pub fn from_lookup(found: HashMap<String, PersistedProgram>) -> Self {
        let mut by_source: HashMap<(String, String), PersistedRef> = HashMap::new();
        for (program_id, program) in found {
            let Some((source_id, key)) = source_pair(&program) else {
                debug!("Ignoring persisted program {} without external ids", program_id);
                continue;
            };
            let candidate = PersistedRef {
                program_id,
                duration_ms: program.duration,
            };
            match by_source.get_mut(&(source_id.clone(), key.clone())) {
                Some(existing) => {
                    warn!(
                        "Programs {} and {} share external key {}|{}",
                        existing.program_id, candidate.program_id, source_id, key
                    );
                    if candidate.program_id < existing.program_id {
                        *existing = candidate;
                    }
                }
                None => {
                    by_source.insert((source_id, key), candidate);
                }
            }
        }
        Self { by_source }
    }

    pub fn get(&self, source_instance_id: &str, source_key: &str) -> Option<&PersistedRef> {
        self.by_source
            .get(&(source_instance_id.to_string(), source_key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

fn source_pair(program: &PersistedProgram) -> Option<(String, String)> {
    match (&program.external_source_id, &program.external_key) {
        (Some(source_id), Some(key)) => Some((source_id.clone(), key.clone())),
        _ => program
            .unique_id
            .as_deref()
            .and_then(ExternalId::parse)
            .map(|id| (id.source_instance_id, id.source_key)),
    }
}

/// Ordered lineup plus the definitions its `New` entries point into.
/// `lineup[i]` corresponds to the i-th planned record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupPlan {
    pub lineup: Vec<LineupEntry>,
    pub new_programs: Vec<ProgramDefinition>,
}

impl LineupPlan {
    pub fn persisted_count(&self) -> usize {
        self.lineup
            .iter()
            .filter(|e| matches!(e, LineupEntry::Persisted { .. }))
            .count()
    }

    pub fn new_count(&self) -> usize {
        self.new_programs.len()
    }

    pub fn into_request(self) -> LineupRequest {
        LineupRequest::manual(self.new_programs, self.lineup)
    }
}

/// External ids for the batch lookup, first occurrence order, no repeats.
pub fn lookup_ids(records: &[CatalogRecord], identity: &ProgramIdentity) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| identity.external_id(r))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Classify each record as persisted or new, in input order.
///
/// Persisted entries carry the store's duration, not the record's. Every
/// new position appends its own definition, so `New` indices count up from
/// zero in lineup order.
pub fn build_plan(records: &[CatalogRecord], identity: &ProgramIdentity, index: &PersistedIndex) -> LineupPlan {
    let mut plan = LineupPlan::default();

    for record in records {
        match index.get(&identity.source_instance_id, &record.source_key) {
            Some(persisted) => {
                debug!("Found existing program: {} -> {}", record.title, persisted.program_id);
                plan.lineup.push(LineupEntry::Persisted {
                    program_id: persisted.program_id.clone(),
                    duration_ms: persisted.duration_ms,
                });
            }
            None => {
                debug!("Program not found, adding as new: {}", record.title);
                plan.new_programs.push(identity.program_definition(record));
                plan.lineup.push(LineupEntry::New {
                    index: plan.new_programs.len() - 1,
                });
            }
        }
    }

    plan
}
