use lineup_sync_models::{CatalogRecord, ExternalId, ExternalIdRef, MediaKind, ProgramDefinition, ProgramSubtype};

/// Serialized external id, `sourceType|sourceInstanceId|sourceKey`.
pub fn external_id(source_type: &str, source_instance_id: &str, record: &CatalogRecord) -> String {
    ExternalId::new(source_type, source_instance_id, record.source_key.as_str()).to_string()
}

/// Program subtype for a catalog kind. Anything that is not an episode or a
/// track is scheduled as a movie.
pub fn classify_kind(kind: &MediaKind) -> ProgramSubtype {
    match kind {
        MediaKind::Episode => ProgramSubtype::Episode,
        MediaKind::Track => ProgramSubtype::Track,
        MediaKind::Movie | MediaKind::Other => ProgramSubtype::Movie,
    }
}

/// Catalog source as registered in the lineup store: the source type plus
/// the store's media source id for that server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIdentity {
    pub source_type: String,
    pub source_instance_id: String,
}

impl ProgramIdentity {
    pub fn new(source_type: impl Into<String>, source_instance_id: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            source_instance_id: source_instance_id.into(),
        }
    }

    pub fn external_id(&self, record: &CatalogRecord) -> String {
        external_id(&self.source_type, &self.source_instance_id, record)
    }

    /// Full definition for a program the store has not seen yet.
    pub fn program_definition(&self, record: &CatalogRecord) -> ProgramDefinition {
        let id = self.external_id(record);
        ProgramDefinition {
            program_type: "content".to_string(),
            persisted: false,
            id: id.clone(),
            unique_id: id,
            title: record.title.clone(),
            duration: record.duration_ms,
            subtype: classify_kind(&record.kind),
            external_source_type: self.source_type.clone(),
            external_source_name: self.source_instance_id.clone(),
            external_source_id: self.source_instance_id.clone(),
            external_key: record.source_key.clone(),
            external_ids: vec![ExternalIdRef {
                id_type: "multi".to_string(),
                source: self.source_type.clone(),
                source_id: self.source_instance_id.clone(),
                id: record.source_key.clone(),
            }],
            year: record.year,
            summary: record.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_id_is_stable() {
        let record = CatalogRecord::new("4521", "Alien").with_duration_ms(7_020_000);
        let identity = ProgramIdentity::new("plex", "src-1");

        let first = identity.external_id(&record);
        assert_eq!(first, "plex|src-1|4521");
        assert_eq!(first, identity.external_id(&record.clone()));
        assert_eq!(first, external_id("plex", "src-1", &record));
        assert_eq!(ExternalId::parse(&first).unwrap().source_key, "4521");
    }

    #[test]
    fn test_classify_kind_defaults_to_movie() {
        assert_eq!(classify_kind(&MediaKind::Episode), ProgramSubtype::Episode);
        assert_eq!(classify_kind(&MediaKind::Track), ProgramSubtype::Track);
        assert_eq!(classify_kind(&MediaKind::Movie), ProgramSubtype::Movie);
        assert_eq!(classify_kind(&MediaKind::from_raw(Some("clip"))), ProgramSubtype::Movie);
        assert_eq!(classify_kind(&MediaKind::from_raw(None)), ProgramSubtype::Movie);
    }

    #[test]
    fn test_program_definition_fields() {
        let record = CatalogRecord::new("10", "Pilot")
            .with_kind(MediaKind::Episode)
            .with_duration_ms(2_700_000)
            .with_year(2004);
        let program = ProgramIdentity::new("plex", "src-1").program_definition(&record);

        assert_eq!(program.program_type, "content");
        assert!(!program.persisted);
        assert_eq!(program.id, "plex|src-1|10");
        assert_eq!(program.unique_id, program.id);
        assert_eq!(program.subtype, ProgramSubtype::Episode);
        assert_eq!(program.external_source_id, "src-1");
        assert_eq!(program.external_key, "10");
        assert_eq!(program.external_ids[0].id_type, "multi");
        assert_eq!(program.year, Some(2004));
        assert_eq!(program.summary, None);
    }
}
