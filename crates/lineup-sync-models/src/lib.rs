pub mod wanted;
pub mod catalog;
pub mod external_id;
pub mod lineup;
pub mod channel;

pub use wanted::WantedEntry;
pub use catalog::{CatalogRecord, MediaKind};
pub use external_id::ExternalId;
pub use lineup::{ExternalIdRef, LineupEntry, LineupRequest, PersistedProgram, ProgramDefinition, ProgramSubtype};
pub use channel::{ChannelDescriptor, ChannelPatch, ChannelProgramming};
