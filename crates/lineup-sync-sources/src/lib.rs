pub mod traits;
pub mod error;
pub mod factory;
pub mod title;
pub mod file;
pub mod plex;
pub mod letterboxd;
pub mod tunarr;

pub use traits::{best_match, CatalogProvider, LineupStore, ListSource, SourceItems};
pub use factory::{ListSourceFactory, SourceFactory};
pub use error::SourceError;
pub use file::MovieFileSource;
pub use plex::PlexClient;
pub use letterboxd::LetterboxdClient;
pub use tunarr::TunarrClient;
