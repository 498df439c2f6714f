pub mod api;
pub mod client;

pub use client::{PlexClient, PLEX_SOURCE_TYPE};
