mod api;
mod client;

pub use api::{MediaSource, NewChannel, TunarrChannel};
pub use client::TunarrClient;
