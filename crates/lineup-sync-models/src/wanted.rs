use serde::{Deserialize, Serialize};
use std::fmt;

/// A title that a list source says should appear on a channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WantedEntry {
    pub title: String,
    pub year: Option<u32>,
}

impl WantedEntry {
    pub fn new(title: impl Into<String>, year: Option<u32>) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

impl fmt::Display for WantedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}
