pub mod client;
pub mod parser;

pub use client::LetterboxdClient;
pub use parser::{parse_list_page, ListPage};
