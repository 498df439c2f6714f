use lineup_sync_models::WantedEntry;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use crate::error::SourceError;
use crate::title::{split_title_year, year_from_slug};


/// One parsed list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPage {
    /// (slug, entry) pairs in page order
    pub films: Vec<(String, WantedEntry)>,
    /// Number of poster containers found, parseable or not
    pub containers: usize,
    pub has_next: bool,
}

struct Selectors {
    poster_item: Selector,
    poster_container: Selector,
    react_component: Selector,
    div: Selector,
    img: Selector,
    next_page: Selector,
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("selector '{}': {:?}", css, e)))
}

impl Selectors {
    fn new() -> Result<Self, SourceError> {
        Ok(Self {
            poster_item: selector("li.posteritem")?,
            poster_container: selector("li.poster-container")?,
            react_component: selector("div.react-component")?,
            div: selector("div")?,
            img: selector("img")?,
            next_page: selector("div.pagination a.next")?,
        })
    }
}

/// Parse a Letterboxd list page.
///
/// Current layout: `li.posteritem > div.react-component` carrying
/// `data-item-slug` and `data-item-name` ("Title (YYYY)"). Older pages use
/// `li.poster-container > div[data-film-slug]` with the title in the image
/// alt text and the year in the slug or `data-film-year`.
pub fn parse_list_page(html: &str) -> Result<ListPage, SourceError> {
    let selectors = Selectors::new()?;
    let document = Html::parse_document(html);

    let mut containers: Vec<ElementRef> = document.select(&selectors.poster_item).collect();
    if containers.is_empty() {
        containers = document.select(&selectors.poster_container).collect();
    }

    let mut films = Vec::new();
    for container in &containers {
        match parse_container(container, &selectors) {
            Some((slug, entry)) => {
                debug!("Parsed film: {} ({:?})", entry.title, entry.year);
                films.push((slug, entry));
            }
            None => warn!("Failed to parse film container"),
        }
    }

    let has_next = document.select(&selectors.next_page).next().is_some();
    Ok(ListPage {
        films,
        containers: containers.len(),
        has_next,
    })
}

fn parse_container(container: &ElementRef, selectors: &Selectors) -> Option<(String, WantedEntry)> {
    if let Some(react) = container.select(&selectors.react_component).next() {
        let slug = react.value().attr("data-item-slug").filter(|s| !s.is_empty())?;
        let name = react.value().attr("data-item-name").filter(|s| !s.is_empty())?;
        let (title, year) = split_title_year(name);
        let year = year.or_else(|| year_from_slug(slug));
        return Some((slug.to_string(), WantedEntry::new(title, year)));
    }

    let film = container.select(&selectors.div).next()?;
    let slug = film.value().attr("data-film-slug").filter(|s| !s.is_empty())?;
    let title = film
        .select(&selectors.img)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .map(str::trim)
        .filter(|t| !t.is_empty())?;
    let year = year_from_slug(slug).or_else(|| {
        film.value()
            .attr("data-film-year")
            .and_then(|y| y.trim().parse::<u32>().ok())
    });
    Some((slug.to_string(), WantedEntry::new(title, year)))
}
