use async_trait::async_trait;
use lineup_sync_models::WantedEntry;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{error, info, warn};
use crate::error::SourceError;
use crate::letterboxd::parser::parse_list_page;
use crate::traits::{ListSource, SourceItems};

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_PAGES: usize = 1000;

/// Paginated public list on Letterboxd.
pub struct LetterboxdClient {
    client: Client,
    list_url: String,
}

impl LetterboxdClient {
    pub fn new(list_url: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(PAGE_TIMEOUT)
            .build()
            .map_err(|e| SourceError::http("Failed to create HTTP client", e))?;
        Ok(Self::with_client(client, list_url))
    }

    pub fn with_client(client: Client, list_url: &str) -> Self {
        Self {
            client,
            list_url: list_url.trim_end_matches('/').to_string(),
        }
    }

    /// Page 1 is the list itself, later pages live under `/page/N/`
    fn page_url(&self, page: usize) -> String {
        if page == 1 {
            self.list_url.clone()
        } else {
            format!("{}/page/{}/", self.list_url, page)
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::http(format!("Failed to fetch {}", url), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                method: "GET".to_string(),
                endpoint: url.to_string(),
                status: status.as_u16(),
                body: String::new(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| SourceError::http(format!("Failed to read {}", url), e))
    }

    /// Walk the list until a page is empty, has no next link, or fails to load.
    /// A failure on the first page means the list is unavailable.
    pub async fn get_list_entries(&self) -> Result<Vec<WantedEntry>, SourceError> {
        let mut entries = Vec::new();
        let mut seen_slugs = HashSet::new();

        for page in 1..=MAX_PAGES {
            let url = self.page_url(page);
            info!("Fetching Letterboxd list page {}: {}", page, url);

            let html = match self.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) if page == 1 => {
                    error!("Failed to fetch Letterboxd list page {}: {}", page, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Failed to fetch Letterboxd list page {}: {}", page, e);
                    break;
                }
            };

            let parsed = parse_list_page(&html)?;
            if parsed.containers == 0 {
                info!("No more films found on page {}", page);
                break;
            }
            info!("Found {} films on page {}", parsed.containers, page);

            for (slug, entry) in parsed.films {
                if seen_slugs.insert(slug) {
                    entries.push(entry);
                }
            }

            if !parsed.has_next {
                break;
            }
        }

        info!(
            operation = "letterboxd_list",
            url = %self.list_url,
            films = entries.len(),
            "Total films fetched from Letterboxd list: {}",
            entries.len()
        );
        Ok(entries)
    }
}

#[async_trait]
impl ListSource for LetterboxdClient {
    fn describe(&self) -> String {
        format!("list {}", self.list_url)
    }

    async fn fetch(&self) -> Result<SourceItems, SourceError> {
        Ok(SourceItems::Wanted(self.get_list_entries().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[(&str, &str)], has_next: bool) -> String {
        let mut html = String::from("<html><body><ul>");
        for (slug, name) in items {
            html.push_str(&format!(
                r#"<li class="posteritem"><div class="react-component" data-item-slug="{}" data-item-name="{}"></div></li>"#,
                slug, name
            ));
        }
        html.push_str("</ul>");
        if has_next {
            html.push_str(r##"<div class="pagination"><a class="next" href="#">Next</a></div>"##);
        }
        html.push_str("</body></html>");
        html
    }

    #[tokio::test]
    async fn test_paginates_until_no_next_link() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/someone/list/top")
            .with_status(200)
            .with_body(page(&[("heat-1995", "Heat (1995)"), ("alien", "Alien (1979)")], true))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/someone/list/top/page/2/")
            .with_status(200)
            .with_body(page(&[("alien", "Alien (1979)"), ("the-thing", "The Thing (1982)")], false))
            .create_async()
            .await;

        let client = LetterboxdClient::new(&format!("{}/someone/list/top/", server.url())).unwrap();
        let entries = client.get_list_entries().await.unwrap();

        second.assert_async().await;
        assert_eq!(
            entries,
            vec![
                WantedEntry::new("Heat", Some(1995)),
                WantedEntry::new("Alien", Some(1979)),
                WantedEntry::new("The Thing", Some(1982)),
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/l")
            .with_status(200)
            .with_body(page(&[("heat-1995", "Heat (1995)")], true))
            .create_async()
            .await;
        server
            .mock("GET", "/l/page/2/")
            .with_status(200)
            .with_body(page(&[], true))
            .create_async()
            .await;
        let third = server
            .mock("GET", "/l/page/3/")
            .expect(0)
            .create_async()
            .await;

        let client = LetterboxdClient::new(&format!("{}/l", server.url())).unwrap();
        let entries = client.get_list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_collected_entries() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/l")
            .with_status(200)
            .with_body(page(&[("heat-1995", "Heat (1995)")], true))
            .create_async()
            .await;
        server
            .mock("GET", "/l/page/2/")
            .with_status(503)
            .create_async()
            .await;

        let client = LetterboxdClient::new(&format!("{}/l", server.url())).unwrap();
        let entries = client.get_list_entries().await.unwrap();
        assert_eq!(entries, vec![WantedEntry::new("Heat", Some(1995))]);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/l")
            .with_status(404)
            .create_async()
            .await;

        let client = LetterboxdClient::new(&format!("{}/l", server.url())).unwrap();
        let err = client.fetch().await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
