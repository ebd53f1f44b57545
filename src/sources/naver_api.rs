//! Naver Search Open API (`/v1/search/news.json`).
//!
//! Requests are authenticated with the application's client id/secret
//! headers and sorted by date. Each item carries both the aggregator
//! `link` and the publisher's `originallink`.

use super::NewsSource;
use crate::config::NaverCredentials;
use crate::error::{DigestError, Result};
use crate::models::RawArticle;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// The API caps `display` at 100 per call.
const API_PAGE_SIZE: usize = 100;
/// The API rejects `start` values above 1000.
const API_MAX_START: usize = 1000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default, rename = "originallink")]
    original_link: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    pub_date: Option<String>,
}

impl From<SearchItem> for RawArticle {
    fn from(item: SearchItem) -> Self {
        RawArticle {
            title: item.title,
            link: item.link,
            original_link: Some(item.original_link).filter(|l| !l.is_empty()),
            summary: item.description,
            published: item.pub_date,
            entities_decoded: false,
        }
    }
}

/// Parse a search response body into raw records.
pub fn parse_response(body: &str) -> Result<Vec<RawArticle>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.items.into_iter().map(RawArticle::from).collect())
}

#[derive(Debug)]
pub struct NaverApiSource<'a> {
    client: &'a Client,
    endpoint: String,
    credentials: NaverCredentials,
}

impl<'a> NaverApiSource<'a> {
    pub fn new(client: &'a Client, endpoint: impl Into<String>, credentials: NaverCredentials) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        }
    }
}

impl NewsSource for NaverApiSource<'_> {
    fn name(&self) -> &str {
        "naver-api"
    }

    fn page_size(&self) -> usize {
        API_PAGE_SIZE
    }

    fn max_start(&self) -> Option<usize> {
        Some(API_MAX_START)
    }

    #[instrument(level = "debug", skip(self, page_display), fields(display = page_display))]
    async fn fetch_page(&self, query: &str, page_display: usize, start: usize) -> Result<Vec<RawArticle>> {
        let display = page_display.to_string();
        let start = start.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .query(&[
                ("query", query),
                ("display", display.as_str()),
                ("start", start.as_str()),
                ("sort", "date"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DigestError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let items = parse_response(&body)?;
        debug!(count = items.len(), "Decoded API items");
        Ok(items)
    }
}
