//! News search strategies behind one paginated fetch contract.
//!
//! | Strategy | Module | Method | Page size |
//! |----------|--------|--------|-----------|
//! | Naver Search API | [`naver_api`] | JSON, needs client id/secret | 100 |
//! | Naver desktop search | [`naver_html`] | HTML scraping | 10 |
//! | Naver mobile search | [`naver_html`] | HTML scraping | 15 |
//!
//! A strategy only knows how to fetch one page. [`fetch_group`] owns the
//! pagination rules shared by all of them: request sizing, offsets, the
//! empty-page stop, the inter-call delay, and partial-failure tolerance.

pub mod naver_api;
pub mod naver_html;

use crate::error::Result;
use crate::models::RawArticle;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// A search backend that can return one page of results.
pub trait NewsSource {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Maximum number of items a single call can return.
    fn page_size(&self) -> usize;

    /// Largest start offset the backend accepts, if it has one.
    fn max_start(&self) -> Option<usize> {
        None
    }

    /// Fetch up to `display` items beginning at 1-based offset `start`.
    async fn fetch_page(&self, query: &str, display: usize, start: usize) -> Result<Vec<RawArticle>>;
}

/// Collect up to `result_cap` raw items for `query`, one page at a time.
///
/// Page N starts at `(N-1) * page_size + 1`. Stops early on an empty page
/// or at the source's start limit. Any error ends pagination for this
/// query and returns what was collected so far.
#[instrument(level = "info", skip(source, page_delay), fields(source = source.name()))]
pub async fn fetch_group<S: NewsSource>(
    source: &S,
    query: &str,
    result_cap: usize,
    page_delay: Duration,
) -> Vec<RawArticle> {
    let page_size = source.page_size().max(1);
    let mut remaining = result_cap;
    let mut collected = Vec::new();
    let mut page = 1usize;

    while remaining > 0 {
        let page_display = remaining.min(page_size);
        let start = (page - 1) * page_size + 1;
        if source.max_start().is_some_and(|max| start > max) {
            debug!(start, "Reached the source's start offset limit");
            break;
        }
        remaining -= page_display;

        match source.fetch_page(query, page_display, start).await {
            Ok(items) if items.is_empty() => {
                debug!(page, start, "Source returned no further items");
                break;
            }
            Ok(items) => {
                debug!(page, start, requested = page_display, received = items.len(), "Fetched page");
                collected.extend(items.into_iter().take(page_display));
            }
            Err(e) => {
                warn!(page, start, error = %e, "Fetch failed; keeping partial results for this group");
                break;
            }
        }

        if remaining > 0 && !page_delay.is_zero() {
            sleep(page_delay).await;
        }
        page += 1;
    }

    info!(count = collected.len(), requested = result_cap, "Collected raw items");
    collected
}
