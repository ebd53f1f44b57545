//! Naver search result page scraper (desktop and mobile layouts).
//!
//! Used when no API credentials are configured, or when selected
//! explicitly. The result page is located by CSS selectors that Naver
//! changes from time to time; each layout keeps them in one place.
//!
//! # URL Pattern
//!
//! `https://search.naver.com/search.naver?where=news&query=...&sort=1&start=11`
//! (`sort=1` is newest first). The mobile host uses `where=m_news`.

use super::NewsSource;
use crate::error::{DigestError, Result};
use crate::models::RawArticle;
use crate::utils::truncate_for_log;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, TimeZone};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const MOBILE_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";

/// Selectors and paging facts for one flavour of the result page.
#[derive(Debug)]
pub struct HtmlLayout {
    pub name: &'static str,
    pub where_param: &'static str,
    pub user_agent: &'static str,
    pub page_size: usize,
    /// One search hit.
    pub item: &'static str,
    /// Anchor carrying the headline and the publisher link.
    pub title: &'static str,
    pub summary: &'static str,
    /// Anchor pointing at the Naver News mirror, when present.
    pub aggregator_link: &'static str,
    /// Metadata spans (press name, relative age, "네이버뉴스" badge).
    pub info: &'static str,
}

pub static DESKTOP: HtmlLayout = HtmlLayout {
    name: "naver-html",
    where_param: "news",
    user_agent: DESKTOP_USER_AGENT,
    page_size: 10,
    item: "div.news_area",
    title: "a.news_tit",
    summary: ".news_dsc",
    aggregator_link: "a.info[href*=\"news.naver.com\"]",
    info: "span.info",
};

pub static MOBILE: HtmlLayout = HtmlLayout {
    name: "naver-mobile-html",
    where_param: "m_news",
    user_agent: MOBILE_USER_AGENT,
    page_size: 15,
    item: "div.news_wrap",
    title: "a.news_tit",
    summary: ".news_dsc",
    aggregator_link: "a.info[href*=\"news.naver.com\"]",
    info: "span.info",
};

static RELATIVE_AGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*(초|분|시간|일|주)\s*전$").expect("relative age pattern is valid")
});
static DOTTED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})\.(\d{1,2})\.(\d{1,2})\.?$").expect("dotted date pattern is valid")
});

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DigestError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled selectors for a layout.
#[derive(Debug)]
pub struct LayoutSelectors {
    item: Selector,
    title: Selector,
    summary: Selector,
    aggregator_link: Selector,
    info: Selector,
}

impl LayoutSelectors {
    pub fn compile(layout: &HtmlLayout) -> Result<Self> {
        Ok(Self {
            item: selector(layout.item)?,
            title: selector(layout.title)?,
            summary: selector(layout.summary)?,
            aggregator_link: selector(layout.aggregator_link)?,
            info: selector(layout.info)?,
        })
    }
}

/// Turn an info-span label into an RFC 3339 timestamp, relative to `now`.
///
/// Understands `N초/분/시간/일/주 전` and `YYYY.MM.DD.`; anything else
/// (press names, badges) yields `None`.
pub fn parse_age(label: &str, now: DateTime<FixedOffset>) -> Option<String> {
    let label = label.trim();
    if let Some(caps) = RELATIVE_AGE.captures(label) {
        let n: i64 = caps[1].parse().ok()?;
        let age = match &caps[2] {
            "초" => Duration::try_seconds(n),
            "분" => Duration::try_minutes(n),
            "시간" => Duration::try_hours(n),
            "일" => Duration::try_days(n),
            "주" => Duration::try_weeks(n),
            _ => None,
        }?;
        return now.checked_sub_signed(age).map(|t| t.to_rfc3339());
    }
    if let Some(caps) = DOTTED_DATE.captures(label) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return now
            .offset()
            .from_local_datetime(&midnight)
            .single()
            .map(|t| t.to_rfc3339());
    }
    None
}

/// Concatenate text nodes (highlight tags split words) and collapse layout whitespace.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().join(" ")
}

/// Extract search hits from a result page.
///
/// Items without a title anchor or a resolvable link are skipped.
pub fn parse_results(
    html: &str,
    base: &Url,
    selectors: &LayoutSelectors,
    now: DateTime<FixedOffset>,
) -> Vec<RawArticle> {
    let document = Html::parse_document(html);
    let mut articles = Vec::new();

    for item in document.select(&selectors.item) {
        let Some(anchor) = item.select(&selectors.title).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(original) = base.join(href) else {
            continue;
        };

        let title = anchor
            .value()
            .attr("title")
            .map(str::to_string)
            .unwrap_or_else(|| element_text(anchor));
        let summary = item
            .select(&selectors.summary)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let link = item
            .select(&selectors.aggregator_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|h| base.join(h).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| original.to_string());
        let published = item
            .select(&selectors.info)
            .find_map(|span| parse_age(&element_text(span), now));

        articles.push(RawArticle {
            title,
            link,
            original_link: Some(original.to_string()),
            summary,
            published,
            entities_decoded: true,
        });
    }
    articles
}

pub struct NaverHtmlSource<'a> {
    client: &'a Client,
    search_url: Url,
    referer: String,
    layout: &'static HtmlLayout,
    selectors: LayoutSelectors,
}

impl<'a> NaverHtmlSource<'a> {
    pub fn new(client: &'a Client, search_url: &str, layout: &'static HtmlLayout) -> Result<Self> {
        let search_url = Url::parse(search_url)?;
        let referer = format!("{}/", search_url.origin().ascii_serialization());
        Ok(Self {
            client,
            search_url,
            referer,
            layout,
            selectors: LayoutSelectors::compile(layout)?,
        })
    }

    fn page_url(&self, query: &str, start: usize) -> String {
        format!(
            "{}?where={}&query={}&sort=1&start={}",
            self.search_url,
            self.layout.where_param,
            urlencoding::encode(query),
            start
        )
    }
}

impl NewsSource for NaverHtmlSource<'_> {
    fn name(&self) -> &str {
        self.layout.name
    }

    fn page_size(&self) -> usize {
        self.layout.page_size
    }

    /// `display` is ignored: result pages have a fixed size and
    /// [`super::fetch_group`] trims the surplus.
    #[instrument(level = "debug", skip(self, _display))]
    async fn fetch_page(&self, query: &str, _display: usize, start: usize) -> Result<Vec<RawArticle>> {
        let url = self.page_url(query, start);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, self.layout.user_agent)
            .header(reqwest::header::REFERER, &self.referer)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DigestError::Status {
                endpoint: self.search_url.to_string(),
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let articles = parse_results(&body, &self.search_url, &self.selectors, Local::now().fixed_offset());
        debug!(count = articles.len(), "Parsed search result page");
        Ok(articles)
    }
}
