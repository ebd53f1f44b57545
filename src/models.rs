//! Data models for news records as they move through the pipeline.
//!
//! - [`RawArticle`]: what a source strategy scraped or decoded, untouched
//! - [`Article`]: a normalized candidate record, immutable from here on
//! - [`Category`]: the source-group tag that drives thresholds and windows
//! - [`QueryGroup`]: one keyword-scoped fetch request

use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag carried by every record of a query group.
///
/// The deduplicator looks up its overlap threshold by this tag, and the
/// freshness window is configured per tag as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Company and industry news (syndicated heavily, tight threshold).
    Industry,
    /// Market wrap-ups (boilerplate-heavy, loose threshold).
    Market,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Industry => f.write_str("industry"),
            Category::Market => f.write_str("market"),
        }
    }
}

/// A raw search result as produced by a source strategy.
///
/// Text fields may still carry entity escapes and highlight tags; the
/// normalizer is responsible for cleaning them up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    /// Headline as delivered by the source.
    pub title: String,
    /// Aggregator link (the Naver News mirror when there is one).
    pub link: String,
    /// The publisher's own link, when the source exposes it.
    pub original_link: Option<String>,
    /// Snippet or description; empty when the source has none.
    pub summary: String,
    /// Publish time in whatever textual form the source uses.
    pub published: Option<String>,
    /// Text came out of an HTML parser, so entities are already decoded.
    pub entities_decoded: bool,
}

/// A normalized candidate record.
///
/// Has no identity beyond its URL string.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub category: Category,
    pub published_at: Option<DateTime<FixedOffset>>,
}

/// One keyword-scoped fetch request with its own filters and cap.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryGroup {
    /// Label used in logs.
    pub name: String,
    pub category: Category,
    /// Required keywords, OR-matched against the title.
    pub keywords: Vec<String>,
    /// Excluded keywords; any hit in the title drops the record.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// How many raw items to request from the source in total.
    pub result_cap: usize,
    /// Provider query string; defaults to the keywords joined with `" | "`.
    #[serde(default)]
    pub query: Option<String>,
    /// Keep only the first K filtered records of this group before merging.
    #[serde(default)]
    pub keep_first: Option<usize>,
}

impl QueryGroup {
    /// The query string sent to the provider.
    pub fn search_query(&self) -> String {
        match &self.query {
            Some(q) if !q.trim().is_empty() => q.clone(),
            _ => self.keywords.iter().join(" | "),
        }
    }
}
