//! Keyword and freshness predicates over normalized records.

use crate::models::{Article, QueryGroup};
use chrono::{DateTime, Duration, Utc};

/// Keep iff the title hits no excluded keyword and at least one required one.
///
/// Plain case-sensitive substring containment; the excluded check runs
/// first since exclusions are the longer list in practice.
pub fn passes_keywords(title: &str, group: &QueryGroup) -> bool {
    if group.excludes.iter().any(|ex| title.contains(ex.as_str())) {
        return false;
    }
    group.keywords.iter().any(|kw| title.contains(kw.as_str()))
}

/// `false` only when the record has a publish time older than `window`.
///
/// Records without a timestamp and categories without a window always pass.
pub fn is_fresh(article: &Article, window: Option<Duration>, now: DateTime<Utc>) -> bool {
    match (article.published_at, window) {
        (Some(published), Some(window)) => now.signed_duration_since(published) <= window,
        _ => true,
    }
}
