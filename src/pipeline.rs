//! One run of the digest: fetch every group, merge, dedupe, classify.
//!
//! Groups are fetched strictly one after another in configuration order;
//! that order is also the merge order, so earlier groups win duplicate
//! ties in the deduplicator.

use crate::config::Config;
use crate::dedup::dedupe;
use crate::digest::{Digest, classify};
use crate::filter::{is_fresh, passes_keywords};
use crate::models::{Article, QueryGroup};
use crate::normalize::normalize;
use crate::sources::{NewsSource, fetch_group};
use chrono::{DateTime, Local, Utc};
use tracing::{info, instrument};

/// Fetch and filter one group. Never fails; fetch errors yield fewer items.
#[instrument(level = "info", skip_all, fields(group = %group.name))]
pub async fn collect_group<S: NewsSource>(
    source: &S,
    group: &QueryGroup,
    config: &Config,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let query = group.search_query();
    info!(%query, cap = group.result_cap, "Searching");
    let raw = fetch_group(source, &query, group.result_cap, config.page_delay()).await;

    let window = config.freshness_window(group.category);
    let mut stale = 0usize;
    let mut rejected = 0usize;
    let mut kept = Vec::new();
    for item in &raw {
        let article = normalize(item, group.category);
        if !is_fresh(&article, window, now) {
            stale += 1;
            continue;
        }
        if !passes_keywords(&article.title, group) {
            rejected += 1;
            continue;
        }
        kept.push(article);
    }

    let matched = kept.len();
    if let Some(limit) = group.keep_first {
        kept.truncate(limit);
    }
    info!(
        fetched = raw.len(),
        stale,
        rejected,
        matched,
        kept = kept.len(),
        "Group collected"
    );
    kept
}

/// Run every configured group and merge the results in group order.
pub async fn collect<S: NewsSource>(source: &S, config: &Config, now: DateTime<Utc>) -> Vec<Article> {
    let mut merged = Vec::new();
    for group in &config.groups {
        merged.extend(collect_group(source, group, config, now).await);
    }
    info!(count = merged.len(), "Merged all groups");
    merged
}

/// Produce the sectioned digest for `now`.
pub async fn run<S: NewsSource>(source: &S, config: &Config, now: DateTime<Local>) -> Digest {
    let merged = collect(source, config, now.with_timezone(&Utc)).await;
    let unique = dedupe(merged, &config.dedup);
    Digest {
        date: now.date_naive(),
        sections: classify(unique, &config.sections),
    }
}
