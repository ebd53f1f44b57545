//! Exact-URL and near-duplicate removal across the merged result list.
//!
//! Syndicated wire stories reach several publishers with different URLs
//! but nearly identical lead paragraphs. A record is a near-duplicate of an
//! earlier accepted record when their summaries share a contiguous run of
//! at least `threshold` characters, where the threshold depends on the
//! record's category.
//!
//! Cost is O(n² · m) in accepted records and summary length, which is fine
//! for the few hundred records a run sees.

use crate::config::DedupConfig;
use crate::models::Article;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Length of the longest common contiguous run between `a` and `b`,
/// counted in `char`s.
pub fn longest_common_substring(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best = 0;
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            best = best.max(curr[j + 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

/// Drop URL repeats and near-duplicate summaries; first occurrence wins.
#[instrument(level = "info", skip_all, fields(input = articles.len()))]
pub fn dedupe(articles: Vec<Article>, config: &DedupConfig) -> Vec<Article> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_summaries: Vec<Vec<char>> = Vec::new();
    let mut unique = Vec::with_capacity(articles.len());
    let total = articles.len();

    for article in articles {
        if seen_urls.contains(&article.url) {
            debug!(url = %article.url, "Dropping repeated URL");
            continue;
        }

        let threshold = config.threshold_for(article.category);
        let summary: Vec<char> = article.summary.chars().collect();
        if let Some(overlap) = seen_summaries
            .iter()
            .map(|seen| longest_common_substring(&summary, seen))
            .find(|overlap| *overlap >= threshold)
        {
            debug!(url = %article.url, overlap, threshold, "Dropping near-duplicate summary");
            continue;
        }

        seen_urls.insert(article.url.clone());
        seen_summaries.push(summary);
        unique.push(article);
    }

    info!(total, kept = unique.len(), dropped = total - unique.len(), "Deduplicated articles");
    unique
}
