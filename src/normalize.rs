//! Text cleanup and link selection for raw search results.
//!
//! Naver wraps matched terms in `<b>` and escapes punctuation as HTML
//! entities in both titles and descriptions. Everything here is pure and
//! infallible: malformed input degrades to best-effort text.

use crate::models::{Article, Category, RawArticle};
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};

static HIGHLIGHT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:b|strong|em|mark)(?:\s[^>]*)?>").expect("highlight tag pattern is valid")
});
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9A-Fa-f]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);").expect("entity pattern is valid")
});

/// Resolve one entity body (the part between `&` and `;`).
fn resolve_entity(body: &str) -> Option<String> {
    let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = body.strip_prefix('#') {
        dec.parse().ok()?
    } else {
        return resolve_html5_entity(body).map(str::to_string);
    };
    char::from_u32(code).map(String::from)
}

/// Decode named and numeric entities one by one. Anything that does not
/// resolve (a bare `&`, an unknown name) is left exactly as written.
pub fn unescape_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |caps: &Captures<'_>| {
            resolve_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Drop highlight markup and trim.
pub fn strip_highlights(text: &str) -> String {
    HIGHLIGHT_TAG.replace_all(text, "").trim().to_string()
}

/// Unescape entities, drop highlight markup, trim.
pub fn clean_text(raw: &str) -> String {
    strip_highlights(&unescape_entities(raw))
}

/// Prefer the publisher's own link over the aggregator mirror.
pub fn canonical_link(raw: &RawArticle) -> String {
    match raw.original_link.as_deref().map(str::trim) {
        Some(original) if !original.is_empty() => original.to_string(),
        _ => raw.link.trim().to_string(),
    }
}

/// Parse a publish timestamp. RFC 2822 (the API's `pubDate`) and RFC 3339
/// (what the HTML strategy emits) are accepted; anything else is `None`.
pub fn parse_published(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

/// Turn a raw record into an immutable [`Article`] tagged with `category`.
pub fn normalize(raw: &RawArticle, category: Category) -> Article {
    let published_at = raw.published.as_deref().and_then(|p| {
        let parsed = parse_published(p);
        if parsed.is_none() {
            tracing::debug!(published = p, "Unparseable publish date; record will not be time-filtered");
        }
        parsed
    });

    // Parsed HTML already had its entities decoded; a second pass would
    // turn literal `&lt;` text into markup.
    let clean: fn(&str) -> String = if raw.entities_decoded {
        strip_highlights
    } else {
        clean_text
    };

    Article {
        title: clean(&raw.title),
        url: canonical_link(raw),
        summary: clean(&raw.summary),
        category,
        published_at,
    }
}
