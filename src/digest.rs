//! Section classification and plain-text rendering of the digest.
//!
//! Sections are matched in configuration order against the title; the
//! first hit wins and everything else lands in the default section.
//! Rendering walks the same order and never omits a section: an empty one
//! shows the placeholder line instead.

use crate::config::{ReportConfig, SectionConfig};
use crate::models::Article;
use chrono::NaiveDate;
use itertools::Itertools;
use tracing::{debug, info, warn};

/// One named bucket of classified articles.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: String,
    pub articles: Vec<Article>,
}

/// The sectioned result of a run, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub date: NaiveDate,
    pub sections: Vec<Section>,
}

impl Digest {
    pub fn article_count(&self) -> usize {
        self.sections.iter().map(|s| s.articles.len()).sum()
    }
}

/// Index of the section a title belongs to.
///
/// `None` only when `sections` has no default section, which a validated
/// configuration rules out.
pub fn section_index(title: &str, sections: &[SectionConfig]) -> Option<usize> {
    sections
        .iter()
        .position(|s| !s.default && s.keywords.iter().any(|k| title.contains(k.as_str())))
        .or_else(|| sections.iter().position(|s| s.default))
}

/// Partition `articles` into sections, preserving input order within each.
///
/// A section's `cap` keeps its first N records and drops the rest.
pub fn classify(articles: Vec<Article>, sections: &[SectionConfig]) -> Vec<Section> {
    let mut buckets: Vec<Section> = sections
        .iter()
        .map(|s| Section {
            header: s.header.clone(),
            articles: Vec::new(),
        })
        .collect();

    for article in articles {
        let Some(idx) = section_index(&article.title, sections) else {
            warn!(title = %article.title, "No section accepts this article; dropping");
            continue;
        };
        if sections[idx].cap.is_some_and(|cap| buckets[idx].articles.len() >= cap) {
            debug!(section = %sections[idx].header, title = %article.title, "Section full; dropping");
            continue;
        }
        buckets[idx].articles.push(article);
    }

    for section in &buckets {
        info!(section = %section.header, count = section.articles.len(), "Classified section");
    }
    buckets
}

/// Render the digest as plain text.
///
/// ```text
/// ■ News feed: 2026-10-16
///
/// <생보3사/보험업계>
/// • headline
/// https://publisher.example/1
///
/// <투자손익/금융시장>
/// (기사 없음)
/// ```
pub fn render(digest: &Digest, report: &ReportConfig) -> String {
    let header = format!("{}: {}\n", report.title, digest.date.format(&report.date_format));
    let blocks = digest
        .sections
        .iter()
        .map(|section| {
            let body = if section.articles.is_empty() {
                format!("{}\n", report.placeholder)
            } else {
                section
                    .articles
                    .iter()
                    .map(|a| format!("• {}\n{}\n", a.title, a.url))
                    .join("\n")
            };
            format!("{}\n{}", section.header, body)
        })
        .join("\n");
    format!("{header}\n{blocks}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use proptest::prelude::*;

    fn sections() -> Vec<SectionConfig> {
        vec![
            SectionConfig {
                header: "<industry>".to_string(),
                keywords: vec![],
                cap: None,
                default: true,
            },
            SectionConfig {
                header: "<investment>".to_string(),
                keywords: vec!["실적".to_string(), "주가".to_string()],
                cap: None,
                default: false,
            },
        ]
    }

    fn article(title: &str, url: &str) -> Article {
        Article {
            title: title.to_string(),
            url: url.to_string(),
            summary: String::new(),
            category: Category::Industry,
            published_at: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_first_matching_section_wins() {
        let mut cfg = sections();
        cfg.push(SectionConfig {
            header: "<stocks>".to_string(),
            keywords: vec!["주가".to_string()],
            cap: None,
            default: false,
        });
        // "<investment>" comes before "<stocks>" and also lists 주가.
        assert_eq!(section_index("한화생명 주가 급등", &cfg), Some(1));
        assert_eq!(section_index("교보생명 신임 대표", &cfg), Some(0));
    }

    #[test]
    fn test_scenario_earnings_go_to_investment() {
        let out = classify(vec![article("A사 실적 발표", "https://a.example/1")], &sections());
        assert!(out[0].articles.is_empty());
        assert_eq!(out[1].articles.len(), 1);
        assert_eq!(out[1].header, "<investment>");
    }

    #[test]
    fn test_section_cap_keeps_first_n() {
        let mut cfg = sections();
        cfg[0].cap = Some(2);
        let input = vec![
            article("첫째", "https://a.example/1"),
            article("둘째", "https://a.example/2"),
            article("셋째", "https://a.example/3"),
        ];
        let out = classify(input, &cfg);
        let urls: Vec<_> = out[0].articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example/1", "https://a.example/2"]);
    }

    #[test]
    fn test_render_layout() {
        let digest = Digest {
            date: date(),
            sections: classify(
                vec![
                    article("교보생명 신임 대표", "https://a.example/1"),
                    article("삼성생명 배당", "https://a.example/2"),
                ],
                &sections(),
            ),
        };
        let text = render(&digest, &ReportConfig::default());
        assert_eq!(
            text,
            "■ News feed: 2026-10-16\n\
             \n\
             <industry>\n\
             • 교보생명 신임 대표\nhttps://a.example/1\n\
             \n\
             • 삼성생명 배당\nhttps://a.example/2\n\
             \n\
             <investment>\n\
             (기사 없음)\n"
        );
    }

    #[test]
    fn test_empty_digest_renders_every_placeholder() {
        let digest = Digest {
            date: date(),
            sections: classify(vec![], &sections()),
        };
        let text = render(&digest, &ReportConfig::default());
        assert_eq!(text.matches("(기사 없음)").count(), 2);
        assert!(text.contains("<industry>\n(기사 없음)\n"));
        assert!(text.contains("<investment>\n(기사 없음)\n"));
        assert_eq!(digest.article_count(), 0);
    }

    #[test]
    fn test_render_uses_configured_date_format() {
        let report = ReportConfig {
            title: "Digest".to_string(),
            placeholder: "none".to_string(),
            date_format: "%Y.%m.%d".to_string(),
        };
        let digest = Digest {
            date: date(),
            sections: vec![],
        };
        assert_eq!(render(&digest, &report), "Digest: 2026.10.16\n\n");
    }

    const TITLE_TOKENS: &[&str] = &["삼성생명", "실적", "주가", "배당", "IR", "코스피", "부고"];

    proptest! {
        #[test]
        fn every_article_lands_in_exactly_one_section(
            titles in proptest::collection::vec(
                proptest::sample::subsequence(TITLE_TOKENS.to_vec(), 0..=TITLE_TOKENS.len()),
                0..30,
            ),
        ) {
            let input: Vec<Article> = titles
                .iter()
                .enumerate()
                .map(|(i, t)| article(&t.join(" "), &format!("https://a.example/{i}")))
                .collect();
            let out = classify(input.clone(), &sections());

            prop_assert_eq!(out.iter().map(|s| s.articles.len()).sum::<usize>(), input.len());
            for a in &input {
                let hits = out.iter().filter(|s| s.articles.contains(a)).count();
                prop_assert_eq!(hits, 1);
            }
        }
    }
}
