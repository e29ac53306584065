// src/analyze/rerank.rs
//! Ordering and per-source diversity for the display sections.
//!
//! - `sort_by_credibility`: credibility desc, then newest first (default order)
//! - `sort_by_composite`: freshness-weighted order used for the top section
//! - `ensure_source_diversity`: single stable pass that keeps at most `cap`
//!   articles per source name. It only drops, never reorders, so a lower
//!   ranked article never jumps ahead of a higher ranked one.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::analyze::scoring::composite_score;
use crate::article::Article;

/// Stable sort: credibility score desc, then publish time desc.
pub fn sort_by_credibility(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.credibility_score
            .cmp(&a.credibility_score)
            .then_with(|| b.pub_date.cmp(&a.pub_date))
    });
}

/// Stable sort by composite (recency + credibility) score, highest first.
/// `now` is captured once so every comparison sees the same clock.
pub fn sort_by_composite(articles: &mut Vec<Article>, now: DateTime<Utc>) {
    let mut keyed: Vec<(f64, Article)> = articles
        .drain(..)
        .map(|a| (composite_score(&a, now), a))
        .collect();
    keyed.sort_by(|(sa, _), (sb, _)| sb.total_cmp(sa));
    articles.extend(keyed.into_iter().map(|(_, a)| a));
}

/// Keep an article only while its source has fewer than `cap` kept so far.
pub fn ensure_source_diversity(articles: Vec<Article>, cap: usize) -> Vec<Article> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut kept = Vec::with_capacity(articles.len());
    for a in articles {
        let seen = counts.entry(a.source.clone()).or_insert(0);
        if *seen >= cap {
            continue;
        }
        *seen += 1;
        kept.push(a);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{article_id, Category};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 14, 0, 0).unwrap()
    }

    fn art(n: usize, source: &str, score: u32, hours_old: i64) -> Article {
        let link = format!("https://x.test/{source}/{n}");
        Article {
            id: article_id(&link),
            title: format!("Story number {n} from {source}"),
            link,
            excerpt: String::new(),
            source: source.to_string(),
            source_url: String::new(),
            pub_date: now() - Duration::hours(hours_old),
            category: Category::Top,
            image_url: None,
            credibility_score: score,
        }
    }

    #[test]
    fn credibility_then_recency() {
        let mut v = vec![
            art(1, "google", 50, 1),
            art(2, "nbc", 100, 10),
            art(3, "billy", 75, 2),
            art(4, "whyy", 100, 3),
        ];
        sort_by_credibility(&mut v);
        let order: Vec<_> = v.iter().map(|a| a.source.as_str()).collect();
        assert_eq!(order, vec!["whyy", "nbc", "billy", "google"]);
    }

    #[test]
    fn composite_prefers_fresh_news() {
        let mut v = vec![art(1, "nbc", 100, 12), art(2, "google", 50, 1)];
        sort_by_composite(&mut v, now());
        assert_eq!(v[0].source, "google");
    }

    #[test]
    fn composite_ties_keep_input_order() {
        let mut v = vec![art(1, "a", 75, 5), art(2, "b", 75, 5), art(3, "c", 75, 5)];
        sort_by_composite(&mut v, now());
        let order: Vec<_> = v.iter().map(|a| a.source.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn diversity_caps_per_source_without_reordering() {
        let v: Vec<Article> = (0..5).map(|i| art(i, "Google News", 50, i as i64)).collect();
        let out = ensure_source_diversity(v, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(
            out.iter().map(|a| a.link.as_str()).collect::<Vec<_>>(),
            vec![
                "https://x.test/Google News/0",
                "https://x.test/Google News/1",
                "https://x.test/Google News/2"
            ]
        );
    }

    #[test]
    fn diversity_counts_each_source_separately() {
        let v = vec![
            art(1, "a", 75, 1),
            art(2, "a", 75, 2),
            art(3, "b", 75, 3),
            art(4, "a", 75, 4),
            art(5, "b", 75, 5),
            art(6, "b", 75, 6),
        ];
        let out = ensure_source_diversity(v, 2);
        let links: Vec<_> = out.iter().map(|a| a.link.rsplit('/').next().unwrap()).collect();
        assert_eq!(links, vec!["1", "2", "3", "5"]);
    }
}
