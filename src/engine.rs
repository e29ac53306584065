//! # Assembly Engine
//! Pure, testable logic that maps the filtered cross-source article list to
//! the grouped `AggregationResult`. No I/O.
//!
//! Order:
//! 1) near-duplicate elimination (input order = fetch order)
//! 2) global sort: credibility desc, newest first
//! 3) split by category (stable)
//! 4) top: composite recency/credibility sort, max 3 per source, 8 total
//! 5) local: max 2 per source, 8 total
//! 6) sports / culture: no source cap, 6 total

use chrono::{DateTime, Utc};
use metrics::counter;

use crate::analyze::dedup::deduplicate;
use crate::analyze::rerank::{ensure_source_diversity, sort_by_composite, sort_by_credibility};
use crate::article::{iso_timestamp, AggregationResult, Article, Category};

/// Per-section limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLimits {
    pub len: usize,
    /// Max articles per source name; `None` disables the diversity pass.
    pub per_source: Option<usize>,
}

pub const TOP: SectionLimits = SectionLimits {
    len: 8,
    per_source: Some(3),
};
pub const LOCAL: SectionLimits = SectionLimits {
    len: 8,
    per_source: Some(2),
};
pub const SPORTS: SectionLimits = SectionLimits {
    len: 6,
    per_source: None,
};
pub const CULTURE: SectionLimits = SectionLimits {
    len: 6,
    per_source: None,
};

pub fn limits_for(category: Category) -> SectionLimits {
    match category {
        Category::Top => TOP,
        Category::Local => LOCAL,
        Category::Sports => SPORTS,
        Category::Culture => CULTURE,
    }
}

/// Build the grouped result from filtered articles.
pub fn assemble(articles: Vec<Article>, now: DateTime<Utc>) -> AggregationResult {
    let before = articles.len();
    let mut articles = deduplicate(articles);
    counter!("news_dedup_removed_total").increment((before - articles.len()) as u64);

    sort_by_credibility(&mut articles);

    let mut result = AggregationResult::empty(now);
    for category in Category::ALL {
        let mut section: Vec<Article> = articles
            .iter()
            .filter(|a| a.category == category)
            .cloned()
            .collect();

        if category == Category::Top {
            sort_by_composite(&mut section, now);
        }

        let limits = limits_for(category);
        if let Some(cap) = limits.per_source {
            let n = section.len();
            section = ensure_source_diversity(section, cap);
            counter!("news_diversity_removed_total", "category" => category.as_str())
                .increment((n - section.len()) as u64);
        }
        section.truncate(limits.len);

        match category {
            Category::Top => result.top = section,
            Category::Local => result.local = section,
            Category::Sports => result.sports = section,
            Category::Culture => result.culture = section,
        }
    }

    result.last_updated = iso_timestamp(now);
    result
}
