//! # Article model
//! Canonical processed unit flowing from the filter stage to the grouped output,
//! plus the per-run `AggregationResult` handed to the presentation layer.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of display sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Local,
    Sports,
    Culture,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Top,
        Category::Local,
        Category::Sports,
        Category::Culture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Local => "local",
            Category::Sports => "sports",
            Category::Culture => "culture",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A headline that survived the content filter.
///
/// Never mutated after construction; later stages only select or drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub link: String,
    pub excerpt: String,
    pub source: String,
    pub source_url: String,
    pub pub_date: DateTime<Utc>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub credibility_score: u32,
}

/// Stable identifier derived from the article link only.
///
/// 24 lowercase hex chars (first 12 bytes of SHA-256). Re-fetches of the same
/// story collapse to the same id regardless of title or source.
pub fn article_id(link: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    hasher
        .finalize()
        .iter()
        .take(12)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Output of one aggregation run. Rebuilt from scratch every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub top: Vec<Article>,
    pub local: Vec<Article>,
    pub sports: Vec<Article>,
    pub culture: Vec<Article>,
    pub last_updated: String,
}

impl AggregationResult {
    /// Well-formed result with every section empty (e.g. all fetches failed).
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            top: Vec::new(),
            local: Vec::new(),
            sports: Vec::new(),
            culture: Vec::new(),
            last_updated: iso_timestamp(now),
        }
    }

    pub fn section(&self, category: Category) -> &[Article] {
        match category {
            Category::Top => &self.top,
            Category::Local => &self.local,
            Category::Sports => &self.sports,
            Category::Culture => &self.culture,
        }
    }

    pub fn total(&self) -> usize {
        self.top.len() + self.local.len() + self.sports.len() + self.culture.len()
    }
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2026-02-10T14:03:07.123Z`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
