//! Content filter: `RawItem` × `FeedSource` → `Article` or a rejection.
//!
//! Checks run in a fixed order and short-circuit:
//! 1. red-flag headline
//! 2. non-news headline (schedules, show names)
//! 3. staleness (older than 48h, or an unparseable timestamp)
//! 4. headline too short (< 10 chars after trimming)

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::analyze::rules::{non_news_rules, red_flag_rules, RuleSet};
use crate::analyze::scoring::credibility_score;
use crate::article::{article_id, Article};
use crate::ingest::types::RawItem;
use crate::sources::FeedSource;

pub const MAX_AGE_HOURS: i64 = 48;
pub const MIN_TITLE_CHARS: usize = 10;
pub const EXCERPT_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    RedFlag(String),
    NonNews(String),
    Stale,
    TooShort,
}

impl Rejection {
    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::RedFlag(_) => "red_flag",
            Rejection::NonNews(_) => "non_news",
            Rejection::Stale => "stale",
            Rejection::TooShort => "too_short",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::RedFlag(rule) | Rejection::NonNews(rule) => {
                write!(f, "{} ({rule})", self.reason())
            }
            _ => f.write_str(self.reason()),
        }
    }
}

/// Headline rule sets used by the filter. `Default` uses the built-in rules.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    pub red_flags: RuleSet,
    pub non_news: RuleSet,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self {
            red_flags: red_flag_rules().clone(),
            non_news: non_news_rules().clone(),
        }
    }
}

impl ContentFilter {
    pub fn new(red_flags: RuleSet, non_news: RuleSet) -> Self {
        Self {
            red_flags,
            non_news,
        }
    }

    pub fn check(&self, raw: &RawItem, now: DateTime<Utc>) -> Result<(), Rejection> {
        if let Some(rule) = self.red_flags.first_match(&raw.title) {
            return Err(Rejection::RedFlag(rule.to_string()));
        }
        if let Some(rule) = self.non_news.first_match(raw.title.trim()) {
            return Err(Rejection::NonNews(rule.to_string()));
        }
        match raw.published {
            Some(ts) if !is_stale(ts, now) => {}
            _ => return Err(Rejection::Stale),
        }
        if raw.title.trim().chars().count() < MIN_TITLE_CHARS {
            return Err(Rejection::TooShort);
        }
        Ok(())
    }

    /// Turn a raw entry into an `Article`, or say why it was dropped.
    pub fn filter_item(
        &self,
        raw: RawItem,
        source: &FeedSource,
        source_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Article, Rejection> {
        self.check(&raw, now)?;
        // `check` guarantees a timestamp.
        let pub_date = raw.published.unwrap_or(now);
        Ok(Article {
            id: article_id(&raw.link),
            excerpt: clean_excerpt(raw.excerpt.as_deref().unwrap_or_default()),
            title: raw.title,
            link: raw.link,
            source: source.name.clone(),
            source_url: source_url.to_string(),
            pub_date,
            category: source.category,
            image_url: raw.image_url,
            credibility_score: credibility_score(source.tier),
        })
    }
}

/// Filter with the built-in rule sets.
pub fn filter_item(
    raw: RawItem,
    source: &FeedSource,
    source_url: &str,
    now: DateTime<Utc>,
) -> Result<Article, Rejection> {
    static DEFAULT: Lazy<ContentFilter> = Lazy::new(ContentFilter::default);
    DEFAULT.filter_item(raw, source, source_url, now)
}

/// Older than the 48h freshness window. Future timestamps are fresh.
pub fn is_stale(published: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(published) > Duration::hours(MAX_AGE_HOURS)
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

pub fn strip_tags(s: &str) -> String {
    RE_TAGS.replace_all(s, "").into_owned()
}

/// Strip tags, decode the common entities, trim, cap at 200 chars.
pub fn clean_excerpt(text: &str) -> String {
    let decoded = strip_tags(text)
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'");
    let clean = decoded.trim();
    if clean.chars().count() > EXCERPT_MAX_CHARS {
        let head: String = clean.chars().take(EXCERPT_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        clean.to_string()
    }
}
