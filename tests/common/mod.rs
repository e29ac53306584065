// tests/common/mod.rs
//
// Shared fixtures: a fixed clock, the XML feeds under tests/fixtures/, and a
// small registry wired to them through the offline transport.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use metro_headlines::article::{article_id, Article, Category};
use metro_headlines::ingest::providers::FixtureTransport;
use metro_headlines::sources::{CredibilityTier, FeedSource, SourceRegistry};

pub const NBC10_XML: &str = include_str!("../fixtures/nbc10_rss.xml");
pub const WHYY_XML: &str = include_str!("../fixtures/whyy_atom.xml");
pub const GOOGLE_XML: &str = include_str!("../fixtures/google_news.xml");
pub const BILLYPENN_XML: &str = include_str!("../fixtures/billypenn_wordpress.xml");

pub const NBC10_URL: &str = "https://www.nbcphiladelphia.com/feed/";
pub const WHYY_URL: &str = "https://whyy.org/feed/";
pub const GOOGLE_URL: &str = "https://news.google.com/rss/search?q=philadelphia+news";
pub const BILLYPENN_URL: &str = "https://billypenn.com/feed/";
pub const BROKEN_URL: &str = "https://broken.example.test/feed/";

/// Tue, 10 Feb 2026 14:00:00 UTC. Fixture dates are relative to this.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, 14, 0, 0).unwrap()
}

pub fn registry() -> SourceRegistry {
    SourceRegistry::new(vec![
        FeedSource::new(NBC10_URL, "NBC10", Category::Top, CredibilityTier::PRIMARY),
        FeedSource::new(WHYY_URL, "WHYY", Category::Top, CredibilityTier::PRIMARY),
        FeedSource::new(
            GOOGLE_URL,
            "Google News",
            Category::Top,
            CredibilityTier::AGGREGATOR,
        ),
        FeedSource::new(
            BROKEN_URL,
            "Broken Local",
            Category::Local,
            CredibilityTier::DIGITAL,
        ),
    ])
}

/// Serves every fixture feed; `BROKEN_URL` is left unregistered.
pub fn transport() -> FixtureTransport {
    FixtureTransport::new()
        .with_feed(NBC10_URL, NBC10_XML)
        .with_feed(WHYY_URL, WHYY_XML)
        .with_feed(GOOGLE_URL, GOOGLE_XML)
}

pub fn article(
    title: &str,
    source: &str,
    category: Category,
    credibility_score: u32,
    minutes_old: i64,
) -> Article {
    let link = format!(
        "https://{}.test/{}",
        source.replace(' ', "").to_lowercase(),
        title.replace(' ', "-").to_lowercase()
    );
    Article {
        id: article_id(&link),
        title: title.to_string(),
        link,
        excerpt: String::new(),
        source: source.to_string(),
        source_url: String::new(),
        pub_date: now() - Duration::minutes(minutes_old),
        category,
        image_url: None,
        credibility_score,
    }
}
