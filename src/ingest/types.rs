// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Generic parsed feed, independent of transport and wire format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    /// Site link advertised by the channel, if any.
    pub link: Option<String>,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Raw date string as found in the feed (RFC 2822 or RFC 3339).
    pub pub_date: Option<String>,
    /// Full (possibly HTML) content.
    pub content: Option<String>,
    /// Plain-text view of `content` with markup stripped.
    pub content_snippet: Option<String>,
    pub media_content: Vec<MediaContent>,
    pub media_thumbnail: Vec<MediaThumbnail>,
    pub enclosure: Option<Enclosure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaContent {
    pub url: Option<String>,
    pub medium: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaThumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: Option<String>,
    pub mime_type: Option<String>,
}

/// One normalized feed entry, produced by the fetcher and consumed by the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    /// `None` when the feed carried a date we could not parse.
    pub published: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub excerpt: Option<String>,
}

/// Feed transport + parser collaborator: URL in, parsed feed out.
#[async_trait::async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch_feed(&self, url: &str) -> Result<ParsedFeed>;
    fn name(&self) -> &'static str;
}
