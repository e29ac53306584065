// src/ingest/mod.rs
pub mod parser;
pub mod providers;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ingest::parser::parse_pub_date;
use crate::ingest::types::{FeedEntry, FeedTransport, MediaContent, RawItem};
use crate::sources::FeedSource;

/// Entries taken from the head of each feed (feeds list newest first).
pub const MAX_ITEMS_PER_SOURCE: usize = 15;
pub const UNTITLED: &str = "Untitled";

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_fetch_items_total", "Raw items taken from feeds.");
        describe_counter!(
            "news_source_errors_total",
            "Feed fetch/parse failures and timeouts."
        );
        describe_counter!(
            "news_filtered_total",
            "Items rejected by the content filter, by reason."
        );
        describe_counter!(
            "news_dedup_removed_total",
            "Articles removed as near-duplicates."
        );
        describe_counter!(
            "news_diversity_removed_total",
            "Articles dropped by the per-source cap."
        );
        describe_counter!("news_cache_hits_total", "Requests served from the cached result.");
        describe_counter!("news_cache_misses_total", "Requests that triggered a rebuild.");
        describe_histogram!("news_fetch_ms", "Per-source fetch + parse time in milliseconds.");
        describe_gauge!(
            "news_last_aggregation_ts",
            "Unix ts when the last aggregation finished."
        );
    });
}

/// Raw items fetched from one source, in feed order.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: FeedSource,
    /// Channel link when the feed has one, else the configured endpoint.
    pub source_url: String,
    pub items: Vec<RawItem>,
}

impl SourceBatch {
    pub fn empty(source: FeedSource) -> Self {
        Self {
            source_url: source.url.clone(),
            source,
            items: Vec::new(),
        }
    }
}

/// Fetch and normalize a single source. Errors propagate to the caller.
pub async fn fetch_source(
    transport: &dyn FeedTransport,
    source: &FeedSource,
    now: DateTime<Utc>,
) -> anyhow::Result<SourceBatch> {
    let feed = transport.fetch_feed(&source.url).await?;
    let items: Vec<RawItem> = feed
        .entries
        .into_iter()
        .take(MAX_ITEMS_PER_SOURCE)
        .map(|e| to_raw_item(e, now))
        .collect();
    counter!("news_fetch_items_total").increment(items.len() as u64);
    Ok(SourceBatch {
        source_url: feed.link.unwrap_or_else(|| source.url.clone()),
        source: source.clone(),
        items,
    })
}

/// Fan out one task per source and wait for all of them.
///
/// Results keep `sources` order. A source that errors, panics or misses
/// `deadline` yields an empty batch; nothing here fails the run.
pub async fn fetch_all(
    transport: Arc<dyn FeedTransport>,
    sources: &[FeedSource],
    deadline: Duration,
    now: DateTime<Utc>,
) -> Vec<SourceBatch> {
    ensure_metrics_described();

    let handles: Vec<_> = sources
        .iter()
        .cloned()
        .map(|source| {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move {
                let t0 = Instant::now();
                let res =
                    tokio::time::timeout(deadline, fetch_source(transport.as_ref(), &source, now))
                        .await;
                histogram!("news_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

                match res {
                    Ok(Ok(batch)) => {
                        tracing::debug!(
                            target: "ingest",
                            source = %source.name,
                            items = batch.items.len(),
                            "feed fetched"
                        );
                        batch
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            target: "ingest",
                            source = %source.name,
                            url = %source.url,
                            transport = transport.name(),
                            error = ?e,
                            "error fetching feed"
                        );
                        counter!("news_source_errors_total").increment(1);
                        SourceBatch::empty(source)
                    }
                    Err(_) => {
                        tracing::warn!(
                            target: "ingest",
                            source = %source.name,
                            url = %source.url,
                            deadline_ms = deadline.as_millis() as u64,
                            "feed fetch timed out"
                        );
                        counter!("news_source_errors_total").increment(1);
                        SourceBatch::empty(source)
                    }
                }
            })
        })
        .collect();

    let mut out = Vec::with_capacity(handles.len());
    for (handle, source) in handles.into_iter().zip(sources) {
        match handle.await {
            Ok(batch) => out.push(batch),
            Err(e) => {
                tracing::warn!(target: "ingest", source = %source.name, error = %e, "fetch task failed");
                counter!("news_source_errors_total").increment(1);
                out.push(SourceBatch::empty(source.clone()));
            }
        }
    }
    out
}

/// Default malformed fields instead of failing the source.
pub fn to_raw_item(entry: FeedEntry, now: DateTime<Utc>) -> RawItem {
    let image_url = extract_image_url(&entry);
    let published = match entry.pub_date.as_deref() {
        None => Some(now),
        Some(s) => {
            let ts = parse_pub_date(s);
            if ts.is_none() {
                tracing::debug!(target: "ingest", date = s, "unparseable publish date");
            }
            ts
        }
    };
    RawItem {
        title: entry.title.unwrap_or_else(|| UNTITLED.to_string()),
        link: entry.link.unwrap_or_default(),
        published,
        image_url,
        excerpt: entry
            .content_snippet
            .filter(|s| !s.is_empty())
            .or(entry.content),
    }
}

/// Image fallback chain: media:content (image) → media:thumbnail → image enclosure.
pub fn extract_image_url(entry: &FeedEntry) -> Option<String> {
    if let Some(url) = entry
        .media_content
        .iter()
        .find(|m| is_image_media(m))
        .and_then(|m| m.url.clone())
    {
        return Some(url);
    }

    if let Some(url) = entry.media_thumbnail.first().and_then(|t| t.url.clone()) {
        return Some(url);
    }

    entry
        .enclosure
        .as_ref()
        .filter(|e| e.mime_type.as_deref().is_some_and(is_image_mime))
        .and_then(|e| e.url.clone())
}

fn is_image_media(m: &MediaContent) -> bool {
    m.medium
        .as_deref()
        .is_some_and(|md| md.eq_ignore_ascii_case("image"))
        || m.mime_type.as_deref().is_some_and(is_image_mime)
}

fn is_image_mime(t: &str) -> bool {
    t.to_ascii_lowercase().starts_with("image/")
}
