//! Aggregation orchestrator: fetch fan-out → filter → assemble.

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::analyze::filter::{ContentFilter, Rejection};
use crate::article::{AggregationResult, Article};
use crate::config::{load_registry_default, AggregatorConfig};
use crate::engine::assemble;
use crate::ingest::providers::HttpFeedTransport;
use crate::ingest::types::FeedTransport;
use crate::ingest::{fetch_all, SourceBatch};
use crate::sources::SourceRegistry;

/// Owns everything one run needs. Cheap to share behind an `Arc`.
pub struct Aggregator {
    registry: SourceRegistry,
    transport: Arc<dyn FeedTransport>,
    filter: ContentFilter,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(
        registry: SourceRegistry,
        transport: Arc<dyn FeedTransport>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            filter: ContentFilter::default(),
            fetch_timeout,
        }
    }

    /// Registry from config files / seed, HTTP transport, env-driven timeouts.
    pub fn from_env() -> Result<Self> {
        let cfg = AggregatorConfig::from_env();
        let registry = load_registry_default()?;
        let transport = HttpFeedTransport::from_config(&cfg)?;
        Ok(Self::new(registry, Arc::new(transport), cfg.fetch_timeout))
    }

    pub fn with_filter(mut self, filter: ContentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub async fn aggregate(&self) -> AggregationResult {
        self.aggregate_at(Utc::now()).await
    }

    /// One full run against a fixed clock.
    pub async fn aggregate_at(&self, now: DateTime<Utc>) -> AggregationResult {
        let batches = fetch_all(
            Arc::clone(&self.transport),
            &self.registry.sources,
            self.fetch_timeout,
            now,
        )
        .await;

        let fetched: usize = batches.iter().map(|b| b.items.len()).sum();
        let articles = self.filter_batches(batches, now);
        let kept = articles.len();

        let result = assemble(articles, now);
        gauge!("news_last_aggregation_ts").set(now.timestamp() as f64);

        info!(
            target: "aggregate",
            sources = self.registry.len(),
            fetched,
            kept,
            top = result.top.len(),
            local = result.local.len(),
            sports = result.sports.len(),
            culture = result.culture.len(),
            "aggregation finished"
        );
        result
    }

    fn filter_batches(&self, batches: Vec<SourceBatch>, now: DateTime<Utc>) -> Vec<Article> {
        let mut out = Vec::new();
        for batch in batches {
            for raw in batch.items {
                let title = raw.title.clone();
                match self
                    .filter
                    .filter_item(raw, &batch.source, &batch.source_url, now)
                {
                    Ok(article) => out.push(article),
                    Err(rej) => {
                        log_rejection(&rej, &batch.source.name, &title);
                        counter!("news_filtered_total", "reason" => rej.reason()).increment(1);
                    }
                }
            }
        }
        out
    }
}

fn log_rejection(rej: &Rejection, source: &str, title: &str) {
    match rej {
        Rejection::RedFlag(rule) | Rejection::NonNews(rule) => {
            info!(target: "filter", reason = rej.reason(), rule = %rule, source, title, "filtered")
        }
        _ => debug!(target: "filter", reason = rej.reason(), source, title, "filtered"),
    }
}
