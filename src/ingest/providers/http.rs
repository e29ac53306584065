// src/ingest/providers/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::AggregatorConfig;
use crate::ingest::parser::parse_feed;
use crate::ingest::types::{FeedTransport, ParsedFeed};

/// Fetches feeds over HTTP(S) with `reqwest` and parses them with `quick-xml`.
pub struct HttpFeedTransport {
    client: reqwest::Client,
}

impl HttpFeedTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("building feed http client")?;
        Ok(Self { client })
    }

    pub fn from_config(cfg: &AggregatorConfig) -> Result<Self> {
        Self::new(cfg.fetch_timeout, &cfg.user_agent)
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    async fn fetch_feed(&self, url: &str) -> Result<ParsedFeed> {
        let body = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "application/rss+xml, application/atom+xml, application/xml;q=0.9, */*;q=0.8",
            )
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} status"))?
            .text()
            .await
            .context("feed http .text()")?;
        parse_feed(&body).with_context(|| format!("parsing feed from {url}"))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
