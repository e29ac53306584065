// src/ingest/providers/fixture.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::ingest::parser::parse_feed;
use crate::ingest::types::{FeedTransport, ParsedFeed};

/// Offline transport: serves XML bodies registered per URL.
///
/// Unknown URLs fail like a network error would. An optional per-URL delay
/// makes slow sources reproducible.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    bodies: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, xml: &str) -> Self {
        self.bodies.insert(url.to_string(), xml.to_string());
        self
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

#[async_trait]
impl FeedTransport for FixtureTransport {
    async fn fetch_feed(&self, url: &str) -> Result<ParsedFeed> {
        if let Some(d) = self.delays.get(url) {
            tokio::time::sleep(*d).await;
        }
        let body = self
            .bodies
            .get(url)
            .ok_or_else(|| anyhow!("no fixture registered for {url}"))?;
        parse_feed(body)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
