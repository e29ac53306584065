//! # Revalidating cache
//! Serves the last `AggregationResult` until it is older than the
//! revalidation interval, then rebuilds it. Manual refresh forces a rebuild.
//!
//! Only the finished result is kept; no article state carries across runs.

use metrics::counter;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::aggregator::Aggregator;
use crate::article::AggregationResult;

#[derive(Debug, Clone)]
struct Entry {
    built: Instant,
    result: Arc<AggregationResult>,
}

pub struct NewsCache {
    aggregator: Arc<Aggregator>,
    revalidate: Duration,
    current: RwLock<Option<Entry>>,
    // Single-flight: concurrent misses wait for one rebuild.
    rebuild: Mutex<()>,
}

impl NewsCache {
    pub fn new(aggregator: Arc<Aggregator>, revalidate: Duration) -> Self {
        Self {
            aggregator,
            revalidate,
            current: RwLock::new(None),
            rebuild: Mutex::new(()),
        }
    }

    /// Cached result if still fresh, otherwise a new aggregation run.
    pub async fn get(&self) -> Arc<AggregationResult> {
        if let Some(r) = self.fresh() {
            counter!("news_cache_hits_total").increment(1);
            return r;
        }
        let _guard = self.rebuild.lock().await;
        // Another caller may have rebuilt while we waited.
        if let Some(r) = self.fresh() {
            counter!("news_cache_hits_total").increment(1);
            return r;
        }
        counter!("news_cache_misses_total").increment(1);
        self.rebuild_now().await
    }

    /// Manual trigger: rebuild regardless of age.
    pub async fn refresh(&self) -> Arc<AggregationResult> {
        let _guard = self.rebuild.lock().await;
        self.rebuild_now().await
    }

    /// Age of the cached result, if any.
    pub fn age(&self) -> Option<Duration> {
        self.read().as_ref().map(|e| e.built.elapsed())
    }

    fn fresh(&self) -> Option<Arc<AggregationResult>> {
        self.read()
            .as_ref()
            .filter(|e| e.built.elapsed() < self.revalidate)
            .map(|e| Arc::clone(&e.result))
    }

    async fn rebuild_now(&self) -> Arc<AggregationResult> {
        let result = Arc::new(self.aggregator.aggregate().await);
        let mut slot = match self.current.write() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        *slot = Some(Entry {
            built: Instant::now(),
            result: Arc::clone(&result),
        });
        result
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Entry>> {
        match self.current.read() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}
