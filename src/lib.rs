// src/lib.rs
// Public library surface: the aggregation pipeline, plus the HTTP app the binary mounts.

pub mod aggregator;
pub mod analyze;
pub mod api;
pub mod article;
pub mod cache;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod sources;

pub use crate::aggregator::Aggregator;
pub use crate::api::{router, AppState};
pub use crate::article::{AggregationResult, Article, Category};
pub use crate::cache::NewsCache;
pub use crate::sources::{CredibilityTier, FeedSource, SourceRegistry};

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// One aggregation run with env config and the HTTP transport.
///
/// Never fails: if the registry or client cannot be set up the run yields
/// four empty sections and the error is logged.
pub async fn aggregate() -> AggregationResult {
    match Aggregator::from_env() {
        Ok(agg) => agg.aggregate().await,
        Err(e) => {
            error!(target: "aggregate", error = ?e, "aggregator setup failed");
            AggregationResult::empty(Utc::now())
        }
    }
}

/// Full in-process app: news routes, plus `/metrics` when `DEBUG_ROUTES=1`.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = config::AggregatorConfig::from_env();
    let aggregator = Arc::new(Aggregator::from_env()?);
    info!(
        target: "aggregate",
        sources = aggregator.registry().len(),
        revalidate_secs = cfg.revalidate.as_secs(),
        "news app starting"
    );

    let state = AppState::new(NewsCache::new(aggregator, cfg.revalidate));
    let mut app = router(state);

    if crate::metrics::debug_routes_enabled() {
        let m = crate::metrics::Metrics::init(cfg.revalidate.as_secs())?;
        app = app.merge(m.router());
    }
    Ok(app)
}
