// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serial_test::serial;
use tower::ServiceExt;

// Build full in-process app (includes /metrics when gated via env).
async fn build_app() -> Router {
    metro_headlines::app()
        .await
        .expect("app() should build Router in tests")
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_is_gated_by_debug_routes() {
    std::env::remove_var("DEBUG_ROUTES");
    let app = build_app().await;
    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_exposes_news_series() {
    std::env::set_var("DEBUG_ROUTES", "1");
    std::env::set_var("NEWS_REVALIDATE_SECS", "900");
    let app = build_app().await;

    let resp = app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();
    let value = text
        .lines()
        .find_map(|l| l.strip_prefix("news_revalidate_secs "))
        .and_then(|v| v.trim().parse::<f64>().ok());
    assert_eq!(value, Some(900.0), "missing revalidate gauge in:\n{text}");

    // Health still served alongside.
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    std::env::remove_var("DEBUG_ROUTES");
    std::env::remove_var("NEWS_REVALIDATE_SECS");
}

#[tokio::test]
#[serial]
async fn pipeline_series_reach_the_prometheus_recorder() {
    use std::sync::Arc;
    use std::time::Duration;

    use metro_headlines::article::Category;
    use metro_headlines::ingest::providers::FixtureTransport;
    use metro_headlines::metrics::Metrics;
    use metro_headlines::sources::{CredibilityTier, FeedSource, SourceRegistry};
    use metro_headlines::Aggregator;

    let m = Metrics::init(60).expect("install recorder");

    let url = "https://metrics.test/feed/";
    let ts = chrono::Utc::now().to_rfc2822();
    let xml = format!(
        "<rss version=\"2.0\"><channel><item><title>Council passes transit budget</title>\
         <link>https://metrics.test/1</link><pubDate>{ts}</pubDate></item></channel></rss>"
    );
    let agg = Aggregator::new(
        SourceRegistry::new(vec![FeedSource::new(
            url,
            "Metrics Test",
            Category::Local,
            CredibilityTier::DIGITAL,
        )]),
        Arc::new(FixtureTransport::new().with_feed(url, &xml)),
        Duration::from_secs(5),
    );
    let result = agg.aggregate().await;
    assert_eq!(result.local.len(), 1);

    let text = m.handle.render();
    for series in [
        "news_fetch_items_total",
        "news_fetch_ms",
        "news_last_aggregation_ts",
    ] {
        assert!(text.contains(series), "missing {series} in:\n{text}");
    }
}
