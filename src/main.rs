//! Metro Headlines: binary entrypoint.
//! Boots the Axum HTTP server serving the cached aggregation result.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Tracing is opt-in: `NEWS_DEV_LOG=1`. `NEWS_LOG_FORMAT=json` switches
/// from compact lines to JSON.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("NEWS_DEV_LOG").is_ok_and(|v| v == "1");
    if !dev_flag {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ingest=info,filter=info,aggregate=info,warn"));

    let json = std::env::var("NEWS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let router = metro_headlines::app().await?;
    Ok(router.into())
}
