use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::article::{Article, Category};
use crate::cache::NewsCache;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<NewsCache>,
}

impl AppState {
    pub fn new(cache: NewsCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/news", get(news))
        .route("/news/{category}", get(news_section))
        .route("/admin/refresh", post(admin_refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn news(State(state): State<AppState>) -> Response {
    let result = state.cache.get().await;
    Json(result.as_ref().clone()).into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionOut {
    category: Category,
    articles: Vec<Article>,
    last_updated: String,
}

async fn news_section(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Response {
    let Some(category) = Category::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(&category))
    else {
        return (StatusCode::NOT_FOUND, format!("unknown category: {category}")).into_response();
    };

    let result = state.cache.get().await;
    Json(SectionOut {
        category,
        articles: result.section(category).to_vec(),
        last_updated: result.last_updated.clone(),
    })
    .into_response()
}

async fn admin_refresh(State(state): State<AppState>) -> Response {
    tracing::info!(target: "aggregate", "manual refresh requested");
    let result = state.cache.refresh().await;
    Json(result.as_ref().clone()).into_response()
}
