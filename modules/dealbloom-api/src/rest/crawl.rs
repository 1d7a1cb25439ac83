use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use dealbloom_crawler::Crawler;

use crate::AppState;

/// POST /api/crawl. Synchronous and unauthenticated; the response arrives
/// once the whole pass is done.
pub async fn api_crawl(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    run_crawl(state).await
}

/// GET variant for poking the pipeline from a browser during development.
pub async fn api_crawl_dev(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.config.is_development() {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(serde_json::json!({ "error": "GET method only allowed in development" })),
        )
            .into_response();
    }
    run_crawl(state).await
}

async fn run_crawl(state: Arc<AppState>) -> Response {
    info!("Crawl triggered via API");

    let crawler = Crawler::new(
        state.store.clone(),
        state.model.clone(),
        state.config.partners_email.clone(),
        state.config.partners_password.clone(),
        !state.config.is_development(),
    );

    match crawler.run().await {
        Ok(stats) => {
            info!("Crawl finished. {stats}");
            Json(serde_json::json!({
                "success": true,
                "message": "Crawl completed",
            }))
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Crawl run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Crawl failed",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
