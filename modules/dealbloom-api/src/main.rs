use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use dealbloom_common::Config;
use dealbloom_content::CHAT_MODEL;
use dealbloom_store::Store;

mod auth;
mod rest;

pub struct AppState {
    pub store: Store,
    pub model: OpenAi,
    pub config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dealbloom=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Store::new(pool);
    store.migrate().await?;

    let model = OpenAi::new(&config.openai_api_key, CHAT_MODEL);

    let host = config.web_host.clone();
    let port = config.web_port;

    let state = Arc::new(AppState {
        store,
        model,
        config,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Crawl trigger
        .route("/api/crawl", post(rest::crawl::api_crawl).get(rest::crawl::api_crawl_dev))
        // Public REST API
        .route("/api/campaigns", get(rest::api_campaigns))
        .route("/api/campaigns/{id}", get(rest::api_campaign_detail))
        .route("/api/blog", get(rest::api_blog_posts))
        .route("/api/blog/{slug}", get(rest::api_blog_post_detail))
        // Admin REST API (Basic auth)
        .route("/api/admin/campaigns", post(rest::admin::api_admin_create_campaign))
        .route("/api/admin/campaigns/all", get(rest::admin::api_admin_campaigns))
        .route(
            "/api/admin/campaigns/{id}",
            patch(rest::admin::api_admin_update_campaign)
                .delete(rest::admin::api_admin_delete_campaign),
        )
        .route("/api/admin/blog", get(rest::admin::api_admin_posts))
        .route(
            "/api/admin/blog/{id}",
            patch(rest::admin::api_admin_update_post).delete(rest::admin::api_admin_delete_post),
        )
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{host}:{port}");
    info!("DealBloom API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
