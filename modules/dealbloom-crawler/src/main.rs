use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use dealbloom_common::Config;
use dealbloom_content::CHAT_MODEL;
use dealbloom_crawler::Crawler;
use dealbloom_store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dealbloom=info".parse()?))
        .init();

    info!("DealBloom crawler starting...");

    let config = Config::crawl_from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Store::new(pool);
    store.migrate().await?;

    let model = OpenAi::new(&config.openai_api_key, CHAT_MODEL);

    let crawler = Crawler::new(
        store,
        model,
        config.partners_email.clone(),
        config.partners_password.clone(),
        !config.is_development(),
    );

    let stats = crawler.run().await?;
    info!("Crawl finished. {stats}");

    Ok(())
}
