//! Keyword research worker.
//!
//! One-shot batch run: processes every unprocessed keyword entry in the
//! configured Notion database and exits.

use std::time::Duration;

use anyhow::Result;
use groq_client::GroqClient;
use notion_client::NotionClient;
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordbrief::{
    pipeline, Config, DuckDuckGoSearcher, GroqSummarizer, NotionKeywordStore, PageExtractor,
    PipelineConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wordbrief=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::from_env()?;

    let store = NotionKeywordStore::new(
        NotionClient::new(config.notion_token.expose_secret()),
        config.notion_database_id.clone(),
    );
    let searcher = DuckDuckGoSearcher::new();
    let extractor = PageExtractor::new();
    let summarizer = GroqSummarizer::new(
        GroqClient::new(config.groq_api_key.expose_secret()),
        config.groq_model.clone(),
    );
    let pipeline_config =
        PipelineConfig::new().with_pause(Duration::from_secs(config.pause_secs));

    tracing::info!(model = %config.groq_model, "starting wordbrief worker");

    let report = pipeline::run(&store, &searcher, &extractor, &summarizer, &pipeline_config).await?;

    tracing::info!(
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        "run complete"
    );
    if !report.is_success() {
        tracing::warn!(keywords = ?report.failed_keywords, "entries failed this run");
    }

    Ok(())
}
