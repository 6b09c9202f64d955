use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nightingale::llm::{AnthropicExtractor, LlmClient};
use nightingale::store::postgres::{create_pool, PgMetadataStore};
use nightingale::store::s3::S3BlobStore;
use nightingale::{Config, Pipeline};

/// Smoke driver: wires the pipeline against the production backends and
/// ingests a single resume passed on the command line as
/// `<subject-uuid> <path>`. The HTTP transport lives elsewhere; this
/// binary exists for local end-to-end runs.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Nightingale pipeline v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config.database_url).await?;
    let meta = Arc::new(PgMetadataStore::new(pool));

    let blobs = Arc::new(S3BlobStore::from_config(&config));
    info!("S3 client initialized");

    let llm = Arc::new(AnthropicExtractor::new(LlmClient::new(
        config.anthropic_api_key.clone(),
    )));
    info!("LLM client initialized");

    let pipeline = Pipeline::new(blobs, meta, llm);

    let mut args = std::env::args().skip(1);
    let (Some(subject), Some(path)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: nightingale <subject-uuid> <resume-path>");
    };
    let subject = subject.parse()?;
    let bytes = std::fs::read(&path)?;
    let filename = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or(path.clone());

    let outcome = pipeline
        .upload_resume(
            subject,
            nightingale::pipeline::Upload {
                filename,
                content_type: "application/octet-stream".to_string(),
                bytes,
            },
        )
        .await?;

    info!(
        resume_id = %outcome.resume_id,
        has_text = outcome.has_text,
        warning = outcome.warning.as_deref().unwrap_or("none"),
        "upload complete"
    );
    if let Some(record) = outcome.record {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    Ok(())
}
