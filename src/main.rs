// Web-based image captioner backed by OpenRouter's chat-completions API.

use std::sync::Arc;

use anyhow::Context;
use openrouter_captioner::{client::build_http_client, server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openrouter_captioner=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(
        model = %config.model,
        api_url = %config.api_url,
        timeout_secs = config.request_timeout.as_secs(),
        max_concurrent = config.max_concurrent,
        "configuration loaded"
    );

    let http = build_http_client(&config).context("failed to build HTTP client")?;
    let bind_addr = config.bind_addr.clone();
    let app = server::router(Arc::new(server::AppState { config, http }));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("server running on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
