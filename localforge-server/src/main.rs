use clap::Parser;
use localforge_retrieval::DEFAULT_EXTENSIONS;
use localforge_server::{build_state, index_directory, router, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::parse();
    let state = build_state(&settings).await?;

    if let Some(path) = &settings.auto_index_path {
        match index_directory(&state, path, DEFAULT_EXTENSIONS).await {
            Ok(count) => {
                tracing::info!(path = %path.display(), indexed = count, "auto-index complete")
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "auto-index failed")
            }
        }
    }

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    tracing::info!(addr = %settings.bind, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "failed to listen for shutdown signal");
    }
}
