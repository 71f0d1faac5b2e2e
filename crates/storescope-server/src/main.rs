mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use storescope_analysis::AnalysisConfig;
use storescope_scraper::{PageFetcher, ProfileCache, ProfileCollector};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storescope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let fetcher = PageFetcher::new(
        config.fetch_timeout_secs,
        &config.fetch_user_agent,
        config.fetch_max_retries,
        config.fetch_backoff_base_ms,
    )?;
    let collector = ProfileCollector::new(fetcher, config.max_followup_fetches);
    let cache = Arc::new(ProfileCache::new(
        collector,
        Duration::from_secs(config.cache_ttl_secs),
    ));
    let analysis = Arc::new(AnalysisConfig::from_app_config(&config));

    let app = build_app(AppState { cache, analysis });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "storescope listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
