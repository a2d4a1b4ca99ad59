use anyhow::Context;
use futures_dashboard::datasource::BinanceDataSource;
use futures_dashboard::{api, config::Config, DataSource};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;

    let binance = Arc::new(
        BinanceDataSource::from_config(&config).context("Failed to build HTTP client")?,
    );
    if let Err(e) = binance.sync_time().await {
        tracing::warn!(error = %e, "initial clock sync failed, using local time");
    }

    if config.time_sync_interval_ms > 0 {
        let binance = binance.clone();
        let period = Duration::from_millis(config.time_sync_interval_ms);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = binance.sync_time().await {
                    tracing::warn!(error = %e, "periodic clock sync failed");
                }
            }
        });
    }

    let datasource: Arc<dyn DataSource> = binance;
    let state = api::AppState::new(datasource, config.clone());

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "purged expired sessions");
            }
        }
    });

    let app = api::create_router(state);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
