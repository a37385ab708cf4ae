use dotenvy::dotenv;
use script_relay::config::RelayConfig;
use script_relay::services::source::GitHubSource;
use script_relay::{AppState, create_app};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "script_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting script relay...");

    let config = RelayConfig::from_env();
    info!(
        "📂 Source: {}/{} {} via {}",
        config.repo_owner,
        config.repo_name,
        config.display_dir(),
        config.github_api_url
    );
    if config.api_key.is_none() {
        warn!("API_KEY is not set, every script request will be rejected");
    }
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set, script requests will fail with NO_GITHUB_TOKEN");
    }

    let source = GitHubSource::new(&config)?;

    let state = AppState {
        source: Arc::new(source),
        config: config.clone(),
    };

    let app = create_app(state);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✅ Server ready at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
