use std::net::SocketAddr;
use std::path::Path;

use dino_api::config::{ConfigError, ServerConfig};
use dino_api::{db, logging, router, AppState, DinosaurCatalog};

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    // A missing .env is fine; real environment variables take precedence.
    let _ = dotenvy::dotenv();

    let config_path = std::env::var("SERVER_CONFIG_PATH")
        .unwrap_or_else(|_| "crates/server/res/config.toml".to_string());

    let config = ServerConfig::load(Path::new(&config_path)).await?;
    logging::init_tracing(&config)?;

    tracing::info!(dialect = ?config.dialect()?, "store dialect configured");
    tracing::info!(host = %config.http.host, port = config.http.port, "server http bind");

    let dinosaurs = DinosaurCatalog::bundled()
        .map_err(|e| ConfigError::Invalid(format!("dinosaur dataset invalid: {e}")))?;
    tracing::info!(records = dinosaurs.len(), "dinosaur dataset loaded");

    let store = db::connect_store(&config, Path::new(&config_path)).await?;

    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("invalid http bind: {e}")))?;

    let app = router(AppState::new(store.clone(), dinosaurs));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    tracing::info!("store closed");

    served.map_err(|e| ConfigError::Invalid(format!("http server error: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
