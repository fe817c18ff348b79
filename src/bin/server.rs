//! Server: loads config from env (and `.env`), connects the pool, mounts resources, serves
//! until Ctrl-C or SIGTERM, then closes the pool.

use football_stats::{build_app, PgStore, ResourceRegistry, ServerConfig, Store};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("football_stats=info,tower_http=info")),
        )
        .init();
    // Panics outside a request are logged; the runtime keeps serving.
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "uncaught panic");
    }));

    let config = ServerConfig::from_env()?;
    let pg = PgStore::connect(&config.database).await?;
    let store: Arc<dyn Store> = Arc::new(pg.clone());

    let registry = match &config.routes_dir {
        Some(dir) => ResourceRegistry::discover(dir).await,
        None => ResourceRegistry::builtin(),
    };
    let app = build_app(store, registry, config.body_limit_bytes).await;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pg.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for SIGTERM"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
