mod api;
mod middleware;
mod scheduler;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use repolens_pipeline::Services;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, build_cors, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(repolens_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting repolens-server");

    let pool_config = repolens_db::PoolConfig::from_app_config(&config);
    let pool = repolens_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = repolens_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let services = Services::from_config(&config, pool.clone())?;
    let _scheduler = scheduler::build_scheduler(&services, &config).await?;

    let app = build_app(
        AppState {
            pool,
            ingestor: Arc::clone(&services.ingestor),
        },
        build_cors(&config.cors_origin)?,
    );

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
