use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};

use studyhub::logging::{init_tracing, shutdown_tracer};
use studyhub::metrics::{init_metrics, metrics_app};
use studyhub::modules::auth::service::AuthService;
use studyhub::router::init_router;
use studyhub::state::init_app_state;
use studyhub_config::ServerConfig;
use studyhub_db::run_migrations;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();

    let state = init_app_state()
        .await
        .context("failed to connect to the database")?;
    run_migrations(&state.db)
        .await
        .context("failed to run database migrations")?;

    if let Some((email, password)) = server_config.bootstrap_admin() {
        AuthService::ensure_admin(&state.db, "Administrator", email, password)
            .await
            .map_err(|e| e.error)
            .context("failed to bootstrap the admin account")?;
    }

    if let Some(handle) = init_metrics() {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], server_config.metrics_port));
        tokio::spawn(async move {
            match TcpListener::bind(metrics_addr).await {
                Ok(listener) => {
                    info!("Metrics available at http://{}/metrics", metrics_addr);
                    if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                        error!(error = %e, "metrics server stopped");
                    }
                }
                Err(e) => error!(error = %e, %metrics_addr, "failed to bind metrics listener"),
            }
        });
    }

    let app = init_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 Server running on http://localhost:{}", server_config.port);
    info!(
        "📚 Swagger UI available at http://localhost:{}/swagger-ui",
        server_config.port
    );
    info!(
        "📖 Scalar UI available at http://localhost:{}/scalar",
        server_config.port
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
