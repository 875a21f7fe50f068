use std::sync::Arc;

use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes::{self, ServerState};
use models::db::{connect_with_config, DatabaseConfig};
use service::partner::{repo::seaorm::SeaOrmPartnerRepository, PartnerRepository};

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: connect, migrate, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrated", "database schema up to date");

    let repo: Arc<dyn PartnerRepository> = Arc::new(SeaOrmPartnerRepository::new(db));
    let app = routes::build_router(ServerState::new(repo), build_cors());

    // Bind and serve
    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "partner directory listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
