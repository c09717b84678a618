//! TaskTrack server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use task_store::{Database, JsonTaskStore, StorageGateway};
use tasktrack_server::{config::Config, create_app, init_tracing, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&config.log_level);

    tracing::info!("Starting TaskTrack server");

    // The database is optional at startup. When the connection fails, the
    // JSON document serves every request instead.
    let database = match Database::connect(&config.db_path).await {
        Ok(db) => Some(Arc::new(db)),
        Err(e) => {
            tracing::warn!(error = %e, "database connection failed, using the JSON file store");
            None
        }
    };

    let file_store = JsonTaskStore::new(config.tasks_file.clone());
    let gateway = StorageGateway::new(database, file_store);

    let state = Arc::new(AppState::new(config.clone(), gateway));
    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
