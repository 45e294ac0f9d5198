use std::sync::Arc;
use votes_backend::{
    build_rocket,
    config::Config,
    queries::PgVoteStore,
    routes::AppState,
    store::{MemoryVoteStore, VoteStore},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting restaurant voting server");
    let config = Config::from_env()?;

    let store: Arc<dyn VoteStore> = if config.store.development_mode {
        warn!("DEVELOPMENT_MODE is on - serving sample votes from memory");
        Arc::new(MemoryVoteStore::seeded())
    } else {
        let store = PgVoteStore::connect(&config.store).await?;
        store.ensure_table().await?;
        info!("📋 Vote table '{}' ready", config.store.table);
        Arc::new(store)
    };

    let state = AppState::new(store, &config.stress);
    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));

    build_rocket(figment, state).launch().await.map_err(|e| {
        error!("Server stopped: {}", e);
        e
    })?;

    Ok(())
}
