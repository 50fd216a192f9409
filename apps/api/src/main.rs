//! Bakery API - REST server for the bakery back-office

use axum_helpers::{create_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::{AppState, BakeryStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let state = AppState {
        config: config.clone(),
        store: BakeryStore::new(),
    };

    let api_routes = api::routes(&state);
    let app = create_router::<openapi::ApiDoc>(api_routes);

    info!(
        "Starting Bakery API on port {} ({:?})",
        state.config.server.port, state.config.environment
    );

    create_app(app, &state.config.server).await?;

    info!("Bakery API shutdown complete");
    Ok(())
}
