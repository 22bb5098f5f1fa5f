use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use hos_server::config::ServerConfig;
use hos_server::fuel::{
    CachedStationSearch, FixedStationDirectory, FuelStationLocator, OverpassClient,
    StationBackend,
};
use hos_server::hos::{PlannerConfig, TripPlanner};
use hos_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hos_server=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let backend = match &config.station_directory {
        Some(path) => {
            let directory = FixedStationDirectory::from_json_file(path)?;
            info!(
                path = %path.display(),
                stations = directory.len(),
                "loaded fixed station directory"
            );
            StationBackend::Directory(directory)
        }
        None => {
            let client = OverpassClient::new(config.overpass.clone())?;
            info!(url = %config.overpass.base_url, "using Overpass station search");
            StationBackend::Overpass(CachedStationSearch::new(client, &config.cache))
        }
    };

    info!(backend = backend.name(), "station search ready");

    let locator = FuelStationLocator::new(backend, config.locator.clone());
    let planner = TripPlanner::new(locator, PlannerConfig::default());
    let app = create_router(AppState::new(planner, config.plan_timeout));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "HOS trip planner listening");
    info!("  GET  /health        - Health check");
    info!("  POST /api/plan-trip - Plan a trip");

    axum::serve(listener, app).await?;
    Ok(())
}
